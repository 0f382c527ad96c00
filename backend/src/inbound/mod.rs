//! Inbound adapters translating external requests into domain port calls.
//!
//! The REST API under [`http`] is the only transport.

pub mod http;
