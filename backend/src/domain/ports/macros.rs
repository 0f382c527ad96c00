//! `define_port_error!`, the declaration form shared by every driven port's
//! error enum.
//!
//! Port errors carry only human-readable text: each variant names its
//! `String` fields and a display template, and gets a snake_case builder
//! taking `impl Into<String>` per field.
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by recipe repository adapters.
//!     pub enum RecipePersistenceError {
//!         Query { message } => "recipe repository query failed: {message}",
//!     }
//! }
//!
//! let err = RecipePersistenceError::query("timeout");
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: String),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Build a `" $variant "` error."]
                    pub fn [<$variant:snake>]($($field: impl Into<String>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;
