//! Correlation id shared by a request's log lines, error bodies and the
//! `trace-id` response header.
//!
//! The [`crate::Trace`] middleware opens a scope per request; anything that
//! runs inside it (handlers, services, repository calls awaited on the same
//! task) can read the id back with [`TraceId::current`]. Work moved onto a
//! spawned task has to be wrapped in [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID v4 correlating one request across logs and error payloads.
///
/// ```
/// use recipe_backend::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id: TraceId = "5f0c6c1e-8d5b-4c8e-9a53-2b7b0e6f4a10".parse().expect("uuid");
/// assert_eq!(TraceId::current(), None);
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

/// A trace id string that is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trace id must be a UUID: {value}")]
pub struct InvalidTraceId {
    value: String,
}

impl TraceId {
    /// Fresh random id for an incoming request.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being handled on this task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = InvalidTraceId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self).map_err(|_| InvalidTraceId {
            value: value.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn nested_scopes_restore_the_outer_id() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();

        let seen = TraceId::scope(outer, async move {
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (nested, TraceId::current())
        })
        .await;

        assert_eq!(seen, (Some(inner), Some(outer)));
        assert_eq!(TraceId::current(), None);
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        let id = TraceId::generate();
        assert_eq!(id.to_string().parse::<TraceId>(), Ok(id));
    }

    #[rstest]
    #[case("")]
    #[case("recipe-42")]
    #[case("5f0c6c1e-8d5b-4c8e-9a53")]
    fn non_uuid_strings_are_rejected(#[case] raw: &str) {
        assert!(raw.parse::<TraceId>().is_err());
    }
}
