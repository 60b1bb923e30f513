//! Visit event model for asynchronous visit recording.

use crate::domain::entities::NewVisit;

/// An in-memory visit event passed from the redirect handler to the worker.
///
/// Decouples the redirect response from the audit write: the handler
/// `try_send`s the event and returns immediately.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler after a successful resolution
/// 2. Sent to the bounded channel (non-blocking, dropped when full)
/// 3. Processed by [`crate::domain::visit_worker::run_visit_worker`]
/// 4. Converted to [`NewVisit`] for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    pub short_code: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl VisitEvent {
    /// Creates a new visit event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = VisitEvent::new(
    ///     "aB3dE9z".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     None,
    /// );
    /// ```
    pub fn new(
        short_code: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            short_code,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }
}

impl From<VisitEvent> for NewVisit {
    fn from(event: VisitEvent) -> Self {
        Self {
            short_code: event.short_code,
            ip: event.ip,
            user_agent: event.user_agent,
            referer: event.referer,
        }
    }
}
