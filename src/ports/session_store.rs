//! Session registry port definition.

use crate::domain::{AppError, SessionId, SessionState};

/// Registry of per-session state. Every write replaces a session's state
/// as a whole.
pub trait SessionStore: Send + Sync {
    /// Register a new, empty session.
    fn create(&self) -> SessionId;

    /// Record activity on a known session. False if it is unknown or has
    /// been idle too long, in which case it is dropped.
    fn touch(&self, id: &SessionId) -> bool;

    fn get(&self, id: &SessionId) -> Result<SessionState, AppError>;

    fn set(&self, id: &SessionId, state: SessionState) -> Result<(), AppError>;

    /// Read-modify-write under the session's lock. On error the stored
    /// state is left as it was.
    fn update(
        &self,
        id: &SessionId,
        f: &mut dyn FnMut(&SessionState) -> Result<SessionState, AppError>,
    ) -> Result<SessionState, AppError>;

    /// Mark a generation as running. Returns false if one already is.
    fn begin_generation(&self, id: &SessionId) -> Result<bool, AppError>;

    fn end_generation(&self, id: &SessionId);
}
