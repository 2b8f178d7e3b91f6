//! Session state machine.
//!
//! The session lifecycle is modeled as an explicit three-state machine with
//! a single transition function, so every transition can be unit tested
//! instead of being scattered across ad hoc flag checks.

use super::model::AuthSession;

/// The lifecycle state of the current client session.
///
/// - `Initializing`: the initial session check has not resolved yet
/// - `Authenticated`: a live session exists
/// - `Unauthenticated`: no session exists
///
/// There is no terminal state; a tab-lifetime store cycles between
/// `Authenticated` and `Unauthenticated` indefinitely.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// The initial session check has not completed
    #[default]
    Initializing,
    /// A session is live
    Authenticated(AuthSession),
    /// No session exists
    Unauthenticated,
}

/// Inputs that drive the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionTransition {
    /// The initial session check resolved (exactly once per store lifetime)
    Resolved(Option<AuthSession>),
    /// An explicit sign-in or sign-up succeeded
    SignedIn(AuthSession),
    /// An explicit sign-out completed, or the session was invalidated
    SignedOut,
    /// A push notification arrived from the backend's auth-change stream
    Notified(Option<AuthSession>),
}

impl SessionState {
    /// Applies a transition and returns the next state.
    ///
    /// Every input yields a definite next state: the in-memory session value
    /// follows last-write-wins semantics between explicit calls and push
    /// notifications, matching the ordering guarantees of the backend.
    /// `Initializing` is only ever left, never re-entered.
    pub fn apply(self, transition: SessionTransition) -> SessionState {
        match transition {
            SessionTransition::Resolved(Some(session))
            | SessionTransition::SignedIn(session)
            | SessionTransition::Notified(Some(session)) => SessionState::Authenticated(session),
            SessionTransition::Resolved(None)
            | SessionTransition::SignedOut
            | SessionTransition::Notified(None) => SessionState::Unauthenticated,
        }
    }

    /// Returns true while the initial session check is unresolved.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    /// Returns true if a session is live.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Returns the live session, if any.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}
