//! Inactivity monitor.
//!
//! Forces a sign-out after a fixed idle period, but only while a session is
//! active. Every qualifying interaction re-arms a single sliding deadline.

use super::deadline::Deadline;
use crate::auth::{AuthProvider, SignOutScope, STALE_SESSION_MESSAGE};
use crate::error::VaultError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Idle period after which the user is signed out (5 minutes).
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_millis(300_000);

/// The interaction kinds that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

/// Policy for which sign-out failures at the idle deadline are suppressed.
///
/// The deadline's check-then-act sequence races with concurrent external
/// sign-outs, so a sign-out can fail because the session disappeared between
/// the check and the call. How broadly that failure is treated as expected
/// is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// Suppress every failure that classifies as a stale session (by error
    /// code or recognized message).
    #[default]
    AllStaleSession,
    /// Suppress only failures carrying the backend's exact
    /// session-no-longer-exists message.
    KnownMessageOnly,
}

impl SuppressionPolicy {
    /// Returns true if the given sign-out failure should be suppressed.
    pub fn suppresses(&self, err: &VaultError) -> bool {
        match self {
            SuppressionPolicy::AllStaleSession => err.is_stale_session(),
            SuppressionPolicy::KnownMessageOnly => match err {
                VaultError::Auth { message, .. } => message.contains(STALE_SESSION_MESSAGE),
                _ => false,
            },
        }
    }
}

/// Watches for user inactivity and signs the session out when the idle
/// deadline expires.
///
/// The monitor is armed only while the caller-supplied authenticated flag is
/// true; clearing the flag cancels the pending deadline immediately, so a
/// sign-out can never fire for a session that already ended.
pub struct InactivityMonitor {
    timeout: Duration,
    deadline: Deadline,
    authenticated: AtomicBool,
    closed: AtomicBool,
    provider: Arc<dyn AuthProvider>,
    policy: SuppressionPolicy,
}

impl InactivityMonitor {
    /// Creates a monitor with the standard 5-minute timeout.
    pub fn new(provider: Arc<dyn AuthProvider>, policy: SuppressionPolicy) -> Self {
        Self::with_timeout(provider, policy, INACTIVITY_TIMEOUT)
    }

    /// Creates a monitor with a custom timeout.
    pub fn with_timeout(
        provider: Arc<dyn AuthProvider>,
        policy: SuppressionPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            timeout,
            deadline: Deadline::new(),
            authenticated: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            provider,
            policy,
        }
    }

    /// Arms or disarms the monitor.
    ///
    /// Arming schedules the initial deadline; disarming cancels any pending
    /// deadline so it can never fire afterwards.
    pub fn set_authenticated(&self, authenticated: bool) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        self.authenticated.store(authenticated, Ordering::SeqCst);
        if authenticated {
            tracing::debug!("[InactivityMonitor] Armed");
            self.rearm();
        } else {
            tracing::debug!("[InactivityMonitor] Disarmed");
            self.deadline.cancel();
        }
    }

    /// Records a qualifying user interaction, sliding the deadline forward.
    ///
    /// Re-arming is idempotent under rapid-fire events: only one deadline is
    /// ever pending, and the monitor never double-fires.
    pub fn record_activity(&self, kind: ActivityKind) {
        if self.closed.load(Ordering::SeqCst) || !self.authenticated.load(Ordering::SeqCst) {
            return;
        }

        tracing::trace!("[InactivityMonitor] Activity: {:?}", kind);
        self.rearm();
    }

    /// Tears the monitor down: cancels the pending deadline and detaches
    /// activity intake. Safe to call multiple times.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.deadline.cancel();
    }

    /// Returns true while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_armed()
    }

    fn rearm(&self) {
        let provider = self.provider.clone();
        let policy = self.policy;
        self.deadline
            .arm(self.timeout, sign_out_if_idle(provider, policy));
    }
}

/// The expiry action: verify a session still exists, then sign out.
///
/// The check-then-act sequence is not atomic with respect to a concurrent
/// external sign-out; the resulting "already gone" failure is expected and
/// suppressed per the policy. No failure here ever propagates to the caller.
async fn sign_out_if_idle(provider: Arc<dyn AuthProvider>, policy: SuppressionPolicy) {
    match provider.get_session().await {
        Ok(Some(_)) => {
            tracing::info!("[InactivityMonitor] Idle timeout reached, signing out");
            if let Err(err) = provider.sign_out(SignOutScope::Global).await {
                if policy.suppresses(&err) {
                    tracing::warn!(
                        "[InactivityMonitor] Sign out failed (expected for invalid session): {}",
                        err
                    );
                } else {
                    tracing::warn!("[InactivityMonitor] Sign out failed: {}", err);
                }
            }
        }
        Ok(None) => {
            tracing::debug!("[InactivityMonitor] Idle deadline fired with no session");
        }
        Err(err) => {
            tracing::warn!(
                "[InactivityMonitor] Session check failed at idle deadline: {}",
                err
            );
        }
    }
}
