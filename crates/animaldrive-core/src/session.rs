//! Session-expiry interception.
//!
//! [`SessionGuard`] is a one-way latch: the first auth failure shows the
//! "logged out" notice and schedules the redirect to the login page, and
//! every later failure on the same page is swallowed. The state flag is set
//! before any side effect runs, in the same synchronous step as the check.

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

use crate::config::{LOGIN_REDIRECT_DELAY_MS, api};
use crate::error::DriveError;
use crate::host::Host;
use crate::models::Notice;

/// Authentication state of the current page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Authenticated,
    /// Terminal: only a full reload leaves this state.
    Unauthenticated,
}

/// Redirects to login the first time the session is found to be gone.
pub struct SessionGuard {
    state: Cell<SessionState>,
    host: Rc<dyn Host>,
    login_url: String,
    logout_url: String,
    delay_ms: u32,
}

impl SessionGuard {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            state: Cell::new(SessionState::Authenticated),
            host,
            login_url: api::LOGIN.to_string(),
            logout_url: api::LOGOUT.to_string(),
            delay_ms: LOGIN_REDIRECT_DELAY_MS,
        }
    }

    /// Prefix the login/logout targets with `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.login_url = format!("{}{}", base, api::LOGIN);
        self.logout_url = format!("{}{}", base, api::LOGOUT);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.get() == SessionState::Authenticated
    }

    /// Hand `err` to the guard.
    ///
    /// Returns `true` when the error was an auth failure; the caller must
    /// then take no further action for it.
    pub fn intercept(&self, err: &DriveError) -> bool {
        if !err.is_auth() {
            return false;
        }
        self.expire();
        true
    }

    /// Enter `Unauthenticated`.
    ///
    /// Only the first call emits the notice and schedules the redirect;
    /// returns whether this call did so.
    pub fn expire(&self) -> bool {
        if self.state.replace(SessionState::Unauthenticated) == SessionState::Unauthenticated {
            return false;
        }

        warn!("session: expired, redirecting to {}", self.login_url);
        self.host.notify(Notice::session_expired());

        let host = self.host.clone();
        let login_url = self.login_url.clone();
        self.host.schedule(
            self.delay_ms,
            Box::new(move || host.navigate(&login_url)),
        );
        true
    }

    /// Leave the app through the logout endpoint.
    pub fn logout(&self) {
        info!("session: logging out");
        self.state.set(SessionState::Unauthenticated);
        self.host.navigate(&self.logout_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingHost;

    fn guard() -> (SessionGuard, Rc<RecordingHost>) {
        let host = Rc::new(RecordingHost::new());
        (SessionGuard::new(host.clone()), host)
    }

    #[test]
    fn test_starts_authenticated() {
        let (guard, host) = guard();
        assert!(guard.is_authenticated());
        assert!(host.notices().is_empty());
    }

    #[test]
    fn test_ignores_non_auth_errors() {
        let (guard, host) = guard();
        assert!(!guard.intercept(&DriveError::NotFound));
        assert!(!guard.intercept(&DriveError::Network("offline".into())));
        assert!(guard.is_authenticated());
        assert_eq!(host.scheduled_count(), 0);
    }

    #[test]
    fn test_redirects_after_delay() {
        let (guard, host) = guard();
        assert!(guard.intercept(&DriveError::Auth { status: 401 }));
        assert_eq!(guard.state(), SessionState::Unauthenticated);
        assert_eq!(host.notices(), vec![Notice::session_expired()]);

        // Navigation waits for the timer
        assert!(host.navigations().is_empty());
        assert_eq!(host.scheduled_delays(), vec![LOGIN_REDIRECT_DELAY_MS]);
        host.run_scheduled();
        assert_eq!(host.navigations(), vec!["/api/login".to_string()]);
    }

    #[test]
    fn test_concurrent_failures_redirect_once() {
        let (guard, host) = guard();
        assert!(guard.expire());
        assert!(guard.intercept(&DriveError::Auth { status: 401 }));
        assert!(guard.intercept(&DriveError::Auth { status: 403 }));
        assert!(!guard.expire());

        host.run_scheduled();
        assert_eq!(host.notices().len(), 1);
        assert_eq!(host.navigations().len(), 1);
    }

    #[test]
    fn test_base_url_prefix() {
        let host = Rc::new(RecordingHost::new());
        let guard = SessionGuard::new(host.clone()).with_base_url("https://drive.example/");
        guard.expire();
        host.run_scheduled();
        guard.logout();
        assert_eq!(
            host.navigations(),
            vec![
                "https://drive.example/api/login".to_string(),
                "https://drive.example/api/logout".to_string(),
            ]
        );
    }

    #[test]
    fn test_logout_navigates_without_notice() {
        let (guard, host) = guard();
        guard.logout();
        assert_eq!(host.navigations(), vec!["/api/logout".to_string()]);
        assert!(host.notices().is_empty());
        assert!(!guard.is_authenticated());
    }
}
