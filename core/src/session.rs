//! Admin-mode gate and the session context that carries it.
//!
//! This is an access gate around ownership edits, not authentication: one shared
//! passphrase, no identities, no expiry, no lockout.

use std::fmt;

use serde::Serialize;

/// Per-session capabilities handed to whatever needs to mutate a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    admin: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Leave admin mode.
    pub fn lock(&mut self) {
        self.admin = false;
    }
}

/// Result of presenting a passphrase to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    Granted,
    /// Wrong passphrase; the caller shows a rejection.
    Rejected,
    /// Nothing entered; nothing to report.
    Cancelled,
    /// No passphrase is configured, so admin mode cannot be entered.
    Unavailable,
}

/// Holds only the blake3 digest of the shared passphrase.
#[derive(Clone)]
pub struct AdminGate {
    digest: Option<blake3::Hash>,
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate").field("enabled", &self.is_enabled()).finish()
    }
}

impl AdminGate {
    pub fn new(passphrase: &str) -> Self {
        Self { digest: Some(blake3::hash(passphrase.as_bytes())) }
    }

    pub fn disabled() -> Self {
        Self { digest: None }
    }

    /// Gate for an optional configured passphrase; an empty one disables the gate.
    pub fn from_config(passphrase: Option<&str>) -> Self {
        match passphrase.filter(|value| !value.is_empty()) {
            Some(value) => Self::new(value),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.digest.is_some()
    }

    /// Try to enter admin mode. `None` or an empty entry counts as a cancelled prompt.
    ///
    /// Only `Granted` changes the session.
    pub fn unlock(&self, session: &mut Session, entered: Option<&str>) -> Unlock {
        let Some(expected) = self.digest else {
            return Unlock::Unavailable;
        };
        let Some(entered) = entered.filter(|value| !value.is_empty()) else {
            return Unlock::Cancelled;
        };

        // blake3::Hash equality is constant time.
        if blake3::hash(entered.as_bytes()) == expected {
            session.admin = true;
            tracing::info!(target: "session", "admin mode enabled");
            Unlock::Granted
        } else {
            tracing::warn!(target: "session", "admin passphrase rejected");
            Unlock::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_passphrase_grants_admin() {
        let gate = AdminGate::new("open sesame");
        let mut session = Session::new();
        assert_eq!(gate.unlock(&mut session, Some("open sesame")), Unlock::Granted);
        assert!(session.is_admin());

        session.lock();
        assert!(!session.is_admin());
    }

    #[test]
    fn wrong_or_missing_entry_leaves_mode_unchanged() {
        let gate = AdminGate::new("open sesame");
        let mut session = Session::new();

        assert_eq!(gate.unlock(&mut session, Some("Open Sesame")), Unlock::Rejected);
        assert_eq!(gate.unlock(&mut session, None), Unlock::Cancelled);
        assert_eq!(gate.unlock(&mut session, Some("")), Unlock::Cancelled);
        assert!(!session.is_admin());
    }

    #[test]
    fn rejection_does_not_revoke_existing_admin() {
        let gate = AdminGate::new("pw");
        let mut session = Session::new();
        gate.unlock(&mut session, Some("pw"));
        assert_eq!(gate.unlock(&mut session, Some("nope")), Unlock::Rejected);
        assert!(session.is_admin());
    }

    #[test]
    fn disabled_gate_never_grants() {
        let gate = AdminGate::from_config(Some(""));
        let mut session = Session::new();
        assert!(!gate.is_enabled());
        assert_eq!(gate.unlock(&mut session, Some("")), Unlock::Unavailable);
        assert!(!session.is_admin());
        assert!(!format!("{gate:?}").contains("digest"));
    }
}
