//! Gate State Machine
//!
//! ```text
//! Unknown ──► Checking ──► AuthenticatedPrivileged
//!    │           │    └──► AuthenticatedUnprivileged
//!    │           └───────► Unauthenticated
//!    └── sign-in ─► Authenticated*
//! ```
//! Every resolved state may return to `Checking`. Sign-out or expiry sends
//! any state to `Unauthenticated`. Nothing returns to `Unknown`.

use serde::{Deserialize, Serialize};

use crate::session::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Nothing checked yet in this load
    Unknown,
    /// Verification in flight
    Checking,
    AuthenticatedPrivileged,
    AuthenticatedUnprivileged,
    Unauthenticated,
}

impl GateState {
    pub fn for_profile(profile: &Profile) -> Self {
        if profile.is_privileged {
            GateState::AuthenticatedPrivileged
        } else {
            GateState::AuthenticatedUnprivileged
        }
    }

    pub fn can_transition_to(&self, target: GateState) -> bool {
        use GateState::*;

        match (self, target) {
            (a, b) if *a == b => true,
            (_, Unknown) => false,
            // Sign-out, expiry and failed checks
            (_, Unauthenticated) => true,
            // Re-verification from any resolved state
            (_, Checking) => true,
            // Check results
            (Checking, AuthenticatedPrivileged | AuthenticatedUnprivileged) => true,
            // Direct sign-in, including switching accounts
            (Unknown | Unauthenticated, AuthenticatedPrivileged | AuthenticatedUnprivileged) => true,
            (AuthenticatedPrivileged, AuthenticatedUnprivileged) => true,
            (AuthenticatedUnprivileged, AuthenticatedPrivileged) => true,
            _ => false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            GateState::AuthenticatedPrivileged | GateState::AuthenticatedUnprivileged
        )
    }

    /// Resolved for this load
    pub fn is_settled(&self) -> bool {
        !matches!(self, GateState::Unknown | GateState::Checking)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Unknown => "unknown",
            GateState::Checking => "checking",
            GateState::AuthenticatedPrivileged => "authenticated_privileged",
            GateState::AuthenticatedUnprivileged => "authenticated_unprivileged",
            GateState::Unauthenticated => "unauthenticated",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a view requires of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Any signed-in user
    Member,
    /// Back-office access
    Admin,
}

impl Privilege {
    pub fn satisfied_by(&self, state: GateState) -> bool {
        match self {
            Privilege::Member => state.is_authenticated(),
            Privilege::Admin => state == GateState::AuthenticatedPrivileged,
        }
    }
}

/// Render-or-redirect decision for a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render,
    Redirect,
    /// Verification has not resolved yet; show neither content nor redirect
    Pending,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [GateState; 5] = [
        GateState::Unknown,
        GateState::Checking,
        GateState::AuthenticatedPrivileged,
        GateState::AuthenticatedUnprivileged,
        GateState::Unauthenticated,
    ];

    #[test]
    fn test_valid_transitions() {
        assert!(GateState::Unknown.can_transition_to(GateState::Checking));
        assert!(GateState::Checking.can_transition_to(GateState::AuthenticatedPrivileged));
        assert!(GateState::Checking.can_transition_to(GateState::Unauthenticated));
        assert!(GateState::Unauthenticated.can_transition_to(GateState::AuthenticatedUnprivileged));
        assert!(GateState::AuthenticatedPrivileged.can_transition_to(GateState::Checking));
        assert!(GateState::AuthenticatedUnprivileged.can_transition_to(GateState::Unauthenticated));
    }

    #[test]
    fn test_nothing_returns_to_unknown() {
        for state in ALL.iter().filter(|s| **s != GateState::Unknown) {
            assert!(!state.can_transition_to(GateState::Unknown), "{}", state);
        }
    }

    #[test]
    fn test_everything_can_sign_out() {
        for state in ALL {
            assert!(state.can_transition_to(GateState::Unauthenticated), "{}", state);
        }
    }

    #[test]
    fn test_privilege_never_satisfied_while_unsettled() {
        for privilege in [Privilege::Member, Privilege::Admin] {
            assert!(!privilege.satisfied_by(GateState::Unknown));
            assert!(!privilege.satisfied_by(GateState::Checking));
            assert!(!privilege.satisfied_by(GateState::Unauthenticated));
        }
        assert!(Privilege::Member.satisfied_by(GateState::AuthenticatedUnprivileged));
        assert!(!Privilege::Admin.satisfied_by(GateState::AuthenticatedUnprivileged));
        assert!(Privilege::Admin.satisfied_by(GateState::AuthenticatedPrivileged));
    }
}
