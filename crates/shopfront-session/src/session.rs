//! Session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shopfront_api::UserProfile;

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub is_privileged: bool,
}

impl From<UserProfile> for Profile {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_privileged: user.is_admin,
        }
    }
}

/// Credential and cached profile.
///
/// A profile is only ever attached alongside, or on top of, a credential.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
    profile: Option<Profile>,
    /// When the credential was issued to this tab
    signed_in_at: Option<DateTime<Utc>>,
    /// Last successful confirmation by the authority
    verified_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild from storage after a reload. A profile without a credential
    /// is discarded.
    pub fn restored(credential: Option<Credential>, profile: Option<Profile>) -> Self {
        let profile = if credential.is_some() { profile } else { None };
        Self {
            credential,
            profile,
            signed_in_at: None,
            verified_at: None,
        }
    }

    /// Fresh sign-in
    pub fn establish(&mut self, credential: Credential, profile: Profile) {
        let now = Utc::now();
        self.credential = Some(credential);
        self.profile = Some(profile);
        self.signed_in_at = Some(now);
        self.verified_at = Some(now);
    }

    /// Attach a freshly verified profile. Returns false, changing nothing,
    /// when there is no credential to attach it to.
    pub fn confirm(&mut self, profile: Profile) -> bool {
        if self.credential.is_none() {
            return false;
        }
        self.profile = Some(profile);
        self.verified_at = Some(Utc::now());
        true
    }

    /// Forget the profile but keep the credential
    pub fn drop_profile(&mut self) {
        self.profile = None;
        self.verified_at = None;
    }

    pub fn clear(&mut self) -> Option<Credential> {
        self.profile = None;
        self.signed_in_at = None;
        self.verified_at = None;
        self.credential.take()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.signed_in_at
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    pub fn is_empty(&self) -> bool {
        self.credential.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(privileged: bool) -> Profile {
        Profile {
            id: "1".to_string(),
            email: "owner@shop.test".to_string(),
            is_privileged: privileged,
        }
    }

    #[test]
    fn test_profile_requires_credential() {
        let restored = Session::restored(None, Some(profile(true)));
        assert!(restored.profile().is_none());

        let mut session = Session::empty();
        assert!(!session.confirm(profile(true)));
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_establish_and_clear() {
        let mut session = Session::empty();
        session.establish(Credential::new("tok"), profile(false));
        assert_eq!(session.credential().map(|c| c.expose()), Some("tok"));
        assert!(session.signed_in_at().is_some());

        session.drop_profile();
        assert!(session.profile().is_none());
        assert!(!session.is_empty());

        let taken = session.clear();
        assert_eq!(taken, Some(Credential::new("tok")));
        assert!(session.is_empty());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let debug = format!("{:?}", Credential::new("super-secret"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_profile_from_user() {
        let user = UserProfile {
            id: "9".to_string(),
            email: "a@b.c".to_string(),
            is_admin: true,
            name: None,
        };
        let profile = Profile::from(user);
        assert!(profile.is_privileged);
        assert_eq!(profile.id, "9");
    }
}
