//! Session Gate
//!
//! Owns the tab's credential and profile, keeps them in scoped storage, and
//! answers access questions for protected views.
//!
//! Ordering rules:
//! - `access` stays `Pending` until a verification or sign-in has resolved
//!   since this gate was opened.
//! - A second `sign_in` while one is in flight is refused.
//! - Sign-in and sign-out bump an epoch; results of operations that started
//!   under an older epoch are discarded.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shopfront_storage::{SessionStorage, StorageError};

use crate::authority::Authority;
use crate::error::SessionError;
use crate::session::{Credential, Profile, Session};
use crate::state::{Access, GateState, Privilege};
use crate::Result;

const CREDENTIAL_KEY: &str = "credential";
const PROFILE_KEY: &str = "profile";

struct GateInner {
    state: GateState,
    session: Session,
    epoch: u64,
    /// A check or sign-in has completed since the gate was opened
    resolved: bool,
}

impl GateInner {
    fn transition(&mut self, to: GateState) {
        if self.state == to {
            return;
        }
        if !self.state.can_transition_to(to) {
            tracing::warn!(from = %self.state, to = %to, "Ignoring invalid gate transition");
            return;
        }
        tracing::debug!(from = %self.state, to = %to, "Gate transition");
        self.state = to;
    }
}

/// Resets the in-flight flag however the sign-in ends
struct SignInGuard(Arc<AtomicBool>);

impl Drop for SignInGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SessionGate {
    inner: Arc<RwLock<GateInner>>,
    storage: SessionStorage,
    authority: Arc<dyn Authority>,
    signing_in: Arc<AtomicBool>,
}

impl SessionGate {
    /// Open the gate for a tab, restoring whatever the tab stored before a
    /// reload. The restored session starts `Unknown` until verified.
    pub fn open(storage: SessionStorage, authority: Arc<dyn Authority>) -> Result<Self> {
        let session = match Self::load(&storage) {
            Ok(session) => session,
            Err(SessionError::Storage(StorageError::Json(e))) => {
                tracing::warn!(scope = %storage.scope(), error = %e, "Discarding unreadable session entries");
                storage.clear()?;
                Session::empty()
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            scope = %storage.scope(),
            has_credential = !session.is_empty(),
            "Opened session gate"
        );

        Ok(Self {
            inner: Arc::new(RwLock::new(GateInner {
                state: GateState::Unknown,
                session,
                epoch: 0,
                resolved: false,
            })),
            storage,
            authority,
            signing_in: Arc::new(AtomicBool::new(false)),
        })
    }

    fn load(storage: &SessionStorage) -> Result<Session> {
        let credential: Option<Credential> = storage.get(CREDENTIAL_KEY)?;
        let profile: Option<Profile> = storage.get(PROFILE_KEY)?;
        Ok(Session::restored(credential, profile))
    }

    /// Exchange an identifier and secret for a session.
    ///
    /// On any failure the state and storage are left exactly as they were.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> Result<Profile> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        if self
            .signing_in
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::SignInInProgress);
        }
        let _guard = SignInGuard(Arc::clone(&self.signing_in));

        let started_epoch = self.inner.read().epoch;

        let (credential, profile) = match self.authority.sign_in(identifier, secret).await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::info!(error = %e, "Sign-in failed");
                return Err(e.into());
            }
        };

        let mut inner = self.inner.write();
        if inner.epoch != started_epoch {
            tracing::info!("Dropping sign-in result after concurrent sign-out");
            return Err(SessionError::Superseded);
        }

        self.storage.set_many(&[
            (CREDENTIAL_KEY, serde_json::to_value(&credential).map_err(StorageError::from)?),
            (PROFILE_KEY, serde_json::to_value(&profile).map_err(StorageError::from)?),
        ])?;

        inner.session.establish(credential, profile.clone());
        inner.transition(GateState::for_profile(&profile));
        inner.epoch += 1;
        inner.resolved = true;

        tracing::info!(
            user_id = %profile.id,
            privileged = profile.is_privileged,
            "Signed in"
        );

        Ok(profile)
    }

    /// Confirm the stored credential with the authority.
    ///
    /// A rejected or unverifiable credential leaves the gate
    /// `Unauthenticated` and drops the cached profile, but the credential
    /// itself stays stored; use `discard_credential` to purge it.
    pub async fn verify_stored_credential(&self) -> GateState {
        let (credential, epoch) = {
            let mut inner = self.inner.write();
            match inner.session.credential().cloned() {
                Some(credential) => {
                    inner.transition(GateState::Checking);
                    (credential, inner.epoch)
                }
                None => {
                    inner.transition(GateState::Unauthenticated);
                    inner.resolved = true;
                    return inner.state;
                }
            }
        };

        let outcome = self.authority.verify(&credential).await;

        let mut inner = self.inner.write();
        if inner.epoch != epoch {
            tracing::debug!("Discarding stale verification result");
            return inner.state;
        }

        match outcome {
            Ok(profile) => {
                if let Err(e) = self.storage.set(PROFILE_KEY, &profile) {
                    tracing::warn!(error = %e, "Failed to store verified profile");
                }
                let next = GateState::for_profile(&profile);
                inner.session.confirm(profile);
                inner.transition(next);
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored credential did not verify");
                if let Err(e) = self.storage.remove(PROFILE_KEY) {
                    tracing::warn!(error = %e, "Failed to drop cached profile");
                }
                inner.session.drop_profile();
                inner.transition(GateState::Unauthenticated);
            }
        }

        inner.resolved = true;
        inner.state
    }

    /// Clear the session. Always succeeds locally; telling the authority is
    /// best-effort.
    pub async fn sign_out(&self) {
        let credential = self.clear_local();

        if let Some(credential) = credential {
            if let Err(e) = self.authority.revoke(&credential).await {
                tracing::debug!(error = %e, "Remote sign-out notification failed");
            }
        }

        tracing::info!("Signed out");
    }

    /// Purge a suspect credential without notifying the authority
    pub fn discard_credential(&self) {
        self.clear_local();
    }

    /// An authenticated request came back 401: the credential expired or
    /// was revoked server-side.
    pub fn mark_expired(&self) {
        let mut inner = self.inner.write();
        if !inner.state.is_authenticated() {
            return;
        }

        if let Err(e) = self.storage.remove(PROFILE_KEY) {
            tracing::warn!(error = %e, "Failed to drop cached profile");
        }
        inner.session.drop_profile();
        inner.transition(GateState::Unauthenticated);
        inner.epoch += 1;

        tracing::info!("Session expired");
    }

    fn clear_local(&self) -> Option<Credential> {
        let credential = {
            let mut inner = self.inner.write();
            let credential = inner.session.clear();
            inner.transition(GateState::Unauthenticated);
            inner.epoch += 1;
            inner.resolved = true;
            credential
        };

        if let Err(e) = self.storage.clear() {
            tracing::error!(error = %e, "Failed to clear stored session");
        }

        credential
    }

    /// Never blocks; false while unknown or checking
    pub fn is_authorized_for(&self, required: Privilege) -> bool {
        required.satisfied_by(self.inner.read().state)
    }

    /// Render-or-redirect decision for a protected view
    pub fn access(&self, required: Privilege) -> Access {
        let inner = self.inner.read();
        if !inner.resolved || !inner.state.is_settled() {
            Access::Pending
        } else if required.satisfied_by(inner.state) {
            Access::Render
        } else {
            Access::Redirect
        }
    }

    pub fn state(&self) -> GateState {
        self.inner.read().state
    }

    pub fn credential(&self) -> Option<Credential> {
        self.inner.read().session.credential().cloned()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.read().session.profile().cloned()
    }

    pub fn session(&self) -> Session {
        self.inner.read().session.clone()
    }

    pub fn is_signing_in(&self) -> bool {
        self.signing_in.load(Ordering::Acquire)
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }
}

impl Clone for SessionGate {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            storage: self.storage.clone(),
            authority: Arc::clone(&self.authority),
            signing_in: Arc::clone(&self.signing_in),
        }
    }
}
