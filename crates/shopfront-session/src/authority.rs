//! Remote authority seam
//!
//! The gate only needs three things from the backend. `ApiClient` provides
//! them over HTTP; tests provide them in memory.

use async_trait::async_trait;

use shopfront_api::ApiClient;

use crate::error::AuthorityError;
use crate::session::{Credential, Profile};

#[async_trait]
pub trait Authority: Send + Sync {
    /// Exchange an identifier and secret for a credential and its profile
    async fn sign_in(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<(Credential, Profile), AuthorityError>;

    /// Current profile for a credential
    async fn verify(&self, credential: &Credential) -> Result<Profile, AuthorityError>;

    /// Tell the authority a credential is no longer in use
    async fn revoke(&self, _credential: &Credential) -> Result<(), AuthorityError> {
        Ok(())
    }
}

#[async_trait]
impl Authority for ApiClient {
    async fn sign_in(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<(Credential, Profile), AuthorityError> {
        let grant = self.login(identifier, secret).await?;
        if grant.access_token.trim().is_empty() {
            return Err(AuthorityError::Unavailable(
                "Login response carried no token".to_string(),
            ));
        }

        let user = match grant.user {
            Some(user) => user,
            None => {
                self.with_bearer(Some(grant.access_token.clone()))
                    .me()
                    .await?
            }
        };

        Ok((Credential::new(grant.access_token), Profile::from(user)))
    }

    async fn verify(&self, credential: &Credential) -> Result<Profile, AuthorityError> {
        let user = self
            .with_bearer(Some(credential.expose().to_string()))
            .me()
            .await?;
        Ok(Profile::from(user))
    }
}
