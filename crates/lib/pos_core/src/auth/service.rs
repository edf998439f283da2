//! Authentication service: login, request authentication, permission checks.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error};

use super::AuthError;
use super::jwt::TokenCodec;
use super::password::verify_password;
use super::permissions::PermissionTable;
use crate::models::{LoginOutcome, TokenClaims, User};
use crate::store::CredentialStore;

/// Stateless authentication service; one instance is shared by all requests.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    permissions: PermissionTable,
    login_duration: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: TokenCodec,
        permissions: PermissionTable,
        login_duration: Duration,
    ) -> Self {
        Self {
            store,
            codec,
            permissions,
            login_duration,
        }
    }

    /// Authenticate with username + password and issue a token.
    ///
    /// Empty input and bad credentials come back as `Ok` outcomes with
    /// `success == false`. Only infrastructure failures are `Err`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if username.is_empty() {
            return Ok(LoginOutcome::bad_request("Username can not be empty"));
        }
        if password.is_empty() {
            return Ok(LoginOutcome::bad_request("Password can not be empty"));
        }

        let user = match self.store.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(username, "login: unknown username");
                return Ok(LoginOutcome::invalid_credentials());
            }
            Err(e) => {
                error!(username, error = %e, "login: failed to look up user");
                return Err(e.into());
            }
        };

        let hash = match self.store.find_password_hash(&user.username).await {
            Ok(Some(hash)) => hash,
            Ok(None) => {
                debug!(username, "login: no password hash stored");
                return Ok(LoginOutcome::invalid_credentials());
            }
            Err(e) => {
                error!(username, error = %e, "login: failed to fetch password hash");
                return Err(e.into());
            }
        };

        match verify_password(password, &hash) {
            Ok(true) => {}
            Ok(false) => {
                debug!(username, "login: password mismatch");
                return Ok(LoginOutcome::invalid_credentials());
            }
            Err(e) => {
                error!(username, error = %e, "login: failed to compare password");
                return Err(e);
            }
        }

        let expires_at = Utc::now()
            .checked_add_signed(self.login_duration)
            .ok_or_else(|| {
                error!(username, "login: token expiry out of range");
                AuthError::Internal("token expiry out of range".into())
            })?;
        let claims = TokenClaims {
            name: user.name.clone(),
            username: user.username.clone(),
            exp: expires_at.timestamp(),
        };
        let token = self.codec.issue(&claims).map_err(|e| {
            error!(username, error = %e, "login: failed to issue token");
            AuthError::from(e)
        })?;

        Ok(LoginOutcome::success(token, user))
    }

    /// Resolve the user behind a bearer token.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        if token.is_empty() {
            debug!("authenticate: empty token");
            return Err(AuthError::EmptyToken);
        }

        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "authenticate: token rejected");
            AuthError::from(e)
        })?;

        match self.store.find_by_username(&claims.username).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(username = %claims.username, "authenticate: token subject no longer exists");
                Err(AuthError::UserNotFound(claims.username))
            }
            Err(e) => {
                error!(username = %claims.username, error = %e, "authenticate: failed to look up user");
                Err(e.into())
            }
        }
    }

    /// Whether `user`'s role is granted `permission`. Unknown permissions deny.
    pub fn check_permission(&self, user: &User, permission: &str) -> bool {
        self.permissions.allows(&user.role, permission)
    }
}
