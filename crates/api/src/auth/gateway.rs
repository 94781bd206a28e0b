//! Maps provider identities to marketplace users and sessions.
//!
//! The gateway owns the sign-up/sign-in/sign-out flows. It talks to the
//! [`IdentityProvider`] for credentials, to the `users`/`tenants`/`owners`
//! tables for profiles, and to the [`SessionRegistry`] for auth-state
//! changes.

use std::sync::Arc;

use chrono::Utc;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::session::{CreateSession, RevokedSession};
use gharpayy_db::models::user::{CreateUser, User};
use gharpayy_db::repositories::{SessionRepo, UserRepo};
use gharpayy_db::DbPool;
use gharpayy_events::{event_types, EventBus, PlatformEvent};
use serde::Serialize;

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_token, JwtConfig};
use crate::auth::provider::IdentityProvider;
use crate::auth::session::{AuthStateChange, SessionRegistry};
use crate::error::{AppError, AppResult};

/// Everything needed to open an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub role: Role,
}

/// Returned by sign-in and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

pub struct IdentityGateway {
    pool: DbPool,
    provider: Arc<dyn IdentityProvider>,
    jwt: JwtConfig,
    sessions: SessionRegistry,
    event_bus: Arc<EventBus>,
}

impl IdentityGateway {
    pub fn new(
        pool: DbPool,
        provider: Arc<dyn IdentityProvider>,
        jwt: JwtConfig,
        sessions: SessionRegistry,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            provider,
            jwt,
            sessions,
            event_bus,
        }
    }

    /// Self-service sign-up. Admin accounts cannot be created this way.
    pub async fn sign_up(&self, account: NewAccount) -> AppResult<User> {
        if !account.role.is_self_service() {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "{} accounts can only be created by an administrator",
                account.role.display_name()
            ))));
        }
        self.create_user(account, None).await
    }

    /// Create an account of any role on behalf of `actor`.
    pub async fn create_user(&self, account: NewAccount, actor: Option<DbId>) -> AppResult<User> {
        let input = CreateUser {
            email: account.email.trim().to_string(),
            name: account.name.trim().to_string(),
            phone_number: account.phone_number,
            role: account.role,
        };
        input.validate()?;

        let identity_id = self
            .provider
            .create_account(&input.email, &account.password)
            .await?;

        let user = UserRepo::create(&self.pool, identity_id, &input).await?;

        // The credential and user rows stay even if the profile row fails.
        if let Err(e) = UserRepo::create_profile(&self.pool, user.id, user.role).await {
            tracing::error!(user_id = user.id, role = %user.role, error = %e, "Failed to create role profile");
        }

        tracing::info!(user_id = user.id, role = %user.role, "User signed up");

        let mut event = PlatformEvent::new(event_types::USER_SIGNED_UP)
            .with_source("user", user.id)
            .with_payload(serde_json::json!({ "role": user.role }));
        if let Some(actor) = actor {
            event = event.with_actor(actor);
        }
        self.event_bus.publish(event);

        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let identity_id = self.provider.authenticate(email.trim(), password).await?;

        let user = UserRepo::find_by_id(&self.pool, identity_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "No user profile exists for this account".into(),
                ))
            })?;

        self.issue_tokens(user).await
    }

    /// Exchange a refresh token for a new token pair. The old session ends.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let session = SessionRepo::consume_refresh_token(&self.pool, &hash_token(refresh_token))
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid or expired refresh token".into(),
                ))
            })?;

        self.sessions.notify(AuthStateChange::SessionRevoked(RevokedSession {
            id: session.id,
            expires_at: session.expires_at,
        }));

        let user = UserRepo::find_by_id(&self.pool, session.user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

        self.issue_tokens(user).await
    }

    /// End every session of the user. Never fails; errors are logged.
    pub async fn sign_out(&self, user_id: DbId) {
        match self.provider.sign_out(user_id).await {
            Ok(sessions) => {
                tracing::info!(user_id, sessions = sessions.len(), "User signed out");
                self.sessions
                    .notify(AuthStateChange::SignedOut { user_id, sessions });
                self.sessions.flush().await;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Sign-out failed");
            }
        }
    }

    /// Start a password reset. Unknown emails and failures are only logged.
    pub async fn request_password_reset(&self, email: &str) {
        match self.provider.send_password_reset(email.trim()).await {
            // TODO: hand the token to an outbound mail sender once one exists.
            Ok(Some(_token)) => tracing::info!("Password reset token issued"),
            Ok(None) => tracing::info!("Password reset requested for unknown email"),
            Err(e) => tracing::error!(error = %e, "Password reset request failed"),
        }
    }

    /// Set a new password from a reset token and end all existing sessions.
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        let identity_id = self
            .provider
            .complete_password_reset(token, new_password)
            .await?;
        tracing::info!(user_id = identity_id, "Password reset completed");
        self.sign_out(identity_id).await;
        Ok(())
    }

    async fn issue_tokens(&self, user: User) -> AppResult<AuthResponse> {
        let (refresh_token, refresh_hash) = generate_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::days(self.jwt.refresh_token_expiry_days);

        let session = SessionRepo::create(
            &self.pool,
            &CreateSession {
                user_id: user.id,
                refresh_token_hash: refresh_hash,
                expires_at,
            },
        )
        .await?;

        let access_token = generate_access_token(user.id, user.role, session.id, &self.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        self.sessions.notify(AuthStateChange::SignedIn {
            user_id: user.id,
            session_id: session.id,
        });

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_mins * 60,
            user,
        })
    }
}
