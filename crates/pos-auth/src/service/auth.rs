//! `AuthService`: login, registration, refresh, logout, token validation,
//! and password management.
//!
//! Every operation takes a [`RequestContext`]. Reads race the context.
//! Writes start only after a final checkpoint and then run on a detached
//! task, so a caller that goes away mid-request leaves either no change or
//! a completed one.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use pos_core::RequestContext;
use pos_core::config::{AuthConfig, SessionConfig};
use pos_core::error::{AppError, ErrorKind};
use pos_core::events::{AuthEvent, DomainEvent, EventPublisher};
use pos_core::result::AppResult;
use pos_core::types::{RoleId, TenantId, UserId};
use pos_entity::role::Role;
use pos_entity::session::Session;
use pos_entity::user::{CreateUser, User};

use crate::directory::UserDirectory;
use crate::jwt::{Claims, TokenPair, TokenService};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::SessionStore;

use super::types::{AuthenticatedUser, LoginRequest, LoginResult, RegisterRequest};

/// Orchestrates the authentication subsystem.
///
/// Holds no mutable state of its own; the session store is the only
/// shared mutable structure.
#[derive(Debug, Clone)]
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    events: Arc<dyn EventPublisher>,
    /// Require a live session behind every validated or refreshed token.
    bind_sessions: bool,
    session_ttl: Duration,
    default_role_id: RoleId,
}

impl AuthService {
    /// Creates the service from configuration and its collaborators.
    pub fn new(
        auth: &AuthConfig,
        session: &SessionConfig,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        events: Arc<dyn EventPublisher>,
    ) -> AppResult<Self> {
        Ok(Self {
            directory,
            sessions,
            tokens: Arc::new(TokenService::new(auth)),
            hasher: PasswordHasher::new(auth.bcrypt_cost)?,
            validator: PasswordValidator::new(auth),
            events,
            bind_sessions: auth.bind_sessions,
            session_ttl: Duration::seconds(
                session.ttl_seconds().max(auth.refresh_token_ttl_seconds()),
            ),
            default_role_id: RoleId::new(auth.default_role_id),
        })
    }

    /// The token service, for callers that only need to inspect tokens.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate a tenant-scoped identity label and password.
    ///
    /// An unknown label and a wrong password fail with the same
    /// `InvalidCredentials` error and cost one bcrypt verification each.
    /// An inactive user or tenant fails with `AccountInactive` whether or
    /// not the password was right.
    pub async fn login(&self, ctx: &RequestContext, request: LoginRequest) -> AppResult<LoginResult> {
        let LoginRequest {
            tenant_id,
            identity_label,
            password,
        } = request;
        let label = identity_label.trim();
        if label.is_empty() || password.is_empty() {
            return Err(AppError::validation("Identity label and password are required"));
        }

        let found = ctx
            .guard(self.directory.find_by_identity_label(tenant_id, label))
            .await
            .map_err(|e| e.context("Failed to resolve identity"))?;

        // Loaded on both paths so an unknown label costs the same lookups.
        let tenant = ctx
            .guard(self.directory.find_tenant(tenant_id))
            .await
            .map_err(|e| e.context("Failed to load tenant"))?;

        let Some(mut user) = found else {
            self.hasher.burn(password).await;
            info!(tenant_id = %tenant_id, "Login rejected: unknown identity");
            return Err(AppError::invalid_credentials());
        };

        let verified = ctx
            .guard(self.hasher.verify(password, user.password_hash.clone()))
            .await;

        if !user.is_active || !tenant.is_some_and(|t| t.is_active) {
            warn!(user_id = %user.id, tenant_id = %user.tenant_id, "Login rejected: account inactive");
            return Err(AppError::account_inactive(format!(
                "User {} or its tenant is inactive",
                user.id
            )));
        }

        match verified {
            Ok(()) => {}
            Err(e) if e.kind == ErrorKind::InvalidCredentials => {
                info!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AppError::invalid_credentials());
            }
            Err(e) => return Err(e),
        }

        let role = ctx.guard(self.directory.find_role(user.role_id)).await?;

        let session_id = new_session_id();
        let tokens = self.tokens.generate_pair(&user, Some(&session_id))?;
        let now = Utc::now();
        let session = Session {
            id: session_id.clone(),
            user_id: user.id,
            tenant_id: user.tenant_id,
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: now + self.session_ttl,
            created_at: now,
        };

        ctx.checkpoint()?;
        tokio::spawn(commit_login(
            self.sessions.clone(),
            self.directory.clone(),
            session,
            now,
        ))
        .await??;
        user.last_login_at = Some(now);

        info!(
            user_id = %user.id,
            tenant_id = %user.tenant_id,
            session_id = %session_id,
            "User logged in"
        );
        self.publish(
            Some(user.tenant_id),
            user.id,
            AuthEvent::LoggedIn {
                username: user.username.clone(),
                session_id,
            },
        )
        .await;

        Ok(LoginResult { tokens, user, role })
    }

    /// Create a new active identity. Issues no tokens.
    pub async fn register(&self, ctx: &RequestContext, request: RegisterRequest) -> AppResult<User> {
        let RegisterRequest {
            tenant_id,
            username,
            email,
            password,
            full_name,
            phone,
            role_id,
        } = request;
        let username = username.trim().to_string();
        let email = email.trim().to_string();
        let full_name = full_name.trim().to_string();

        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        validate_registration(&username, &email, &full_name, phone.as_deref())?;
        self.validator.validate(&password)?;

        let tenant = ctx.guard(self.directory.find_tenant(tenant_id)).await?;
        if !tenant.is_some_and(|t| t.is_active) {
            return Err(AppError::validation(format!(
                "Tenant {tenant_id} does not exist or is inactive"
            )));
        }

        let role_id = role_id.unwrap_or(self.default_role_id);
        if ctx.guard(self.directory.find_role(role_id)).await?.is_none() {
            return Err(AppError::validation(format!("Role {role_id} does not exist")));
        }

        let password_hash = ctx.guard(self.hasher.hash(password)).await?;
        let data = CreateUser {
            tenant_id,
            role_id,
            username,
            email,
            password_hash,
            full_name,
            phone,
        };

        ctx.checkpoint()?;
        let directory = self.directory.clone();
        let user = tokio::spawn(async move { directory.create(data).await }).await??;

        info!(user_id = %user.id, tenant_id = %user.tenant_id, "User registered");
        self.publish(
            Some(user.tenant_id),
            user.id,
            AuthEvent::Registered {
                username: user.username.clone(),
                email: user.email.clone(),
            },
        )
        .await;

        Ok(user)
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The identity is re-read so role and tenant come from the directory,
    /// not from the old token. The session behind the token stores the new
    /// pair and lives for another full session lifetime, so a client that
    /// keeps refreshing never has to log in again.
    pub async fn refresh_token(&self, ctx: &RequestContext, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;
        if self.bind_sessions {
            self.ensure_session(ctx, &claims).await?;
        }

        let user = self.load_active_user(ctx, claims.user_id).await?;
        let tokens = self.tokens.generate_pair(&user, claims.session_id())?;

        if let Some(session_id) = claims.session_id() {
            ctx.checkpoint()?;
            let sessions = self.sessions.clone();
            let session_id = session_id.to_string();
            let access_token = tokens.access_token.clone();
            let new_refresh_token = tokens.refresh_token.clone();
            let expires_at = Utc::now() + self.session_ttl;
            let renewed = tokio::spawn(async move {
                sessions
                    .renew(&session_id, &access_token, &new_refresh_token, expires_at)
                    .await
            })
            .await?
            .map_err(|e| e.context("Failed to renew session"))?;

            if !renewed && self.bind_sessions {
                return Err(AppError::session_revoked(
                    "Session ended while the token was being refreshed",
                ));
            }
        }

        info!(user_id = %user.id, "Tokens refreshed");
        Ok(tokens)
    }

    /// Delete every session of `user_id`. Returns how many were removed;
    /// zero is not an error.
    pub async fn logout(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<usize> {
        ctx.checkpoint()?;
        let sessions = self.sessions.clone();
        let removed = tokio::spawn(async move { sessions.delete_by_user_id(user_id).await })
            .await?
            .map_err(|e| e.context("Failed to delete sessions"))?;

        let count = removed.len();
        let tenant_id = removed.first().map(|s| s.tenant_id);

        info!(user_id = %user_id, sessions_revoked = count, "User logged out");
        self.publish(
            tenant_id,
            user_id,
            AuthEvent::LoggedOut {
                sessions_revoked: count,
            },
        )
        .await;

        Ok(count)
    }

    /// Resolve the identity behind an access token.
    ///
    /// This is the authorization gate used by every other module.
    pub async fn validate_token(&self, ctx: &RequestContext, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.tokens.validate_access_token(token)?;
        if self.bind_sessions {
            self.ensure_session(ctx, &claims).await?;
        }

        let user = self.load_active_user(ctx, claims.user_id).await?;
        if user.tenant_id != claims.tenant_id {
            return Err(AppError::token_malformed(
                "Token tenant does not match the identity's tenant",
            ));
        }

        Ok(AuthenticatedUser { user, claims })
    }

    /// Replace the password after checking the current one, then revoke
    /// every session of the user. Returns the number of sessions revoked.
    ///
    /// A login that verified against the old hash just before the update
    /// still succeeds; the hash is last-writer-wins.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<usize> {
        self.validator.validate_not_same(old_password, new_password)?;
        self.validator.validate(new_password)?;

        let mut user = self.load_active_user(ctx, user_id).await?;

        ctx.guard(
            self.hasher
                .verify(old_password.to_string(), user.password_hash.clone()),
        )
        .await
        .map_err(|e| {
            if e.kind == ErrorKind::InvalidCredentials {
                info!(user_id = %user_id, "Password change rejected: wrong current password");
                AppError::invalid_credentials()
            } else {
                e
            }
        })?;

        user.password_hash = ctx.guard(self.hasher.hash(new_password.to_string())).await?;
        user.updated_at = Utc::now();
        let tenant_id = user.tenant_id;

        ctx.checkpoint()?;
        let removed = tokio::spawn(commit_password_change(
            self.directory.clone(),
            self.sessions.clone(),
            user,
        ))
        .await??;

        info!(user_id = %user_id, sessions_revoked = removed, "Password changed");
        self.publish(
            Some(tenant_id),
            user_id,
            AuthEvent::PasswordChanged {
                sessions_revoked: removed,
            },
        )
        .await;

        Ok(removed)
    }

    /// Announce a password reset for the identity behind `identity_label`.
    ///
    /// Delivery of the reset secret belongs to the notification service;
    /// the event carries no secret.
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        tenant_id: TenantId,
        identity_label: &str,
    ) -> AppResult<()> {
        let user = ctx
            .guard(
                self.directory
                    .find_by_identity_label(tenant_id, identity_label.trim()),
            )
            .await?
            .ok_or_else(|| AppError::identity_not_found("No identity matches the reset request"))?;

        if !user.is_active {
            return Err(AppError::account_inactive(format!("User {} is inactive", user.id)));
        }

        info!(user_id = %user.id, tenant_id = %user.tenant_id, "Password reset requested");
        self.publish(
            Some(user.tenant_id),
            user.id,
            AuthEvent::PasswordResetRequested {
                email: user.email.clone(),
            },
        )
        .await;

        Ok(())
    }

    /// Email verification has no backing flow yet.
    pub async fn verify_email(&self, _ctx: &RequestContext, _token: &str) -> AppResult<()> {
        Err(AppError::not_implemented("Email verification is not implemented"))
    }

    /// Look up a role, e.g. to describe the caller's permissions.
    pub async fn find_role(&self, ctx: &RequestContext, role_id: RoleId) -> AppResult<Option<Role>> {
        ctx.guard(self.directory.find_role(role_id)).await
    }

    async fn ensure_session(&self, ctx: &RequestContext, claims: &Claims) -> AppResult<()> {
        let Some(session_id) = claims.session_id() else {
            return Err(AppError::session_revoked("Token is not bound to a session"));
        };

        let session = ctx
            .guard(self.sessions.find_by_id(session_id))
            .await
            .map_err(|e| e.context("Failed to load session"))?;

        match session {
            Some(s) if s.user_id == claims.user_id && !s.is_expired() => Ok(()),
            _ => Err(AppError::session_revoked(format!(
                "Session {session_id} is no longer active"
            ))),
        }
    }

    async fn load_active_user(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<User> {
        let user = ctx
            .guard(self.directory.find_by_id(user_id))
            .await?
            .ok_or_else(|| AppError::identity_not_found(format!("User {user_id} not found")))?;

        if !user.is_active {
            return Err(AppError::account_inactive(format!("User {user_id} is inactive")));
        }
        Ok(user)
    }

    async fn publish(&self, tenant_id: Option<TenantId>, user_id: UserId, payload: AuthEvent) {
        let event = DomainEvent::new(tenant_id, user_id, payload);
        if let Err(e) = self.events.publish(event.topic(), &event).await {
            warn!(
                event_type = %event.event_type,
                user_id = %user_id,
                error = %e,
                "Failed to publish domain event"
            );
        }
    }
}

/// Create the session, then record the login. The session is removed
/// again if the second write fails.
async fn commit_login(
    sessions: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
    session: Session,
    at: DateTime<Utc>,
) -> AppResult<()> {
    let session_id = session.id.clone();
    let user_id = session.user_id;

    sessions
        .create(session)
        .await
        .map_err(|e| e.context("Failed to create session"))?;

    if let Err(e) = directory.record_login(user_id, at).await {
        if let Err(rollback) = sessions.delete(&session_id).await {
            error!(
                session_id = %session_id,
                error = %rollback,
                "Failed to remove session after login write failed"
            );
        }
        return Err(e.context("Failed to record login"));
    }

    Ok(())
}

async fn commit_password_change(
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    user: User,
) -> AppResult<usize> {
    directory
        .update(&user)
        .await
        .map_err(|e| e.context("Failed to update password"))?;

    let removed = sessions.delete_by_user_id(user.id).await.map_err(|e| {
        error!(user_id = %user.id, error = %e, "Password changed but sessions were not revoked");
        e.context("Failed to revoke sessions")
    })?;

    Ok(removed.len())
}

/// Longest phone number the directory stores.
pub const MAX_PHONE_LENGTH: usize = 20;

fn validate_registration(
    username: &str,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
) -> AppResult<()> {
    let username_len = username.chars().count();
    if !(3..=100).contains(&username_len) {
        return Err(AppError::validation(
            "Username must be between 3 and 100 characters",
        ));
    }
    // Emails always contain '@', so usernames never collide with them.
    if username.contains('@') {
        return Err(AppError::validation("Username must not contain '@'"));
    }
    if email.len() > 255 || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AppError::validation("Email address is invalid"));
    }
    if full_name.is_empty() || full_name.chars().count() > 255 {
        return Err(AppError::validation(
            "Full name must be between 1 and 255 characters",
        ));
    }
    if phone.is_some_and(|p| p.chars().count() > MAX_PHONE_LENGTH) {
        return Err(AppError::validation(format!(
            "Phone number must be at most {MAX_PHONE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn new_session_id() -> String {
    format!("sess_{}", Uuid::new_v4().simple())
}
