use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use pos_core::RequestContext;
use pos_core::config::{AuthConfig, SessionConfig};
use pos_core::error::{AppError, ErrorKind};
use pos_core::events::{BroadcastEventBus, DomainEvent, EventPublisher};
use pos_core::result::AppResult;
use pos_core::types::{TenantId, UserId};
use pos_entity::tenant::Tenant;
use pos_entity::user::User;

use super::*;
use crate::directory::{MemoryUserDirectory, UserDirectory};
use crate::session::{MemorySessionStore, SessionStore};

struct Harness {
    service: AuthService,
    directory: Arc<MemoryUserDirectory>,
    sessions: Arc<MemorySessionStore>,
    bus: BroadcastEventBus,
}

fn auth_config(bind_sessions: bool) -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: 4,
        bind_sessions,
        ..AuthConfig::default()
    }
}

async fn harness_with(bind_sessions: bool, events: Option<Arc<dyn EventPublisher>>) -> Harness {
    let directory = Arc::new(MemoryUserDirectory::with_defaults().await);
    let now = Utc::now();
    directory
        .insert_tenant(Tenant {
            id: TenantId::new(2),
            name: "Second".to_string(),
            is_active: true,
            trial_ends_at: None,
            created_at: now,
            updated_at: now,
        })
        .await;

    let sessions = Arc::new(MemorySessionStore::new());
    let bus = BroadcastEventBus::new(64);
    let publisher: Arc<dyn EventPublisher> = match events {
        Some(publisher) => publisher,
        None => Arc::new(bus.clone()),
    };

    let service = AuthService::new(
        &auth_config(bind_sessions),
        &SessionConfig::default(),
        directory.clone(),
        sessions.clone(),
        publisher,
    )
    .unwrap();

    Harness {
        service,
        directory,
        sessions,
        bus,
    }
}

async fn harness() -> Harness {
    harness_with(true, None).await
}

fn register_request(tenant: i64, username: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        tenant_id: TenantId::new(tenant),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        full_name: username.to_string(),
        phone: None,
        role_id: None,
    }
}

fn login_request(tenant: i64, label: &str, password: &str) -> LoginRequest {
    LoginRequest {
        tenant_id: TenantId::new(tenant),
        identity_label: label.to_string(),
        password: password.to_string(),
    }
}

async fn register(h: &Harness, tenant: i64, username: &str) -> User {
    h.service
        .register(
            &RequestContext::new(),
            register_request(tenant, username, "Secret1234"),
        )
        .await
        .unwrap()
}

async fn deactivate(h: &Harness, user: &User) {
    let mut stored = h.directory.find_by_id(user.id).await.unwrap().unwrap();
    stored.is_active = false;
    h.directory.update(&stored).await.unwrap();
}

#[derive(Debug)]
struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _event: &DomainEvent) -> AppResult<()> {
        Err(AppError::internal("broker unavailable"))
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;

    let result = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    assert_eq!(result.user.id, alice.id);
    assert_eq!(result.tokens.expires_in, 24 * 3600);
    assert_eq!(result.role.unwrap().name, "cashier");
    assert!(result.user.last_login_at.is_some());

    let validated = h
        .service
        .validate_token(&ctx, &result.tokens.access_token)
        .await
        .unwrap();
    assert_eq!(validated.user.id, alice.id);
    assert_eq!(validated.claims.tenant_id, TenantId::new(1));
}

#[tokio::test]
async fn test_login_by_email() {
    let h = harness().await;
    let alice = register(&h, 1, "alice").await;

    let result = h
        .service
        .login(
            &RequestContext::new(),
            login_request(1, "ALICE@example.com", "Secret1234"),
        )
        .await
        .unwrap();
    assert_eq!(result.user.id, alice.id);
}

#[tokio::test]
async fn test_login_records_last_login() {
    let h = harness().await;
    let alice = register(&h, 1, "alice").await;
    h.service
        .login(&RequestContext::new(), login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let stored = h.directory.find_by_id(alice.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_unknown_label_and_wrong_password_are_indistinguishable() {
    let h = harness().await;
    let ctx = RequestContext::new();
    register(&h, 1, "alice").await;

    let wrong_password = h
        .service
        .login(&ctx, login_request(1, "alice", "Wrong12345"))
        .await
        .unwrap_err();
    let unknown = h
        .service
        .login(&ctx, login_request(1, "nobody", "Secret1234"))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown.to_string());
    assert!(h.sessions.is_empty());
}

#[tokio::test]
async fn test_inactive_account_rejected_with_correct_password() {
    let h = harness().await;
    let alice = register(&h, 1, "alice").await;
    deactivate(&h, &alice).await;

    let err = h
        .service
        .login(&RequestContext::new(), login_request(1, "alice", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountInactive);
}

#[tokio::test]
async fn test_inactive_tenant_rejected() {
    let h = harness().await;
    register(&h, 2, "bob").await;

    let now = Utc::now();
    h.directory
        .insert_tenant(Tenant {
            id: TenantId::new(2),
            name: "Second".to_string(),
            is_active: false,
            trial_ends_at: None,
            created_at: now,
            updated_at: now,
        })
        .await;

    let err = h
        .service
        .login(&RequestContext::new(), login_request(2, "bob", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountInactive);
}

#[tokio::test]
async fn test_labels_are_tenant_scoped() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let in_one = register(&h, 1, "alice").await;
    let in_two = register(&h, 2, "alice").await;
    assert_ne!(in_one.id, in_two.id);

    let result = h
        .service
        .login(&ctx, login_request(2, "alice", "Secret1234"))
        .await
        .unwrap();
    assert_eq!(result.user.id, in_two.id);

    let err = h
        .service
        .login(&ctx, login_request(3, "alice", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_register_duplicate_in_tenant() {
    let h = harness().await;
    register(&h, 1, "alice").await;

    let err = h
        .service
        .register(
            &RequestContext::new(),
            register_request(1, "Alice", "Secret1234"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateIdentity);
}

#[tokio::test]
async fn test_register_validation() {
    let h = harness().await;
    let ctx = RequestContext::new();

    let weak = h
        .service
        .register(&ctx, register_request(1, "alice", "short"))
        .await
        .unwrap_err();
    assert_eq!(weak.kind, ErrorKind::Validation);

    let no_tenant = h
        .service
        .register(&ctx, register_request(9, "alice", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(no_tenant.kind, ErrorKind::Validation);

    let mut bad_email = register_request(1, "alice", "Secret1234");
    bad_email.email = "not-an-email".to_string();
    let err = h.service.register(&ctx, bad_email).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_refresh_token_issues_new_pair() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let pair = h
        .service
        .refresh_token(&ctx, &login.tokens.refresh_token)
        .await
        .unwrap();
    let validated = h
        .service
        .validate_token(&ctx, &pair.access_token)
        .await
        .unwrap();
    assert_eq!(validated.user.id, alice.id);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let h = harness().await;
    let ctx = RequestContext::new();
    register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let err = h
        .service
        .refresh_token(&ctx, &login.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::WrongTokenKind);
}

#[tokio::test]
async fn test_validate_rejects_refresh_token() {
    let h = harness().await;
    let ctx = RequestContext::new();
    register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let err = h
        .service
        .validate_token(&ctx, &login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::WrongTokenKind);
}

#[tokio::test]
async fn test_validate_rejects_deactivated_user() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();
    deactivate(&h, &alice).await;

    let err = h
        .service
        .validate_token(&ctx, &login.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountInactive);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    for _ in 0..2 {
        h.service
            .login(&ctx, login_request(1, "alice", "Secret1234"))
            .await
            .unwrap();
    }
    assert_eq!(h.sessions.find_by_user_id(alice.id).await.unwrap().len(), 2);

    assert_eq!(h.service.logout(&ctx, alice.id).await.unwrap(), 2);
    assert!(h.sessions.find_by_user_id(alice.id).await.unwrap().is_empty());

    assert_eq!(h.service.logout(&ctx, alice.id).await.unwrap(), 0);
    assert!(h.sessions.find_by_user_id(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_revokes_bound_tokens() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    h.service.logout(&ctx, alice.id).await.unwrap();

    let err = h
        .service
        .validate_token(&ctx, &login.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionRevoked);
    let err = h
        .service
        .refresh_token(&ctx, &login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionRevoked);
}

#[tokio::test]
async fn test_unbound_tokens_outlive_logout() {
    let h = harness_with(false, None).await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    h.service.logout(&ctx, alice.id).await.unwrap();

    let validated = h
        .service
        .validate_token(&ctx, &login.tokens.access_token)
        .await
        .unwrap();
    assert_eq!(validated.user.id, alice.id);
    assert!(
        h.service
            .refresh_token(&ctx, &login.tokens.refresh_token)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_change_password() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let before = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();
    h.service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let revoked = h
        .service
        .change_password(&ctx, alice.id, "Secret1234", "Fresh5678")
        .await
        .unwrap();
    assert_eq!(revoked, 2);
    assert!(h.sessions.find_by_user_id(alice.id).await.unwrap().is_empty());

    let err = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    let err = h
        .service
        .validate_token(&ctx, &before.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionRevoked);

    assert!(
        h.service
            .login(&ctx, login_request(1, "alice", "Fresh5678"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_change_password_wrong_old_password() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    h.service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let err = h
        .service
        .change_password(&ctx, alice.id, "Wrong12345", "Fresh5678")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(h.sessions.find_by_user_id(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_change_password_policy() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;

    let same = h
        .service
        .change_password(&ctx, alice.id, "Secret1234", "Secret1234")
        .await
        .unwrap_err();
    assert_eq!(same.kind, ErrorKind::Validation);

    let missing = h
        .service
        .change_password(&ctx, UserId::new(999), "Secret1234", "Fresh5678")
        .await
        .unwrap_err();
    assert_eq!(missing.kind, ErrorKind::IdentityNotFound);
}

#[tokio::test]
async fn test_events_published() {
    let h = harness().await;
    let mut rx = h.bus.subscribe();
    let ctx = RequestContext::new();

    let alice = register(&h, 1, "alice").await;
    h.service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();
    h.service.logout(&ctx, alice.id).await.unwrap();
    h.service
        .reset_password(&ctx, TenantId::new(1), "alice")
        .await
        .unwrap();

    let types: Vec<(String, String)> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|published| (published.topic, published.event.event_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("auth.register".to_string(), "user.registered".to_string()),
            ("auth.login".to_string(), "user.logged_in".to_string()),
            ("auth.logout".to_string(), "user.logged_out".to_string()),
            (
                "auth.password_reset".to_string(),
                "password.reset_requested".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_operation() {
    let h = harness_with(true, Some(Arc::new(FailingPublisher))).await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;

    assert!(
        h.service
            .login(&ctx, login_request(1, "alice", "Secret1234"))
            .await
            .is_ok()
    );
    assert_eq!(h.service.logout(&ctx, alice.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_reset_password_unknown_identity() {
    let h = harness().await;
    let mut rx = h.bus.subscribe();

    let err = h
        .service
        .reset_password(&RequestContext::new(), TenantId::new(1), "ghost")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::IdentityNotFound);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_verify_email_not_implemented() {
    let h = harness().await;
    let err = h
        .service
        .verify_email(&RequestContext::new(), "anything")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}

#[tokio::test]
async fn test_cancelled_login_leaves_no_session() {
    let h = harness().await;
    register(&h, 1, "alice").await;

    let ctx = RequestContext::new();
    ctx.cancel();
    let err = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert!(h.sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_create_independent_sessions() {
    let h = harness().await;
    let alice = register(&h, 1, "alice").await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = h.service.clone();
        handles.push(tokio::spawn(async move {
            service
                .login(&RequestContext::new(), login_request(1, "alice", "Secret1234"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.sessions.find_by_user_id(alice.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_register_rejects_username_shaped_like_email() {
    let h = harness().await;
    let ctx = RequestContext::new();

    let mut request = register_request(1, "shared", "Secret1234");
    request.username = "shared@example.com".to_string();
    request.email = "first@example.com".to_string();
    let err = h.service.register(&ctx, request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let first = register(&h, 1, "first").await;
    let mut clash = register_request(1, "second", "Secret1234");
    clash.email = "FIRST@example.com".to_string();
    let err = h.service.register(&ctx, clash).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateIdentity);

    let login = h
        .service
        .login(&ctx, login_request(1, "first@example.com", "Secret1234"))
        .await
        .unwrap();
    assert_eq!(login.user.id, first.id);
}

#[tokio::test]
async fn test_register_phone_length() {
    let h = harness().await;
    let ctx = RequestContext::new();

    let mut long = register_request(1, "alice", "Secret1234");
    long.phone = Some("1".repeat(super::auth::MAX_PHONE_LENGTH + 10));
    let err = h.service.register(&ctx, long).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let mut fits = register_request(1, "alice", "Secret1234");
    fits.phone = Some(format!(" {} ", "1".repeat(super::auth::MAX_PHONE_LENGTH)));
    let user = h.service.register(&ctx, fits).await.unwrap();
    assert_eq!(user.phone.as_deref().map(str::len), Some(super::auth::MAX_PHONE_LENGTH));
}

#[tokio::test]
async fn test_session_lives_as_long_as_refresh_token() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    h.service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let sessions = h.sessions.find_by_user_id(alice.id).await.unwrap();
    let refresh_window = chrono::Duration::days(7) - chrono::Duration::minutes(1);
    assert!(sessions[0].expires_at > Utc::now() + refresh_window);
}

#[tokio::test]
async fn test_refresh_renews_session_near_its_end() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    // Leave the session one minute from expiry, past the access token window.
    let mut session = h.sessions.find_by_user_id(alice.id).await.unwrap().remove(0);
    h.sessions.delete(&session.id).await.unwrap();
    session.expires_at = Utc::now() + chrono::Duration::minutes(1);
    h.sessions.create(session.clone()).await.unwrap();

    let pair = h
        .service
        .refresh_token(&ctx, &login.tokens.refresh_token)
        .await
        .unwrap();

    let renewed = h.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert!(renewed.expires_at > Utc::now() + chrono::Duration::days(6));
    assert_eq!(renewed.refresh_token, pair.refresh_token);
    assert_eq!(renewed.access_token, pair.access_token);

    let again = h.service.refresh_token(&ctx, &pair.refresh_token).await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_refresh_fails_once_session_expired() {
    let h = harness().await;
    let ctx = RequestContext::new();
    let alice = register(&h, 1, "alice").await;
    let login = h
        .service
        .login(&ctx, login_request(1, "alice", "Secret1234"))
        .await
        .unwrap();

    let mut session = h.sessions.find_by_user_id(alice.id).await.unwrap().remove(0);
    h.sessions.delete(&session.id).await.unwrap();
    session.expires_at = Utc::now() - chrono::Duration::seconds(1);
    h.sessions.create(session).await.unwrap();

    let err = h
        .service
        .refresh_token(&ctx, &login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionRevoked);
}

/// Counts directory calls so the two login failure paths can be compared.
#[derive(Debug)]
struct CountingDirectory {
    inner: MemoryUserDirectory,
    calls: std::sync::atomic::AtomicUsize,
}

impl CountingDirectory {
    fn tick(&self) {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn take(&self) -> usize {
        self.calls.swap(0, std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for CountingDirectory {
    async fn find_by_identity_label(&self, tenant_id: TenantId, label: &str) -> AppResult<Option<User>> {
        self.tick();
        self.inner.find_by_identity_label(tenant_id, label).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        self.tick();
        self.inner.find_by_id(user_id).await
    }

    async fn create(&self, user: pos_entity::user::CreateUser) -> AppResult<User> {
        self.tick();
        self.inner.create(user).await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.tick();
        self.inner.update(user).await
    }

    async fn record_login(&self, user_id: UserId, at: chrono::DateTime<Utc>) -> AppResult<()> {
        self.tick();
        self.inner.record_login(user_id, at).await
    }

    async fn find_role(&self, role_id: pos_core::types::RoleId) -> AppResult<Option<pos_entity::role::Role>> {
        self.tick();
        self.inner.find_role(role_id).await
    }

    async fn find_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>> {
        self.tick();
        self.inner.find_tenant(tenant_id).await
    }
}

#[tokio::test]
async fn test_failed_logins_make_the_same_directory_calls() {
    let directory = Arc::new(CountingDirectory {
        inner: MemoryUserDirectory::with_defaults().await,
        calls: std::sync::atomic::AtomicUsize::new(0),
    });
    let service = AuthService::new(
        &auth_config(true),
        &SessionConfig::default(),
        directory.clone(),
        Arc::new(MemorySessionStore::new()),
        Arc::new(BroadcastEventBus::new(8)),
    )
    .unwrap();
    let ctx = RequestContext::new();
    service
        .register(&ctx, register_request(1, "alice", "Secret1234"))
        .await
        .unwrap();
    directory.take();

    service
        .login(&ctx, login_request(1, "mallory", "Secret1234"))
        .await
        .unwrap_err();
    let unknown = directory.take();

    service
        .login(&ctx, login_request(1, "alice", "Wrong12345"))
        .await
        .unwrap_err();
    let wrong_password = directory.take();

    assert_eq!(unknown, wrong_password);
}
