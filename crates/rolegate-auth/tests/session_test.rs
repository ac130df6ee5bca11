//! Integration tests for bearer resolution and permission sets.

mod helpers;

use chrono::Duration;

use rolegate_auth::jwt::TokenCodec;
use rolegate_auth::rbac::{DEFAULT_PERMISSIONS, RbacEnforcer, permissions_of};
use rolegate_auth::TokenKind;
use rolegate_core::config::AuthConfig;
use rolegate_core::error::ErrorKind;

use helpers::TestAuth;

#[tokio::test]
async fn test_viewer_permissions() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("alice", "alice@example.com", "password123")
        .await
        .unwrap();

    let user = ctx.resolver.resolve(&session.tokens.access_token).await.unwrap();
    assert_eq!(permissions_of(&user), vec!["read_article", "read_user"]);
}

#[tokio::test]
async fn test_admin_has_full_set() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("root", "root@example.com", "password123")
        .await
        .unwrap();
    ctx.grant_role(session.user.id(), "admin").await;

    let user = ctx.resolver.resolve(&session.tokens.access_token).await.unwrap();
    let mut expected: Vec<&str> = DEFAULT_PERMISSIONS.iter().map(|p| p.name).collect();
    expected.sort();
    assert_eq!(permissions_of(&user), expected);
    assert!(RbacEnforcer::new().require_permission(&user, "delete_user").is_ok());
}

#[tokio::test]
async fn test_editor_and_viewer_union_is_deduplicated() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("ed", "ed@example.com", "password123")
        .await
        .unwrap();
    ctx.grant_role(session.user.id(), "editor").await;

    let user = ctx.load(session.user.id()).await.unwrap();
    assert_eq!(
        permissions_of(&user),
        vec!["create_article", "read_article", "read_user", "update_article"]
    );
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("bob", "bob@example.com", "password123")
        .await
        .unwrap();

    let err = ctx
        .resolver
        .resolve(&session.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_foreign_and_expired_tokens_are_unauthenticated() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("carol", "carol@example.com", "password123")
        .await
        .unwrap();

    let foreign = TokenCodec::new(&AuthConfig::with_secret("someone-else"))
        .unwrap()
        .issue_access(session.user.id())
        .unwrap();
    let err = ctx.resolver.resolve(&foreign.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    let expired = ctx
        .codec
        .issue_with_ttl(session.user.id(), TokenKind::Access, Duration::seconds(-1))
        .unwrap();
    let err = ctx.resolver.resolve(&expired.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    let err = ctx.resolver.resolve("garbage").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_disabled_or_deleted_user_is_unauthenticated() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("dave", "dave@example.com", "password123")
        .await
        .unwrap();
    ctx.set_active(session.user.id(), false).await;

    let err = ctx
        .resolver
        .resolve(&session.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    let ghost = ctx.codec.issue_access(9_999).unwrap();
    let err = ctx.resolver.resolve(&ghost.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_store_failure_is_not_unauthenticated() {
    let ctx = TestAuth::new().await;
    let session = ctx
        .service
        .register("erin", "erin@example.com", "password123")
        .await
        .unwrap();

    ctx.store.set_unavailable(true);
    let err = ctx
        .resolver
        .resolve(&session.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
}
