/// End-to-end tests for the notification center over the in-memory store
///
/// This test module covers:
/// - Role-scoped listing (admin sees all, member sees own, anonymous sees none)
/// - Idempotent scope-bound mark-all-read
/// - Delete authorization and not-found outcomes
use jsonwebtoken::{encode, EncodingKey, Header};
use notification_center::auth::{Claims, IdentityResolver, StaticAccountStore};
use notification_center::models::{NewNotification, Notification, Role, TargetScope};
use notification_center::store::{MemoryNotificationStore, NotificationStore};
use notification_center::{AppError, NotificationCenter};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "center-test-secret";

fn token_for(caller_id: Uuid) -> String {
    encode(
        &Header::default(),
        &Claims::new(caller_id),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

struct Fixture {
    center: NotificationCenter,
    store: Arc<MemoryNotificationStore>,
    admin_token: String,
    member_token: String,
    member_id: Uuid,
}

impl Fixture {
    fn new() -> Self {
        let admin_id = Uuid::new_v4();
        let member_id = Uuid::new_v4();

        let accounts = StaticAccountStore::new()
            .with_role(admin_id, Role::Admin)
            .with_role(member_id, Role::Member);
        let resolver = IdentityResolver::new(SECRET, Arc::new(accounts));

        let store = Arc::new(MemoryNotificationStore::new());
        let center = NotificationCenter::new(store.clone(), resolver);

        Self {
            center,
            store,
            admin_token: token_for(admin_id),
            member_token: token_for(member_id),
            member_id,
        }
    }

    async fn seed(&self, message: &str, target: TargetScope) -> Notification {
        self.store
            .insert(NewNotification {
                message: message.to_string(),
                target,
                image_url: None,
            })
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn admin_lists_every_notification() {
    let fx = Fixture::new();
    fx.seed("broadcast alert", TargetScope::Broadcast).await;
    fx.seed("for member", TargetScope::Member(fx.member_id))
        .await;
    fx.seed("for someone else", TargetScope::Member(Uuid::new_v4()))
        .await;

    let listed = fx.center.list(Some(&fx.admin_token)).await.unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn member_lists_only_own_notifications() {
    let fx = Fixture::new();
    fx.seed("broadcast alert", TargetScope::Broadcast).await;
    let own = fx
        .seed("for member", TargetScope::Member(fx.member_id))
        .await;
    fx.seed("for someone else", TargetScope::Member(Uuid::new_v4()))
        .await;

    let listed = fx.center.list(Some(&fx.member_token)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, own.id);
}

#[tokio::test]
async fn anonymous_list_is_empty_not_an_error() {
    let fx = Fixture::new();
    fx.seed("broadcast alert", TargetScope::Broadcast).await;

    assert!(fx.center.list(None).await.unwrap().is_empty());
    assert!(fx
        .center
        .list(Some("garbage-token"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unread_count_tracks_scope() {
    let fx = Fixture::new();
    fx.seed("broadcast alert", TargetScope::Broadcast).await;
    fx.seed("for member", TargetScope::Member(fx.member_id))
        .await;

    assert_eq!(fx.center.unread_count(Some(&fx.admin_token)).await.unwrap(), 2);
    assert_eq!(
        fx.center.unread_count(Some(&fx.member_token)).await.unwrap(),
        1
    );
    assert_eq!(fx.center.unread_count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn mark_all_read_is_idempotent() {
    let fx = Fixture::new();
    fx.seed("one", TargetScope::Member(fx.member_id)).await;
    fx.seed("two", TargetScope::Member(fx.member_id)).await;

    assert_eq!(fx.center.mark_all_read(Some(&fx.member_token)).await.unwrap(), 2);
    assert_eq!(fx.center.mark_all_read(Some(&fx.member_token)).await.unwrap(), 0);
}

#[tokio::test]
async fn mark_all_read_never_touches_out_of_scope_records() {
    let fx = Fixture::new();
    let broadcast = fx.seed("broadcast alert", TargetScope::Broadcast).await;
    let own = fx
        .seed("for member", TargetScope::Member(fx.member_id))
        .await;

    assert_eq!(fx.center.mark_all_read(Some(&fx.member_token)).await.unwrap(), 1);

    let after: Vec<Notification> = fx.center.list(Some(&fx.admin_token)).await.unwrap();
    let find = |id: Uuid| after.iter().find(|n| n.id == id).unwrap();
    assert!(find(own.id).is_read);
    assert!(!find(broadcast.id).is_read);
}

#[tokio::test]
async fn mark_all_read_for_anonymous_is_a_noop() {
    let fx = Fixture::new();
    fx.seed("broadcast alert", TargetScope::Broadcast).await;

    assert_eq!(fx.center.mark_all_read(None).await.unwrap(), 0);
    let listed = fx.center.list(Some(&fx.admin_token)).await.unwrap();
    assert!(!listed[0].is_read);
}

#[tokio::test]
async fn delete_out_of_scope_is_forbidden_and_leaves_record_untouched() {
    let fx = Fixture::new();
    let broadcast = fx.seed("broadcast alert", TargetScope::Broadcast).await;

    let err = fx
        .center
        .delete_notification(Some(&fx.member_token), broadcast.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let survivor = fx.store.get(broadcast.id).await.unwrap().unwrap();
    assert!(!survivor.is_read);
}

#[tokio::test]
async fn delete_for_anonymous_is_forbidden_without_store_access() {
    let fx = Fixture::new();
    let err = fx
        .center
        .delete_notification(None, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn delete_already_deleted_id_is_not_found() {
    let fx = Fixture::new();
    let own = fx
        .seed("for member", TargetScope::Member(fx.member_id))
        .await;

    fx.center
        .delete_notification(Some(&fx.member_token), own.id)
        .await
        .unwrap();

    let err = fx
        .center
        .delete_notification(Some(&fx.member_token), own.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn admin_can_delete_any_record() {
    let fx = Fixture::new();
    let other = fx
        .seed("for someone else", TargetScope::Member(Uuid::new_v4()))
        .await;

    fx.center
        .delete_notification(Some(&fx.admin_token), other.id)
        .await
        .unwrap();
    assert!(fx.store.get(other.id).await.unwrap().is_none());
}

// The concrete scenario from the design review: one member record, one
// broadcast record, member marks their own read, admin sees both states.
#[tokio::test]
async fn member_and_admin_views_stay_consistent() {
    let fx = Fixture::new();
    let own = fx
        .seed("your parcel arrived", TargetScope::Member(fx.member_id))
        .await;
    let broadcast = fx
        .seed("new maintenance request", TargetScope::Broadcast)
        .await;

    let member_view = fx.center.list(Some(&fx.member_token)).await.unwrap();
    assert_eq!(member_view.len(), 1);
    assert_eq!(member_view[0].id, own.id);

    assert_eq!(fx.center.mark_all_read(Some(&fx.member_token)).await.unwrap(), 1);

    let admin_view = fx.center.list(Some(&fx.admin_token)).await.unwrap();
    assert_eq!(admin_view.len(), 2);
    let find = |id: Uuid| admin_view.iter().find(|n| n.id == id).unwrap();
    assert!(find(own.id).is_read);
    assert!(!find(broadcast.id).is_read);
}
