//! SimpleLockService tests

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use lockey_core::{AuthError, Environment, LockError, LockService, SimpleLockService};
use lockey_proto::{Id, IdentityField, Session, SessionDescriptor, SessionToken};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Seeded environment so issued session IDs are reproducible
#[derive(Clone)]
struct TestEnv(Arc<Mutex<ChaCha8Rng>>);

impl TestEnv {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(7))))
    }
}

impl Environment for TestEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.0.lock().unwrap().fill_bytes(buffer);
    }
}

fn service() -> SimpleLockService<TestEnv> {
    SimpleLockService::new(TestEnv::new())
}

async fn open(
    service: &SimpleLockService<TestEnv>,
    client: &str,
    process: &str,
) -> SessionDescriptor {
    service.open_session(Id::new(client), Id::new(process)).await.unwrap()
}

#[tokio::test]
async fn acquire_then_release() {
    let service = service();
    let session = open(&service, "C1", "P1").await;

    service.acquire(&session, "file-1").await.unwrap();
    assert!(service.check_acquired(&session, "file-1").await.unwrap());
    assert!(!service.check_released(&session, "file-1").await.unwrap());

    service.release(&session, "file-1").await.unwrap();
    assert!(service.check_released(&session, "file-1").await.unwrap());
    assert_eq!(service.held_count(), 0);
}

#[tokio::test]
async fn acquire_held_lock_conflicts() {
    let service = service();
    let first = open(&service, "C1", "P1").await;
    let second = open(&service, "C2", "P1").await;

    service.acquire(&first, "file-1").await.unwrap();

    let result = service.acquire(&second, "file-1").await;
    assert_eq!(result, Err(LockError::AlreadyAcquired { resource: "file-1".to_string() }));

    // Re-acquiring by the owner is also a conflict.
    assert!(matches!(
        service.acquire(&first, "file-1").await,
        Err(LockError::AlreadyAcquired { .. })
    ));
}

#[tokio::test]
async fn release_by_other_session_is_unauthorized() {
    let service = service();
    let owner = open(&service, "C1", "P1").await;
    let other = open(&service, "C1", "P2").await;

    service.acquire(&owner, "file-1").await.unwrap();

    let err = service.release(&other, "file-1").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(service.check_acquired(&owner, "file-1").await.unwrap());
}

#[tokio::test]
async fn release_with_wrong_process_for_real_session_is_rejected() {
    let service = service();
    let owner = open(&service, "C1", "P1").await;
    service.acquire(&owner, "file-1").await.unwrap();

    // Right session and client, wrong process: the registry rejects it.
    let forged = SessionDescriptor::new(owner.session_id().clone(), "C1", "P2");
    assert_eq!(
        service.release(&forged, "file-1").await,
        Err(LockError::Unauthorized(AuthError::IdentityMismatch {
            field: IdentityField::ProcessId,
        }))
    );
}

#[tokio::test]
async fn release_unheld_lock_fails() {
    let service = service();
    let session = open(&service, "C1", "P1").await;

    assert_eq!(
        service.release(&session, "file-9").await,
        Err(LockError::NotAcquired { resource: "file-9".to_string() })
    );
}

#[tokio::test]
async fn unknown_session_cannot_acquire() {
    let service = service();
    let stranger = SessionToken::from_parts(Some("S-unknown"), Some("C1"), Some("P1"));

    let err = service.acquire(&stranger, "file-1").await.unwrap_err();
    assert!(matches!(err, LockError::Unauthorized(AuthError::UnknownSession { .. })));
    assert_eq!(service.held_count(), 0);
}

#[tokio::test]
async fn incomplete_token_is_rejected() {
    let service = service();
    let session = open(&service, "C1", "P1").await;
    let token = SessionToken::from_parts(Some(session.session_id().as_str()), Some("C1"), None);

    assert_eq!(
        service.acquire(&token, "file-1").await,
        Err(LockError::Unauthorized(AuthError::EmptyIdentity { field: IdentityField::ProcessId }))
    );
}

#[tokio::test]
async fn token_matching_registry_is_accepted() {
    let service = service();
    let session = open(&service, "C1", "P1").await;
    let token =
        SessionToken::from_parts(Some(session.session_id().as_str()), Some("C1"), Some("P1"));

    service.acquire(&token, "file-1").await.unwrap();
    service.release(&session, "file-1").await.unwrap();
}

#[tokio::test]
async fn empty_resource_is_invalid() {
    let service = service();
    let session = open(&service, "C1", "P1").await;

    assert!(matches!(service.acquire(&session, "  ").await, Err(LockError::InvalidRequest { .. })));
}

#[tokio::test]
async fn open_session_rejects_empty_ids() {
    let service = service();
    let result = service.open_session(Id::empty(), Id::new("P1")).await;
    assert_eq!(result, Err(LockError::InvalidRequest { reason: "client id is empty".to_string() }));

    let err = service.open_session(Id::new("C1"), Id::empty()).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid request: process id is empty");
    assert!(!err.is_unauthorized());
    assert_eq!(service.session_count(), 0);
}

#[tokio::test]
async fn close_session_releases_its_locks_only() {
    let service = service();
    let a = open(&service, "C1", "P1").await;
    let b = open(&service, "C2", "P1").await;

    service.acquire(&a, "file-1").await.unwrap();
    service.acquire(&a, "file-2").await.unwrap();
    service.acquire(&b, "file-3").await.unwrap();

    assert_eq!(service.close_session(&a).await.unwrap(), 2);
    assert_eq!(service.held_count(), 1);
    assert_eq!(service.session_count(), 1);

    // A closed session no longer authorizes anything.
    assert!(service.acquire(&a, "file-1").await.unwrap_err().is_unauthorized());
    service.acquire(&b, "file-1").await.unwrap();
}

#[tokio::test]
async fn service_is_usable_as_trait_object() {
    let service: Arc<dyn LockService> = Arc::new(service());
    let session = service.open_session(Id::new("C1"), Id::new("P1")).await.unwrap();
    let session: &dyn Session = &session;

    service.acquire(session, "file-1").await.unwrap();
    assert!(service.check_acquired(session, "file-1").await.unwrap());
}
