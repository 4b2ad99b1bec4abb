//! The lock service collaborator.
//!
//! [`LockService`] is the seam between the node and lock state: the router
//! binds handlers to a shared `Arc<L: LockService>` once at startup, and every
//! concurrently running handler goes through it. Implementations own their
//! own concurrency discipline.
//!
//! [`SimpleLockService`] is the in-memory implementation the node ships with.
//! It keeps one owner triple per held resource and authorizes every call
//! against the [`SessionRegistry`].

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};

use async_trait::async_trait;
use lockey_proto::{Id, Session, SessionDescriptor};
use thiserror::Error;

use crate::{
    auth::{self, AuthError},
    env::Environment,
    registry::SessionRegistry,
};

/// Errors from lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The presented session failed the identity check.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// The resource is already held.
    #[error("lock already acquired: {resource}")]
    AlreadyAcquired {
        /// The contested resource.
        resource: String,
    },

    /// The resource is not held.
    #[error("lock not acquired: {resource}")]
    NotAcquired {
        /// The resource that was expected to be held.
        resource: String,
    },

    /// The request is malformed.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// What was wrong with it.
        reason: String,
    },
}

impl LockError {
    /// Returns true if this error is an authorization rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Lock operations, each attributed to a presented session.
#[async_trait]
pub trait LockService: Send + Sync + 'static {
    /// Open a session for a client process.
    async fn open_session(
        &self,
        client_id: Id,
        process_id: Id,
    ) -> Result<SessionDescriptor, LockError>;

    /// Close a session, releasing every lock it holds. Returns the number of
    /// locks released.
    async fn close_session(&self, session: &dyn Session) -> Result<usize, LockError>;

    /// Acquire `resource` for the session.
    async fn acquire(&self, session: &dyn Session, resource: &str) -> Result<(), LockError>;

    /// Release `resource`. Only the owning session may release.
    async fn release(&self, session: &dyn Session, resource: &str) -> Result<(), LockError>;

    /// Returns true if `resource` is currently held.
    async fn check_acquired(
        &self,
        session: &dyn Session,
        resource: &str,
    ) -> Result<bool, LockError>;

    /// Returns true if `resource` is currently free.
    async fn check_released(
        &self,
        session: &dyn Session,
        resource: &str,
    ) -> Result<bool, LockError> {
        self.check_acquired(session, resource).await.map(|held| !held)
    }
}

#[derive(Debug)]
struct Held {
    owner: SessionDescriptor,
    acquired_at: Instant,
}

struct State<E: Environment> {
    registry: SessionRegistry<E>,
    locks: HashMap<String, Held>,
}

/// In-memory lock table.
pub struct SimpleLockService<E: Environment> {
    env: E,
    state: Mutex<State<E>>,
}

impl<E: Environment> SimpleLockService<E> {
    /// Create an empty lock service.
    pub fn new(env: E) -> Self {
        let registry = SessionRegistry::new(env.clone());
        Self { env, state: Mutex::new(State { registry, locks: HashMap::new() }) }
    }

    /// Number of currently held locks.
    pub fn held_count(&self) -> usize {
        self.state().locks.len()
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.state().registry.len()
    }

    // A panicking handler must not take the lock table down with it. Every
    // critical section leaves the maps consistent before anything can panic.
    fn state(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_resource(resource: &str) -> Result<(), LockError> {
    if resource.trim().is_empty() {
        return Err(LockError::InvalidRequest { reason: "resource name is empty".to_string() });
    }
    Ok(())
}

#[async_trait]
impl<E: Environment> LockService for SimpleLockService<E> {
    async fn open_session(
        &self,
        client_id: Id,
        process_id: Id,
    ) -> Result<SessionDescriptor, LockError> {
        self.state().registry.open(client_id, process_id).map_err(|err| match err {
            AuthError::EmptyIdentity { field } => {
                LockError::InvalidRequest { reason: format!("{field} is empty") }
            },
            other => LockError::Unauthorized(other),
        })
    }

    async fn close_session(&self, session: &dyn Session) -> Result<usize, LockError> {
        let mut state = self.state();
        let closed = state.registry.close(session)?;

        let before = state.locks.len();
        state.locks.retain(|_, held| held.owner != closed);
        let released = before - state.locks.len();

        if released > 0 {
            tracing::info!(
                client_id = %closed.client_id(),
                released,
                "Released locks of closed session"
            );
        }
        Ok(released)
    }

    async fn acquire(&self, session: &dyn Session, resource: &str) -> Result<(), LockError> {
        check_resource(resource)?;
        let mut state = self.state();
        let owner = state.registry.authorize(session)?.clone();

        if state.locks.contains_key(resource) {
            return Err(LockError::AlreadyAcquired { resource: resource.to_string() });
        }

        tracing::debug!(resource, process_id = %owner.process_id(), "Lock acquired");
        state.locks.insert(resource.to_string(), Held { owner, acquired_at: self.env.now() });
        Ok(())
    }

    async fn release(&self, session: &dyn Session, resource: &str) -> Result<(), LockError> {
        check_resource(resource)?;
        let mut state = self.state();
        state.registry.authorize(session)?;

        let held = state
            .locks
            .get(resource)
            .ok_or_else(|| LockError::NotAcquired { resource: resource.to_string() })?;
        auth::authorize(session, &held.owner)?;

        if let Some(held) = state.locks.remove(resource) {
            tracing::debug!(
                resource,
                held_ms = self.env.now().saturating_duration_since(held.acquired_at).as_millis(),
                "Lock released"
            );
        }
        Ok(())
    }

    async fn check_acquired(
        &self,
        session: &dyn Session,
        resource: &str,
    ) -> Result<bool, LockError> {
        check_resource(resource)?;
        let state = self.state();
        state.registry.authorize(session)?;
        Ok(state.locks.contains_key(resource))
    }
}
