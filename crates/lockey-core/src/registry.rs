//! Session registry.
//!
//! Records the expected (session, client, process) triple for every open
//! session. The session ID is issued here from the environment's randomness;
//! client and process IDs are supplied by the client.

use std::{collections::HashMap, time::Instant};

use lockey_proto::{Id, IdentityField, Session, SessionDescriptor};

use crate::{
    auth::{self, AuthError},
    env::Environment,
};

/// A registered session and when it was opened.
#[derive(Debug, Clone)]
struct Entry {
    session: SessionDescriptor,
    opened_at: Instant,
}

/// Expected identity triples, keyed by session ID.
pub struct SessionRegistry<E: Environment> {
    env: E,
    sessions: HashMap<Id, Entry>,
}

impl<E: Environment> SessionRegistry<E> {
    /// Create an empty registry.
    pub fn new(env: E) -> Self {
        Self { env, sessions: HashMap::new() }
    }

    /// Open a session for `client_id`/`process_id`, issuing a fresh session
    /// ID.
    pub fn open(&mut self, client_id: Id, process_id: Id) -> Result<SessionDescriptor, AuthError> {
        if client_id.is_empty() {
            return Err(AuthError::EmptyIdentity { field: IdentityField::ClientId });
        }
        if process_id.is_empty() {
            return Err(AuthError::EmptyIdentity { field: IdentityField::ProcessId });
        }

        let session_id = loop {
            let candidate = Id::new(format!("{:032x}", self.env.random_u128()));
            if !self.sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = SessionDescriptor::new(session_id.clone(), client_id, process_id);
        self.sessions
            .insert(session_id, Entry { session: session.clone(), opened_at: self.env.now() });

        tracing::debug!(
            client_id = %session.client_id(),
            process_id = %session.process_id(),
            "Session opened"
        );

        Ok(session)
    }

    /// Check a presented session against the recorded triple.
    pub fn authorize(
        &self,
        presented: &(impl Session + ?Sized),
    ) -> Result<&SessionDescriptor, AuthError> {
        auth::validate(presented)?;

        let entry = self
            .sessions
            .get(presented.session_id())
            .ok_or_else(|| AuthError::UnknownSession {
                session_id: presented.session_id().clone(),
            })?;

        auth::authorize(presented, &entry.session)?;
        Ok(&entry.session)
    }

    /// Authorize and remove a session, returning the removed record.
    pub fn close(
        &mut self,
        presented: &(impl Session + ?Sized),
    ) -> Result<SessionDescriptor, AuthError> {
        self.authorize(presented)?;

        let entry = self
            .sessions
            .remove(presented.session_id())
            .ok_or_else(|| AuthError::UnknownSession {
                session_id: presented.session_id().clone(),
            })?;

        tracing::debug!(
            client_id = %entry.session.client_id(),
            open_ms = self.env.now().saturating_duration_since(entry.opened_at).as_millis(),
            "Session closed"
        );

        Ok(entry.session)
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
