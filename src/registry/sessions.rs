//! Bounded store for open sessions.

use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use crate::error::{RegistryError, RegistryResult};

/// Open sessions keyed by id, holding at most `capacity` of them.
///
/// Clients that never close a session would otherwise grow the store
/// without bound. Opening a session when the store is full evicts the
/// oldest open one.
#[derive(Debug, Clone)]
pub struct SessionMap<T> {
    sessions: HashMap<Uuid, T>,
    order: VecDeque<Uuid>,
    capacity: usize,
}

impl<T> SessionMap<T> {
    /// Creates an empty store. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Stores `session` under a fresh id.
    ///
    /// Returns the new id and the id of the session evicted to make room,
    /// if any.
    pub fn open(&mut self, session: T) -> (Uuid, Option<Uuid>) {
        let evicted = if self.sessions.len() >= self.capacity {
            self.order.pop_front().inspect(|oldest| {
                self.sessions.remove(oldest);
            })
        } else {
            None
        };

        let id = Uuid::new_v4();
        self.sessions.insert(id, session);
        self.order.push_back(id);
        (id, evicted)
    }

    /// Gets an open session.
    pub fn get(&self, id: Uuid) -> RegistryResult<&T> {
        self.sessions
            .get(&id)
            .ok_or(RegistryError::SessionNotFound { id })
    }

    /// Gets an open session for modification.
    pub fn get_mut(&mut self, id: Uuid) -> RegistryResult<&mut T> {
        self.sessions
            .get_mut(&id)
            .ok_or(RegistryError::SessionNotFound { id })
    }

    /// Removes and returns an open session.
    pub fn close(&mut self, id: Uuid) -> RegistryResult<T> {
        let session = self
            .sessions
            .remove(&id)
            .ok_or(RegistryError::SessionNotFound { id })?;
        self.order.retain(|open| *open != id);
        Ok(session)
    }

    /// Returns the number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_get_close() {
        let mut sessions = SessionMap::new(4);
        let (id, evicted) = sessions.open("draft");
        assert!(evicted.is_none());
        assert_eq!(*sessions.get(id).unwrap(), "draft");

        *sessions.get_mut(id).unwrap() = "edited";
        assert_eq!(sessions.close(id).unwrap(), "edited");
        assert!(sessions.is_empty());
        assert!(matches!(
            sessions.get(id),
            Err(RegistryError::SessionNotFound { .. })
        ));
    }

    #[test]
    fn test_full_store_evicts_oldest() {
        let mut sessions = SessionMap::new(2);
        let (first, _) = sessions.open(1);
        let (second, _) = sessions.open(2);
        let (third, evicted) = sessions.open(3);

        assert_eq!(evicted, Some(first));
        assert_eq!(sessions.len(), 2);
        assert!(sessions.get(first).is_err());
        assert_eq!(*sessions.get(second).unwrap(), 2);
        assert_eq!(*sessions.get(third).unwrap(), 3);
    }

    #[test]
    fn test_closed_session_frees_its_slot() {
        let mut sessions = SessionMap::new(2);
        let (first, _) = sessions.open(1);
        let (second, _) = sessions.open(2);
        sessions.close(first).unwrap();

        let (_, evicted) = sessions.open(3);
        assert!(evicted.is_none());
        assert!(sessions.get(second).is_ok());
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut sessions = SessionMap::new(0);
        sessions.open(1);
        let (latest, _) = sessions.open(2);
        assert_eq!(sessions.len(), 1);
        assert_eq!(*sessions.get(latest).unwrap(), 2);
    }
}
