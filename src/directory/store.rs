use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::directory::models::User;

/// One session's copy of the user list. Order is fetch order, with form
/// submissions appended at the end.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn from_users(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn add(&mut self, user: User) {
        self.users.push(user);
    }
}

/// Per-session directories keyed by the session cookie. Each browser
/// session gets its own list copy; appends are never visible across
/// sessions and everything is lost on restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Directory>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.lock().await.contains_key(&id)
    }

    /// Seeds a session with a freshly fetched list. If a concurrent request
    /// seeded it first, the existing list wins so appends aren't dropped.
    pub async fn seed(&self, id: Uuid, users: Vec<User>) {
        self.sessions
            .lock()
            .await
            .entry(id)
            .or_insert_with(|| Directory::from_users(users));
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<Directory> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Appends to the session's list and returns the new length, or None
    /// when the session was never seeded.
    pub async fn add_user(&self, id: Uuid, user: User) -> Option<usize> {
        let mut sessions = self.sessions.lock().await;
        let directory = sessions.get_mut(&id)?;
        directory.add(user);
        Some(directory.len())
    }
}
