use crate::model::User;
use crate::storage::Storage;

/// Holds at most one authenticated user, persisted under a fixed key.
pub struct SessionStore {
    user: Option<User>,
    dirty: bool,
}

impl SessionStore {
    pub const STORAGE_KEY: &'static str = "user";

    pub fn new() -> Self {
        SessionStore {
            user: None,
            dirty: false,
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        match storage.get_json::<User>(Self::STORAGE_KEY) {
            Ok(user) => self.user = user,
            Err(e) => {
                tracing::warn!(key = Self::STORAGE_KEY, error = %e, "failed to load session user");
            }
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set(&mut self, storage: &Storage, user: User) -> anyhow::Result<()> {
        self.user = Some(user);
        self.persist(storage)
    }

    pub fn clear(&mut self, storage: &Storage) -> anyhow::Result<()> {
        self.user = None;
        self.persist(storage)
    }

    fn persist(&mut self, storage: &Storage) -> anyhow::Result<()> {
        let result = match &self.user {
            Some(user) => storage.set_json(Self::STORAGE_KEY, user),
            None => storage.remove(Self::STORAGE_KEY),
        };
        match result {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::error!(key = Self::STORAGE_KEY, error = %e, "session write failed, in-memory state kept");
                Err(e)
            }
        }
    }

    pub(crate) fn flush(&mut self, storage: &Storage) -> anyhow::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn user() -> User {
        User {
            id: "1".to_string(),
            name: "John".to_string(),
            family_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Teacher,
        }
    }

    #[test]
    fn set_persists_and_clear_removes() {
        let storage = Storage::open_in_memory().expect("open");
        let mut session = SessionStore::new();
        session.load(&storage);
        assert!(session.current().is_none());

        session.set(&storage, user()).expect("set");
        assert_eq!(session.current().map(|u| u.id.as_str()), Some("1"));

        // A fresh store over the same storage sees the persisted user.
        let mut reloaded = SessionStore::new();
        reloaded.load(&storage);
        assert_eq!(reloaded.current().map(|u| u.email.as_str()), Some("john@example.com"));

        session.clear(&storage).expect("clear");
        let mut after_logout = SessionStore::new();
        after_logout.load(&storage);
        assert!(after_logout.current().is_none());
    }
}
