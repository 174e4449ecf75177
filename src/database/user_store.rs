use std::sync::{PoisonError, RwLock};

use super::StoreError;
use crate::models::User;

/// Persistence seam for accounts.
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with [`StoreError::Duplicate`] when the email
    /// (case-insensitive) is already taken.
    fn insert(&self, user: User) -> Result<(), StoreError>;

    fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Process-local user list. Accounts are lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore for InMemoryUserStore {
    fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate(user.email));
        }
        users.push(user);
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            role: Role::Donor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_email_rejected_any_case() {
        let store = InMemoryUserStore::default();
        store.insert(user("u1", "ann@example.com")).unwrap();

        let err = store.insert(user("u2", "ANN@Example.com")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert!(store.find_by_id("u2").unwrap().is_none());
        assert_eq!(store.find_by_email("ann@example.com").unwrap().unwrap().id, "u1");
    }

    #[test]
    fn test_lookup_by_email_ignores_case() {
        let store = InMemoryUserStore::default();
        store.insert(user("u1", "ann@example.com")).unwrap();

        assert_eq!(store.find_by_email("Ann@EXAMPLE.com").unwrap().unwrap().id, "u1");
        assert!(store.find_by_id("u1").unwrap().is_some());
        assert!(store.find_by_id("u2").unwrap().is_none());
    }
}
