pub mod csv_store;
pub mod match_store;
pub mod user_store;

pub use csv_store::{CsvRecord, CsvTable};
pub use match_store::{InMemoryMatchStore, MatchStore};
pub use user_store::{InMemoryUserStore, UserStore};

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::models::{Donation, ItemRequest};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

/// Handle to every store the service uses. Cheap to clone.
///
/// Donations and requests live in CSV files under the data directory; users
/// and matches go through injectable stores. Nothing spans stores
/// transactionally; status transitions that check a row and then write it
/// hold [`Database::lifecycle_guard`] for the whole step.
#[derive(Clone)]
pub struct Database {
    pub donations: Arc<CsvTable<Donation>>,
    pub requests: Arc<CsvTable<ItemRequest>>,
    pub users: Arc<dyn UserStore>,
    pub matches: Arc<dyn MatchStore>,
    lifecycle: Arc<Mutex<()>>,
}

impl Database {
    /// CSV tables in `data_dir`, in-memory users and matches.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_stores(
            data_dir,
            Arc::new(InMemoryUserStore::default()),
            Arc::new(InMemoryMatchStore::default()),
        )
    }

    pub fn with_stores(
        data_dir: impl AsRef<Path>,
        users: Arc<dyn UserStore>,
        matches: Arc<dyn MatchStore>,
    ) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref();
        log::info!("🔧 Opening CSV tables in {}", dir.display());

        let donations = Arc::new(CsvTable::open(dir)?);
        let requests = Arc::new(CsvTable::open(dir)?);

        log::info!("✅ CSV tables ready");

        Ok(Self {
            donations,
            requests,
            users,
            matches,
            lifecycle: Arc::new(Mutex::new(())),
        })
    }

    /// Serialises review, owner edit/delete and match transitions so a status
    /// read and the write that depends on it cannot interleave with another
    /// transition. Never take a table lock and then this one.
    pub fn lifecycle_guard(&self) -> MutexGuard<'_, ()> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Category, ItemStatus, Role, Urgency, User};
    use chrono::{Duration, Utc};
    use std::ops::Deref;
    use std::path::PathBuf;

    /// Scratch data directory, removed on drop.
    pub struct TempDataDir(PathBuf);

    impl Deref for TempDataDir {
        type Target = Path;

        fn deref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDataDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    pub fn temp_data_dir() -> TempDataDir {
        TempDataDir(std::env::temp_dir().join(format!("donation-hub-test-{}", uuid::Uuid::new_v4())))
    }

    /// A database together with the directory backing it. Derefs to
    /// [`Database`]; the directory goes away with it.
    pub struct TestDb {
        db: Database,
        _dir: TempDataDir,
    }

    impl Deref for TestDb {
        type Target = Database;

        fn deref(&self) -> &Database {
            &self.db
        }
    }

    /// Fresh database with no users.
    pub fn empty_db() -> TestDb {
        let dir = temp_data_dir();
        let db = Database::open(&*dir).unwrap();
        TestDb { db, _dir: dir }
    }

    pub fn sample_donation(id: &str, status: ItemStatus) -> Donation {
        let then = Utc::now() - Duration::hours(1);
        Donation {
            id: id.to_string(),
            donor_id: "donor1".to_string(),
            donor_name: "Donor User".to_string(),
            donor_email: "donor@example.com".to_string(),
            item_name: "Winter Jackets".to_string(),
            category: Category::Clothes,
            description: "Warm jackets".to_string(),
            quantity: 4,
            photo_url: None,
            status,
            created_at: then,
            updated_at: then,
        }
    }

    pub fn sample_request(id: &str, status: ItemStatus) -> ItemRequest {
        let then = Utc::now() - Duration::hours(1);
        ItemRequest {
            id: id.to_string(),
            receiver_id: "receiver1".to_string(),
            receiver_name: "Receiver User".to_string(),
            receiver_email: "receiver@example.com".to_string(),
            item_needed: "Jackets".to_string(),
            category: Category::Clothes,
            description: "For the shelter".to_string(),
            quantity: 2,
            urgency: Urgency::Normal,
            status,
            created_at: then,
            updated_at: then,
        }
    }

    pub fn test_user(id: &str, email: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: format!("{} name", id),
            email: email.to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Fresh database with one user per role: `admin1`, `donor1`, `receiver1`.
    pub fn test_db() -> TestDb {
        let db = empty_db();
        db.users.insert(test_user("admin1", "admin@example.com", Role::Admin)).unwrap();
        db.users.insert(test_user("donor1", "donor@example.com", Role::Donor)).unwrap();
        db.users
            .insert(test_user("receiver1", "receiver@example.com", Role::Receiver))
            .unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{empty_db, temp_data_dir};

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let dir = temp_data_dir();
        std::fs::create_dir_all(&*dir).unwrap();
        let path = dir.to_path_buf();
        assert!(path.exists());
        drop(dir);
        assert!(!path.exists());

        let db = empty_db();
        let csv = db.donations.path().to_path_buf();
        assert!(csv.exists());
        drop(db);
        assert!(!csv.exists());
    }

    #[test]
    fn test_lifecycle_guard_survives_a_panicked_holder() {
        let db = empty_db();
        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = db.lifecycle_guard();
                    panic!("transition failed");
                })
                .join()
        });
        drop(db.lifecycle_guard());
    }
}
