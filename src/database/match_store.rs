use std::sync::{PoisonError, RwLock};

use super::StoreError;
use crate::models::Match;

/// Persistence seam for matches.
pub trait MatchStore: Send + Sync {
    fn insert(&self, record: Match) -> Result<(), StoreError>;

    fn find(&self, id: &str) -> Result<Option<Match>, StoreError>;

    /// Replaces the stored match with the same id. Returns `false` if none.
    fn save(&self, record: &Match) -> Result<bool, StoreError>;

    /// All matches in creation order.
    fn list(&self) -> Result<Vec<Match>, StoreError>;
}

#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<Vec<Match>>,
}

impl MatchStore for InMemoryMatchStore {
    fn insert(&self, record: Match) -> Result<(), StoreError> {
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        if matches.iter().any(|m| m.id == record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        matches.push(record);
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Option<Match>, StoreError> {
        let matches = self.matches.read().unwrap_or_else(PoisonError::into_inner);
        Ok(matches.iter().find(|m| m.id == id).cloned())
    }

    fn save(&self, record: &Match) -> Result<bool, StoreError> {
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        match matches.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.matches.read().unwrap_or_else(PoisonError::into_inner).clone())
    }
}
