//! Ordered in-memory repository.
//!
//! Every entity list in the portal is a [`Repository`]: newest records first,
//! sequential ids, and each mutation applied as a single write-locked
//! replacement so readers never observe a half-applied change.

use crate::error::{PortalError, Result};
use crate::types::RecordId;
use tokio::sync::RwLock;
use tracing::debug;

/// A record that a repository can own.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
}

/// Ordered, id-assigning list of records.
pub struct Repository<T> {
    /// Entity name used in errors and logs
    name: &'static str,
    records: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    /// Creates an empty repository
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository holding `records` as given (ids and order kept)
    pub fn with_records(name: &'static str, records: Vec<T>) -> Self {
        Self {
            name,
            records: RwLock::new(records),
        }
    }

    fn next_id(records: &[T]) -> RecordId {
        records.iter().map(Record::id).max().unwrap_or(0) + 1
    }

    /// Prepends a record, assigning it the next sequential id
    pub async fn insert(&self, record: T) -> T {
        let mut records = self.records.write().await;
        let mut record = record;
        record.set_id(Self::next_id(&records));
        records.insert(0, record.clone());
        debug!(entity = self.name, id = record.id(), "Record created");
        record
    }

    /// Builds and prepends a record under one write lock.
    ///
    /// `build` sees the current records and the id the new record will get,
    /// so uniqueness checks and sequence numbers cannot race another insert.
    pub async fn insert_with<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(&[T], RecordId) -> Result<T>,
    {
        let mut records = self.records.write().await;
        let id = Self::next_id(&records);
        let mut record = build(&records, id)?;
        record.set_id(id);
        records.insert(0, record.clone());
        debug!(entity = self.name, id, "Record created");
        Ok(record)
    }

    /// Appends a record at the end, assigning the next sequential id
    pub async fn append(&self, record: T) -> T {
        let mut records = self.records.write().await;
        let mut record = record;
        record.set_id(Self::next_id(&records));
        records.push(record.clone());
        record
    }

    /// Snapshot of all records, newest first
    pub async fn list(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Runs `f` against the current records without cloning them
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let records = self.records.read().await;
        f(&records)
    }

    /// Gets a record by id
    pub async fn get(&self, id: RecordId) -> Option<T> {
        let records = self.records.read().await;
        records.iter().find(|r| r.id() == id).cloned()
    }

    /// Replaces the record with the same id, keeping its position
    pub async fn replace(&self, record: T) -> Result<()> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| PortalError::NotFound(format!("{} {}", self.name, record.id())))?;
        *slot = record;
        Ok(())
    }

    /// Applies `f` to the record with `id` and returns the updated copy
    pub async fn update<F>(&self, id: RecordId, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| PortalError::NotFound(format!("{} {}", self.name, id)))?;
        f(slot);
        Ok(slot.clone())
    }

    /// Deletes a record, returning whether it existed
    pub async fn delete(&self, id: RecordId) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        let deleted = records.len() != before;
        if deleted {
            debug!(entity = self.name, id, "Record deleted");
        }
        deleted
    }

    /// Removes every record matching `predicate`, returning how many went
    pub async fn delete_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !predicate(r));
        before - records.len()
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Removes everything
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: RecordId,
        text: String,
    }

    impl Record for Note {
        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_prepends_with_sequential_ids() {
        let repo = Repository::new("note");
        repo.insert(note("first")).await;
        repo.insert(note("second")).await;

        let all = repo.list().await;
        assert_eq!(all[0].text, "second");
        assert_eq!(all[0].id, 2);
        assert_eq!(all[1].id, 1);
    }

    #[tokio::test]
    async fn test_ids_stay_unique_after_delete() {
        let repo = Repository::new("note");
        repo.insert(note("a")).await;
        repo.insert(note("b")).await;
        assert!(repo.delete(1).await);

        let c = repo.insert(note("c")).await;
        assert_eq!(c.id, 3);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_with_rejects_without_mutating() {
        let repo = Repository::new("note");
        repo.insert(note("a")).await;

        let result = repo
            .insert_with(|existing, _| {
                if existing.iter().any(|n| n.text == "a") {
                    Err(PortalError::AlreadyExists("a".into()))
                } else {
                    Ok(note("a"))
                }
            })
            .await;
        assert!(matches!(result, Err(PortalError::AlreadyExists(_))));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_replace_and_update() {
        let repo = Repository::new("note");
        let mut a = repo.insert(note("a")).await;
        a.text = "changed".to_string();
        repo.replace(a).await.unwrap();
        assert_eq!(repo.get(1).await.unwrap().text, "changed");

        let updated = repo.update(1, |n| n.text.push('!')).await.unwrap();
        assert_eq!(updated.text, "changed!");

        assert!(repo.update(99, |_| {}).await.is_err());
        assert!(!repo.delete(99).await);
    }
}
