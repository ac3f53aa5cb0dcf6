use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Keyed in-process collection backing an entity store.
///
/// Rows are cloned out on read; mutation goes through `update` so that a
/// read-modify-write happens under a single write-lock acquisition.
pub struct Collection<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, id: Uuid, row: T) {
        self.rows.write().await.insert(id, row);
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Apply `apply` to the row under the write lock, returning the updated
    /// row, or `None` when the id is unknown.
    pub async fn update<F>(&self, id: Uuid, apply: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    /// Conditional update: `apply` runs against a copy of the row under the
    /// write lock and the row is replaced only when it returns `Ok`. Returns
    /// `None` when the id is unknown.
    pub async fn try_update<F, E>(&self, id: Uuid, apply: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id)?;
        let mut candidate = row.clone();
        match apply(&mut candidate) {
            Ok(()) => {
                *row = candidate.clone();
                Some(Ok(candidate))
            }
            Err(e) => Some(Err(e)),
        }
    }

    pub async fn find<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_returns_none_for_unknown_id() {
        let collection: Collection<u32> = Collection::new();
        assert_eq!(collection.update(Uuid::new_v4(), |v| *v += 1).await, None);
    }

    #[tokio::test]
    async fn update_applies_under_lock_and_returns_row() {
        let collection = Collection::new();
        let id = Uuid::new_v4();
        collection.insert(id, 1u32).await;

        let updated = collection.update(id, |v| *v += 41).await;
        assert_eq!(updated, Some(42));
        assert_eq!(collection.get(id).await, Some(42));
    }
}
