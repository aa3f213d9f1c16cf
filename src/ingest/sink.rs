use crate::db::{DbResult, StoreRepository};
use crate::domain::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkOutcome {
    pub inserted: usize,
    pub skipped_existing: usize,
}

/// Insert every store whose id is not already present.
///
/// Existing rows are never updated. Repeated ids inside `stores` are inserted
/// once, because the existence check sees earlier inserts.
pub fn persist_new<R: StoreRepository + ?Sized>(repo: &R, stores: &[Store]) -> DbResult<SinkOutcome> {
    let mut outcome = SinkOutcome::default();

    for store in stores {
        if repo.exists(store.id)? {
            outcome.skipped_existing += 1;
            continue;
        }
        tracing::debug!(store_id = store.id, name = %store.name, category = %store.category, "inserting store");
        repo.insert(store)?;
        outcome.inserted += 1;
    }

    Ok(outcome)
}
