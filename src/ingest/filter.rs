use crate::domain::{FeedRow, Store};

/// Turn enriched rows into stores, dropping the ones that cannot be persisted.
///
/// Returns the stores and the number of rows discarded.
pub fn retain_persistable(rows: &[FeedRow]) -> (Vec<Store>, usize) {
    let mut stores = Vec::with_capacity(rows.len());
    let mut discarded = 0;

    for row in rows {
        match row.is_persistable().then(|| row.to_store()).flatten() {
            Some(store) => stores.push(store),
            None => {
                tracing::debug!(seq = ?row.seq, name = %row.name, "discarding incomplete row");
                discarded += 1;
            }
        }
    }

    (stores, discarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store_id: Option<&str>, category: Option<&str>) -> FeedRow {
        let mut row = FeedRow::new("Venue", "Road 1");
        row.latitude = Some(37.5);
        row.longitude = Some(127.0);
        row.category = category.map(str::to_string);
        row.store_id = store_id.map(str::to_string);
        row
    }

    #[test]
    fn test_retain_persistable() {
        let rows = vec![
            row(Some("1"), Some("한식")),
            row(None, Some("한식")),
            row(Some("2"), None),
            row(Some("not-a-number"), Some("카페")),
            row(Some("3"), Some("other")),
        ];

        let (stores, discarded) = retain_persistable(&rows);
        assert_eq!(discarded, 3);
        assert_eq!(stores.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
