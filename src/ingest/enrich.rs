use crate::api::PlaceLookup;
use crate::domain::{CategoryGroup, FeedRow, category_label};

/// What happened to a row during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// Coordinates, category and store id are all set
    Enriched,
    /// The address lookup returned nothing usable
    NoAddressMatch,
    /// The nearby lookup found nothing, or only a non food/cafe place
    CategoryRejected,
    /// A map API call failed; the row keeps whatever it had so far
    LookupFailed,
}

/// Enrich one row in place with coordinates, category and store id.
///
/// # Algorithm
/// 1. Look the address up and take the first match as the row's coordinates
/// 2. Derive a provisional category from that match
/// 3. Look the venue name up around those coordinates
/// 4. Accept the first nearby match only when it is a restaurant or cafe,
///    taking its id and category
///
/// Failures never propagate: the outcome says why the row will be dropped.
pub fn enrich_row<L: PlaceLookup + ?Sized>(lookup: &L, row: &mut FeedRow) -> EnrichOutcome {
    if row.address.trim().is_empty() {
        return EnrichOutcome::NoAddressMatch;
    }

    let matches = match lookup.search_address(&row.address) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(seq = ?row.seq, address = %row.address, error = %e, "address lookup failed");
            return EnrichOutcome::LookupFailed;
        }
    };

    let Some((place, (lat, lng))) = matches
        .first()
        .and_then(|p| p.coordinates().map(|coords| (p, coords)))
    else {
        tracing::debug!(seq = ?row.seq, address = %row.address, "no address match");
        return EnrichOutcome::NoAddressMatch;
    };

    row.latitude = Some(lat);
    row.longitude = Some(lng);
    row.category = category_label(place.category_text());

    let nearby = match lookup.search_nearby(&row.name, lat, lng) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(seq = ?row.seq, name = %row.name, error = %e, "nearby lookup failed");
            return EnrichOutcome::LookupFailed;
        }
    };

    let Some((place, group)) = nearby.into_iter().next().and_then(|p| {
        let group = p.category_group_code.as_deref().and_then(CategoryGroup::from_code)?;
        Some((p, group))
    }) else {
        tracing::debug!(seq = ?row.seq, name = %row.name, "no food or cafe match nearby");
        return EnrichOutcome::CategoryRejected;
    };

    tracing::debug!(seq = ?row.seq, id = %place.id, group = group.code(), "nearby match accepted");
    row.category = category_label(place.category_text());
    row.store_id = Some(place.id);
    EnrichOutcome::Enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MapApiError, Place};
    use reqwest::StatusCode;

    fn place(id: &str, category: Option<&str>, group: &str) -> Place {
        Place {
            id: id.to_string(),
            place_name: "Place".to_string(),
            category_name: category.map(str::to_string),
            category_group_code: Some(group.to_string()),
            address_name: None,
            x: "126.98".to_string(),
            y: "37.56".to_string(),
        }
    }

    struct FixedLookup {
        address: Result<Vec<Place>, StatusCode>,
        nearby: Result<Vec<Place>, StatusCode>,
    }

    impl PlaceLookup for FixedLookup {
        fn search_address(&self, _address: &str) -> Result<Vec<Place>, MapApiError> {
            self.address.clone().map_err(MapApiError::Status)
        }

        fn search_nearby(&self, _name: &str, _lat: f64, _lng: f64) -> Result<Vec<Place>, MapApiError> {
            self.nearby.clone().map_err(MapApiError::Status)
        }
    }

    #[test]
    fn test_enrich_accepts_food_match() {
        let lookup = FixedLookup {
            address: Ok(vec![place("1", Some("주소 > 건물"), "")]),
            nearby: Ok(vec![place("10332413", Some("음식점 > 한식 > 국밥"), "FD6")]),
        };
        let mut row = FeedRow::new("Hadongkwan", "Myeongdong 9-gil 12");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::Enriched);
        assert_eq!(row.store_id.as_deref(), Some("10332413"));
        assert_eq!(row.category.as_deref(), Some("한식"));
        assert_eq!(row.latitude, Some(37.56));
        assert_eq!(row.longitude, Some(126.98));
        assert!(row.is_persistable());
    }

    #[test]
    fn test_enrich_no_address_match() {
        let lookup = FixedLookup {
            address: Ok(vec![]),
            nearby: Ok(vec![place("1", None, "FD6")]),
        };
        let mut row = FeedRow::new("Nowhere", "Unknown road 1");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::NoAddressMatch);
        assert!(row.latitude.is_none());
        assert!(!row.is_persistable());
    }

    #[test]
    fn test_enrich_rejects_disallowed_category() {
        let lookup = FixedLookup {
            address: Ok(vec![place("1", Some("a > b"), "")]),
            nearby: Ok(vec![place("77", Some("여행 > 관광명소"), "AT4")]),
        };
        let mut row = FeedRow::new("Gyeongbokgung", "Sajik-ro 161");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::CategoryRejected);
        assert!(row.latitude.is_some());
        assert!(row.store_id.is_none());
        assert!(!row.is_persistable());
    }

    #[test]
    fn test_enrich_missing_category_text_becomes_other() {
        let lookup = FixedLookup {
            address: Ok(vec![place("1", Some("a > b"), "")]),
            nearby: Ok(vec![place("88", None, "CE7")]),
        };
        let mut row = FeedRow::new("Cafe", "Somewhere 1");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::Enriched);
        assert_eq!(row.category.as_deref(), Some("other"));
    }

    #[test]
    fn test_enrich_lookup_failure_skips_row() {
        let lookup = FixedLookup {
            address: Err(StatusCode::UNAUTHORIZED),
            nearby: Ok(vec![]),
        };
        let mut row = FeedRow::new("Any", "Any road 1");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::LookupFailed);
        assert!(!row.is_persistable());
    }

    #[test]
    fn test_enrich_nearby_failure_skips_row() {
        let lookup = FixedLookup {
            address: Ok(vec![place("1", Some("a > b"), "")]),
            nearby: Err(StatusCode::INTERNAL_SERVER_ERROR),
        };
        let mut row = FeedRow::new("Hadongkwan", "Myeongdong 9-gil 12");

        assert_eq!(enrich_row(&lookup, &mut row), EnrichOutcome::LookupFailed);
        assert_eq!(row.latitude, Some(37.56));
        assert!(row.store_id.is_none());
        assert!(!row.is_persistable());
    }
}
