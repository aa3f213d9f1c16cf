/// Label used when a map result carries no category text at all
pub const OTHER_CATEGORY: &str = "other";

/// Venue class based on Kakao category group codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    Food,
    Cafe,
}

impl CategoryGroup {
    /// Classify a category group code into an accepted CategoryGroup
    pub fn from_code(code: &str) -> Option<CategoryGroup> {
        match code {
            "FD6" => Some(CategoryGroup::Food),
            "CE7" => Some(CategoryGroup::Cafe),
            _ => None, // Everything else is outside the store list
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CategoryGroup::Food => "FD6",
            CategoryGroup::Cafe => "CE7",
        }
    }
}

/// Derive a short category label from a hierarchical category name.
///
/// "음식점 > 한식 > 육류,고기" and "Korean > BBQ" keep their second segment.
/// `None` input falls back to [`OTHER_CATEGORY`]. Text without a `>`
/// delimiter yields `None`, so the row carrying it is dropped later on.
pub fn category_label(raw: Option<&str>) -> Option<String> {
    let Some(raw) = raw else {
        return Some(OTHER_CATEGORY.to_string());
    };

    if !raw.contains('>') {
        return None;
    }

    raw.split('>')
        .nth(1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// A persisted store, keyed by the map API place identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub bookmark_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_group_from_code() {
        assert_eq!(CategoryGroup::from_code("FD6"), Some(CategoryGroup::Food));
        assert_eq!(CategoryGroup::from_code("CE7"), Some(CategoryGroup::Cafe));
        assert_eq!(CategoryGroup::from_code("AT4"), None);
        assert_eq!(CategoryGroup::from_code(""), None);
    }

    #[test]
    fn test_category_label_takes_second_segment() {
        assert_eq!(category_label(Some("Korean > BBQ")).as_deref(), Some("BBQ"));
        assert_eq!(
            category_label(Some("음식점 > 한식 > 육류,고기")).as_deref(),
            Some("한식")
        );
    }

    #[test]
    fn test_category_label_missing_is_other() {
        assert_eq!(category_label(None).as_deref(), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_category_label_without_delimiter_is_none() {
        assert_eq!(category_label(Some("Restaurant")), None);
        assert_eq!(category_label(Some("")), None);
        assert_eq!(category_label(Some("Food >")), None);
    }
}
