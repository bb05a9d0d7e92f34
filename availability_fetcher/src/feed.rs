use serde::Deserialize;

/// One lot entry from the campus availability feed. Fields the feed omits
/// come through as null; a missing name makes the entry unusable and it is
/// skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct LotStatus {
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub total_spaces: Option<i32>,
    pub free_spaces: Option<i32>,
}
