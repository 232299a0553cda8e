use serde::{Deserialize, Serialize};

use super::birthday::BirthdayView;

/// `page` is kept as raw text: anything that is not a number falls back to page 1.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub entries: Vec<BirthdayView>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}
