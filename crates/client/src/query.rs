//! Query parameters of the worklist endpoint.

use serde::Serialize;

/// Server-side filters and paging. Every field is optional; unset fields are not sent, and
/// an empty query returns the caller's full worklist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorklistQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl WorklistQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}
