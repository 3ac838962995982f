use crate::ModelError;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    Descend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub current: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<HashMap<String, SortOrder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<HashMap<String, Value>>,
}

impl PaginationParams {
    /// Page numbers start at 1 and a page holds at least one row.
    #[track_caller]
    pub fn new(current: u32, page_size: u32) -> Result<Self, ModelError> {
        if current == 0 {
            return Err(ModelError::validation("current page must be at least 1"));
        }
        if page_size == 0 {
            return Err(ModelError::validation("page size must be at least 1"));
        }

        Ok(Self {
            current,
            page_size,
            keyword: None,
            sorter: None,
            filter: None,
        })
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            keyword: None,
            sorter: None,
            filter: None,
        }
    }
}

/// Query for resource list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub current: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl<T> PaginationResponse<T> {
    /// `pages` when the server sent it, otherwise derived from `total`.
    pub fn page_count(&self) -> u32 {
        if let Some(pages) = self.pages {
            return pages;
        }
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size)) as u32
    }

    /// 1-based `(first, last)` row numbers of this page, as shown in table footers.
    pub fn row_range(&self) -> (u64, u64) {
        if self.list.is_empty() {
            return (0, 0);
        }
        let first = u64::from(self.current.saturating_sub(1)) * u64::from(self.page_size) + 1;
        (first, first + self.list.len() as u64 - 1)
    }
}
