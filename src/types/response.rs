use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::request::PAGE_SIZE;
use crate::validate::FieldError;

/// Classified failure kinds surfaced to callers. Row-absent and
/// organization-mismatch are both `NotFound` so responses never reveal
/// whether a row exists in another organization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorKind {
    Unauthenticated,
    NoActiveOrganization,
    InvalidInput,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Serialize, Deserialize)]
pub struct CommonResponse {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "fieldErrors")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ResourceResponse<T: Serialize + DeserializeOwned> {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: Option<T>,
}

/// One page of a list result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct PageResponse<T: Serialize + DeserializeOwned> {
    pub items: Vec<T>,

    pub total: u64,

    pub page: u64,

    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl<T: Serialize + DeserializeOwned> PageResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64) -> Self {
        Self {
            items,
            total,
            page,
            total_pages: total.div_ceil(PAGE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page: PageResponse<u64> = PageResponse::new(vec![], 0, 1);
        assert_eq!(page.total_pages, 0);

        let page: PageResponse<u64> = PageResponse::new(vec![], 20, 1);
        assert_eq!(page.total_pages, 1);

        let page: PageResponse<u64> = PageResponse::new(vec![], 21, 2);
        assert_eq!(page.total_pages, 2);
    }
}
