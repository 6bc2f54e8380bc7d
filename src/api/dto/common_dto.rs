//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
///
/// Pages are 0-indexed to match the mobile clients already consuming
/// this API.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page number (0-indexed). Defaults to 0.
    #[serde(default)]
    pub page: u32,
    /// Items per page (max 100). Defaults to 10.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    10
}

impl PageParams {
    /// Clamps `size` to the allowed range of 1..=100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, 100),
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T: ToSchema> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Current page number (0-indexed).
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T: ToSchema> PageResponse<T> {
    /// Slices `items` into the requested page.
    #[must_use]
    pub fn paginate(items: Vec<T>, params: &PageParams) -> Self {
        let params = params.clamped();
        let total_elements = items.len() as u64;
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements.div_ceil(u64::from(params.size))) as u32
        };
        let start = (params.page as usize).saturating_mul(params.size as usize);
        let content = items
            .into_iter()
            .skip(start)
            .take(params.size as usize)
            .collect();
        Self {
            content,
            page: params.page,
            size: params.size,
            total_elements,
            total_pages,
        }
    }
}
