//! Pagination extractor for list endpoints.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use socialhub_core::error::AppError;
use socialhub_core::types::pagination::PageRequest;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
struct PageParams {
    page: Option<u64>,
    page_size: Option<u64>,
}

/// Extracts `?page=&page_size=` into a clamped [`PageRequest`].
#[derive(Debug, Clone)]
pub struct Pagination(pub PageRequest);

impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid pagination parameters"))?;
        let defaults = PageRequest::default();
        Ok(Pagination(PageRequest::new(
            params.page.unwrap_or(defaults.page),
            params.page_size.unwrap_or(defaults.page_size),
        )))
    }
}
