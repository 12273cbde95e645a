use async_trait::async_trait;
use serde::Serialize;

use super::notice::ResultSet;
use crate::error::GatewayFailure;

pub type GatewayResult<T> = std::result::Result<T, GatewayFailure>;

/// Search form values, sent as-is to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// `all`, `servc`, `cnstwk` or `thng`
    pub bid_type: String,
    /// `all` or an agency name
    pub agency_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub rows: ResultSet,
    /// Server-reported total; falls back to the row count when absent
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub remaining_count: usize,
    pub message: String,
}

/// The remote operations the front end depends on.
///
/// Each call performs exactly one request and never retries; the caller
/// decides whether to offer the action again.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Agency names for the filter list
    async fn agencies(&self) -> GatewayResult<Vec<String>>;

    async fn search(&self, criteria: &SearchCriteria) -> GatewayResult<SearchOutcome>;

    async fn delete(&self, ids: &[String]) -> GatewayResult<DeleteOutcome>;

    /// Spreadsheet bytes for the given rows
    async fn export_spreadsheet(&self, ids: &[String]) -> GatewayResult<Vec<u8>>;
}
