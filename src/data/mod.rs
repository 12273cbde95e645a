pub mod gateway;
pub mod http;
pub mod notice;
pub mod store;

pub use gateway::{
    DeleteOutcome, GatewayResult, RequestGateway, SearchCriteria, SearchOutcome,
};
pub use http::HttpGateway;
pub use notice::{BidCategory, BidNotice, ResultSet};
pub use store::{ResultStore, SelectionSummary};
