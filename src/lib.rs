pub mod app;
pub mod config;
pub mod data;
pub mod format;
pub mod globals;
pub mod input;
pub mod template;
pub mod ui;
pub mod view;

pub mod error;

pub use error::BidStackError;
