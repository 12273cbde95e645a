pub mod projection;

pub use projection::{COLUMNS, Projection, RowView};
