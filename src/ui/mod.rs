pub mod header;
pub mod loading;
pub mod popup;
pub mod statusbar;
pub mod table;
