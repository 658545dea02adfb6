// Presentation layer - HTTP surface read by the dashboard view
pub mod app_state;
pub mod handlers;
pub mod view_mapper;
