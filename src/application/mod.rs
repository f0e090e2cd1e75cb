// Application layer - panels, data source, orchestration
pub mod address_panel;
pub mod controller;
pub mod data_source;
pub mod detail_service;
pub mod panel;
pub mod query_service;
pub mod render_sink;
pub mod streaming_service;
pub mod views;
