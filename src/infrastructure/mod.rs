// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod http_response;
pub mod mock_data;
pub mod rest_client;
pub mod snapshot_sink;
