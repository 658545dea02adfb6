// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_sink;
pub mod http_backend;
pub mod ndjson_stream;
