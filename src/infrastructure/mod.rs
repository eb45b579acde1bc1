// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod fixture_source;
pub mod http_response;
pub mod http_source;
