// Application layer - Use cases over the issue data source
pub mod analytics_service;
pub mod issue_repository;
pub mod issue_service;
pub mod metrics;
