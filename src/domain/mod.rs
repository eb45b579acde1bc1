// Domain layer - Records, invariants and view models
pub mod analytics;
pub mod chart;
pub mod comment;
pub mod dashboard;
pub mod issue;
pub mod user;
pub mod window;
