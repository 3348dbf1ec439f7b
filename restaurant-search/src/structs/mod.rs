pub mod health_report;
pub mod restaurant;
pub mod search_config;
pub mod search_request;
