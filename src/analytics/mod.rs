pub mod analytics_models;
pub mod analytics_handlers;
pub mod analytics_service;

pub use analytics_service::AnalyticsService;
