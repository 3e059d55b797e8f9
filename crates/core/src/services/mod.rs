pub mod chart_service;
pub mod indicator_engine;
pub mod insight_service;
pub mod market_data;
pub mod portfolio_store;
pub mod refresh_scheduler;
pub mod report_service;
