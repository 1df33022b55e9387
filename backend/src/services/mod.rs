pub mod aggregator;
pub mod clip_service;
pub mod clip_store;
pub mod platforms;
pub mod stats_fetcher;
pub mod stats_service;
