pub mod metrics_service;
pub mod mock_metrics;

#[cfg(test)]
pub mod fakes;
