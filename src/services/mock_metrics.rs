// src/services/mock_metrics.rs

use async_trait::async_trait;
use chrono::Weekday;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::dashboard_repo::weekday_label,
    models::dashboard::{MetricsSnapshot, WeeklySalesEntry},
};

const MOCK_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// Retrato "vazio" para ambientes sem banco: tudo zerado, listas vazias.
// Só entra no ar quando METRICS_SOURCE=mock é configurado explicitamente.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMetricsProvider;

impl MockMetricsProvider {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            // A semana continua com 7 dias, só que sem vendas
            weekly_sales: MOCK_WEEK
                .iter()
                .map(|day| WeeklySalesEntry {
                    day_label: weekday_label(*day).to_string(),
                    amount: Decimal::ZERO,
                })
                .collect(),
            ..MetricsSnapshot::default()
        }
    }
}

#[async_trait]
impl super::metrics_service::MetricsSource for MockMetricsProvider {
    async fn obtain_metrics(&self) -> Result<MetricsSnapshot, AppError> {
        Ok(self.snapshot())
    }
}
