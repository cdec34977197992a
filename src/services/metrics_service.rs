// src/services/metrics_service.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::local_today},
    db::DashboardRepository,
    models::dashboard::MetricsSnapshot,
};

/// A fonte das métricas do painel: uma única operação, sem argumentos.
///
/// Toda falha (conexão, permissão, consulta) chega como
/// `AppError::MetricsLoadFailure`. Nunca há resultado parcial.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn obtain_metrics(&self) -> Result<MetricsSnapshot, AppError>;
}

// Implementação real, agregando os dados do Postgres da loja configurada.
#[derive(Clone)]
pub struct MetricsService {
    repo: DashboardRepository,
    tenant_id: Uuid,
}

impl MetricsService {
    pub fn new(repo: DashboardRepository, tenant_id: Uuid) -> Self {
        Self { repo, tenant_id }
    }
}

#[async_trait]
impl MetricsSource for MetricsService {
    async fn obtain_metrics(&self) -> Result<MetricsSnapshot, AppError> {
        let today = local_today();
        tracing::debug!(tenant_id = %self.tenant_id, %today, "Agregando métricas do painel");

        self.repo
            .get_snapshot(self.tenant_id, today)
            .await
            .map_err(|e| {
                tracing::error!(
                    tenant_id = %self.tenant_id,
                    "🔥 Falha ao agregar métricas: {}",
                    e
                );
                e.into_load_failure()
            })
    }
}
