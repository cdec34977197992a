// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    services::{
        metrics_service::{MetricsService, MetricsSource},
        mock_metrics::MockMetricsProvider,
    },
};

// De onde o painel tira as métricas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsSourceKind {
    #[default]
    Postgres,
    Mock,
}

impl FromStr for MetricsSourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(MetricsSourceKind::Postgres),
            "mock" => Ok(MetricsSourceKind::Mock),
            other => Err(AppError::ConfigError(format!(
                "METRICS_SOURCE desconhecida: '{other}' (use 'postgres' ou 'mock')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_source_requirements"))]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub tenant_id: Option<Uuid>,

    #[validate(length(min = 1, message = "BIND_ADDR não pode ser vazio."))]
    pub bind_addr: String,

    #[validate(range(min = 1, max = 100, message = "DB_MAX_CONNECTIONS deve estar entre 1 e 100."))]
    pub db_max_connections: u32,

    pub metrics_source: MetricsSourceKind,
}

// O Postgres precisa saber onde conectar e de qual loja agregar.
fn validate_source_requirements(config: &AppConfig) -> Result<(), ValidationError> {
    if config.metrics_source != MetricsSourceKind::Postgres {
        return Ok(());
    }
    if config.database_url.as_deref().is_none_or(str::is_empty) {
        let mut err = ValidationError::new("DatabaseUrlRequired");
        err.message = Some("DATABASE_URL deve ser definida".into());
        return Err(err);
    }
    if config.tenant_id.is_none() {
        let mut err = ValidationError::new("TenantIdRequired");
        err.message = Some("TENANT_ID deve ser definido".into());
        return Err(err);
    }
    Ok(())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant_id = lookup("TENANT_ID")
            .map(|raw| {
                Uuid::parse_str(raw.trim()).map_err(|_| {
                    AppError::ConfigError(format!("TENANT_ID inválido (não é um UUID): '{raw}'"))
                })
            })
            .transpose()?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                AppError::ConfigError(format!("DB_MAX_CONNECTIONS inválido: '{raw}'"))
            })?,
            None => 5,
        };

        let metrics_source = match lookup("METRICS_SOURCE") {
            Some(raw) => raw.parse()?,
            None => MetricsSourceKind::default(),
        };

        let config = Self {
            database_url: lookup("DATABASE_URL"),
            tenant_id,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            metrics_source,
        };

        config.validate()?;
        Ok(config)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metrics_source: Arc<dyn MetricsSource>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let metrics_source: Arc<dyn MetricsSource> = match config.metrics_source {
            MetricsSourceKind::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
                let tenant_id = config
                    .tenant_id
                    .ok_or_else(|| anyhow::anyhow!("TENANT_ID deve ser definido"))?;

                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                // --- Monta o gráfico de dependências ---
                let dashboard_repo = DashboardRepository::new(db_pool);
                Arc::new(MetricsService::new(dashboard_repo, tenant_id))
            }
            MetricsSourceKind::Mock => {
                tracing::warn!("⚠️ METRICS_SOURCE=mock: o painel vai mostrar métricas zeradas");
                Arc::new(MockMetricsProvider)
            }
        };

        Ok(Self::with_source(config, metrics_source))
    }

    pub fn with_source(config: AppConfig, metrics_source: Arc<dyn MetricsSource>) -> Self {
        Self {
            config: Arc::new(config),
            metrics_source,
        }
    }
}
