// src/models/dashboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// O retrato completo do painel, produzido de uma vez por uma única consulta.
// Nunca é montado pela metade: ou chega inteiro, ou a carga falha.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub sales_today: Decimal,
    pub average_ticket: Decimal,
    pub units_sold: u64,
    pub active_alerts: u64,
    pub weekly_sales: Vec<WeeklySalesEntry>, // 7 dias, do mais antigo para hoje
    pub sales_by_category: Vec<CategorySalesEntry>,
    pub top_products: Vec<TopProductEntry>, // Maior faturamento primeiro (máx. 10)
    pub recent_sales: Vec<RecentSale>,      // Mais recente primeiro
    pub stock_alerts: Vec<StockAlert>,
}

// 1. Gráfico de área (semana)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySalesEntry {
    pub day_label: String,
    pub amount: Decimal,
}

// 2. Gráfico de rosca (categorias)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySalesEntry {
    pub category: String,
    pub amount: Decimal,
    pub color: String,
}

// 3. Curva ABC (Top Produtos)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub name: String,
    pub quantity: Decimal,
    pub amount: Decimal,
}

// 4. Últimas vendas do PDV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub id: Uuid,
    pub sale_number: i32,
    pub operator_name: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Rupture, // Estoque zerado
    Low,     // Abaixo do mínimo
}

// 5. Alertas de estoque
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub kind: AlertKind,
    pub product_name: String,
    pub detail: String,
}

// Variação contra ontem, exibida nos cards quando existir.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub value: Decimal,
    pub positive: bool,
}

// --- Linhas cruas vindas do banco ---

#[derive(Debug, Clone, FromRow)]
pub struct DailySalesRow {
    pub day: NaiveDate,
    pub total: Option<Decimal>,
}

// O pedido não guarda quem operou o caixa.
#[derive(Debug, Clone, FromRow)]
pub struct RecentSaleRow {
    pub id: Uuid,
    pub sale_number: i32,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategorySalesRow {
    pub category: String,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StockLevelRow {
    pub product_name: String,
    pub quantity: Decimal,
    pub low_stock_threshold: Decimal,
}
