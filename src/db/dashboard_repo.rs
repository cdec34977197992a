// src/db/dashboard_repo.rs

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::scope_to_tenant, error::AppError},
    models::dashboard::{
        AlertKind, CategorySalesEntry, CategorySalesRow, DailySalesRow, MetricsSnapshot,
        RecentSale, RecentSaleRow, StockAlert, StockLevelRow, TopProductEntry, WeeklySalesEntry,
    },
};

pub const TOP_PRODUCTS_LIMIT: i64 = 10;
pub const RECENT_SALES_LIMIT: i64 = 10;
const WEEK_DAYS: i64 = 7;
// Rótulo do operador enquanto os pedidos não registram quem fechou a venda.
pub const DEFAULT_OPERATOR: &str = "PDV";

// Paleta das fatias do gráfico de rosca, atribuída pela ordem das categorias.
const CATEGORY_PALETTE: [&str; 8] = [
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#9333ea", "#0891b2", "#db2777", "#65a30d",
];

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Monta o retrato inteiro dentro de uma única transação de leitura.
    // Qualquer consulta que falhe derruba o retrato todo (rollback no drop).
    pub async fn get_snapshot(
        &self,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> Result<MetricsSnapshot, AppError> {
        let mut tx = self.pool.begin().await?;

        scope_to_tenant(&mut *tx, tenant_id).await?;

        // A. Vendas de Hoje + quantidade de pedidos (para o ticket médio)
        let (sales_today, orders_today) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(o.total_amount), 0) AS total, COUNT(o.id) AS orders
            FROM orders o
            JOIN pipeline_stages s ON o.stage_id = s.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date = $2
            "#,
        )
            .bind(tenant_id)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

        // B. Itens vendidos hoje
        let units_sold = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(oi.quantity), 0)
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN pipeline_stages s ON o.stage_id = s.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date = $2
            "#,
        )
            .bind(tenant_id)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

        // C. Vendas dos últimos 7 dias (dias sem venda não aparecem aqui)
        let week_start = today - Duration::days(WEEK_DAYS - 1);
        let daily = sqlx::query_as::<_, DailySalesRow>(
            r#"
            SELECT
                (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date AS day,
                SUM(o.total_amount) AS total
            FROM orders o
            JOIN pipeline_stages s ON o.stage_id = s.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date BETWEEN $2 AND $3
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
            .bind(tenant_id)
            .bind(week_start)
            .bind(today)
            .fetch_all(&mut *tx)
            .await?;

        // D. Faturamento de hoje por categoria
        let categories = sqlx::query_as::<_, CategorySalesRow>(
            r#"
            SELECT
                c.name AS category,
                SUM(oi.quantity * oi.unit_price - oi.discount) AS total
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN pipeline_stages s ON o.stage_id = s.id
            JOIN items i ON oi.item_id = i.id
            JOIN categories c ON i.category_id = c.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date = $2
            GROUP BY c.id, c.name
            ORDER BY c.name ASC
            "#,
        )
            .bind(tenant_id)
            .bind(today)
            .fetch_all(&mut *tx)
            .await?;

        // E. Curva ABC do dia (Top 10 em R$)
        let top_products = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT
                i.name AS name,
                SUM(oi.quantity) AS quantity,
                SUM(oi.quantity * oi.unit_price - oi.discount) AS amount
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN pipeline_stages s ON o.stage_id = s.id
            JOIN items i ON oi.item_id = i.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND (o.closed_at AT TIME ZONE 'America/Sao_Paulo')::date = $2
            GROUP BY i.id, i.name
            ORDER BY amount DESC, i.name ASC
            LIMIT $3
            "#,
        )
            .bind(tenant_id)
            .bind(today)
            .bind(TOP_PRODUCTS_LIMIT)
            .fetch_all(&mut *tx)
            .await?;

        // F. Últimas vendas fechadas
        let recent_sales = sqlx::query_as::<_, RecentSaleRow>(
            r#"
            SELECT
                o.id,
                o.display_id AS sale_number,
                o.total_amount AS total,
                o.closed_at AS created_at
            FROM orders o
            JOIN pipeline_stages s ON o.stage_id = s.id
            WHERE o.tenant_id = $1
              AND s.category = 'DONE'
              AND o.closed_at IS NOT NULL
            ORDER BY o.closed_at DESC
            LIMIT $2
            "#,
        )
            .bind(tenant_id)
            .bind(RECENT_SALES_LIMIT)
            .fetch_all(&mut *tx)
            .await?;

        // G. Itens zerados ou abaixo do mínimo (somando todos os locais)
        let stock_levels = sqlx::query_as::<_, StockLevelRow>(
            r#"
            SELECT
                i.name AS product_name,
                SUM(l.quantity) AS quantity,
                MAX(l.low_stock_threshold) AS low_stock_threshold
            FROM inventory_levels l
            JOIN items i ON l.item_id = i.id
            WHERE l.tenant_id = $1
            GROUP BY i.id, i.name
            HAVING SUM(l.quantity) <= 0
                OR SUM(l.quantity) <= MAX(l.low_stock_threshold)
            ORDER BY SUM(l.quantity) ASC, i.name ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        // Só leitura, mas o commit fecha a transação de forma limpa
        tx.commit().await?;

        let stock_alerts: Vec<StockAlert> = stock_levels.iter().map(classify_stock_level).collect();

        Ok(MetricsSnapshot {
            sales_today,
            average_ticket: average_ticket(sales_today, orders_today),
            units_sold: whole_units(units_sold),
            active_alerts: stock_alerts.len() as u64,
            weekly_sales: fill_week(today, &daily),
            sales_by_category: paint_categories(categories),
            top_products,
            recent_sales: recent_sales.into_iter().map(label_sale).collect(),
            stock_alerts,
        })
    }
}

pub(crate) fn average_ticket(total: Decimal, orders: i64) -> Decimal {
    if orders <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(orders)).round_dp(2)
}

// Itens fracionados (kg, litros) contam pela parte inteira.
pub(crate) fn whole_units(quantity: Decimal) -> u64 {
    quantity.trunc().to_u64().unwrap_or_default()
}

pub(crate) fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Dom",
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
    }
}

/// Sempre 7 entradas terminando em `today`, com zero nos dias sem venda.
pub(crate) fn fill_week(today: NaiveDate, rows: &[DailySalesRow]) -> Vec<WeeklySalesEntry> {
    (0..WEEK_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let amount = rows
                .iter()
                .find(|row| row.day == day)
                .and_then(|row| row.total)
                .unwrap_or(Decimal::ZERO);
            WeeklySalesEntry {
                day_label: weekday_label(day.weekday()).to_string(),
                amount,
            }
        })
        .collect()
}

pub(crate) fn paint_categories(rows: Vec<CategorySalesRow>) -> Vec<CategorySalesEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| CategorySalesEntry {
            category: row.category,
            amount: row.total.unwrap_or(Decimal::ZERO),
            color: CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()].to_string(),
        })
        .collect()
}

pub(crate) fn label_sale(row: RecentSaleRow) -> RecentSale {
    RecentSale {
        id: row.id,
        sale_number: row.sale_number,
        operator_name: DEFAULT_OPERATOR.to_string(),
        total: row.total,
        created_at: row.created_at,
    }
}

pub(crate) fn classify_stock_level(row: &StockLevelRow) -> StockAlert {
    if row.quantity <= Decimal::ZERO {
        StockAlert {
            kind: AlertKind::Rupture,
            product_name: row.product_name.clone(),
            detail: "Sem estoque".to_string(),
        }
    } else {
        StockAlert {
            kind: AlertKind::Low,
            product_name: row.product_name.clone(),
            detail: format!(
                "Restam {} (mínimo {})",
                row.quantity.normalize(),
                row.low_stock_threshold.normalize()
            ),
        }
    }
}
