// src/views/page.rs
//
// Derivações puras do retrato: tudo o que o painel mostra sai daqui.
// Recalculado a cada renderização, sem cache.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    common::format::{
        format_currency, format_datetime, format_integer, format_percent, format_quantity,
    },
    middleware::i18n::Locale,
    models::dashboard::{AlertKind, MetricsSnapshot, Variation},
};

// Só as primeiras vendas aparecem no card de últimas vendas.
pub const RECENT_SALES_VISIBLE: usize = 4;
// Posições 1 a 3 ganham destaque no ranking.
pub const PODIUM_SIZE: usize = 3;
pub const WEEKLY_CHART_COLOR: &str = "#2563eb";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub glyph: &'static str,
    pub percentage: String,
    pub positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub trend: Option<Trend>,
}

// Conteúdo do tooltip dos gráficos: um rótulo e uma lista de (cor, valor).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTooltip {
    pub label: String,
    pub entries: Vec<TooltipEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub color: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub amount: Decimal,
    pub tooltip: ChartTooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutSlice {
    pub label: String,
    pub amount: Decimal,
    pub fill: String,
    pub share: Decimal, // 0..=100
    pub tooltip: ChartTooltip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RankEmphasis {
    Podium,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub rank: usize,
    pub name: String,
    pub quantity: String,
    pub amount: String,
    pub emphasis: RankEmphasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

impl From<AlertKind> for AlertSeverity {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Rupture => AlertSeverity::Critical,
            AlertKind::Low => AlertSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRow {
    pub severity: AlertSeverity,
    pub product_name: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub sale_number: String,
    pub operator_name: String,
    pub total: String,
    pub created_at: String,
}

// Uma lista ou a mensagem explícita de "vazio". Nunca uma lista vazia muda.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum Listing<T> {
    Rows { rows: Vec<T> },
    Empty { message: &'static str },
}

impl<T> Listing<T> {
    fn from_rows(rows: Vec<T>, empty_message: &'static str) -> Self {
        if rows.is_empty() {
            Listing::Empty { message: empty_message }
        } else {
            Listing::Rows { rows }
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            Listing::Rows { rows } => rows,
            Listing::Empty { .. } => &[],
        }
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Listing::Rows { .. } => None,
            Listing::Empty { message } => Some(*message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    pub cards: Vec<MetricCard>,
    pub weekly_chart: Vec<ChartPoint>,
    pub category_donut: Listing<DonutSlice>,
    pub top_products: Listing<RankedProduct>,
    pub stock_alerts: Listing<AlertRow>,
    pub recent_sales: Listing<SaleRow>,
}

/// Card de métrica. O indicador de tendência só aparece com variação > 0.
pub fn build_card(
    title: &'static str,
    value: String,
    variation: Option<&Variation>,
    locale: Locale,
) -> MetricCard {
    let trend = variation
        .filter(|v| v.value > Decimal::ZERO)
        .map(|v| Trend {
            glyph: if v.positive { "▲" } else { "▼" },
            percentage: format_percent(v.value, locale),
            positive: v.positive,
        });

    MetricCard { title, value, trend }
}

pub fn build_page(snapshot: &MetricsSnapshot, locale: Locale) -> DashboardPage {
    let messages = locale.messages();

    // O serviço ainda não entrega comparação com ontem: nenhum card tem variação.
    let cards = vec![
        build_card(
            messages.card_sales_today,
            format_currency(snapshot.sales_today, locale),
            None,
            locale,
        ),
        build_card(
            messages.card_average_ticket,
            format_currency(snapshot.average_ticket, locale),
            None,
            locale,
        ),
        build_card(
            messages.card_units_sold,
            format_integer(snapshot.units_sold, locale),
            None,
            locale,
        ),
        build_card(
            messages.card_active_alerts,
            format_integer(snapshot.active_alerts, locale),
            None,
            locale,
        ),
    ];

    let weekly_chart = snapshot
        .weekly_sales
        .iter()
        .map(|entry| ChartPoint {
            label: entry.day_label.clone(),
            amount: entry.amount,
            tooltip: ChartTooltip {
                label: entry.day_label.clone(),
                entries: vec![TooltipEntry {
                    color: WEEKLY_CHART_COLOR.to_string(),
                    value: format_currency(entry.amount, locale),
                }],
            },
        })
        .collect();

    // Estornos podem deixar uma categoria negativa; ela não ocupa fatia.
    let category_total: Decimal = snapshot
        .sales_by_category
        .iter()
        .map(|c| c.amount.max(Decimal::ZERO))
        .sum();
    let slices = snapshot
        .sales_by_category
        .iter()
        .map(|category| DonutSlice {
            label: category.category.clone(),
            amount: category.amount,
            fill: category.color.clone(),
            share: share_of(category.amount, category_total),
            tooltip: ChartTooltip {
                label: category.category.clone(),
                entries: vec![TooltipEntry {
                    color: category.color.clone(),
                    value: format_currency(category.amount, locale),
                }],
            },
        })
        .collect();

    let ranked = snapshot
        .top_products
        .iter()
        .enumerate()
        .map(|(i, product)| RankedProduct {
            rank: i + 1,
            name: product.name.clone(),
            quantity: format_quantity(product.quantity, locale),
            amount: format_currency(product.amount, locale),
            emphasis: if i < PODIUM_SIZE { RankEmphasis::Podium } else { RankEmphasis::Regular },
        })
        .collect();

    let alerts = snapshot
        .stock_alerts
        .iter()
        .map(|alert| AlertRow {
            severity: alert.kind.into(),
            product_name: alert.product_name.clone(),
            detail: alert.detail.clone(),
        })
        .collect();

    let sales = snapshot
        .recent_sales
        .iter()
        .take(RECENT_SALES_VISIBLE)
        .map(|sale| SaleRow {
            sale_number: format!("#{}", sale.sale_number),
            operator_name: sale.operator_name.clone(),
            total: format_currency(sale.total, locale),
            created_at: format_datetime(sale.created_at, locale),
        })
        .collect();

    DashboardPage {
        cards,
        weekly_chart,
        category_donut: Listing::from_rows(slices, messages.no_category_sales),
        top_products: Listing::from_rows(ranked, messages.no_top_products),
        stock_alerts: Listing::from_rows(alerts, messages.no_stock_alerts),
        recent_sales: Listing::from_rows(sales, messages.no_recent_sales),
    }
}

fn share_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO || part <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / total).round_dp(1)
}
