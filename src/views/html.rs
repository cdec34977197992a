// src/views/html.rs
//
// HTML do painel, montado no servidor a partir do `RenderedView`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{
    middleware::i18n::Locale,
    views::{
        dashboard::RenderedView,
        page::{AlertSeverity, ChartPoint, DashboardPage, DonutSlice, Listing, RankEmphasis},
    },
};

// Recarregar é uma nova montagem completa do painel.
pub const RELOAD_HREF: &str = "/dashboard";

const CHART_WIDTH: f64 = 560.0;
const CHART_HEIGHT: f64 = 160.0;
const DONUT_RADIUS: f64 = 60.0;

pub fn render_html(view: &RenderedView, locale: Locale) -> String {
    let messages = locale.messages();
    let body = match view {
        RenderedView::Loading { message } => {
            format!("<p class=\"loading\">{}</p>", html_escape(message))
        }
        RenderedView::Error { message, reload_label } => format!(
            "<section class=\"error-panel\">\n  <p class=\"error\">{}</p>\n  <a class=\"reload\" href=\"{RELOAD_HREF}\">{}</a>\n</section>",
            html_escape(message),
            html_escape(reload_label)
        ),
        RenderedView::Success { page } => render_page(page, locale),
    };

    format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n{}\n</body>\n</html>\n",
        locale.html_lang(),
        html_escape(messages.page_title),
        html_escape(messages.page_title),
        body
    )
}

fn render_page(page: &DashboardPage, locale: Locale) -> String {
    let messages = locale.messages();
    let mut out = String::new();

    // 1. Cards
    out.push_str("<section class=\"cards\">\n");
    for card in &page.cards {
        let trend = match &card.trend {
            Some(trend) => format!(
                " <span class=\"trend {}\">{} {}</span>",
                if trend.positive { "up" } else { "down" },
                trend.glyph,
                html_escape(&trend.percentage)
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            "  <div class=\"card\"><h2>{}</h2><p class=\"value\">{}</p>{trend}</div>\n",
            html_escape(card.title),
            html_escape(&card.value)
        ));
    }
    out.push_str("</section>\n");

    // 2. Semana
    out.push_str(&section(
        messages.weekly_sales_title,
        &render_area_chart(&page.weekly_chart),
    ));

    // 3. Categorias
    out.push_str(&section(
        messages.category_sales_title,
        &render_listing(&page.category_donut, render_donut),
    ));

    // 4. Ranking
    out.push_str(&section(
        messages.top_products_title,
        &render_listing(&page.top_products, |rows| {
            let items: String = rows
                .iter()
                .map(|p| {
                    let class = match p.emphasis {
                        RankEmphasis::Podium => "podium",
                        RankEmphasis::Regular => "regular",
                    };
                    format!(
                        "  <li class=\"rank {class}\"><span class=\"position\">{}</span> {} <span class=\"qty\">{}</span> <span class=\"amount\">{}</span></li>\n",
                        p.rank,
                        html_escape(&p.name),
                        html_escape(&p.quantity),
                        html_escape(&p.amount)
                    )
                })
                .collect();
            format!("<ol class=\"top-products\">\n{items}</ol>")
        }),
    ));

    // 5. Alertas
    out.push_str(&section(
        messages.stock_alerts_title,
        &render_listing(&page.stock_alerts, |rows| {
            let items: String = rows
                .iter()
                .map(|a| {
                    let class = match a.severity {
                        AlertSeverity::Critical => "critical",
                        AlertSeverity::Warning => "warning",
                    };
                    format!(
                        "  <li class=\"alert {class}\"><strong>{}</strong> {}</li>\n",
                        html_escape(&a.product_name),
                        html_escape(&a.detail)
                    )
                })
                .collect();
            format!("<ul class=\"stock-alerts\">\n{items}</ul>")
        }),
    ));

    // 6. Últimas vendas
    out.push_str(&section(
        messages.recent_sales_title,
        &render_listing(&page.recent_sales, |rows| {
            let items: String = rows
                .iter()
                .map(|s| {
                    format!(
                        "  <tr class=\"sale-row\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        html_escape(&s.sale_number),
                        html_escape(&s.operator_name),
                        html_escape(&s.total),
                        html_escape(&s.created_at)
                    )
                })
                .collect();
            format!("<table class=\"recent-sales\">\n<tbody>\n{items}</tbody>\n</table>")
        }),
    ));

    out
}

fn section(title: &str, content: &str) -> String {
    format!("<section>\n<h2>{}</h2>\n{content}\n</section>\n", html_escape(title))
}

fn render_listing<T>(listing: &Listing<T>, rows: impl Fn(&[T]) -> String) -> String {
    match listing.empty_message() {
        Some(message) => format!("<p class=\"empty\">{}</p>", html_escape(message)),
        None => rows(listing.rows()),
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

// Área preenchida: um polígono do eixo X até cada ponto e de volta.
fn render_area_chart(points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let max = points.iter().map(|p| to_f64(p.amount)).fold(0.0_f64, f64::max);
    let step = if points.len() > 1 { CHART_WIDTH / (points.len() - 1) as f64 } else { 0.0 };
    let y_of = |amount: Decimal| {
        if max <= 0.0 {
            CHART_HEIGHT
        } else {
            CHART_HEIGHT - (to_f64(amount) / max) * CHART_HEIGHT
        }
    };

    let mut polygon = format!("0,{CHART_HEIGHT}");
    let mut markers = String::new();
    for (i, point) in points.iter().enumerate() {
        let x = step * i as f64;
        let y = y_of(point.amount);
        polygon.push_str(&format!(" {x:.1},{y:.1}"));

        let tooltip: Vec<String> = point.tooltip.entries.iter().map(|e| e.value.clone()).collect();
        markers.push_str(&format!(
            "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{}\"><title>{}: {}</title></circle>\n  <text x=\"{x:.1}\" y=\"{}\">{}</text>\n",
            point.tooltip.entries.first().map(|e| e.color.as_str()).unwrap_or("currentColor"),
            html_escape(&point.tooltip.label),
            html_escape(&tooltip.join(", ")),
            CHART_HEIGHT + 14.0,
            html_escape(&point.label)
        ));
    }
    polygon.push_str(&format!(" {:.1},{CHART_HEIGHT}", step * (points.len() - 1) as f64));

    format!(
        "<svg class=\"area-chart\" viewBox=\"0 0 {CHART_WIDTH} {}\">\n  <polygon points=\"{polygon}\" fill=\"{}\" fill-opacity=\"0.3\"/>\n{markers}</svg>",
        CHART_HEIGHT + 20.0,
        crate::views::page::WEEKLY_CHART_COLOR
    )
}

// Rosca: cada fatia é um arco com `stroke-dasharray` proporcional à sua fatia.
fn render_donut(slices: &[DonutSlice]) -> String {
    let circumference = 2.0 * std::f64::consts::PI * DONUT_RADIUS;
    let mut offset = 0.0_f64;
    let mut arcs = String::new();
    let mut legend = String::new();

    for slice in slices {
        let length = to_f64(slice.share) / 100.0 * circumference;
        arcs.push_str(&format!(
            "  <circle r=\"{DONUT_RADIUS}\" cx=\"80\" cy=\"80\" fill=\"none\" stroke=\"{}\" stroke-width=\"24\" stroke-dasharray=\"{length:.2} {:.2}\" stroke-dashoffset=\"{:.2}\"><title>{}: {}</title></circle>\n",
            html_escape(&slice.fill),
            circumference - length,
            -offset,
            html_escape(&slice.tooltip.label),
            html_escape(slice.tooltip.entries.first().map(|e| e.value.as_str()).unwrap_or_default())
        ));
        legend.push_str(&format!(
            "  <li><span class=\"swatch\" style=\"background:{}\"></span>{}</li>\n",
            html_escape(&slice.fill),
            html_escape(&slice.label)
        ));
        offset += length;
    }

    format!(
        "<svg class=\"donut\" viewBox=\"0 0 160 160\">\n{arcs}</svg>\n<ul class=\"legend\">\n{legend}</ul>"
    )
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
