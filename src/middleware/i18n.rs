// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Idiomas suportados pelo painel. Português é o padrão da loja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Pt,
    En,
}

// Textos fixos do painel, por idioma.
#[derive(Debug)]
pub struct Messages {
    pub load_error_prefix: &'static str,
    pub unexpected_error: &'static str,
    pub reload_label: &'static str,
    pub loading: &'static str,
    pub page_title: &'static str,
    pub card_sales_today: &'static str,
    pub card_average_ticket: &'static str,
    pub card_units_sold: &'static str,
    pub card_active_alerts: &'static str,
    pub weekly_sales_title: &'static str,
    pub category_sales_title: &'static str,
    pub top_products_title: &'static str,
    pub stock_alerts_title: &'static str,
    pub recent_sales_title: &'static str,
    pub no_top_products: &'static str,
    pub no_stock_alerts: &'static str,
    pub no_recent_sales: &'static str,
    pub no_category_sales: &'static str,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

static PT: Messages = Messages {
    load_error_prefix: "Erro ao carregar o dashboard:",
    unexpected_error: "Ocorreu um erro inesperado.",
    reload_label: "Recarregar",
    loading: "Carregando métricas...",
    page_title: "Dashboard",
    card_sales_today: "Vendas Hoje",
    card_average_ticket: "Ticket Médio",
    card_units_sold: "Itens Vendidos",
    card_active_alerts: "Alertas Ativos",
    weekly_sales_title: "Vendas da Semana",
    category_sales_title: "Vendas por Categoria",
    top_products_title: "Produtos Mais Vendidos",
    stock_alerts_title: "Alertas de Estoque",
    recent_sales_title: "Últimas Vendas",
    no_top_products: "Nenhuma venda registrada hoje.",
    no_stock_alerts: "Nenhum alerta de estoque.",
    no_recent_sales: "Nenhuma venda recente.",
    no_category_sales: "Sem vendas por categoria.",
    thousands_separator: '.',
    decimal_separator: ',',
};

static EN: Messages = Messages {
    load_error_prefix: "Failed to load the dashboard:",
    unexpected_error: "An unexpected error occurred.",
    reload_label: "Reload",
    loading: "Loading metrics...",
    page_title: "Dashboard",
    card_sales_today: "Sales Today",
    card_average_ticket: "Average Ticket",
    card_units_sold: "Units Sold",
    card_active_alerts: "Active Alerts",
    weekly_sales_title: "Weekly Sales",
    category_sales_title: "Sales by Category",
    top_products_title: "Top Products",
    stock_alerts_title: "Stock Alerts",
    recent_sales_title: "Recent Sales",
    no_top_products: "No sales recorded today.",
    no_stock_alerts: "No stock alerts.",
    no_recent_sales: "No recent sales.",
    no_category_sales: "No sales by category.",
    thousands_separator: ',',
    decimal_separator: '.',
};

impl Locale {
    // "pt-BR" -> "pt", "en-US" -> "en". Qualquer outro cai no padrão.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split('-').next().unwrap_or(tag);
        if primary.eq_ignore_ascii_case("en") {
            Locale::En
        } else {
            Locale::Pt
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::Pt => &PT,
            Locale::En => &EN,
        }
    }

    pub fn html_lang(&self) -> &'static str {
        match self {
            Locale::Pt => "pt-BR",
            Locale::En => "en",
        }
    }
}

// Nosso extrator de idioma
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o idioma preferido (ex: "pt-BR")
                    .map(|tag| Locale::from_tag(tag))
            })
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header_value: Option<&str>) -> Locale {
        let mut builder = Request::builder();
        if let Some(value) = header_value {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Locale::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn defaults_to_portuguese() {
        assert_eq!(extract(None).await, Locale::Pt);
        assert_eq!(extract(Some("fr-FR")).await, Locale::Pt);
    }

    #[tokio::test]
    async fn picks_the_preferred_language() {
        assert_eq!(extract(Some("en-US,pt;q=0.5")).await, Locale::En);
        assert_eq!(extract(Some("pt-BR,en;q=0.8")).await, Locale::Pt);
    }
}
