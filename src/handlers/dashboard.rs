// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    views::{dashboard::DashboardView, html::render_html},
};

// GET /api/dashboard/metrics
// O retrato cru, direto do serviço de métricas.
pub async fn get_metrics(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = app_state
        .metrics_source
        .obtain_metrics()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(snapshot)))
}

// Cada requisição é uma montagem nova do painel: carrega, renderiza, desmonta.
async fn mount_dashboard(app_state: &AppState, locale: Locale) -> DashboardView {
    DashboardView::mount(app_state.metrics_source.clone(), locale).await
}

// GET /api/dashboard/view
// O painel já derivado (cards, gráficos, listas) ou o painel de erro.
// A falha fica contida no estado do painel: a resposta é sempre 200.
pub async fn get_view(State(app_state): State<AppState>, locale: Locale) -> impl IntoResponse {
    let view = mount_dashboard(&app_state, locale).await;
    let rendered = view.render();
    view.unmount();

    (StatusCode::OK, Json(rendered))
}

// GET /dashboard
pub async fn get_dashboard_page(
    State(app_state): State<AppState>,
    locale: Locale,
) -> impl IntoResponse {
    let view = mount_dashboard(&app_state, locale).await;
    let html = render_html(&view.render(), locale);
    view.unmount();

    Html(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        Router,
    };
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{
        config::{AppConfig, AppState},
        models::dashboard::MetricsSnapshot,
        services::{fakes::ScriptedSource, metrics_service::MetricsSource},
    };

    fn app(source: Arc<dyn MetricsSource>) -> Router {
        let config = AppConfig::from_lookup(|key| match key {
            "METRICS_SOURCE" => Some("mock".to_string()),
            _ => None,
        })
        .unwrap();
        crate::build_router(AppState::with_source(config, source))
    }

    async fn get(router: Router, uri: &str, lang: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::ACCEPT_LANGUAGE, lang)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let router = app(Arc::new(ScriptedSource::ok(MetricsSnapshot::default())));
        let (status, body) = get(router, "/api/health", "pt-BR").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_camel_case_snapshot() {
        let snapshot = MetricsSnapshot {
            sales_today: dec!(1234.5),
            units_sold: 7,
            ..MetricsSnapshot::default()
        };
        let router = app(Arc::new(ScriptedSource::ok(snapshot)));
        let (status, body) = get(router, "/api/dashboard/metrics", "pt-BR").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["salesToday"], 1234.5);
        assert_eq!(json["unitsSold"], 7);
        assert!(json["topProducts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn metrics_endpoint_reports_load_failure() {
        let router = app(Arc::new(ScriptedSource::failing("network timeout")));
        let (status, body) = get(router, "/api/dashboard/metrics", "en").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Failed to load the dashboard: network timeout");
    }

    #[tokio::test]
    async fn view_endpoint_contains_the_failure() {
        let router = app(Arc::new(ScriptedSource::failing("network timeout")));
        let (status, body) = get(router, "/api/dashboard/view", "pt-BR").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["state"], "error");
        assert!(json["message"].as_str().unwrap().contains("network timeout"));
        assert_eq!(json["reloadLabel"], "Recarregar");
    }

    #[tokio::test]
    async fn view_endpoint_renders_cards() {
        let snapshot = MetricsSnapshot {
            sales_today: dec!(1234.5),
            ..MetricsSnapshot::default()
        };
        let router = app(Arc::new(ScriptedSource::ok(snapshot)));
        let (_, body) = get(router, "/api/dashboard/view", "pt-BR").await;

        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["state"], "success");
        assert_eq!(json["page"]["cards"].as_array().unwrap().len(), 4);
        assert_eq!(json["page"]["cards"][0]["value"], "R$ 1.234,50");
        assert_eq!(json["page"]["topProducts"]["state"], "empty");
    }

    #[tokio::test]
    async fn every_page_request_is_a_fresh_mount() {
        let source = Arc::new(ScriptedSource::failing("network timeout"));
        let router = app(source.clone());

        let (status, html) = get(router.clone(), "/dashboard", "pt-BR").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("network timeout"));
        assert!(html.contains("href=\"/dashboard\""));
        assert_eq!(source.calls(), 1);

        // Seguir o link de recarregar monta o painel de novo: uma chamada a mais.
        get(router, "/dashboard", "pt-BR").await;
        assert_eq!(source.calls(), 2);
    }
}
