// src/views/dashboard.rs

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    middleware::i18n::Locale,
    models::dashboard::MetricsSnapshot,
    services::metrics_service::MetricsSource,
    views::page::{build_page, DashboardPage},
};

// Loading -> Success | Error. Não existe estado "em cache" entre montagens.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Success(Arc<MetricsSnapshot>),
    Error(String),
}

// O que a tela efetivamente mostra em cada estado.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum RenderedView {
    Loading {
        message: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        reload_label: &'static str,
    },
    Success {
        page: DashboardPage,
    },
}

struct ViewInner {
    state: ViewState,
    // Cada carga ganha uma época; só a mais recente pode gravar o resultado.
    epoch: u64,
    mounted: bool,
}

/// Uma instância do painel. Clones compartilham o mesmo estado.
#[derive(Clone)]
pub struct DashboardView {
    source: Arc<dyn MetricsSource>,
    locale: Locale,
    inner: Arc<Mutex<ViewInner>>,
}

impl DashboardView {
    pub fn new(source: Arc<dyn MetricsSource>, locale: Locale) -> Self {
        Self {
            source,
            locale,
            inner: Arc::new(Mutex::new(ViewInner {
                state: ViewState::Loading,
                epoch: 0,
                mounted: true,
            })),
        }
    }

    /// Monta o painel e dispara a carga inicial.
    pub async fn mount(source: Arc<dyn MetricsSource>, locale: Locale) -> Self {
        let view = Self::new(source, locale);
        view.load().await;
        view
    }

    // Entra em Loading e faz exatamente uma chamada à fonte de métricas.
    pub async fn load(&self) {
        let epoch = {
            let mut inner = self.inner.lock();
            if !inner.mounted {
                tracing::debug!("Painel desmontado, carga ignorada");
                return;
            }
            inner.epoch += 1;
            inner.state = ViewState::Loading;
            inner.epoch
        };

        tracing::info!(epoch, "Carregando métricas do painel");
        let result = self.source.obtain_metrics().await;

        let mut inner = self.inner.lock();
        if !inner.mounted || inner.epoch != epoch {
            tracing::debug!(
                epoch,
                current = inner.epoch,
                mounted = inner.mounted,
                "Resultado de carga obsoleto descartado"
            );
            return;
        }

        inner.state = match result {
            Ok(snapshot) => {
                tracing::info!(epoch, "✅ Métricas do painel carregadas");
                ViewState::Success(Arc::new(snapshot))
            }
            Err(e) => {
                tracing::warn!(epoch, "Falha ao carregar o painel: {}", e);
                ViewState::Error(format!(
                    "{} {}",
                    self.locale.messages().load_error_prefix,
                    e.user_message()
                ))
            }
        };
    }

    /// Recarrega tudo do zero (não é um retry parcial).
    // Pelo HTTP, recarregar é montar de novo (cada requisição é uma montagem).
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn reload(&self) {
        self.load().await;
    }

    // Depois disso, nenhuma carga em voo pode mexer no estado.
    pub fn unmount(&self) {
        self.inner.lock().mounted = false;
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.inner.lock().mounted
    }

    pub fn state(&self) -> ViewState {
        self.inner.lock().state.clone()
    }

    pub fn render(&self) -> RenderedView {
        let messages = self.locale.messages();
        match self.state() {
            ViewState::Loading => RenderedView::Loading { message: messages.loading },
            ViewState::Error(message) => RenderedView::Error {
                message,
                reload_label: messages.reload_label,
            },
            ViewState::Success(snapshot) => RenderedView::Success {
                page: build_page(&snapshot, self.locale),
            },
        }
    }
}
