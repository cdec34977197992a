// src/services/fakes.rs
//
// Fontes de métricas roteirizadas para os testes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::{
    common::error::AppError, models::dashboard::MetricsSnapshot,
    services::metrics_service::MetricsSource,
};

// Sempre responde a mesma coisa e conta quantas vezes foi chamada.
pub struct ScriptedSource {
    outcome: Result<MetricsSnapshot, String>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn ok(snapshot: MetricsSnapshot) -> Self {
        Self {
            outcome: Ok(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsSource for ScriptedSource {
    async fn obtain_metrics(&self) -> Result<MetricsSnapshot, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(AppError::MetricsLoadFailure)
    }
}

pub type Gate = oneshot::Sender<Result<MetricsSnapshot, String>>;

// Cada chamada fica presa até o teste liberar o portão correspondente.
#[derive(Default)]
pub struct GatedSource {
    pending: Mutex<VecDeque<oneshot::Receiver<Result<MetricsSnapshot, String>>>>,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn gate(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, expected: usize) {
        while self.calls() < expected {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl MetricsSource for GatedSource {
    async fn obtain_metrics(&self) -> Result<MetricsSnapshot, AppError> {
        let gate = self.pending.lock().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(gate) = gate else {
            return Err(AppError::MetricsLoadFailure("sem portão configurado".into()));
        };
        match gate.await {
            Ok(outcome) => outcome.map_err(AppError::MetricsLoadFailure),
            Err(_) => Err(AppError::MetricsLoadFailure("portão descartado".into())),
        }
    }
}
