//! Session driver: owns the state, runs the reducer, executes commands.
//!
//! Fetch commands are spawned as tokio tasks whose completions come back
//! over an unbounded channel as settle events. `apply` itself never awaits,
//! so user interactions are handled even while fetches are outstanding.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::adapter::KnowledgeEngine;
use crate::catalog::Catalog;
use crate::engine::events::{Command, Event};
use crate::engine::reducer::reduce;
use crate::engine::state::SessionState;
use crate::logging::{log, obj, v_str, Domain};

pub struct Session {
    state: SessionState,
    catalog: Catalog,
    engine: Arc<dyn KnowledgeEngine + Send + Sync>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Session {
    pub fn new(catalog: Catalog, engine: Arc<dyn KnowledgeEngine + Send + Sync>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(),
            catalog,
            engine,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one event through the reducer and executes the commands it
    /// returns. Synchronous: fetches are spawned, not awaited.
    pub fn apply(&mut self, event: Event) {
        let commands = reduce(&mut self.state, event, &self.catalog);
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        match command {
            Command::FetchAnalysis { seq, request } => {
                let engine = Arc::clone(&self.engine);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = engine
                        .analyze(&request)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    // Receiver dropping means the session is gone; nothing
                    // to settle into.
                    let _ = tx.send(Event::AnalysisSettled { seq, outcome });
                });
            }
            Command::FetchDetail { seq, name } => {
                let engine = Arc::clone(&self.engine);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = engine
                        .structure_detail(&name)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    let _ = tx.send(Event::DetailSettled { seq, outcome });
                });
            }
            Command::Log { level, msg } => {
                log(level, Domain::Session, "session", obj(&[("msg", v_str(&msg))]));
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.state.has_pending_fetch()
    }

    /// Waits for the next settle event and applies it. Returns false when
    /// nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        if !self.has_pending() {
            return false;
        }
        match self.rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Drains every outstanding fetch.
    pub async fn settle_all(&mut self) {
        while self.settle_next().await {}
    }

    /// Applies already-delivered settle events without waiting.
    pub fn try_settle(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
        }
    }
}
