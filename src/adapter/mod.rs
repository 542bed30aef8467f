//! Knowledge-engine adapters.
//!
//! The core treats the engine as an opaque asynchronous function: an
//! analysis query returns annotated prose plus grounded sources, a
//! structure query returns a strict four-field record. Transport, retry
//! and auth policy live behind this seam.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::ExamTest;
use crate::config::Config;

pub mod gemini;

/// A grounded citation attached to an analysis reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Reply to an analysis query. Content uses the `[[Name]]` markup grammar.
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub content: String,
    pub sources: Vec<Source>,
}

/// Strict structure deep-dive record. Deserialization fails if any field is
/// missing, which the detail path reports as a request failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDetail {
    pub name: String,
    pub embryology: String,
    pub localization: String,
    pub function: String,
}

/// What the session wants analyzed.
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    /// A catalog test was chosen from the region picker.
    Protocol(ExamTest),
    /// Free-text query from the search box.
    Query(String),
}

#[async_trait]
pub trait KnowledgeEngine {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;
    async fn structure_detail(&self, name: &str) -> Result<StructureDetail>;
}

#[derive(Clone, Copy, Debug)]
pub enum EngineKind {
    Gemini,
    Null,
}

impl EngineKind {
    pub fn from_config(cfg: &Config) -> Self {
        if cfg.has_credential() {
            EngineKind::Gemini
        } else {
            EngineKind::Null
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn KnowledgeEngine + Send + Sync>> {
        match self {
            EngineKind::Gemini => Ok(Box::new(gemini::GeminiEngine::new(cfg)?)),
            EngineKind::Null => Ok(Box::new(NullEngine)),
        }
    }
}

// Stub implementation to make integration explicit. The credential guard
// keeps the session from dispatching to it in normal operation.
pub struct NullEngine;

#[async_trait]
impl KnowledgeEngine for NullEngine {
    async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisResult> {
        Ok(AnalysisResult {
            content: "# Modo sin conexión\nConsulta de ejemplo sobre el [[Núcleo Rojo]].".to_string(),
            sources: Vec::new(),
        })
    }

    async fn structure_detail(&self, name: &str) -> Result<StructureDetail> {
        Ok(StructureDetail {
            name: name.to_string(),
            embryology: "(sin conexión)".to_string(),
            localization: "(sin conexión)".to_string(),
            function: "(sin conexión)".to_string(),
        })
    }
}
