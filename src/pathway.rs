//! Pathway-inference heuristic: decide which long-tract overlay to trace
//! from the analysis prose.
//!
//! Ordered keyword scan, first match wins. This is a fixed priority, not a
//! relevance ranking: content naming both pain and cerebellar findings
//! traces the pain pathway because that set is declared first.

use crate::adapter::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathwayKind {
    Motor,
    Pain,
    Sensory,
    Cerebellar,
}

/// Direction the overlay is drawn in. Motor descends; every sensory-side
/// pathway ascends and shares one visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    Downward,
    Upward,
}

impl PathwayKind {
    pub fn direction(&self) -> TraceDirection {
        match self {
            PathwayKind::Motor => TraceDirection::Downward,
            _ => TraceDirection::Upward,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathwayKind::Motor => "motor",
            PathwayKind::Pain => "pain",
            PathwayKind::Sensory => "sensory",
            PathwayKind::Cerebellar => "cerebellar",
        }
    }
}

// Declaration order is the priority order.
const PATHWAY_KEYWORDS: &[(&[&str], PathwayKind)] = &[
    (&["corticoespinal", "piramidal"], PathwayKind::Motor),
    (&["espinotalámica", "dolor"], PathwayKind::Pain),
    (&["columnas posteriores", "vibración"], PathwayKind::Sensory),
    (&["cerebelo", "ataxia"], PathwayKind::Cerebellar),
];

/// Scan analysis content for a pathway to trace. `None` means no overlay.
pub fn infer_pathway(analysis: Option<&AnalysisResult>) -> Option<PathwayKind> {
    let content = analysis?.content.to_lowercase();
    for (keywords, kind) in PATHWAY_KEYWORDS {
        if keywords.iter().any(|k| content.contains(k)) {
            return Some(*kind);
        }
    }
    None
}
