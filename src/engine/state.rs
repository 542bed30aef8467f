//! Session-scoped state aggregate.

use crate::adapter::{AnalysisResult, StructureDetail};
use crate::anatomy::{Layer, Region};
use crate::catalog::{Catalog, ClinicalCase, ExamTest};

/// Coarse phase of the session, derived from the aggregate. `Failed` is
/// terminal per attempt, never per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RegionPicking,
    Evaluating,
    Presenting,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Corrective,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

/// Structure deep-dive view. Independent of the main analysis fetch: the
/// two loading states never share a flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Closed,
    Fetching { seq: u64, name: String },
    Open(StructureDetail),
}

/// The one mutable aggregate of a session. Mutated exclusively through
/// [`crate::engine::reducer::reduce`]; never persisted across sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Region tapped on the diagram; drives the test picker.
    pub selected_region: Option<Region>,
    /// Transient hover highlight, distinct from the clicked selection.
    pub highlighted_region: Option<Region>,
    pub active_layer: Layer,
    pub active_case: Option<ClinicalCase>,
    pub analysis: Option<AnalysisResult>,
    pub loading: bool,
    pub feedback: Option<Feedback>,
    pub detail: DetailView,
    /// Last credential presence check. False routes every dispatching
    /// operation to the Failed guard.
    pub credential_ok: bool,
    pub request_failed: bool,
    /// Monotonic id of the current analysis request; settles with an older
    /// id are ignored for display.
    pub analysis_seq: u64,
    pub detail_seq: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            selected_region: None,
            highlighted_region: None,
            active_layer: Layer::Skin,
            active_case: None,
            analysis: None,
            loading: false,
            feedback: None,
            detail: DetailView::Closed,
            credential_ok: false,
            request_failed: false,
            analysis_seq: 0,
            detail_seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Evaluating
        } else if self.request_failed {
            Phase::Failed
        } else if self.selected_region.is_some() {
            Phase::RegionPicking
        } else if self.analysis.is_some() {
            Phase::Presenting
        } else {
            Phase::Idle
        }
    }

    /// Tests offered by the picker for the currently selected region.
    pub fn available_tests(&self, catalog: &Catalog) -> Vec<&'static ExamTest> {
        match self.selected_region {
            Some(region) => catalog.tests_for_region(region),
            None => Vec::new(),
        }
    }

    /// True while either fetch kind is outstanding.
    pub fn has_pending_fetch(&self) -> bool {
        self.loading || matches!(self.detail, DetailView::Fetching { .. })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_idle_on_skin() {
        let state = SessionState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.active_layer, Layer::Skin);
        assert!(!state.has_pending_fetch());
    }

    #[test]
    fn phase_priority_is_loading_first() {
        let mut state = SessionState::new();
        state.analysis = Some(AnalysisResult { content: "x".into(), sources: vec![] });
        assert_eq!(state.phase(), Phase::Presenting);
        state.selected_region = Some(Region::Head);
        assert_eq!(state.phase(), Phase::RegionPicking);
        state.loading = true;
        assert_eq!(state.phase(), Phase::Evaluating);
    }
}
