//! Events consumed by the reducer and commands it emits.

use crate::adapter::{AnalysisRequest, AnalysisResult, StructureDetail};
use crate::anatomy::{Layer, Region};
use crate::logging::Level;

/// Everything that can happen to a session: user interactions, the
/// credential poll, and the settle halves of the two fetch kinds.
#[derive(Debug, Clone)]
pub enum Event {
    /// Result of the credential presence check (startup and refocus).
    CredentialCheck(bool),
    SelectRegion(Region),
    CloseRegionPicker,
    /// A test was picked from the region picker; payload is the catalog id.
    ChooseTest(String),
    Search(String),
    /// Activate a case by id, or `None` to return to free exploration.
    SelectCase(Option<String>),
    SetLayer(Layer),
    /// Pointer entered (`Some`) or left (`None`) a structure token.
    HoverStructure(Option<String>),
    ClickStructure(String),
    CloseDetail,
    AnalysisSettled {
        seq: u64,
        outcome: Result<AnalysisResult, String>,
    },
    DetailSettled {
        seq: u64,
        outcome: Result<StructureDetail, String>,
    },
    Reset,
}

/// Side effects requested by the reducer. The driver executes them; the
/// reducer itself performs no I/O.
#[derive(Debug, Clone)]
pub enum Command {
    FetchAnalysis { seq: u64, request: AnalysisRequest },
    FetchDetail { seq: u64, name: String },
    Log { level: Level, msg: String },
}
