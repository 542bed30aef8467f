//! Exploration state machine.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  UI Events   │────►│   Reducer    │────►│   Commands   │
//! │ (region/test │     │  (pure fn)   │     │ (fetch/log)  │
//! │  /search/…)  │     └──────┬───────┘     └──────────────┘
//! └──────────────┘            ▼
//!                      ┌──────────────┐
//!                      │ SessionState │
//!                      └──────────────┘
//! ```
//!
//! The reducer is a pure function over the session aggregate; fetch
//! commands are executed by the driver in [`crate::session`], whose
//! completions come back as settle events tagged with a sequence number so
//! superseded requests resolve as display no-ops.

pub mod events;
pub mod reducer;
pub mod state;
