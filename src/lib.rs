//! Interactive neuroanatomy exploration engine.
//!
//! Core flow: a region or search dispatches an analysis query to the
//! knowledge engine, the annotated reply is tokenized into renderable
//! segments, and structure references drill down into deep-dive records.
//! All interaction state lives in one reducer-driven session aggregate.

pub mod adapter;
pub mod anatomy;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod logging;
pub mod markup;
pub mod pathway;
pub mod session;
