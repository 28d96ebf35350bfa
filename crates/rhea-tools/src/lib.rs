//! Tooling primitives for rolling-horizon agents.
//!
//! This crate is intentionally lightweight and engine-agnostic: decision records are plain data
//! that a host can collect in memory or stream into its own sink.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{TraceEvent, TraceLog, TraceSink, Tracer};
