//! Client runtime
//!
//! This module provides access to duplex-runtime, the state machinery that
//! generated scripts drive: positional hooks, reactive components mounted on
//! element ids, the context store and history-based routing.

// Re-export all duplex-runtime functionality
pub use duplex_runtime::*;
