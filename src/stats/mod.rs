//! Statistics aggregators.
//!
//! Each aggregator is a pure function over a parsed chat. They share no
//! state, so the orchestrator can run them independently on blocking
//! threads and join the results.

pub mod basic;
pub mod linguistic;
pub mod temporal;

pub use basic::{BasicStats, compute_basic_stats};
pub use linguistic::{LinguisticStats, WordCount, compute_linguistic_stats};
pub use temporal::{DailyCount, TemporalStats, compute_temporal_stats};
