//! Process-related modules for sampling processes from procfs.
//!
//! This module provides:
//! - `scanner`: Process discovery, command line and name reading
//! - `cpu`: CPU time parsing and utilization
//! - `memory`: Resident memory parsing
//! - `sampler`: The `ProcessSampler` capability and its procfs implementation

pub mod cpu;
pub mod memory;
pub mod sampler;
pub mod scanner;

// Re-export commonly used types
pub use sampler::{ProcessSampler, ProcessSnapshot, ProcfsSampler, SamplerError};
pub use scanner::matches_filter;
