// All core functionality is in bloodwork-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod output;

// Re-export core types for convenience
pub use bloodwork_core::*;

pub use output::write_output;
