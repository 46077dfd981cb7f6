//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: Runtime failure
//! - 2: Configuration or usage error

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// The command ran but failed, e.g. the server stopped with an error
pub const EXIT_FAILURE: i32 = 1;

/// Configuration is missing or invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;
