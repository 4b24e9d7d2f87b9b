//! Process exit codes
//!
//! The contract is deliberately coarse: 0 on success (including a skipped
//! or failed certificate request), 1 on any fatal condition.

/// Successful termination
pub const OK: i32 = 0;

/// Privilege failure or any fatal step error
pub const FAILURE: i32 = 1;
