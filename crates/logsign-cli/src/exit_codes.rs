//! Exit codes for the `logsign` binary.
//! Request failures exit with `SigningError::exit_code()` (1..=5).

pub const SUCCESS: i32 = 0;
pub const USAGE_ERROR: i32 = 6; // Bad arguments, unreadable input, bad key file
