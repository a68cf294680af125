//! Process exit codes

/// Command completed and every write was persisted
pub const EXIT_SUCCESS: i32 = 0;

/// Command completed locally but some writes failed to persist
pub const EXIT_WARNING: i32 = 1;

/// Command failed
pub const EXIT_ERROR: i32 = 2;
