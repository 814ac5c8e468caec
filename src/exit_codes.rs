//! Standard exit codes for the basegfx binary
//!
//! Fatal load and switch errors map onto these so scripts driving the tool
//! can tell a broken set apart from an undersized sprite table.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Set loaded but one or more files are corrupt or missing
pub const EXIT_INCOMPLETE_SET: i32 = 2;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// GRF container error (corrupt header, unsupported compression, short file)
pub const EXIT_GRF_ERROR: i32 = 102;

/// Sprite table capacity exhausted
pub const EXIT_CAPACITY_ERROR: i32 = 103;

/// Video driver could not be re-initialised after a blitter switch
pub const EXIT_VIDEO_ERROR: i32 = 104;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Configuration error (invalid set descriptor, missing required fields)
pub const EXIT_CONFIG_ERROR: i32 = 109;
