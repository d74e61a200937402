// src/constants.rs

use std::time::Duration;

/// The name of the per-user configuration file (inside the ffkit config dir).
pub const SETTINGS_FILENAME: &str = "ffkit.toml";

/// Delay between iterations of the execution engine's poll loop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Size of a single read from the child's combined output stream.
pub const READ_CHUNK_SIZE: usize = 4096;

/// The reply injected into the child's stdin to confirm an overwrite prompt.
pub const OVERWRITE_REPLY: &str = "y\n";
