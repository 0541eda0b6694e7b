/// Application name used in messages and the config template.
pub const APP_NAME: &str = "stagehand";

/// Per-project configuration file looked up in the project root.
pub const CONFIG_FILENAME: &str = "stagehand.toml";

/// Binary name used when neither the config nor `Cargo.toml` names one.
pub const DEFAULT_BINARY_NAME: &str = "app";

/// Maximum number of captured stderr bytes kept for error reports.
pub const STDERR_TAIL_BYTES: usize = 4096;
