pub mod error;
pub mod status;
pub mod table;

// Re-exports
pub use error::{Error, Result};
pub use status::TrialStatus;
pub use table::{coerce_numeric, ResultsTable};

/// Column holding the trial identifier.
pub const TRIAL_ID_COL: &str = "trial_id";

/// Column holding the configuration identifier a trial ran with.
pub const CONFIG_ID_COL: &str = "tunable_config_id";

/// Column holding the trial status string.
pub const STATUS_COL: &str = "status";

/// Prefix of tunable-parameter columns in a results table.
pub const CONFIG_PREFIX: &str = "config.";

/// Prefix of result-metric columns in a results table.
pub const RESULT_PREFIX: &str = "result.";
