//! Constants used throughout the worklist core crate.

/// Path of the worklist endpoint, relative to the API base URL.
pub const WORKLIST_PATH: &str = "/v1/me/worklist";

/// API base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// File the session store persists to when no path is configured.
pub const DEFAULT_SESSION_FILE: &str = ".lab-session.yaml";

/// Statuses that mean the work is done. Items in these statuses are hidden by default.
pub const COMPLETED_STATUSES: [&str; 5] = ["APPROVED", "READY", "RELEASED", "CLOSED", "PUBLISHED"];

/// Shown in place of missing values.
pub const PLACEHOLDER: &str = "—";
