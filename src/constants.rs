//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and default service locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "InteriorRec";

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "InteriorRec";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "INTERIORREC_CONFIG_DIR";

/// Default generation/recommendation backend.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Default thumbnail store (sharded by image id prefix).
pub const DEFAULT_THUMBNAIL_URL: &str =
    "https://amazon-berkeley-objects.s3.amazonaws.com/spins/original";

/// Style variants requested per generation round.
pub const DEFAULT_STYLES: [&str; 3] = ["minimal", "mid-century", "modern"];
