//! Stable codes for failures that are not tied to a typed error.

pub const MANIFEST_NOT_FOUND: &str = "UB100";
pub const READ_FAILED: &str = "UB104";
pub const MAIN_ENVIRONMENT_UNUSABLE: &str = "UB403";
pub const ENTRY_SCRIPT_MISSING: &str = "UB404";
pub const SETTINGS_NOT_FOUND: &str = "UB111";
