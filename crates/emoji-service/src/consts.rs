pub const MAX_SHORTCODE_LENGTH: usize = 64;

/// Reported as the set name for emoji sets that didn't specify one
pub const UNKNOWN_SET_NAME: &str = "unknown";
