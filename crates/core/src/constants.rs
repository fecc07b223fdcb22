//! Application-wide constants.

/// Number of fractional digits carried by every point amount.
pub const POINT_DECIMAL_SCALE: u32 = 8;

/// Display name used for the public pool in transaction descriptions.
pub const PUBLIC_POOL_NAME: &str = "PUBLIC_POOL";
