/// Decimal precision for reported rates
pub const RATE_DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display/summary values
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Rendering for groups without a solvable rate
pub const NOT_AVAILABLE: &str = "N/A";
