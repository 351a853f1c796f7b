//! System-wide constants for the SplitLedger engine.

use rust_decimal::Decimal;

/// Decimal places of a currency amount (cents).
pub const CURRENCY_SCALE: u32 = 2;

/// Decimal places kept for intermediate share fractions before the final
/// rounding to [`CURRENCY_SCALE`].
pub const INTERMEDIATE_SCALE: u32 = 10;

/// Largest scale a `Decimal` can carry.
pub const MAX_SCALE: u32 = 28;

/// Balances within one cent of zero count as settled.
pub const SETTLE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, CURRENCY_SCALE);

/// A full percentage split.
pub const FULL_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SplitLedger";
