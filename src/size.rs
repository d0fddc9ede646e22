//! Human-readable byte counts.
//!
//! Values are scaled by powers of 1024 and printed with `rust_decimal`
//! arithmetic, so large inputs keep their exact digits instead of going
//! through `f64`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Unit suffixes, one per power of 1024.
const SIZE_SUFFIXES: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Decimal places used by [`readable_size`].
pub const DEFAULT_DECIMAL_PLACES: usize = 2;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Format a byte count with the given number of fractional digits.
///
/// # Example
///
/// ```
/// use pptsize::size::format_size;
///
/// assert_eq!(format_size(1572864, 2), "1.50 MB");
/// assert_eq!(format_size(0, 4), "0 B");
/// assert_eq!(format_size(-1536, 1), "-1.5 KB");
/// ```
pub fn format_size(bytes: i64, decimal_places: usize) -> String {
    if bytes < 0 {
        return format!("-{}", format_magnitude(bytes.unsigned_abs(), decimal_places));
    }
    format_magnitude(bytes as u64, decimal_places)
}

/// Format a byte count with two fractional digits.
pub fn readable_size(bytes: i64) -> String {
    format_size(bytes, DEFAULT_DECIMAL_PLACES)
}

/// Format a byte count as megabytes with two fractional digits, no suffix.
///
/// Used for the file summary line, which always reports MB regardless of
/// magnitude.
pub fn megabytes(bytes: u64) -> String {
    scaled(bytes, BYTES_PER_MB, 2)
}

fn format_magnitude(bytes: u64, decimal_places: usize) -> String {
    if bytes == 0 {
        return format!("0 {}", SIZE_SUFFIXES[0]);
    }

    let mag = magnitude(bytes);
    format!(
        "{} {}",
        scaled(bytes, 1u64 << (mag * 10), decimal_places),
        SIZE_SUFFIXES[mag]
    )
}

/// floor(log_1024(bytes)), clamped to the suffix table. `bytes` must be non-zero.
fn magnitude(bytes: u64) -> usize {
    let log2 = (u64::BITS - 1 - bytes.leading_zeros()) as usize;
    (log2 / 10).min(SIZE_SUFFIXES.len() - 1)
}

/// `bytes / divisor` rounded half away from zero and printed with exactly
/// `places` fractional digits.
fn scaled(bytes: u64, divisor: u64, places: usize) -> String {
    let value = (Decimal::from(bytes) / Decimal::from(divisor)).round_dp_with_strategy(
        u32::try_from(places).unwrap_or(u32::MAX),
        RoundingStrategy::MidpointAwayFromZero,
    );
    // precision only pads here; rounding already happened above
    format!("{:.*}", places, value)
}
