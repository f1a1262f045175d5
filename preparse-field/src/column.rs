use preparse_model::ColumnType;

use crate::host::ColumnSizer;

/// Widest precision a decimal column accepts.
pub const MAX_DECIMAL_PRECISION: u32 = 65;

/// Sizes decimal columns from the digit count of the widest bound.
///
/// With no bounds the signed 64-bit range applies, so `decimals = 2` yields
/// `decimal(21,2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColumnSizer;

impl ColumnSizer for DefaultColumnSizer {
    fn decimal_column(&self, min: Option<i64>, max: Option<i64>, decimals: u32) -> ColumnType {
        let min = min.unwrap_or(i64::MIN);
        let max = max.unwrap_or(i64::MAX);
        let widest = min.unsigned_abs().max(max.unsigned_abs());
        let digits = if widest == 0 {
            0
        } else {
            widest.to_string().len() as u32
        };
        let precision = (digits + decimals).clamp(1, MAX_DECIMAL_PRECISION);
        ColumnType::Decimal {
            precision,
            scale: decimals.min(precision),
        }
    }
}
