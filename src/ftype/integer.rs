use std::num::IntErrorKind;

use crate::error::FtypeError;

/// Parse an unsigned 32-bit literal: `0x`/`0X` prefix for hex, a leading `0`
/// for octal, decimal otherwise. Signs and trailing characters are rejected.
pub(crate) fn from_text(s: &str) -> Result<u32, FtypeError> {
    let invalid = || FtypeError::InvalidNumber(s.to_owned());

    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    u32::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => FtypeError::IntegerOverflow(s.to_owned()),
        _ => invalid(),
    })
}
