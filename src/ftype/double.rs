use crate::error::FtypeError;

/// Parse a floating-point literal.
///
/// Out-of-range input is refused: a result that underflowed to zero, one that
/// overflowed to infinity, and one that lost precision as a subnormal each
/// get their own diagnostic.
pub(crate) fn from_text(s: &str) -> Result<f64, FtypeError> {
    let value: f64 = s
        .parse()
        .map_err(|_| FtypeError::InvalidNumber(s.to_owned()))?;

    if value.is_infinite() && !names_infinity(s) {
        return Err(FtypeError::FloatOverflow(s.to_owned()));
    }
    if value == 0.0 && has_nonzero_mantissa(s) {
        return Err(FtypeError::FloatUnderflow(s.to_owned()));
    }
    if value.is_subnormal() {
        return Err(FtypeError::InvalidFloat(s.to_owned()));
    }

    Ok(value)
}

fn names_infinity(s: &str) -> bool {
    s.trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf")
}

fn has_nonzero_mantissa(s: &str) -> bool {
    s.split(['e', 'E'])
        .next()
        .map_or(false, |mantissa| mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)))
}
