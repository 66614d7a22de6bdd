use itertools::Itertools;

use crate::error::FtypeError;
use crate::ftype::CmpOp;

/// Parse `aa:bb:cc` (`:`, `-` or `.` between bytes) or a lone `aa`.
pub(crate) fn from_text(s: &str) -> Result<Vec<u8>, FtypeError> {
    s.split([':', '-', '.'])
        .map(|pair| {
            if pair.len() == 2 && pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                u8::from_str_radix(pair, 16).ok()
            } else {
                None
            }
        })
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| FtypeError::InvalidBytes(s.to_owned()))
}

pub(crate) fn to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join(":")
}

/// Shorter byte strings order first; equal lengths compare bytewise.
pub(crate) fn relate(op: CmpOp, a: &[u8], b: &[u8]) -> bool {
    op.relate(&(a.len(), a), &(b.len(), b))
}
