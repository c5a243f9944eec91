use crate::value::Value;
use thiserror::Error as ThisError;

const TERMINATOR: [u8; 2] = [0, 0];
const ESCAPED_ZERO: [u8; 2] = [0, 0xFF];

///
/// OrderedValueEncodeError
///
/// Canonical key-encoding failures for one `Value` component.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum OrderedValueEncodeError {
    #[error("null values are not orderable key components")]
    NullNotOrderable,
}

/// Append one key component so lexicographic byte order matches `Value` order.
///
/// Every encoding is prefix-free, so consecutive components (and HKey
/// segments) compare component by component.
pub(crate) fn encode_ordered_value(
    out: &mut Vec<u8>,
    value: &Value,
) -> Result<(), OrderedValueEncodeError> {
    out.push(value.tag().to_u8());

    match value {
        Value::Null => return Err(OrderedValueEncodeError::NullNotOrderable),
        Value::Bool(v) => out.push(u8::from(*v)),
        Value::Int(v) => out.extend_from_slice(&ordered_i64_bytes(*v)),
        Value::Uint(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Text(v) => push_terminated_bytes(out, v.as_bytes()),
        Value::Blob(v) => push_terminated_bytes(out, v),
    }

    Ok(())
}

// Zero bytes are escaped so the two-byte terminator sorts below any content.
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == 0 {
            out.extend_from_slice(&ESCAPED_ZERO);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&TERMINATOR);
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}
