use serde::Serialize;

use super::PayloadError;

/// One decoded EMV field. Nested templates (26, 62) keep their raw value;
/// callers parse again if they care about the inner fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TlvField {
    pub id: String,
    pub value: String,
}

/// Encodes one field as `id + zero-padded 2-digit length + value`.
///
/// `id` must already be two characters and `value` at most 99; both are the
/// caller's contract, enforced by the assembler's truncation steps.
pub fn field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

/// Walks a payload from the front, consuming `(id, length, value)` triples
/// until the input is exhausted. Any leftover or short read is an error, so
/// a successful parse proves the length bookkeeping is consistent.
pub fn parse(payload: &str) -> Result<Vec<TlvField>, PayloadError> {
    let mut fields = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        let header = payload
            .get(offset..offset + 4)
            .ok_or(PayloadError::TruncatedHeader { offset })?;
        let (id, len_digits) = header.split_at(2);

        if !len_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PayloadError::BadLength { offset: offset + 2 });
        }
        let len: usize = len_digits
            .parse()
            .map_err(|_| PayloadError::BadLength { offset: offset + 2 })?;

        let value = payload
            .get(offset + 4..offset + 4 + len)
            .ok_or_else(|| PayloadError::TruncatedValue {
                id: id.to_string(),
                expected: len,
            })?;

        fields.push(TlvField {
            id: id.to_string(),
            value: value.to_string(),
        });
        offset += 4 + len;
    }

    Ok(fields)
}
