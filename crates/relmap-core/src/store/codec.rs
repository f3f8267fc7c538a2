//! Field codec for encoding/decoding row data.
//!
//! Layout: a little-endian u32 field count, then per field a u16
//! length-prefixed UTF-8 name, a one-byte type tag, and the tag-specific
//! payload.

use crate::error::Error;
use crate::store::RecordId;
use crate::value::Value;

/// Type tag for encoded values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueTag {
    Null = 0,
    Bool = 1,
    Int32 = 2,
    Int64 = 3,
    Float64 = 4,
    String = 5,
    Date = 6,
    Timestamp = 7,
    Id = 8,
}

impl TryFrom<u8> for ValueTag {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ValueTag::Null),
            1 => Ok(ValueTag::Bool),
            2 => Ok(ValueTag::Int32),
            3 => Ok(ValueTag::Int64),
            4 => Ok(ValueTag::Float64),
            5 => Ok(ValueTag::String),
            6 => Ok(ValueTag::Date),
            7 => Ok(ValueTag::Timestamp),
            8 => Ok(ValueTag::Id),
            _ => Err(Error::InvalidData(format!("unknown value tag: {}", value))),
        }
    }
}

/// Encode a list of field name/value pairs to bytes.
pub fn encode_fields(fields: &[(String, Value)]) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();

    let count = fields.len() as u32;
    buf.extend_from_slice(&count.to_le_bytes());

    for (name, value) in fields {
        let name_bytes = name.as_bytes();
        if name_bytes.len() > u16::MAX as usize {
            return Err(Error::InvalidData("field name too long".into()));
        }
        buf.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(name_bytes);

        encode_value(&mut buf, value)?;
    }

    Ok(buf)
}

/// Decode bytes back to field name/value pairs.
pub fn decode_fields(data: &[u8]) -> Result<Vec<(String, Value)>, Error> {
    let mut cursor = 0;
    let count = read_count(data, &mut cursor)?;

    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_name(data, &mut cursor)?.to_string();
        let (value, consumed) = decode_value(&data[cursor..])?;
        cursor += consumed;
        fields.push((name, value));
    }

    Ok(fields)
}

/// Get a single field value by name, skipping non-matching values without
/// decoding them.
pub fn get_field(data: &[u8], field_name: &str) -> Result<Option<Value>, Error> {
    let mut cursor = 0;
    let count = read_count(data, &mut cursor)?;

    for _ in 0..count {
        let name = read_name(data, &mut cursor)?;
        if name == field_name {
            let (value, _) = decode_value(&data[cursor..])?;
            return Ok(Some(value));
        }
        cursor += skip_value(&data[cursor..])?;
    }

    Ok(None)
}

fn read_count(data: &[u8], cursor: &mut usize) -> Result<usize, Error> {
    if data.len() < *cursor + 4 {
        return Err(Error::InvalidData("data too short for field count".into()));
    }
    let count = u32::from_le_bytes(data[*cursor..*cursor + 4].try_into().unwrap()) as usize;
    *cursor += 4;
    Ok(count)
}

fn read_name<'a>(data: &'a [u8], cursor: &mut usize) -> Result<&'a str, Error> {
    if data.len() < *cursor + 2 {
        return Err(Error::InvalidData("data too short for field name length".into()));
    }
    let len = u16::from_le_bytes(data[*cursor..*cursor + 2].try_into().unwrap()) as usize;
    *cursor += 2;

    if data.len() < *cursor + len {
        return Err(Error::InvalidData("data too short for field name".into()));
    }
    let name = std::str::from_utf8(&data[*cursor..*cursor + len])
        .map_err(|_| Error::InvalidData("invalid UTF-8 in field name".into()))?;
    *cursor += len;
    Ok(name)
}

/// Number of bytes a value occupies (tag included), without decoding it.
fn skip_value(data: &[u8]) -> Result<usize, Error> {
    if data.is_empty() {
        return Err(Error::InvalidData("empty data for value".into()));
    }

    let tag = ValueTag::try_from(data[0])?;
    let size = match tag {
        ValueTag::Null => 1,
        ValueTag::Bool => 2,
        ValueTag::Int32 | ValueTag::Date => 5,
        ValueTag::Int64 | ValueTag::Float64 | ValueTag::Timestamp => 9,
        ValueTag::Id => 17,
        ValueTag::String => {
            if data.len() < 5 {
                return Err(Error::InvalidData("data too short for string length".into()));
            }
            let len = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
            5 + len
        }
    };

    if data.len() < size {
        return Err(Error::InvalidData("data too short for value".into()));
    }
    Ok(size)
}

fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), Error> {
    match value {
        Value::Null => {
            buf.push(ValueTag::Null as u8);
        }
        Value::Bool(b) => {
            buf.push(ValueTag::Bool as u8);
            buf.push(if *b { 1 } else { 0 });
        }
        Value::Int32(n) => {
            buf.push(ValueTag::Int32 as u8);
            buf.extend_from_slice(&n.to_le_bytes());
        }
        Value::Int64(n) => {
            buf.push(ValueTag::Int64 as u8);
            buf.extend_from_slice(&n.to_le_bytes());
        }
        Value::Float64(f) => {
            buf.push(ValueTag::Float64 as u8);
            buf.extend_from_slice(&f.to_le_bytes());
        }
        Value::String(s) => {
            buf.push(ValueTag::String as u8);
            let bytes = s.as_bytes();
            if bytes.len() > u32::MAX as usize {
                return Err(Error::InvalidData("string too long".into()));
            }
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(bytes);
        }
        Value::Date(d) => {
            buf.push(ValueTag::Date as u8);
            buf.extend_from_slice(&d.to_le_bytes());
        }
        Value::Timestamp(ts) => {
            buf.push(ValueTag::Timestamp as u8);
            buf.extend_from_slice(&ts.to_le_bytes());
        }
        Value::Id(id) => {
            buf.push(ValueTag::Id as u8);
            buf.extend_from_slice(id.as_bytes());
        }
    }
    Ok(())
}

/// Decode a single value. Returns the value and the bytes consumed.
fn decode_value(data: &[u8]) -> Result<(Value, usize), Error> {
    if data.is_empty() {
        return Err(Error::InvalidData("empty data for value".into()));
    }

    let tag = ValueTag::try_from(data[0])?;
    let mut cursor = 1;

    let value = match tag {
        ValueTag::Null => Value::Null,
        ValueTag::Bool => {
            if cursor >= data.len() {
                return Err(Error::InvalidData("data too short for bool".into()));
            }
            let v = data[cursor] != 0;
            cursor += 1;
            Value::Bool(v)
        }
        ValueTag::Int32 => {
            if data.len() < cursor + 4 {
                return Err(Error::InvalidData("data too short for i32".into()));
            }
            let v = i32::from_le_bytes(data[cursor..cursor + 4].try_into().unwrap());
            cursor += 4;
            Value::Int32(v)
        }
        ValueTag::Int64 => {
            if data.len() < cursor + 8 {
                return Err(Error::InvalidData("data too short for i64".into()));
            }
            let v = i64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap());
            cursor += 8;
            Value::Int64(v)
        }
        ValueTag::Float64 => {
            if data.len() < cursor + 8 {
                return Err(Error::InvalidData("data too short for f64".into()));
            }
            let v = f64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap());
            cursor += 8;
            Value::Float64(v)
        }
        ValueTag::String => {
            if data.len() < cursor + 4 {
                return Err(Error::InvalidData("data too short for string length".into()));
            }
            let len = u32::from_le_bytes(data[cursor..cursor + 4].try_into().unwrap()) as usize;
            cursor += 4;
            if data.len() < cursor + len {
                return Err(Error::InvalidData("data too short for string".into()));
            }
            let v = String::from_utf8(data[cursor..cursor + len].to_vec())
                .map_err(|_| Error::InvalidData("invalid UTF-8 in string".into()))?;
            cursor += len;
            Value::String(v)
        }
        ValueTag::Date => {
            if data.len() < cursor + 4 {
                return Err(Error::InvalidData("data too short for date".into()));
            }
            let v = i32::from_le_bytes(data[cursor..cursor + 4].try_into().unwrap());
            cursor += 4;
            Value::Date(v)
        }
        ValueTag::Timestamp => {
            if data.len() < cursor + 8 {
                return Err(Error::InvalidData("data too short for timestamp".into()));
            }
            let v = i64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap());
            cursor += 8;
            Value::Timestamp(v)
        }
        ValueTag::Id => {
            if data.len() < cursor + 16 {
                return Err(Error::InvalidData("data too short for id".into()));
            }
            let id = RecordId::from_slice(&data[cursor..cursor + 16])
                .ok_or_else(|| Error::InvalidData("bad id length".into()))?;
            cursor += 16;
            Value::Id(id)
        }
    };

    Ok((value, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_basic_types() {
        let fields = vec![
            ("name".to_string(), Value::String("Alice".to_string())),
            ("year_of_birth".to_string(), Value::Int32(1990)),
            ("active".to_string(), Value::Bool(true)),
            ("score".to_string(), Value::Float64(95.5)),
            ("joined".to_string(), Value::Date(19000)),
            ("seen".to_string(), Value::Timestamp(1_700_000_000_000_000)),
        ];

        let encoded = encode_fields(&fields).unwrap();
        let decoded = decode_fields(&encoded).unwrap();

        assert_eq!(fields, decoded);
    }

    #[test]
    fn test_encode_decode_null() {
        let fields = vec![("parent_id".to_string(), Value::Null)];

        let encoded = encode_fields(&fields).unwrap();
        let decoded = decode_fields(&encoded).unwrap();

        assert_eq!(fields, decoded);
    }

    #[test]
    fn test_encode_decode_id() {
        let id = RecordId::generate();
        let fields = vec![("category_id".to_string(), Value::Id(id))];

        let encoded = encode_fields(&fields).unwrap();
        let decoded = decode_fields(&encoded).unwrap();

        assert_eq!(fields, decoded);
    }

    #[test]
    fn test_get_field_skips_others() {
        let fields = vec![
            ("title".to_string(), Value::String("War and Peace".to_string())),
            ("authors".to_string(), Value::String("Tolstoy".to_string())),
            ("year".to_string(), Value::Int32(1869)),
        ];

        let encoded = encode_fields(&fields).unwrap();

        assert_eq!(
            get_field(&encoded, "year").unwrap(),
            Some(Value::Int32(1869))
        );
        assert_eq!(get_field(&encoded, "missing").unwrap(), None);
    }

    #[test]
    fn test_empty_fields() {
        let fields: Vec<(String, Value)> = vec![];

        let encoded = encode_fields(&fields).unwrap();
        let decoded = decode_fields(&encoded).unwrap();

        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_data_errors() {
        let fields = vec![("name".to_string(), Value::String("Alice".to_string()))];
        let encoded = encode_fields(&fields).unwrap();

        assert!(decode_fields(&encoded[..encoded.len() - 2]).is_err());
        assert!(decode_fields(&[1, 0]).is_err());
    }
}
