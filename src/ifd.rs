//! Abstractions over TIFF tags

use std::fmt;
use std::io::Write;

use crate::decoder::stream::{EndianReader, SmartReader};
use crate::encoder::TiffWriter;
use crate::error::{DataConsistencyError, TiffError, TiffFormatError, TiffResult};
use crate::tags::{ByteOrder, Tag, Type};
use crate::value::{read_vec, write_slice, Rational, SRational};

/// The decoded values of one entry, one variant per field type.
///
/// The element count of the vector is the count written to the directory. ASCII values keep their
/// terminating nul, so a byte-exact round trip reproduces it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Ifd(Vec<u32>),
}

impl Value {
    /// Build a nul-terminated ASCII value from text.
    pub fn ascii(text: &str) -> Value {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Value::Ascii(bytes)
    }

    pub fn field_type(&self) -> Type {
        match self {
            Value::Byte(_) => Type::BYTE,
            Value::Ascii(_) => Type::ASCII,
            Value::Short(_) => Type::SHORT,
            Value::Long(_) => Type::LONG,
            Value::Rational(_) => Type::RATIONAL,
            Value::SByte(_) => Type::SBYTE,
            Value::Undefined(_) => Type::UNDEFINED,
            Value::SShort(_) => Type::SSHORT,
            Value::SLong(_) => Type::SLONG,
            Value::SRational(_) => Type::SRATIONAL,
            Value::Float(_) => Type::FLOAT,
            Value::Double(_) => Type::DOUBLE,
            Value::Ifd(_) => Type::IFD,
        }
    }

    /// Number of atomic values.
    pub fn count(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Ascii(v) | Value::Undefined(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) | Value::Ifd(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SByte(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
        }
    }

    /// Size of the encoded values in bytes.
    pub fn byte_len(&self) -> u64 {
        self.count() as u64 * u64::from(self.field_type().byte_len())
    }

    /// Decode `count` values of type `ty` from the current position of `reader`.
    pub fn decode<R: EndianReader + ?Sized>(
        ty: Type,
        count: u32,
        reader: &mut R,
    ) -> TiffResult<Value> {
        let count = usize::try_from(count)?;
        Ok(match ty {
            Type::BYTE => Value::Byte(read_vec(reader, count)?),
            Type::ASCII => Value::Ascii(read_vec(reader, count)?),
            Type::SHORT => Value::Short(read_vec(reader, count)?),
            Type::LONG => Value::Long(read_vec(reader, count)?),
            Type::RATIONAL => Value::Rational(read_vec(reader, count)?),
            Type::SBYTE => Value::SByte(read_vec(reader, count)?),
            Type::UNDEFINED => Value::Undefined(read_vec(reader, count)?),
            Type::SSHORT => Value::SShort(read_vec(reader, count)?),
            Type::SLONG => Value::SLong(read_vec(reader, count)?),
            Type::SRATIONAL => Value::SRational(read_vec(reader, count)?),
            Type::FLOAT => Value::Float(read_vec(reader, count)?),
            Type::DOUBLE => Value::Double(read_vec(reader, count)?),
            Type::IFD => Value::Ifd(read_vec(reader, count)?),
        })
    }

    /// Encode all values at the current position of `writer`.
    pub fn encode<W: Write>(&self, writer: &mut TiffWriter<W>) -> TiffResult<()> {
        match self {
            Value::Byte(v) | Value::Ascii(v) | Value::Undefined(v) => writer.write_bytes(v)?,
            Value::Short(v) => write_slice(writer, v)?,
            Value::Long(v) | Value::Ifd(v) => write_slice(writer, v)?,
            Value::Rational(v) => write_slice(writer, v)?,
            Value::SByte(v) => write_slice(writer, v)?,
            Value::SShort(v) => write_slice(writer, v)?,
            Value::SLong(v) => write_slice(writer, v)?,
            Value::SRational(v) => write_slice(writer, v)?,
            Value::Float(v) => write_slice(writer, v)?,
            Value::Double(v) => write_slice(writer, v)?,
        }
        Ok(())
    }

    /// Item `index` widened to `u32`, for the 16 and 32 bit offset types.
    pub fn get_u32(&self, index: usize) -> Option<u32> {
        match self {
            Value::Short(v) => v.get(index).map(|&x| u32::from(x)),
            Value::Long(v) | Value::Ifd(v) => v.get(index).copied(),
            _ => None,
        }
    }

    /// All items widened to `u32`, or `None` unless the value is Short, Long or IFD.
    pub fn to_u32_vec(&self) -> Option<Vec<u32>> {
        match self {
            Value::Short(v) => Some(v.iter().map(|&x| u32::from(x)).collect()),
            Value::Long(v) | Value::Ifd(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// The text of an ASCII value, up to its terminating nul.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Ascii(bytes) => Some(ascii_text(bytes)),
            _ => None,
        }
    }
}

fn ascii_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

const HEX_DISPLAY_LEN: usize = 20;

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    if hex.len() > HEX_DISPLAY_LEN {
        write!(f, "{}...", &hex[..HEX_DISPLAY_LEN])
    } else {
        f.write_str(&hex)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Ascii(bytes) => f.write_str(&ascii_text(bytes)),
            Value::Byte(bytes) | Value::Undefined(bytes) => write_hex(f, bytes),
            Value::Short(v) => write_joined(f, v),
            Value::Long(v) | Value::Ifd(v) => write_joined(f, v),
            Value::Rational(v) => write_joined(f, v),
            Value::SByte(v) => write_joined(f, v),
            Value::SShort(v) => write_joined(f, v),
            Value::SLong(v) => write_joined(f, v),
            Value::SRational(v) => write_joined(f, v),
            Value::Float(v) => write_joined(f, v),
            Value::Double(v) => write_joined(f, v),
        }
    }
}

/// Whether an entry's values have been materialized.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    /// Only the directory record is known; the type code may be one the codec can not decode.
    Raw { type_code: u16, count: u32 },
    Decoded(Value),
}

/// One directory entry.
///
/// An entry read from a stream remembers where its 12 byte record sits and the 4 bytes of its
/// inline field, also after its values were decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    tag: Tag,
    record_offset: Option<u32>,
    inline_field: [u8; 4],
    state: EntryState,
}

impl Entry {
    pub fn new(tag: Tag, value: Value) -> Entry {
        Entry {
            tag,
            record_offset: None,
            inline_field: [0; 4],
            state: EntryState::Decoded(value),
        }
    }

    pub(crate) fn raw(
        tag: Tag,
        type_code: u16,
        count: u32,
        inline_field: [u8; 4],
        record_offset: u32,
    ) -> Entry {
        Entry {
            tag,
            record_offset: Some(record_offset),
            inline_field,
            state: EntryState::Raw { type_code, count },
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The numeric type code as found in the directory record.
    pub fn type_code(&self) -> u16 {
        match &self.state {
            EntryState::Raw { type_code, .. } => *type_code,
            EntryState::Decoded(value) => value.field_type().to_u16(),
        }
    }

    /// The field type, if the type code is one of the known ones.
    pub fn field_type(&self) -> Option<Type> {
        Type::from_u16(self.type_code())
    }

    pub fn count(&self) -> u64 {
        match &self.state {
            EntryState::Raw { count, .. } => u64::from(*count),
            EntryState::Decoded(value) => value.count() as u64,
        }
    }

    /// Byte position of the directory record this entry was last read from or written to.
    pub fn record_offset(&self) -> Option<u32> {
        self.record_offset
    }

    /// The 4 bytes of the record's value field, in stream byte order.
    pub fn inline_field(&self) -> [u8; 4] {
        self.inline_field
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self.state, EntryState::Decoded(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.state {
            EntryState::Decoded(value) => Some(value),
            EntryState::Raw { .. } => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut Value> {
        match &mut self.state {
            EntryState::Decoded(value) => Some(value),
            EntryState::Raw { .. } => None,
        }
    }

    /// Replace the values. A later save writes the new type and count.
    pub fn set_value(&mut self, value: Value) {
        self.state = EntryState::Decoded(value);
    }

    pub(crate) fn set_record_offset(&mut self, offset: u32) {
        self.record_offset = Some(offset);
    }

    pub(crate) fn set_inline_field(&mut self, field: [u8; 4]) {
        self.inline_field = field;
    }

    /// Overwrite item `index` of an unsigned integer value, keeping its type.
    pub(crate) fn set_u32(&mut self, index: usize, new: u32) -> TiffResult<()> {
        let tag = self.tag;
        let slot_missing = || TiffError::from(DataConsistencyError::ShapeChanged(tag));
        match &mut self.state {
            EntryState::Decoded(Value::Short(v)) => {
                *v.get_mut(index).ok_or_else(slot_missing)? = u16::try_from(new)?;
            }
            EntryState::Decoded(Value::Long(v)) | EntryState::Decoded(Value::Ifd(v)) => {
                *v.get_mut(index).ok_or_else(slot_missing)? = new;
            }
            _ => return Err(TiffFormatError::InvalidTagValueType(tag).into()),
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.tag.to_u16())?;
        match self.field_type() {
            Some(ty) => write!(f, "{}", ty.name())?,
            None => write!(f, "{}", self.type_code())?,
        }
        write!(f, ":{}:", self.count())?;
        match &self.state {
            EntryState::Decoded(value) => write!(f, "{value}"),
            EntryState::Raw { .. } => write_hex(f, &self.inline_field),
        }
    }
}

/// Decode a value held in the 4 byte inline field of a record.
pub(crate) fn decode_inline(
    ty: Type,
    count: u32,
    field: [u8; 4],
    byte_order: ByteOrder,
) -> TiffResult<Value> {
    let mut reader = SmartReader::wrap(&field[..], byte_order);
    Value::decode(ty, count, &mut reader)
}
