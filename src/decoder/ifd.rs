//! Function for reading TIFF tags

use std::io::{Seek, SeekFrom};

use log::trace;

use super::stream::{EndianReader, SmartReader};
use super::Limits;
use crate::error::{DataConsistencyError, TiffFormatError, TiffResult};
use crate::ifd::{decode_inline, Entry, EntryState, Value};
use crate::tags::{Tag, Type};
use crate::TiffError;

/// Size of one directory record: id, type, count and the inline field.
pub(crate) const ENTRY_LEN: u64 = 12;

/// Reads the 12 byte record at the current position without looking at its value.
pub(crate) fn read_entry<R: EndianReader + Seek + ?Sized>(reader: &mut R) -> TiffResult<Entry> {
    let record_offset = u32::try_from(reader.stream_position()?)?;
    let tag = Tag::from_u16_exhaustive(reader.read_u16()?);
    let type_code = reader.read_u16()?;
    let count = reader.read_u32()?;
    let mut inline_field = [0u8; 4];
    reader.read_exact(&mut inline_field)?;

    trace!(
        "entry {} type {} count {} at {}",
        tag.to_u16(),
        type_code,
        count,
        record_offset
    );
    Ok(Entry::raw(tag, type_code, count, inline_field, record_offset))
}

impl Entry {
    /// The inline field read as an offset into the stream.
    pub(crate) fn value_pointer(&self, byte_order: super::ByteOrder) -> u32 {
        let mut field = self.inline_field();
        byte_order.fix_endianness(&mut field);
        u32::from_ne_bytes(field)
    }

    /// Materialize the values of a raw entry.
    ///
    /// Values longer than four bytes are fetched from where the inline field points. The position
    /// of `reader` is the same before and after the call. Entries already decoded are left as is.
    pub(crate) fn decode_in_place<R: EndianReader + Seek + ?Sized>(
        &mut self,
        reader: &mut R,
        limits: &Limits,
        stream_len: u64,
    ) -> TiffResult<()> {
        let (type_code, count) = match self.state() {
            EntryState::Raw { type_code, count } => (*type_code, *count),
            EntryState::Decoded(_) => return Ok(()),
        };

        let tag = self.tag();
        let ty = Type::from_u16(type_code)
            .ok_or(TiffFormatError::UnknownFieldType { tag, type_code })?;
        let byte_order = reader.byte_order();

        let len = ty.value_bytes(count);
        let value = if len <= 4 {
            decode_inline(ty, count, self.inline_field(), byte_order)?
        } else {
            if len > limits.ifd_value_size as u64 {
                return Err(TiffError::LimitsExceeded);
            }

            let offset = u64::from(self.value_pointer(byte_order));
            if offset + len > stream_len {
                return Err(DataConsistencyError::ValueOutOfBounds {
                    tag,
                    offset,
                    len,
                    stream_len,
                }
                .into());
            }

            let resume = reader.stream_position()?;
            reader.seek(SeekFrom::Start(offset))?;
            let buf = reader.read_bytes(usize::try_from(len)?);
            reader.seek(SeekFrom::Start(resume))?;

            let buf = buf?;
            let mut cursor = SmartReader::wrap(&buf[..], byte_order);
            Value::decode(ty, count, &mut cursor)?
        };

        self.set_value(value);
        Ok(())
    }
}
