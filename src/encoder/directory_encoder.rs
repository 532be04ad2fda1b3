use std::io::{Read, Seek, Write};

use log::{debug, trace};

use crate::{
    decoder::{
        ifd::{read_entry, ENTRY_LEN},
        stream::{stream_len, EndianReader},
        Limits,
    },
    encoder::TiffWriter,
    error::{DataConsistencyError, TiffBoundsError, TiffError, TiffResult, TiffUnsupportedError},
    ifd::{Entry, Value},
    image::Strip,
    tags::Tag,
    Directory,
};

/// Low level interface to encode ifd directories.
///
/// Directories are written in two passes. First every entry gets a fixed size placeholder record,
/// then each entry is finalized: its values go into the inline field when they fit in four bytes
/// and to the end of the stream otherwise, with the record pointing there.
pub struct DirectoryEncoder<'a, W: 'a + Read + Write + Seek> {
    pub writer: &'a mut TiffWriter<W>,
}

fn entry_count(entry: &Entry) -> TiffResult<u32> {
    Ok(u32::try_from(entry.count())?)
}

fn offset_u32(offset: u64) -> TiffResult<u32> {
    u32::try_from(offset).map_err(|_| TiffBoundsError::OffsetOverflow(offset).into())
}

impl<'a, W: 'a + Read + Write + Seek> DirectoryEncoder<'a, W> {
    pub fn new(writer: &'a mut TiffWriter<W>) -> Self {
        DirectoryEncoder { writer }
    }

    /// Write a 12 byte record with a zeroed value field at the current position.
    pub fn write_placeholder(&mut self, entry: &mut Entry) -> TiffResult<()> {
        let record_offset = self.writer.offset_u32()?;
        self.writer.write_u16(entry.tag().to_u16())?;
        self.writer.write_u16(entry.type_code())?;
        self.writer.write_u32(entry_count(entry)?)?;
        self.writer.write_bytes(&[0; 4])?;

        entry.set_record_offset(record_offset);
        entry.set_inline_field([0; 4]);
        trace!(
            "placeholder for {} at {}",
            entry.tag().to_u16(),
            record_offset
        );
        Ok(())
    }

    /// The values of `value` as they sit in a record, zero padded on the right.
    fn inline_bytes(&self, value: &Value) -> TiffResult<[u8; 4]> {
        let mut field = TiffWriter::new(Vec::with_capacity(4), self.writer.byte_order());
        value.encode(&mut field)?;
        let mut bytes = field.into_inner();
        bytes.resize(4, 0);

        let mut inline = [0u8; 4];
        inline.copy_from_slice(&bytes[..4]);
        Ok(inline)
    }

    /// Fill in the record of a placed entry.
    ///
    /// Leaves the writer at the end of the stream.
    pub fn finalize(&mut self, entry: &mut Entry) -> TiffResult<()> {
        let tag = entry.tag();
        let record = entry
            .record_offset()
            .ok_or(DataConsistencyError::NotPlaced(tag))?;
        let value = entry
            .value()
            .ok_or(TiffUnsupportedError::UndecodedEntry(tag))?;
        let count = entry_count(entry)?;

        self.writer.goto_offset(u64::from(record) + 2)?;
        self.writer.write_u16(value.field_type().to_u16())?;
        self.writer.write_u32(count)?;

        let inline = if value.byte_len() > 4 {
            let pointer = offset_u32(self.writer.goto_aligned_end()?)?;
            value.encode(self.writer)?;
            self.writer.goto_offset(u64::from(record) + 8)?;
            self.writer.write_u32(pointer)?;
            trace!("finalized {} out-of-line at {}", tag.to_u16(), pointer);

            let mut field = pointer.to_ne_bytes();
            self.writer.byte_order().fix_endianness(&mut field);
            field
        } else {
            let inline = self.inline_bytes(value)?;
            self.writer.write_bytes(&inline)?;
            trace!("finalized {} inline", tag.to_u16());
            inline
        };

        entry.set_inline_field(inline);
        self.writer.goto_end()?;
        Ok(())
    }

    /// Rewrite the values of an entry that was finalized before, in place.
    ///
    /// Out-of-line values reuse the block the record already points to. Fails if the type or the
    /// count on the stream differ from the entry's.
    pub fn update(&mut self, entry: &mut Entry) -> TiffResult<()> {
        let tag = entry.tag();
        let record = entry
            .record_offset()
            .ok_or(DataConsistencyError::NotPlaced(tag))?;
        let value = entry
            .value()
            .ok_or(TiffUnsupportedError::UndecodedEntry(tag))?;

        self.writer.goto_offset(u64::from(record))?;
        let placed = read_entry(self.writer)?;
        if placed.type_code() != entry.type_code() || placed.count() != entry.count() {
            return Err(DataConsistencyError::ShapeChanged(tag).into());
        }

        if value.byte_len() > 4 {
            let pointer = placed.value_pointer(self.writer.byte_order());
            self.writer.goto_offset(u64::from(pointer))?;
            value.encode(self.writer)?;
            trace!("updated {} out-of-line at {}", tag.to_u16(), pointer);
        } else {
            let inline = self.inline_bytes(value)?;
            self.writer.goto_offset(u64::from(record) + 8)?;
            self.writer.write_bytes(&inline)?;
            entry.set_inline_field(inline);
            trace!("updated {} inline", tag.to_u16());
        }

        self.writer.goto_end()?;
        Ok(())
    }

    /// Write a whole directory at the aligned end of the stream, with a next pointer of `0`.
    ///
    /// Returns the offset of the directory.
    pub fn write_directory(&mut self, dir: &mut Directory) -> TiffResult<u32> {
        let offset = offset_u32(self.writer.goto_aligned_end()?)?;
        self.writer.write_u16(u16::try_from(dir.len())?)?;
        for entry in dir.iter_mut() {
            self.write_placeholder(entry)?;
        }
        self.writer.write_u32(0)?;

        for entry in dir.iter_mut() {
            self.finalize(entry)?;
        }

        debug!("wrote directory at {} with {} entries", offset, dir.len());
        Ok(offset)
    }

    /// Point the directory at `dir_offset` to the directory at `next`.
    pub fn patch_next_pointer(&mut self, dir_offset: u32, next: u32) -> TiffResult<()> {
        self.writer.goto_offset(u64::from(dir_offset))?;
        let count = self.writer.read_u16()?;
        self.writer
            .goto_offset(u64::from(dir_offset) + 2 + u64::from(count) * ENTRY_LEN)?;
        self.writer.write_u32(next)?;
        self.writer.goto_end()?;
        Ok(())
    }

    /// Append strip data and point the strip tags of the directory at `dir_offset` to it.
    ///
    /// The strip tags are read back from the stream. Their counts must match the number of
    /// strips; their types stay as they are. Strips are laid out by ascending `strip_number`.
    /// `tags` receives the updated entries.
    pub fn write_strips(
        &mut self,
        dir_offset: u32,
        strips: &mut [Strip],
        tags: &mut Directory,
    ) -> TiffResult<()> {
        if strips.is_empty()
            && !tags.contains(Tag::StripOffsets)
            && !tags.contains(Tag::StripByteCounts)
        {
            return Ok(());
        }

        self.writer.goto_offset(u64::from(dir_offset))?;
        let count = self.writer.read_u16()?;
        let mut offsets = None;
        let mut byte_counts = None;
        for _ in 0..count {
            let entry = read_entry(self.writer)?;
            match entry.tag() {
                Tag::StripOffsets => offsets = Some(entry),
                Tag::StripByteCounts => byte_counts = Some(entry),
                _ => {}
            }
        }
        let mut offsets = offsets.ok_or(TiffError::MissingTag(Tag::StripOffsets))?;
        let mut byte_counts = byte_counts.ok_or(TiffError::MissingTag(Tag::StripByteCounts))?;

        let len = stream_len(self.writer)?;
        for entry in [&mut offsets, &mut byte_counts] {
            if entry.count() != strips.len() as u64 {
                return Err(DataConsistencyError::StripTagMismatch {
                    tag: entry.tag(),
                    declared: entry.count(),
                    strips: strips.len(),
                }
                .into());
            }
            entry.decode_in_place(self.writer, &Limits::unlimited(), len)?;
        }

        strips.sort_by_key(Strip::strip_number);
        for (index, strip) in strips.iter_mut().enumerate() {
            let offset = offset_u32(self.writer.goto_aligned_end()?)?;
            self.writer.write_bytes(strip.data())?;
            offsets.set_u32(index, offset)?;
            byte_counts.set_u32(index, u32::try_from(strip.data().len())?)?;
            strip.set_strip_offset(offset);
        }

        self.update(&mut offsets)?;
        self.update(&mut byte_counts)?;
        tags.insert(offsets);
        tags.insert(byte_counts);

        debug!(
            "wrote {} strips for directory at {}",
            strips.len(),
            dir_offset
        );
        Ok(())
    }
}
