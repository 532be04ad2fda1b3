//! Reading a TIFF stream into directories, strips and images.

use std::io::{Read, Seek};

use log::debug;

use crate::error::{DataConsistencyError, TiffBoundsError, TiffFormatError, TiffResult};
use crate::ifd::Entry;
use crate::image::{Image, Strip};
use crate::tags::{IfdPointer, Tag};
use crate::{Directory, TiffError};

use self::cycles::IfdCycles;
use self::ifd::{read_entry, ENTRY_LEN};
use self::stream::{stream_len, EndianReader, SmartReader};
use self::tag_reader::TagReader;

pub use self::stream::ByteOrder;

pub(crate) mod cycles;
pub(crate) mod ifd;
pub mod stream;
mod tag_reader;

/// Size of the file header: signature, version and first directory offset.
pub const HEADER_LEN: u32 = 8;

/// Decoding limits
#[derive(Clone, Debug)]
pub struct Limits {
    /// The maximum size of any ifd value in bytes, the default is
    /// 16MiB.
    pub ifd_value_size: usize,
    /// The maximum size of a single strip in bytes, the default is
    /// 256MiB.
    pub strip_size: usize,
    /// How deep sub-images may nest below a top-level image, the default is 32.
    pub max_ifd_depth: usize,
    /// How many directories one load may read in total, the default is 65536.
    ///
    /// Sub-image pointers may share targets, so this also bounds the work of a graph that fans out
    /// without containing a cycle.
    pub max_directories: usize,
    /// The purpose of this is to prevent all the fields of the struct from
    /// being public, as this would make adding new fields a major version
    /// bump.
    _non_exhaustive: (),
}

impl Limits {
    /// A configuration that does not impose any limits.
    ///
    /// This is a good start if the caller only wants to impose selective limits, contrary to the
    /// default limits which allows selectively disabling limits.
    ///
    /// Note that this configuration is likely to crash on excessively large images since,
    /// naturally, the machine running the program does not have infinite memory.
    pub fn unlimited() -> Limits {
        Limits {
            ifd_value_size: usize::MAX,
            strip_size: usize::MAX,
            max_ifd_depth: usize::MAX,
            max_directories: usize::MAX,
            _non_exhaustive: (),
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            ifd_value_size: 16 * 1024 * 1024,
            strip_size: 256 * 1024 * 1024,
            max_ifd_depth: 32,
            max_directories: 65536,
            _non_exhaustive: (),
        }
    }
}

/// The representation of a TIFF decoder
///
/// The header is parsed on construction; directories are read on demand from any offset.
#[derive(Debug)]
pub struct Decoder<R>
where
    R: Read + Seek,
{
    reader: SmartReader<R>,
    limits: Limits,
    stream_len: u64,
    first_ifd: u32,
    directories_read: usize,
}

impl<R: Read + Seek> Decoder<R> {
    /// Create a new decoder that decodes from the stream ```r```
    pub fn new(r: R) -> TiffResult<Decoder<R>> {
        let mut reader = SmartReader::wrap(r, ByteOrder::LittleEndian);
        let stream_len = stream_len(&mut reader)?;
        let mut decoder = Decoder {
            reader,
            limits: Limits::default(),
            stream_len,
            first_ifd: 0,
            directories_read: 0,
        };
        decoder.read_header()?;
        Ok(decoder)
    }

    pub fn with_limits(mut self, limits: Limits) -> Decoder<R> {
        self.limits = limits;
        self
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order
    }

    /// Offset of the first directory of the top-level chain.
    pub fn first_ifd(&self) -> u32 {
        self.first_ifd
    }

    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_header(&mut self) -> TiffResult<()> {
        self.reader.goto_offset(0)?;
        let mut magic = [0u8; 2];
        self.reader.read_exact(&mut magic)?;
        self.reader.byte_order = ByteOrder::from_magic(magic)
            .ok_or(TiffFormatError::TiffSignatureInvalid(magic))?;

        match self.reader.read_u16()? {
            42 => {}
            version => return Err(TiffFormatError::TiffVersionInvalid(version).into()),
        }

        let offset = self.reader.read_u32()?;
        if offset < HEADER_LEN || u64::from(offset) >= self.stream_len {
            return Err(TiffBoundsError::FirstIfdOutOfRange {
                offset,
                stream_len: self.stream_len,
            }
            .into());
        }
        self.first_ifd = offset;

        debug!(
            "header {:?}, first directory at {}",
            self.reader.byte_order, offset
        );
        Ok(())
    }

    fn check_range(&self, offset: u64, len: u64) -> TiffResult<()> {
        if offset + len > self.stream_len {
            return Err(TiffBoundsError::ReadPastEnd {
                offset,
                len,
                stream_len: self.stream_len,
            }
            .into());
        }
        Ok(())
    }

    /// Read the records of the directory at `offset` without decoding their values.
    ///
    /// Returns the entries in file order and the offset of the next directory, `0` at the end of
    /// the chain. Entries with a type code outside the known range are kept as they are.
    pub fn read_directory(&mut self, offset: u32) -> TiffResult<(Vec<Entry>, u32)> {
        if self.directories_read >= self.limits.max_directories {
            return Err(TiffError::LimitsExceeded);
        }
        self.directories_read += 1;

        let start = u64::from(offset);
        self.check_range(start, 2)?;
        self.reader.goto_offset(start)?;
        let count = self.reader.read_u16()?;
        self.check_range(start + 2, u64::from(count) * ENTRY_LEN + 4)?;

        let mut entries = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            entries.push(read_entry(&mut self.reader)?);
        }
        let next = self.reader.read_u32()?;

        debug!(
            "directory at {} with {} entries, next at {}",
            offset, count, next
        );
        Ok((entries, next))
    }

    /// Read the directory at `offset` and decode the values of all its entries.
    pub fn decode_directory(&mut self, offset: u32) -> TiffResult<(Directory, u32)> {
        let (entries, next) = self.read_directory(offset)?;
        let mut dir = Directory::empty();
        for mut entry in entries {
            if dir.contains(entry.tag()) {
                return Err(TiffFormatError::DuplicateTag(entry.tag()).into());
            }
            entry.decode_in_place(&mut self.reader, &self.limits, self.stream_len)?;
            dir.insert(entry);
        }
        Ok((dir, next))
    }

    /// Decode one entry of a directory previously returned by [`Self::read_directory`].
    pub fn decode_entry(&mut self, entry: &mut Entry) -> TiffResult<()> {
        entry.decode_in_place(&mut self.reader, &self.limits, self.stream_len)
    }

    /// Read the strips of the directory at `offset`.
    pub fn read_strips(&mut self, offset: u32) -> TiffResult<Vec<Strip>> {
        let (dir, _) = self.decode_directory(offset)?;
        self.strips_of(&dir)
    }

    fn strips_of(&mut self, dir: &Directory) -> TiffResult<Vec<Strip>> {
        let tags = TagReader { ifd: dir };
        let offsets = tags.require_tag_u32_vec(Tag::StripOffsets)?;
        let byte_counts = tags.require_tag_u32_vec(Tag::StripByteCounts)?;

        if offsets.len() != byte_counts.len() {
            return Err(DataConsistencyError::StripCountMismatch {
                offsets: offsets.len(),
                byte_counts: byte_counts.len(),
            }
            .into());
        }

        let mut strips = Vec::with_capacity(offsets.len());
        for (number, (&offset, &len)) in offsets.iter().zip(&byte_counts).enumerate() {
            if len as usize > self.limits.strip_size {
                return Err(TiffError::LimitsExceeded);
            }
            self.check_range(u64::from(offset), u64::from(len))?;
            self.reader.goto_offset(u64::from(offset))?;
            let data = self.reader.read_bytes(usize::try_from(len)?)?;
            strips.push(Strip::read_at(u32::try_from(number)?, offset, data));
        }
        Ok(strips)
    }

    /// Read the image whose directory is at `offset`, with its strips, sub-images and Exif data.
    ///
    /// Returns the image and the offset of the next directory of the chain.
    pub fn read_image(&mut self, offset: u32) -> TiffResult<(Image, u32)> {
        let mut cycles = IfdCycles::new();
        self.read_image_guarded(IfdPointer(offset), &mut cycles)
    }

    fn read_image_guarded(
        &mut self,
        ifd: IfdPointer,
        cycles: &mut IfdCycles,
    ) -> TiffResult<(Image, u32)> {
        cycles.enter(ifd, self.limits.max_ifd_depth)?;

        let (tags, next) = self.decode_directory(ifd.0)?;
        let strips = self.strips_of(&tags)?;

        let reader = TagReader { ifd: &tags };
        let sub_ifds = reader.find_tag_u32_vec(Tag::SubIfd)?;
        let exif_ifd = reader.find_tag_u32_vec(Tag::ExifDirectory)?;

        let mut sub_images = Vec::new();
        for sub_ifd in sub_ifds.unwrap_or_default() {
            let (sub_image, _) = self.read_image_guarded(IfdPointer(sub_ifd), cycles)?;
            sub_images.push(sub_image);
        }

        let exif = match exif_ifd.as_deref() {
            None => None,
            Some([exif_ifd]) => Some(self.decode_directory(*exif_ifd)?.0),
            Some(_) => {
                return Err(TiffFormatError::InvalidTagValueType(Tag::ExifDirectory).into())
            }
        };

        cycles.leave();

        debug!(
            "image at {}: {} tags, {} strips, {} sub-images, exif {}",
            ifd.0,
            tags.len(),
            strips.len(),
            sub_images.len(),
            exif.is_some()
        );
        Ok((Image::from_parts(tags, strips, sub_images, exif), next))
    }
}
