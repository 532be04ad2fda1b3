//! Writing an image graph as a TIFF stream.

use std::io::{Read, Seek, Write};

use log::debug;

use crate::decoder::HEADER_LEN;
use crate::error::TiffResult;
use crate::ifd::{Entry, Value};
use crate::image::Image;
use crate::tags::{ByteOrder, Tag};
use crate::{Directory, TiffError};

mod directory_encoder;
mod writer;

pub use self::directory_encoder::DirectoryEncoder;
pub use self::writer::TiffWriter;

/// Encoder for TIFF files.
///
/// The header is written on construction, images are appended one at a time with
/// [`Self::write_image`] and chained in the order they were written.
pub struct TiffEncoder<W> {
    writer: TiffWriter<W>,
    last_ifd: Option<u32>,
}

/// Make sure `tags` has a pointer entry with room for `count` directory offsets, or none at all.
///
/// An existing entry of a pointer type and the right count is kept so that a reloaded file keeps
/// its type codes.
fn sync_pointer_entry(tags: &mut Directory, tag: Tag, count: usize) {
    if count == 0 {
        tags.remove(tag);
        return;
    }

    let fits = tags.get(tag).map_or(false, |entry| {
        entry.count() == count as u64
            && matches!(entry.value(), Some(Value::Long(_)) | Some(Value::Ifd(_)))
    });
    if !fits {
        tags.insert(Entry::new(tag, Value::Long(vec![0; count])));
    }
}

impl<W: Read + Write + Seek> TiffEncoder<W> {
    pub fn new(writer: W, byte_order: ByteOrder) -> TiffResult<TiffEncoder<W>> {
        let mut encoder = TiffEncoder {
            writer: TiffWriter::new(writer, byte_order),
            last_ifd: None,
        };

        encoder.writer.write_header()?;
        encoder.writer.write_u32(HEADER_LEN)?;

        Ok(encoder)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.writer.byte_order()
    }

    /// Create a `DirectoryEncoder` to encode an ifd directory.
    pub fn new_directory(&mut self) -> DirectoryEncoder<'_, W> {
        DirectoryEncoder::new(&mut self.writer)
    }

    /// Append an image to the top-level chain.
    ///
    /// The record offsets, strip offsets and pointer entries of `image` are updated to where they
    /// were written. Returns the offset of the image's directory.
    pub fn write_image(&mut self, image: &mut Image) -> TiffResult<u32> {
        let offset = self.write_image_tree(image)?;

        match self.last_ifd {
            Some(previous) => self.new_directory().patch_next_pointer(previous, offset)?,
            None => {
                self.writer.goto_offset(4)?;
                self.writer.write_u32(offset)?;
                self.writer.goto_end()?;
            }
        }
        self.last_ifd = Some(offset);

        debug!("appended image at {}", offset);
        Ok(offset)
    }

    fn write_image_tree(&mut self, image: &mut Image) -> TiffResult<u32> {
        let (tags, strips, sub_images, exif) = image.parts_mut();
        // A directory needs at least one entry, an empty Exif block is not written.
        let exif = exif.filter(|exif| !exif.is_empty());

        sync_pointer_entry(tags, Tag::SubIfd, sub_images.len());
        sync_pointer_entry(tags, Tag::ExifDirectory, usize::from(exif.is_some()));

        let offset = self.new_directory().write_directory(tags)?;
        self.new_directory().write_strips(offset, strips, tags)?;

        if !sub_images.is_empty() {
            let mut sub_offsets = Vec::with_capacity(sub_images.len());
            for sub_image in sub_images.iter_mut() {
                sub_offsets.push(self.write_image_tree(sub_image)?);
            }

            let entry = tags
                .get_mut(Tag::SubIfd)
                .ok_or(TiffError::MissingTag(Tag::SubIfd))?;
            for (index, sub_offset) in sub_offsets.into_iter().enumerate() {
                entry.set_u32(index, sub_offset)?;
            }
            self.new_directory().update(entry)?;
        }

        if let Some(exif) = exif {
            let exif_offset = self.new_directory().write_directory(exif)?;
            let entry = tags
                .get_mut(Tag::ExifDirectory)
                .ok_or(TiffError::MissingTag(Tag::ExifDirectory))?;
            entry.set_u32(0, exif_offset)?;
            self.new_directory().update(entry)?;
        }

        Ok(offset)
    }

    pub fn flush(&mut self) -> TiffResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
