//! The in-memory image graph.

use crate::Directory;

/// An opaque block of pixel-sample bytes.
///
/// Strips are never decompressed. `strip_number` fixes their order within the image, which need
/// not match the order of their data in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strip {
    data: Vec<u8>,
    strip_number: u32,
    strip_offset: Option<u32>,
}

impl Strip {
    pub fn new(strip_number: u32, data: Vec<u8>) -> Strip {
        Strip {
            data,
            strip_number,
            strip_offset: None,
        }
    }

    pub(crate) fn read_at(strip_number: u32, strip_offset: u32, data: Vec<u8>) -> Strip {
        Strip {
            data,
            strip_number,
            strip_offset: Some(strip_offset),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn strip_number(&self) -> u32 {
        self.strip_number
    }

    /// Where the data was last read from or written to.
    pub fn strip_offset(&self) -> Option<u32> {
        self.strip_offset
    }

    pub(crate) fn set_strip_offset(&mut self, offset: u32) {
        self.strip_offset = Some(offset);
    }
}

/// One image, that is one directory of the file together with what it points to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    tags: Directory,
    strips: Vec<Strip>,
    sub_images: Vec<Image>,
    exif: Option<Directory>,
}

impl Image {
    /// An image without tags or strips, to be filled by the caller.
    pub fn new() -> Image {
        Image::default()
    }

    pub fn with_tags(tags: Directory) -> Image {
        Image {
            tags,
            ..Image::default()
        }
    }

    pub(crate) fn from_parts(
        tags: Directory,
        strips: Vec<Strip>,
        sub_images: Vec<Image>,
        exif: Option<Directory>,
    ) -> Image {
        Image {
            tags,
            strips,
            sub_images,
            exif,
        }
    }

    pub fn tags(&self) -> &Directory {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut Directory {
        &mut self.tags
    }

    /// Strips in ascending `strip_number` order.
    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    pub fn strips_mut(&mut self) -> &mut Vec<Strip> {
        &mut self.strips
    }

    /// Append a strip numbered after the current last one.
    pub fn push_strip(&mut self, data: Vec<u8>) {
        let number = self
            .strips
            .last()
            .map_or(0, |strip| strip.strip_number.saturating_add(1));
        self.strips.push(Strip::new(number, data));
    }

    pub fn sub_images(&self) -> &[Image] {
        &self.sub_images
    }

    pub fn sub_images_mut(&mut self) -> &mut Vec<Image> {
        &mut self.sub_images
    }

    pub fn exif(&self) -> Option<&Directory> {
        self.exif.as_ref()
    }

    pub fn exif_mut(&mut self) -> Option<&mut Directory> {
        self.exif.as_mut()
    }

    /// Attach or drop the Exif directory. Saving writes the pointer tag to match.
    pub fn set_exif(&mut self, exif: Option<Directory>) {
        self.exif = exif;
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut Directory,
        &mut [Strip],
        &mut [Image],
        Option<&mut Directory>,
    ) {
        (
            &mut self.tags,
            &mut self.strips,
            &mut self.sub_images,
            self.exif.as_mut(),
        )
    }
}
