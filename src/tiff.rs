use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use log::debug;

use crate::decoder::cycles::IfdCycles;
use crate::decoder::{Decoder, Limits};
use crate::encoder::TiffEncoder;
use crate::error::TiffResult;
use crate::image::Image;
use crate::tags::{ByteOrder, IfdPointer};

/// A whole TIFF file: the top-level images in chain order and the byte order of the stream.
///
/// The byte order is fixed when the value is created, by the header on load or by the caller for
/// a new file, and applies to every save.
#[derive(Clone, Debug, PartialEq)]
pub struct Tiff {
    images: Vec<Image>,
    byte_order: ByteOrder,
}

impl Tiff {
    /// An empty file to be populated with [`Self::push_image`].
    pub fn new(byte_order: ByteOrder) -> Tiff {
        Tiff {
            images: Vec::new(),
            byte_order,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Tiff> {
        let file = File::open(path)?;
        Tiff::load(BufReader::new(file))
    }

    /// Read every image of the stream with the default [`Limits`].
    ///
    /// The reader is only borrowed for the duration of the load, pass `&mut reader` to keep it.
    pub fn load<R: Read + Seek>(reader: R) -> TiffResult<Tiff> {
        Tiff::load_with_limits(reader, Limits::default())
    }

    pub fn load_with_limits<R: Read + Seek>(reader: R, limits: Limits) -> TiffResult<Tiff> {
        let mut decoder = Decoder::new(reader)?.with_limits(limits);
        let mut cycles = IfdCycles::new();
        let mut images = Vec::new();

        let mut next = decoder.first_ifd();
        while next != 0 {
            cycles.insert_chain(IfdPointer(next))?;
            let (image, following) = decoder.read_image(next)?;
            images.push(image);
            next = following;
        }

        debug!("loaded {} images", images.len());
        Ok(Tiff {
            images,
            byte_order: decoder.byte_order(),
        })
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_big_endian(&self) -> bool {
        self.byte_order == ByteOrder::BigEndian
    }

    /// The top-level images, in the order they are chained.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut Vec<Image> {
        &mut self.images
    }

    pub fn push_image(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Lay out the whole file in memory.
    ///
    /// Every offset is recomputed. Record offsets, strip offsets and pointer tags of the images
    /// are updated to the new layout, which is why this takes `&mut self`.
    pub fn encode(&mut self) -> TiffResult<Vec<u8>> {
        let mut encoder = TiffEncoder::new(Cursor::new(Vec::new()), self.byte_order)?;
        for image in &mut self.images {
            encoder.write_image(image)?;
        }
        Ok(encoder.into_inner().into_inner())
    }

    /// Write the file to any sink.
    ///
    /// The layout needs to revisit earlier positions, so it is built in memory first and the sink
    /// only sees sequential writes.
    pub fn save_to<W: Write>(&mut self, mut writer: W) -> TiffResult<()> {
        let bytes = self.encode()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        debug!("saved {} bytes", bytes.len());
        Ok(())
    }

    /// Write the file to a new file at `path`, failing if something already exists there.
    ///
    /// Nothing is created when encoding fails.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> TiffResult<()> {
        let bytes = self.encode()?;
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        debug!("saved {} bytes", bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ifd::{Entry, Value};
    use crate::tags::Tag;
    use crate::{TiffBoundsError, TiffError};

    fn one_strip_image(data: Vec<u8>) -> Image {
        let mut image = Image::new();
        image.tags_mut().extend([
            Entry::new(Tag::ImageWidth, Value::Long(vec![data.len() as u32])),
            Entry::new(Tag::ImageLength, Value::Short(vec![1])),
            Entry::new(Tag::StripOffsets, Value::Long(vec![0])),
            Entry::new(Tag::StripByteCounts, Value::Long(vec![0])),
        ]);
        image.push_strip(data);
        image
    }

    #[test]
    fn header_byte_order_survives() {
        for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let mut tiff = Tiff::new(byte_order);
            tiff.push_image(one_strip_image(vec![1, 2, 3, 4]));
            let bytes = tiff.encode().unwrap();

            let loaded = Tiff::load(Cursor::new(bytes)).unwrap();
            assert_eq!(loaded.byte_order(), byte_order);
            assert_eq!(
                loaded.is_big_endian(),
                byte_order == ByteOrder::BigEndian
            );
        }
    }

    #[test]
    fn encode_and_load_images() {
        let mut tiff = Tiff::new(ByteOrder::LittleEndian);
        tiff.push_image(one_strip_image(vec![10; 7]));
        tiff.push_image(one_strip_image(vec![20; 3]));
        let bytes = tiff.encode().unwrap();

        let loaded = Tiff::load(Cursor::new(bytes)).unwrap();
        assert_eq!(loaded.images().len(), 2);
        assert_eq!(loaded.images()[0].strips()[0].data(), [10; 7]);
        assert_eq!(loaded.images()[1].strips()[0].data(), [20; 3]);
        assert_eq!(
            loaded.images()[1].tags().get(Tag::StripByteCounts).and_then(Entry::value),
            Some(&Value::Long(vec![3]))
        );
    }

    #[test]
    fn empty_file_has_no_first_directory() {
        let bytes = Tiff::new(ByteOrder::BigEndian).encode().unwrap();
        assert_eq!(bytes, [0x4d, 0x4d, 0, 42, 0, 0, 0, 8]);

        match Tiff::load(Cursor::new(bytes)) {
            Err(TiffError::BoundsError(TiffBoundsError::FirstIfdOutOfRange { offset: 8, .. })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn save_to_any_sink() {
        let mut tiff = Tiff::new(ByteOrder::LittleEndian);
        tiff.push_image(one_strip_image(vec![5]));

        let mut sink = Vec::new();
        tiff.save_to(&mut sink).unwrap();
        assert_eq!(sink, tiff.encode().unwrap());
        assert_eq!(&sink[..4], [0x49, 0x49, 0x2a, 0x00]);
    }
}
