extern crate tiff_graph;

mod common;

use std::io::Cursor;

use tiff_graph::decoder::Decoder;
use tiff_graph::{ByteOrder, Entry, Rational, Tag, Tiff, Type, Value};

use common::{camera, pyramid, CAMERA_EXIF_IFD};

#[test]
fn camera_first_directory() {
    let mut decoder = Decoder::new(Cursor::new(camera())).unwrap();
    assert_eq!(decoder.byte_order(), ByteOrder::LittleEndian);
    assert_eq!(decoder.first_ifd(), 8);

    let (entries, next) = decoder.read_directory(8).unwrap();
    assert_eq!(entries.len(), 23);
    assert_eq!(next, 0);
    assert!(
        entries.iter().all(|entry| !entry.is_decoded()),
        "reading a directory does not decode its values"
    );
    assert_eq!(entries[0].record_offset(), Some(10));
    assert_eq!(entries[22].record_offset(), Some(10 + 22 * 12));
}

#[test]
fn camera_image_graph() {
    let tiff = Tiff::load(Cursor::new(camera())).unwrap();
    assert!(!tiff.is_big_endian());
    assert_eq!(tiff.images().len(), 1);

    let image = &tiff.images()[0];
    assert_eq!(image.tags().len(), 23);
    assert!(image.sub_images().is_empty());
    assert_eq!(
        image.tags().get(Tag::ExifDirectory).and_then(Entry::value),
        Some(&Value::Long(vec![CAMERA_EXIF_IFD]))
    );
    assert_eq!(
        image
            .tags()
            .get(Tag::Make)
            .and_then(Entry::value)
            .and_then(Value::as_text)
            .as_deref(),
        Some("Nikon")
    );
    assert_eq!(
        image.tags().get(Tag::XResolution).and_then(Entry::value),
        Some(&Value::Rational(vec![Rational::new(300, 1)]))
    );

    assert_eq!(image.strips().len(), 1);
    let strip = &image.strips()[0];
    assert_eq!(strip.strip_number(), 0);
    assert_eq!(strip.strip_offset(), Some(1024));
    assert_eq!(strip.data().len(), 4096);
    assert_eq!(strip.data()[1], 7);

    let exif = image.exif().expect("the Exif pointer is followed");
    assert_eq!(exif.len(), 36);
    let iso = exif.get(Tag::IsoSpeedRatings).unwrap();
    assert_eq!(iso.field_type(), Some(Type::SHORT));
    assert_eq!(iso.value(), Some(&Value::Short(vec![400])));
    assert_eq!(
        exif.get(Tag::Unknown(0x9204)).and_then(Entry::value),
        Some(&Value::SRational(vec![tiff_graph::SRational::new(-1, 3)]))
    );
}

#[test]
fn exif_rendering() {
    let tiff = Tiff::load(Cursor::new(camera())).unwrap();
    let exif = tiff.images()[0].exif().unwrap();

    assert_eq!(
        exif.get(Tag::IsoSpeedRatings).unwrap().to_string(),
        "34855:Short:1:400"
    );
    assert_eq!(
        exif.get(Tag::ExposureTime).unwrap().to_string(),
        "33434:Rational:1:10/1250"
    );
    assert_eq!(
        exif.get(Tag::MakerNote).unwrap().to_string(),
        "37500:Undefined:40:00010203040506070809..."
    );
}

#[test]
fn pyramid_sub_image() {
    for big_endian in [false, true] {
        let tiff = Tiff::load(Cursor::new(pyramid(big_endian))).unwrap();
        assert_eq!(tiff.is_big_endian(), big_endian);
        assert_eq!(tiff.images().len(), 1);

        let top = &tiff.images()[0];
        assert_eq!(top.sub_images().len(), 1);
        assert!(top.exif().is_none());
        assert_eq!(top.strips().len(), 2);
        assert_eq!(top.strips()[1].strip_number(), 1);
        assert_eq!(top.strips()[1].data()[0], 128);

        let sub = &top.sub_images()[0];
        assert_eq!(sub.tags().len(), 15);
        assert_eq!(sub.strips().len(), 1);
        assert_eq!(sub.strips()[0].data().len(), 64);
        assert_eq!(sub.strips()[0].data()[63], 252);
        assert!(sub.sub_images().is_empty());
    }
}

#[test]
fn read_strips_of_any_directory() {
    let bytes = pyramid(false);
    let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
    let strips = decoder.read_strips(8).unwrap();

    let lengths: Vec<usize> = strips.iter().map(|strip| strip.data().len()).collect();
    assert_eq!(lengths, [128, 128]);
    assert!(strips[0].strip_offset() < strips[1].strip_offset());
}
