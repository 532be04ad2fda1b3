//! Hand-laid TIFF streams for the integration tests.
//!
//! The builder places every directory at an offset of the test's choosing and writes entries in
//! the order given, so that streams the encoder would never produce (unsorted tags, cycles,
//! dangling offsets) can be expressed.
#![allow(dead_code)]

/// A value of a raw entry, encoded by the builder in the stream's byte order.
pub enum Raw {
    Byte(Vec<u8>),
    Ascii(&'static str),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    SRational(Vec<(i32, i32)>),
    Undefined(Vec<u8>),
    Ifd(Vec<u32>),
    /// Type, count and inline field written verbatim.
    Field { ty: u16, count: u32, field: [u8; 4] },
}

pub struct RawTiff {
    bytes: Vec<u8>,
    big_endian: bool,
}

impl RawTiff {
    /// A header with a first directory offset of `0`, see [`Self::set_first_ifd`].
    pub fn new(big_endian: bool) -> RawTiff {
        let mut raw = RawTiff {
            bytes: Vec::new(),
            big_endian,
        };
        let magic = if big_endian { *b"MM" } else { *b"II" };
        raw.bytes.extend_from_slice(&magic);
        let version = raw.u16_bytes(42);
        raw.bytes.extend_from_slice(&version);
        raw.bytes.extend_from_slice(&[0; 4]);
        raw
    }

    pub fn u16_bytes(&self, value: u16) -> [u8; 2] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    pub fn u32_bytes(&self, value: u32) -> [u8; 4] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    pub fn set_first_ifd(&mut self, offset: u32) {
        self.put_u32(4, offset);
    }

    pub fn put_u32(&mut self, at: usize, value: u32) {
        let bytes = self.u32_bytes(value);
        self.bytes[at..at + 4].copy_from_slice(&bytes);
    }

    fn put(&mut self, at: usize, data: &[u8]) {
        self.pad_to(at + data.len());
        self.bytes[at..at + data.len()].copy_from_slice(data);
    }

    /// Grow the stream with zeros to at least `len` bytes.
    pub fn pad_to(&mut self, len: usize) {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
    }

    /// Append `data` at the word-aligned end and return where it starts.
    pub fn append(&mut self, data: &[u8]) -> u32 {
        if self.bytes.len() % 2 == 1 {
            self.bytes.push(0);
        }
        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(data);
        offset
    }

    fn encode(&self, value: &Raw) -> (u16, u32, Vec<u8>) {
        let mut out = Vec::new();
        let (ty, count) = match value {
            Raw::Byte(v) => {
                out.extend_from_slice(v);
                (1, v.len())
            }
            Raw::Ascii(text) => {
                out.extend_from_slice(text.as_bytes());
                out.push(0);
                (2, text.len() + 1)
            }
            Raw::Short(v) => {
                v.iter().for_each(|&n| out.extend_from_slice(&self.u16_bytes(n)));
                (3, v.len())
            }
            Raw::Long(v) => {
                v.iter().for_each(|&n| out.extend_from_slice(&self.u32_bytes(n)));
                (4, v.len())
            }
            Raw::Rational(v) => {
                for &(n, d) in v {
                    out.extend_from_slice(&self.u32_bytes(n));
                    out.extend_from_slice(&self.u32_bytes(d));
                }
                (5, v.len())
            }
            Raw::SRational(v) => {
                for &(n, d) in v {
                    out.extend_from_slice(&self.u32_bytes(n as u32));
                    out.extend_from_slice(&self.u32_bytes(d as u32));
                }
                (10, v.len())
            }
            Raw::Undefined(v) => {
                out.extend_from_slice(v);
                (7, v.len())
            }
            Raw::Ifd(v) => {
                v.iter().for_each(|&n| out.extend_from_slice(&self.u32_bytes(n)));
                (13, v.len())
            }
            Raw::Field { ty, count, field } => {
                out.extend_from_slice(field);
                return (*ty, *count, out);
            }
        };
        (ty, count as u32, out)
    }

    /// Write a directory at `at` with the entries in the given order.
    ///
    /// Values longer than four bytes are appended after everything written so far.
    pub fn write_ifd(&mut self, at: u32, entries: &[(u16, Raw)], next: u32) {
        let at = at as usize;
        self.pad_to(at + 2 + 12 * entries.len() + 4);

        let count = self.u16_bytes(entries.len() as u16);
        self.put(at, &count);
        for (index, (tag, value)) in entries.iter().enumerate() {
            let (ty, count, data) = self.encode(value);
            let field = match value {
                Raw::Field { field, .. } => *field,
                _ if data.len() <= 4 => {
                    let mut field = [0; 4];
                    field[..data.len()].copy_from_slice(&data);
                    field
                }
                _ => {
                    let pointer = self.append(&data);
                    self.u32_bytes(pointer)
                }
            };

            let record = at + 2 + 12 * index;
            let mut bytes = Vec::with_capacity(12);
            bytes.extend_from_slice(&self.u16_bytes(*tag));
            bytes.extend_from_slice(&self.u16_bytes(ty));
            bytes.extend_from_slice(&self.u32_bytes(count));
            bytes.extend_from_slice(&field);
            self.put(record, &bytes);
        }
        let next = self.u32_bytes(next);
        self.put(at + 2 + 12 * entries.len(), &next);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Directory offset of the Exif block in [`camera`].
pub const CAMERA_EXIF_IFD: u32 = 2_991_224;

/// A single image as a camera writes it: 23 tags, one strip, and an Exif block with 36 tags far
/// behind the pixel data.
pub fn camera() -> Vec<u8> {
    let mut raw = RawTiff::new(false);
    raw.set_first_ifd(8);

    // Leave room for the first directory and its values before the pixel data.
    raw.pad_to(1024);
    let strip: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
    let strip_offset = raw.append(&strip);

    let ifd0 = vec![
        (254, Raw::Long(vec![0])),
        (256, Raw::Long(vec![64])),
        (257, Raw::Long(vec![64])),
        (258, Raw::Short(vec![8])),
        (259, Raw::Short(vec![1])),
        (262, Raw::Short(vec![1])),
        (270, Raw::Ascii("A camera test image")),
        (271, Raw::Ascii("Nikon")),
        (272, Raw::Ascii("COOLPIX P7000")),
        (273, Raw::Long(vec![strip_offset])),
        (274, Raw::Short(vec![1])),
        (277, Raw::Short(vec![1])),
        (278, Raw::Long(vec![64])),
        (279, Raw::Long(vec![strip.len() as u32])),
        (282, Raw::Rational(vec![(300, 1)])),
        (283, Raw::Rational(vec![(300, 1)])),
        (284, Raw::Short(vec![1])),
        (296, Raw::Short(vec![2])),
        (305, Raw::Ascii("Nikon Transfer 2.0")),
        (306, Raw::Ascii("2011:03:27 12:00:00")),
        (315, Raw::Ascii("Ansel Adams")),
        (33432, Raw::Ascii("public domain")),
        (34665, Raw::Long(vec![CAMERA_EXIF_IFD])),
    ];
    raw.write_ifd(8, &ifd0, 0);

    let exif = vec![
        (0x829a, Raw::Rational(vec![(10, 1250)])),
        (0x829d, Raw::Rational(vec![(56, 10)])),
        (0x8822, Raw::Short(vec![2])),
        (0x8827, Raw::Short(vec![400])),
        (0x9000, Raw::Undefined(b"0230".to_vec())),
        (0x9003, Raw::Ascii("2011:03:27 12:00:00")),
        (0x9004, Raw::Ascii("2011:03:27 12:00:00")),
        (0x9101, Raw::Undefined(vec![1, 2, 3, 0])),
        (0x9102, Raw::Rational(vec![(4, 1)])),
        (0x9204, Raw::SRational(vec![(-1, 3)])),
        (0x9205, Raw::Rational(vec![(28, 10)])),
        (0x9207, Raw::Short(vec![5])),
        (0x9208, Raw::Short(vec![0])),
        (0x9209, Raw::Short(vec![16])),
        (0x920a, Raw::Rational(vec![(60, 10)])),
        (0x927c, Raw::Undefined((0..40).collect())),
        (0x9286, Raw::Undefined(b"ASCII\0\0\0no comment".to_vec())),
        (0x9290, Raw::Ascii("10")),
        (0x9291, Raw::Ascii("10")),
        (0x9292, Raw::Ascii("10")),
        (0xa000, Raw::Undefined(b"0100".to_vec())),
        (0xa001, Raw::Short(vec![1])),
        (0xa002, Raw::Long(vec![64])),
        (0xa003, Raw::Long(vec![64])),
        (0xa217, Raw::Short(vec![2])),
        (0xa300, Raw::Undefined(vec![3])),
        (0xa301, Raw::Undefined(vec![1])),
        (0xa302, Raw::Undefined(vec![0, 2, 0, 2, 0, 1, 1, 2])),
        (0xa401, Raw::Short(vec![0])),
        (0xa402, Raw::Short(vec![0])),
        (0xa403, Raw::Short(vec![0])),
        (0xa404, Raw::Rational(vec![(0, 100)])),
        (0xa405, Raw::Short(vec![28])),
        (0xa406, Raw::Short(vec![0])),
        (0xa407, Raw::Short(vec![0])),
        (0xa408, Raw::Short(vec![0])),
    ];
    raw.write_ifd(CAMERA_EXIF_IFD, &exif, 0);

    raw.into_bytes()
}

/// A two-level pyramid: the full image with 2 strips and one reduced-resolution sub-image with 15
/// tags and 1 strip.
pub fn pyramid(big_endian: bool) -> Vec<u8> {
    let mut raw = RawTiff::new(big_endian);
    raw.set_first_ifd(8);

    let full_ifd = 8;
    raw.pad_to(8 + 2 + 12 * 13 + 4);
    let sub_ifd = raw.append(&[0; 2 + 12 * 15 + 4]);

    let first_half: Vec<u8> = (0..128).collect();
    let second_half: Vec<u8> = (128..=255).collect();
    let reduced: Vec<u8> = (0..64).map(|i| i * 4).collect();
    let first_offset = raw.append(&first_half);
    let second_offset = raw.append(&second_half);
    let reduced_offset = raw.append(&reduced);

    let full = vec![
        (254, Raw::Long(vec![0])),
        (256, Raw::Short(vec![16])),
        (257, Raw::Short(vec![16])),
        (258, Raw::Short(vec![8])),
        (259, Raw::Short(vec![1])),
        (262, Raw::Short(vec![1])),
        (273, Raw::Short(vec![first_offset as u16, second_offset as u16])),
        (277, Raw::Short(vec![1])),
        (278, Raw::Short(vec![8])),
        (279, Raw::Short(vec![128, 128])),
        (282, Raw::Rational(vec![(72, 1)])),
        (283, Raw::Rational(vec![(72, 1)])),
        (330, Raw::Ifd(vec![sub_ifd])),
    ];
    raw.write_ifd(full_ifd, &full, 0);

    let sub = vec![
        (254, Raw::Long(vec![1])),
        (256, Raw::Short(vec![8])),
        (257, Raw::Short(vec![8])),
        (258, Raw::Short(vec![8])),
        (259, Raw::Short(vec![1])),
        (262, Raw::Short(vec![1])),
        (273, Raw::Long(vec![reduced_offset])),
        (277, Raw::Short(vec![1])),
        (278, Raw::Short(vec![8])),
        (279, Raw::Long(vec![reduced.len() as u32])),
        (282, Raw::Rational(vec![(36, 1)])),
        (283, Raw::Rational(vec![(36, 1)])),
        (284, Raw::Short(vec![1])),
        (296, Raw::Short(vec![2])),
        (305, Raw::Ascii("pyramid builder")),
    ];
    raw.write_ifd(sub_ifd, &sub, 0);

    raw.into_bytes()
}

/// The minimal strip tags for a one-strip directory whose data lives at `offset`.
pub fn strip_entries(offset: u32, len: u32) -> Vec<(u16, Raw)> {
    vec![(273, Raw::Long(vec![offset])), (279, Raw::Long(vec![len]))]
}
