macro_rules! tags {
    {
        // Permit arbitrary meta items, which include documentation.
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident($ty:tt) $(unknown(#[$unknown_meta:meta] $unknown_doc:ident))* {
            // Each of the `Name = Val,` permitting documentation.
            $($(#[$ident_attr:meta])* $tag:ident = $val:expr,)*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[non_exhaustive]
        #[repr($ty)]
        pub enum $name {
            $($(#[$ident_attr])* $tag = $val,)*
            $(
                #[$unknown_meta]
                Unknown($ty),
            )*
        }

        impl $name {
            #[inline(always)]
            const fn __from_inner_type(n: $ty) -> Result<Self, $ty> {
                match n {
                    $( $val => Ok($name::$tag), )*
                    n => Err(n),
                }
            }

            #[inline(always)]
            const fn __to_inner_type(&self) -> $ty {
                match *self {
                    $( $name::$tag => $val, )*
                    $( $name::Unknown($unknown_doc) => { $unknown_doc }, )*
                }
            }
        }

        tags!($name, $ty, $($unknown_doc)*);
    };
    // For u16 tags, provide direct inherent primitive conversion methods.
    ($name:tt, u16, $($unknown_doc:ident)*) => {
        impl $name {
            #[inline(always)]
            pub const fn from_u16(val: u16) -> Option<Self> {
                match Self::__from_inner_type(val) {
                    Ok(v) => Some(v),
                    Err(_) => None,
                }
            }

            $(
            #[inline(always)]
            pub const fn from_u16_exhaustive($unknown_doc: u16) -> Self {
                match Self::__from_inner_type($unknown_doc) {
                    Ok(v) => v,
                    Err(_) => $name::Unknown($unknown_doc),
                }
            }
            )*

            #[inline(always)]
            pub const fn to_u16(&self) -> u16 {
                Self::__to_inner_type(self)
            }
        }
    };
}

// Note: These tags appear in the order they are mentioned in the TIFF reference
tags! {
/// TIFF tags
///
/// Only a handful of ids carry meaning for the codec itself (strip location, sub-images and the
/// Exif directory). The rest are named for convenience and are carried through untouched.
pub enum Tag(u16) unknown(
    /// A private or extension tag
    unknown
) {
    // Baseline tags:
    Artist = 315,
    BitsPerSample = 258,
    Compression = 259,
    DateTime = 306,
    HostComputer = 316,
    ImageDescription = 270,
    ImageLength = 257,
    ImageWidth = 256,
    Make = 271,
    Model = 272,
    NewSubfileType = 254,
    Orientation = 274,
    PhotometricInterpretation = 262,
    PlanarConfiguration = 284,
    ResolutionUnit = 296,
    RowsPerStrip = 278,
    SamplesPerPixel = 277,
    Software = 305,
    StripByteCounts = 279,
    StripOffsets = 273,
    XResolution = 282,
    YResolution = 283,
    // Advanced tags
    SubIfd = 330,
    // <https://web.archive.org/web/20131111073619/http://www.exif.org/Exif2-1.PDF>
    // *Do note its typo in the Decimal id*
    Copyright = 33_432,
    ExposureTime = 0x829a,
    FNumber = 0x829d,
    // <https://web.archive.org/web/20131111073619/http://www.exif.org/Exif2-1.PDF>
    ExifDirectory = 0x8769,
    #[doc(alias = "ISOSpeedRatings")]
    IsoSpeedRatings = 0x8827,
    ExifVersion = 0x9000,
    MakerNote = 0x927c,
}
}

/// Identifies the offset of an IFD.
///
/// The value `0` is never a valid directory position. It is the end marker of a directory chain.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct IfdPointer(pub u32);

tags! {
/// The type of an IFD entry (a 2 byte field).
pub enum Type(u16) {
    /// 8-bit unsigned integer
    BYTE = 1,
    /// 8-bit byte that contains a 7-bit ASCII code; the last byte must be zero
    ASCII = 2,
    /// 16-bit unsigned integer
    SHORT = 3,
    /// 32-bit unsigned integer
    LONG = 4,
    /// Fraction stored as two 32-bit unsigned integers
    RATIONAL = 5,
    /// 8-bit signed integer
    SBYTE = 6,
    /// 8-bit byte that may contain anything, depending on the field
    UNDEFINED = 7,
    /// 16-bit signed integer
    SSHORT = 8,
    /// 32-bit signed integer
    SLONG = 9,
    /// Fraction stored as two 32-bit signed integers
    SRATIONAL = 10,
    /// 32-bit IEEE floating point
    FLOAT = 11,
    /// 64-bit IEEE floating point
    DOUBLE = 12,
    /// 32-bit unsigned integer (offset)
    IFD = 13,
}
}

impl Type {
    /// Width in bytes of a single atomic value of this type.
    pub fn byte_len(&self) -> u8 {
        match *self {
            Type::BYTE | Type::SBYTE | Type::ASCII | Type::UNDEFINED => 1,
            Type::SHORT | Type::SSHORT => 2,
            Type::LONG | Type::SLONG | Type::FLOAT | Type::IFD => 4,
            Type::DOUBLE | Type::RATIONAL | Type::SRATIONAL => 8,
        }
    }

    /// Total length of `count` values of this type.
    ///
    /// Computed in 64 bits so that a hostile 32-bit count can not wrap around.
    pub fn value_bytes(&self, count: u32) -> u64 {
        u64::from(count) * u64::from(self.byte_len())
    }

    /// Human readable name, as used when rendering entries.
    pub fn name(&self) -> &'static str {
        match *self {
            Type::BYTE => "Byte",
            Type::ASCII => "ASCII",
            Type::SHORT => "Short",
            Type::LONG => "Long",
            Type::RATIONAL => "Rational",
            Type::SBYTE => "SByte",
            Type::UNDEFINED => "Undefined",
            Type::SSHORT => "SShort",
            Type::SLONG => "SLong",
            Type::SRATIONAL => "SRational",
            Type::FLOAT => "Float",
            Type::DOUBLE => "Double",
            Type::IFD => "IFD",
        }
    }
}

/// Byte order of the TIFF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// little endian byte order
    LittleEndian,
    /// big endian byte order
    BigEndian,
}

impl ByteOrder {
    /// Get the byte order representing the running target.
    pub const fn native() -> Self {
        match () {
            #[cfg(target_endian = "little")]
            () => ByteOrder::LittleEndian,
            #[cfg(target_endian = "big")]
            () => ByteOrder::BigEndian,
            #[cfg(not(any(target_endian = "big", target_endian = "little")))]
            () => compile_error!("Unsupported target"),
        }
    }

    /// The two signature bytes opening a file of this byte order.
    pub const fn magic(self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => *b"II",
            ByteOrder::BigEndian => *b"MM",
        }
    }

    /// Recognize the signature bytes of a file header.
    pub fn from_magic(magic: [u8; 2]) -> Option<Self> {
        match &magic {
            b"II" => Some(ByteOrder::LittleEndian),
            b"MM" => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Convert the bytes of one multi-byte scalar between this order and the native one.
    ///
    /// The conversion is its own inverse so the same call serves reading and writing. Every
    /// primitive read and write goes through here.
    pub(crate) fn fix_endianness(self, bytes: &mut [u8]) {
        if self != ByteOrder::native() {
            bytes.reverse();
        }
    }
}

#[test]
fn type_widths() {
    let widths: Vec<u8> = (1..=13)
        .map(|code| Type::from_u16(code).map(|ty| ty.byte_len()).unwrap())
        .collect();
    assert_eq!(widths, [1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8, 4]);
    assert_eq!(Type::from_u16(0), None);
    assert_eq!(Type::from_u16(14), None);
}

#[test]
fn value_bytes_does_not_wrap() {
    assert_eq!(Type::DOUBLE.value_bytes(u32::MAX), u64::from(u32::MAX) * 8);
}

#[test]
fn fix_endianness_roundtrip() {
    for bo in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let mut buf = 0x0102_0304u32.to_ne_bytes();
        bo.fix_endianness(&mut buf);
        let expected = match bo {
            ByteOrder::BigEndian => [1, 2, 3, 4],
            ByteOrder::LittleEndian => [4, 3, 2, 1],
        };
        assert_eq!(buf, expected);
        bo.fix_endianness(&mut buf);
        assert_eq!(u32::from_ne_bytes(buf), 0x0102_0304);
    }
}

#[test]
fn tag_ids() {
    assert_eq!(Tag::ExifDirectory.to_u16(), 34665);
    assert_eq!(Tag::IsoSpeedRatings.to_u16(), 34855);
    assert_eq!(Tag::from_u16_exhaustive(330), Tag::SubIfd);
    assert_eq!(Tag::from_u16_exhaustive(65000), Tag::Unknown(65000));
}
