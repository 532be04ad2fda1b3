//! Encoding and decoding of single atomic field values.

use std::fmt;
use std::io::{self, Write};

use crate::decoder::stream::EndianReader;
use crate::encoder::TiffWriter;
use crate::tags::Type;

/// A scalar that occupies exactly one slot of a field of type [`Self::FIELD_TYPE`].
///
/// `write` followed by `read` with the same byte order yields the value back; this also holds for
/// floating point values, including NaN payloads.
pub trait AtomicValue: Copy + Sized {
    const FIELD_TYPE: Type;

    fn read<R: EndianReader + ?Sized>(reader: &mut R) -> io::Result<Self>;

    fn write<W: Write>(self, writer: &mut TiffWriter<W>) -> io::Result<()>;
}

macro_rules! impl_atomic_value {
    ($inner_type:ty; $field_type:expr; $read:ident; $write:ident) => {
        impl AtomicValue for $inner_type {
            const FIELD_TYPE: Type = $field_type;

            #[inline]
            fn read<R: EndianReader + ?Sized>(reader: &mut R) -> io::Result<Self> {
                reader.$read()
            }

            #[inline]
            fn write<W: Write>(self, writer: &mut TiffWriter<W>) -> io::Result<()> {
                writer.$write(self)
            }
        }
    };
}

impl_atomic_value!(u8; Type::BYTE; read_u8; write_u8);
impl_atomic_value!(i8; Type::SBYTE; read_i8; write_i8);
impl_atomic_value!(u16; Type::SHORT; read_u16; write_u16);
impl_atomic_value!(i16; Type::SSHORT; read_i16; write_i16);
impl_atomic_value!(u32; Type::LONG; read_u32; write_u32);
impl_atomic_value!(i32; Type::SLONG; read_i32; write_i32);
impl_atomic_value!(f32; Type::FLOAT; read_f32; write_f32);
impl_atomic_value!(f64; Type::DOUBLE; read_f64; write_f64);

/// Type to represent tiff values of type `RATIONAL`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub n: u32,
    pub d: u32,
}

impl Rational {
    pub fn new(n: u32, d: u32) -> Self {
        Rational { n, d }
    }

    /// The quotient as a float. A zero denominator yields infinity or NaN.
    pub fn to_f64(self) -> f64 {
        f64::from(self.n) / f64::from(self.d)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl AtomicValue for Rational {
    const FIELD_TYPE: Type = Type::RATIONAL;

    fn read<R: EndianReader + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let n = reader.read_u32()?;
        let d = reader.read_u32()?;
        Ok(Rational { n, d })
    }

    fn write<W: Write>(self, writer: &mut TiffWriter<W>) -> io::Result<()> {
        writer.write_u32(self.n)?;
        writer.write_u32(self.d)
    }
}

/// Type to represent tiff values of type `SRATIONAL`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SRational {
    pub n: i32,
    pub d: i32,
}

impl SRational {
    pub fn new(n: i32, d: i32) -> Self {
        SRational { n, d }
    }

    /// The quotient as a float. A zero denominator yields infinity or NaN.
    pub fn to_f64(self) -> f64 {
        f64::from(self.n) / f64::from(self.d)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl AtomicValue for SRational {
    const FIELD_TYPE: Type = Type::SRATIONAL;

    fn read<R: EndianReader + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let n = reader.read_i32()?;
        let d = reader.read_i32()?;
        Ok(SRational { n, d })
    }

    fn write<W: Write>(self, writer: &mut TiffWriter<W>) -> io::Result<()> {
        writer.write_i32(self.n)?;
        writer.write_i32(self.d)
    }
}

/// Reads `count` consecutive values.
pub(crate) fn read_vec<T: AtomicValue, R: EndianReader + ?Sized>(
    reader: &mut R,
    count: usize,
) -> io::Result<Vec<T>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(T::read(reader)?);
    }
    Ok(values)
}

pub(crate) fn write_slice<T: AtomicValue, W: Write>(
    writer: &mut TiffWriter<W>,
    values: &[T],
) -> io::Result<()> {
    for value in values {
        value.write(writer)?;
    }
    Ok(())
}
