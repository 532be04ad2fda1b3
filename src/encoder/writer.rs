use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::decoder::stream::EndianReader;
use crate::error::{TiffBoundsError, TiffResult};
use crate::tags::ByteOrder;

macro_rules! write_fn {
    ($name:ident, $type:ty) => {
        #[inline(always)]
        pub fn $name(&mut self, n: $type) -> Result<(), io::Error> {
            let mut bytes = n.to_ne_bytes();
            self.byte_order.fix_endianness(&mut bytes);
            self.writer.write_all(&bytes)
        }
    };
}

/// Sink that writes scalars in a fixed byte order.
///
/// The encoder patches earlier records in place, so the sink has to be seekable and readable.
pub struct TiffWriter<W> {
    writer: W,
    byte_order: ByteOrder,
}

impl<W> TiffWriter<W> {
    pub fn new(writer: W, byte_order: ByteOrder) -> Self {
        Self { writer, byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TiffWriter<W> {
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), io::Error> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    pub fn write_u8(&mut self, n: u8) -> Result<(), io::Error> {
        self.writer.write_all(&[n])
    }

    pub fn write_i8(&mut self, n: i8) -> Result<(), io::Error> {
        self.writer.write_all(&n.to_ne_bytes())
    }

    write_fn!(write_u16, u16);
    write_fn!(write_i16, i16);
    write_fn!(write_u32, u32);
    write_fn!(write_i32, i32);
    write_fn!(write_f32, f32);
    write_fn!(write_f64, f64);

    /// Writes the byte order signature and the version word.
    ///
    /// The offset of the first directory is left to the caller.
    pub fn write_header(&mut self) -> Result<(), io::Error> {
        self.write_bytes(&self.byte_order.magic())?;
        self.write_u16(42)
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }
}

impl<W: Write + Seek> TiffWriter<W> {
    /// Moves to the end of the stream, padding with one zero byte if its length is odd.
    ///
    /// Returns the resulting, even, offset.
    pub fn goto_aligned_end(&mut self) -> Result<u64, io::Error> {
        let end = self.goto_end()?;
        if end % 2 != 0 {
            self.write_u8(0)?;
            return Ok(end + 1);
        }
        Ok(end)
    }
}

impl<W: Seek> TiffWriter<W> {
    pub fn goto_offset(&mut self, offset: u64) -> Result<(), io::Error> {
        self.writer.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn goto_end(&mut self) -> Result<u64, io::Error> {
        self.writer.seek(SeekFrom::End(0))
    }

    pub fn offset(&mut self) -> Result<u64, io::Error> {
        self.writer.stream_position()
    }

    /// Current position as a value for a 32-bit offset field.
    pub fn offset_u32(&mut self) -> TiffResult<u32> {
        let offset = self.offset()?;
        u32::try_from(offset).map_err(|_| TiffBoundsError::OffsetOverflow(offset).into())
    }
}

impl<W: Read> Read for TiffWriter<W> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.writer.read(buf)
    }
}

impl<W: Seek> Seek for TiffWriter<W> {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.writer.seek(pos)
    }
}

impl<W: Read> EndianReader for TiffWriter<W> {
    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
