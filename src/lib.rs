//! Reading and writing the container structure of TIFF files
//!
//! A TIFF file is a graph of image file directories (IFDs) linked through file offsets: the
//! top-level images form a chain, pyramid levels hang off a `SubIFDs` pointer and camera metadata
//! off an Exif pointer. This crate reads that graph into a [`Tiff`] of [`Image`]s, tags and
//! opaque pixel strips, lets the caller edit it, and lays it out again as a new stream.
//!
//! Pixel data is never interpreted: strips are carried as raw bytes, whatever their compression.
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

pub mod decoder;
mod directory;
pub mod encoder;
mod error;
pub mod ifd;
mod image;
pub mod tags;
mod tiff;
mod value;

pub use self::directory::Directory;
pub use self::error::{
    DataConsistencyError, TiffBoundsError, TiffError, TiffFormatError, TiffResult,
    TiffUnsupportedError,
};
pub use self::ifd::{Entry, EntryState, Value};
pub use self::image::{Image, Strip};
pub use self::tags::{ByteOrder, IfdPointer, Tag, Type};
pub use self::tiff::Tiff;
pub use self::value::{AtomicValue, Rational, SRational};
