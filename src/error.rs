use std::io;
use std::num::TryFromIntError;

use quick_error::quick_error;

use crate::tags::{IfdPointer, Tag};

quick_error! {
    /// Tiff error kinds.
    ///
    /// Every error is terminal for the operation that raised it: a failed load yields no partial
    /// [`Tiff`](crate::Tiff), a failed save leaves the sink in an unspecified state.
    #[derive(Debug)]
    pub enum TiffError {
        /// The stream is not a well-formed TIFF.
        FormatError(err: TiffFormatError) {
            from()
            display("Format error: {}", err)
            source(err)
        }
        /// An offset points outside of the stream, or an output offset does not fit the format.
        BoundsError(err: TiffBoundsError) {
            from()
            display("Bounds error: {}", err)
            source(err)
        }
        /// A tag required to locate the strips of an image is absent.
        MissingTag(tag: Tag) {
            display("Required tag {:?} is missing", tag)
        }
        /// The in-memory graph disagrees with itself or with what is already on the stream.
        DataConsistencyError(err: DataConsistencyError) {
            from()
            display("Data consistency error: {}", err)
            source(err)
        }
        /// A directory offset was reached twice while walking the directory graph.
        CircularReference(ifd: IfdPointer) {
            display("Circular directory reference at offset {}", ifd.0)
        }
        /// No encoding or decoding exists for the requested value.
        UnsupportedError(err: TiffUnsupportedError) {
            from()
            display("Unsupported: {}", err)
            source(err)
        }
        /// An I/O error occurred while reading or writing the stream.
        IoError(err: io::Error) {
            from()
            display("{}", err)
            source(err)
        }
        /// A bound configured in [`Limits`](crate::decoder::Limits) was hit.
        LimitsExceeded {
            display("The Decoder limits are exceeded")
        }
        /// A count or offset does not fit the integer width the format gives it.
        IntSizeError {
            display("Platform or format size limits exceeded")
        }
    }
}

quick_error! {
    /// The stream content violates the TIFF layout.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TiffFormatError {
        TiffSignatureInvalid(magic: [u8; 2]) {
            display("TIFF signature invalid: {:02x?}", magic)
        }
        TiffVersionInvalid(version: u16) {
            display("TIFF version {} is not supported, expected 42", version)
        }
        UnknownFieldType { tag: Tag, type_code: u16 } {
            display("Entry {:?} has unknown field type {}", tag, type_code)
        }
        InvalidTagValueType(tag: Tag) {
            display("Entry {:?} does not hold integer offsets", tag)
        }
        DuplicateTag(tag: Tag) {
            display("Entry {:?} appears more than once in a directory", tag)
        }
    }
}

quick_error! {
    /// An offset or length falls outside of the addressable stream.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TiffBoundsError {
        FirstIfdOutOfRange { offset: u32, stream_len: u64 } {
            display("First directory offset {} is outside of 8..{}", offset, stream_len)
        }
        ReadPastEnd { offset: u64, len: u64, stream_len: u64 } {
            display("Reading {} bytes at {} runs past the end of a {} byte stream", len, offset, stream_len)
        }
        OffsetOverflow(offset: u64) {
            display("Offset {} does not fit a 32-bit offset field", offset)
        }
    }
}

quick_error! {
    /// Tag values disagree with each other or with the stream.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DataConsistencyError {
        ValueOutOfBounds { tag: Tag, offset: u64, len: u64, stream_len: u64 } {
            display("Value of {:?} ({} bytes at {}) runs past the end of a {} byte stream", tag, len, offset, stream_len)
        }
        ShapeChanged(tag: Tag) {
            display("Type or count of {:?} changed since it was written", tag)
        }
        StripCountMismatch { offsets: usize, byte_counts: usize } {
            display("{} strip offsets but {} strip byte counts", offsets, byte_counts)
        }
        StripTagMismatch { tag: Tag, declared: u64, strips: usize } {
            display("{:?} declares {} values for {} strips", tag, declared, strips)
        }
        NotPlaced(tag: Tag) {
            display("{:?} has no directory record on the stream yet", tag)
        }
    }
}

quick_error! {
    /// Values the codec has no encoder or decoder for.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TiffUnsupportedError {
        FieldType(type_code: u16) {
            display("No codec for field type {}", type_code)
        }
        UndecodedEntry(tag: Tag) {
            display("{:?} was never decoded and can not be re-encoded", tag)
        }
    }
}

impl From<TryFromIntError> for TiffError {
    fn from(_err: TryFromIntError) -> TiffError {
        TiffError::IntSizeError
    }
}

/// Result of a TIFF decoding or encoding operation.
pub type TiffResult<T> = Result<T, TiffError>;
