use crate::ifd::Value;
use crate::{tags::Tag, Directory};
use crate::{TiffError, TiffFormatError, TiffResult};

/// Typed lookups into a decoded directory.
pub(crate) struct TagReader<'lt> {
    pub(crate) ifd: &'lt Directory,
}

impl<'a> TagReader<'a> {
    pub(crate) fn find_tag(&self, tag: Tag) -> Option<&'a Value> {
        self.ifd.get(tag).and_then(|entry| entry.value())
    }

    pub(crate) fn require_tag(&self, tag: Tag) -> TiffResult<&'a Value> {
        match self.find_tag(tag) {
            Some(val) => Ok(val),
            None => Err(TiffError::MissingTag(tag)),
        }
    }

    /// Offsets or lengths stored under `tag`, which may use any unsigned integer type.
    pub(crate) fn find_tag_u32_vec(&self, tag: Tag) -> TiffResult<Option<Vec<u32>>> {
        self.find_tag(tag)
            .map(|value| {
                value
                    .to_u32_vec()
                    .ok_or_else(|| TiffFormatError::InvalidTagValueType(tag).into())
            })
            .transpose()
    }

    pub(crate) fn require_tag_u32_vec(&self, tag: Tag) -> TiffResult<Vec<u32>> {
        self.find_tag_u32_vec(tag)?
            .ok_or(TiffError::MissingTag(tag))
    }
}
