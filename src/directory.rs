use core::fmt;
use std::collections::BTreeMap;

use crate::{ifd::Entry, tags::Tag};

/// An Image File Directory (IFD).
///
/// A directory is a map of [`Tag`]s to [`Entry`]s. Entries are unique by tag and always iterate,
/// and are always written, in ascending order of their numeric id regardless of the order they
/// were read or inserted in.
///
/// A directory is filled by [`Decoder::decode_directory`](crate::decoder::Decoder::decode_directory)
/// or starts out empty to be extended with entries.
#[doc(alias = "IFD")]
#[derive(Clone, Default, PartialEq)]
pub struct Directory {
    /// There are at most `u16::MAX` entries in any single directory, the count is stored as a
    /// 2-byte value.
    pub(crate) entries: BTreeMap<u16, Entry>,
}

impl Directory {
    /// Create a directory in an initial state without entries. Note that an empty directory can
    /// not be encoded in a file, it must contain at least one entry.
    pub fn empty() -> Self {
        Directory {
            entries: BTreeMap::new(),
        }
    }

    /// Retrieve the entry of a tag.
    pub fn get(&self, tag: Tag) -> Option<&Entry> {
        self.entries.get(&tag.to_u16())
    }

    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut Entry> {
        self.entries.get_mut(&tag.to_u16())
    }

    /// Check if the directory contains a specified tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.entries.contains_key(&tag.to_u16())
    }

    /// Insert an entry under its own tag, returning the entry it replaced.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.tag().to_u16(), entry)
    }

    pub fn remove(&mut self, tag: Tag) -> Option<Entry> {
        self.entries.remove(&tag.to_u16())
    }

    /// Iterate over all known and unknown tags in this directory.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> + '_ {
        self.entries.values_mut()
    }

    /// Insert additional entries into the directory.
    ///
    /// Providing a tag multiple times or a tag that already exists within this directory
    /// overwrites the entry.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = Entry>) {
        // Code size conscious extension, avoid monomorphic extensions with the assumption of these
        // not being performance sensitive in practice.
        self.extend_inner(iter.into_iter().by_ref())
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are any entries in this directory. Note that an empty directory can not be
    /// encoded in the file, it must contain at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extend_inner(&mut self, iter: &mut dyn Iterator<Item = Entry>) {
        for entry in iter {
            // If the tag is already present, it will be overwritten.
            self.entries.insert(entry.tag().to_u16(), entry);
        }
    }
}

impl FromIterator<Entry> for Directory {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut dir = Directory::empty();
        dir.extend(iter);
        dir
    }
}

impl IntoIterator for Directory {
    type Item = Entry;
    type IntoIter = std::collections::btree_map::IntoValues<u16, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in self.entries.values() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
