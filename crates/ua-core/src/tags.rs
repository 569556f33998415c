//! Target tags and tag sets.
//!
//! A tag is a small index in `0..64`; a [`TagSet`] stores membership as a
//! single `u64` bit mask, so tag checks on the scoring hot path are one AND
//! and one compare.  Human-readable names are mapped to tags by the
//! application (see `ua_behavior::Registry::tag`).

use std::fmt;

use crate::CoreError;

/// A single tag, an index below [`Tag::MAX`].
///
/// Build one with [`Tag::new`]; out-of-range indices are rejected there, so
/// every `Tag` maps to a distinct bit of a [`TagSet`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Tag(u8);

impl Tag {
    /// Number of distinct tags a `TagSet` can hold.
    pub const MAX: u8 = 64;

    /// The tag at `index`, or `None` if `index >= Tag::MAX`.
    #[inline]
    pub const fn new(index: u8) -> Option<Tag> {
        if index < Self::MAX { Some(Tag(index)) } else { None }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    fn bit(self) -> u64 {
        1u64 << self.0
    }
}

impl TryFrom<u8> for Tag {
    type Error = CoreError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Tag::new(index).ok_or(CoreError::InvalidTag(index))
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of [`Tag`]s stored as a bit mask.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSet(u64);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    #[inline]
    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    #[inline]
    pub fn remove(&mut self, tag: Tag) {
        self.0 &= !tag.bit();
    }

    #[inline]
    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// `true` if every tag in `required` is also in `self`.
    ///
    /// The empty set is contained in everything.
    #[inline]
    pub fn contains_all(self, required: TagSet) -> bool {
        self.0 & required.0 == required.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the tags in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = Tag> {
        (0..Tag::MAX).map(Tag).filter(move |t| self.contains(*t))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter().fold(TagSet::EMPTY, TagSet::with)
    }
}
