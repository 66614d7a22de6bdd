//! Byte-range addressing for `field[start:length]` style slices
//!
//! A [`RangeSpec`] is one slice; a [`RangeList`] is an ordered run of them
//! with aggregates kept up to date on every insert.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::ops::Range;

use itertools::Itertools;

/// What follows the start offset of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Ending {
    Uninitialized,
    Length,
    Offset,
    ToEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RangeSpec {
    start_offset: i32,
    length: i32,
    end_offset: i32,
    ending: Ending,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSpec {
    pub fn new() -> Self {
        Self {
            start_offset: 0,
            length: 0,
            end_offset: 0,
            ending: Ending::Uninitialized,
        }
    }

    /// `start:length`
    pub fn with_length(start_offset: i32, length: i32) -> Self {
        let mut spec = Self::new();
        spec.set_start_offset(start_offset);
        spec.set_length(length);
        spec
    }

    /// `start-end`, end inclusive
    pub fn with_end_offset(start_offset: i32, end_offset: i32) -> Self {
        let mut spec = Self::new();
        spec.set_start_offset(start_offset);
        spec.set_end_offset(end_offset);
        spec
    }

    /// `start:`
    pub fn to_the_end(start_offset: i32) -> Self {
        let mut spec = Self::new();
        spec.set_start_offset(start_offset);
        spec.set_to_the_end();
        spec
    }

    pub fn start_offset(&self) -> i32 {
        assert!(
            self.ending != Ending::Uninitialized,
            "start offset read from an uninitialized range"
        );
        self.start_offset
    }

    pub fn length(&self) -> i32 {
        assert!(
            self.ending == Ending::Length,
            "length read from a range ending in {:?}",
            self.ending
        );
        self.length
    }

    pub fn end_offset(&self) -> i32 {
        assert!(
            self.ending == Ending::Offset,
            "end offset read from a range ending in {:?}",
            self.ending
        );
        self.end_offset
    }

    pub fn ending(&self) -> Ending {
        assert!(
            self.ending != Ending::Uninitialized,
            "ending read from an uninitialized range"
        );
        self.ending
    }

    pub fn set_start_offset(&mut self, offset: i32) {
        self.start_offset = offset;
    }

    pub fn set_length(&mut self, length: i32) {
        self.length = length;
        self.ending = Ending::Length;
    }

    pub fn set_end_offset(&mut self, offset: i32) {
        self.end_offset = offset;
        self.ending = Ending::Offset;
    }

    pub fn set_to_the_end(&mut self) {
        self.ending = Ending::ToEnd;
    }

    /// Number of bytes this slice covers, if that is known without the data.
    /// An end offset is inclusive, so `2-5` spans four bytes.
    pub fn span_len(&self) -> Option<i32> {
        match self.ending() {
            Ending::Length => Some(self.length),
            Ending::Offset => Some(
                self.end_offset
                    .saturating_sub(self.start_offset)
                    .saturating_add(1),
            ),
            Ending::ToEnd => None,
            Ending::Uninitialized => unreachable!("ending() rejects uninitialized ranges"),
        }
    }

    /// Byte positions this slice selects from `len` bytes of data.
    /// Negative offsets count back from the end.
    pub fn resolve(&self, len: usize) -> Option<Range<usize>> {
        let len = i64::try_from(len).ok()?;
        let from_end = |offset: i32| {
            let offset = i64::from(offset);
            if offset < 0 {
                len + offset
            } else {
                offset
            }
        };

        let start = from_end(self.start_offset());
        if start < 0 || start > len {
            return None;
        }
        let end = match self.ending() {
            Ending::Length if self.length < 0 => return None,
            Ending::Length => start + i64::from(self.length),
            Ending::Offset => from_end(self.end_offset) + 1,
            Ending::ToEnd => len,
            Ending::Uninitialized => unreachable!("ending() rejects uninitialized ranges"),
        };
        if end < start || end > len {
            return None;
        }

        Some(usize::try_from(start).ok()?..usize::try_from(end).ok()?)
    }
}

impl Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ending {
            Ending::Uninitialized => f.write_str("?"),
            Ending::Length => write!(f, "{}:{}", self.start_offset, self.length),
            Ending::Offset => write!(f, "{}-{}", self.start_offset, self.end_offset),
            Ending::ToEnd => write!(f, "{}:", self.start_offset),
        }
    }
}

/// Ordered slices plus running totals over them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeList {
    specs: VecDeque<RangeSpec>,
    has_total_length: bool,
    total_length: i32,
    min_start_offset: i32,
    max_start_offset: i32,
}

impl Default for RangeList {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeList {
    pub fn new() -> Self {
        Self {
            specs: VecDeque::new(),
            has_total_length: true,
            total_length: 0,
            min_start_offset: i32::MAX,
            max_start_offset: i32::MIN,
        }
    }

    /// Append each spec in order
    pub fn from_specs(specs: impl IntoIterator<Item = RangeSpec>) -> Self {
        let mut list = Self::new();
        for spec in specs {
            list.append(spec);
        }
        list
    }

    /// Insert at the back. `None` leaves the list untouched.
    pub fn append(&mut self, spec: impl Into<Option<RangeSpec>>) {
        if let Some(spec) = spec.into() {
            self.update(&spec);
            self.specs.push_back(spec);
        }
    }

    /// Insert at the front. `None` leaves the list untouched.
    pub fn prepend(&mut self, spec: impl Into<Option<RangeSpec>>) {
        if let Some(spec) = spec.into() {
            self.update(&spec);
            self.specs.push_front(spec);
        }
    }

    fn update(&mut self, spec: &RangeSpec) {
        // once any member runs to the end the total is unknowable for good
        match spec.span_len() {
            None => self.has_total_length = false,
            Some(len) if self.has_total_length => {
                self.total_length = self.total_length.saturating_add(len)
            }
            Some(_) => {}
        }
        self.min_start_offset = self.min_start_offset.min(spec.start_offset());
        self.max_start_offset = self.max_start_offset.max(spec.start_offset());
    }

    pub fn has_total_length(&self) -> bool {
        self.has_total_length
    }

    /// Sum of member lengths; stale once [`RangeList::has_total_length`] is false
    pub fn total_length(&self) -> i32 {
        self.total_length
    }

    pub fn min_start_offset(&self) -> i32 {
        self.min_start_offset
    }

    pub fn max_start_offset(&self) -> i32 {
        self.max_start_offset
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RangeSpec> {
        self.specs.iter()
    }

    /// Concatenate every slice of `data` in list order, or `None` if any
    /// slice falls outside it.
    pub fn apply(&self, data: &[u8]) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        for spec in &self.specs {
            let range = spec.resolve(data.len())?;
            out.extend_from_slice(&data[range]);
        }
        Some(out)
    }
}

impl FromIterator<RangeSpec> for RangeList {
    fn from_iter<I: IntoIterator<Item = RangeSpec>>(iter: I) -> Self {
        Self::from_specs(iter)
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a RangeSpec;
    type IntoIter = std::collections::vec_deque::Iter<'a, RangeSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

impl Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specs.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_setter_wins() {
        let mut spec = RangeSpec::new();
        spec.set_start_offset(3);
        spec.set_length(4);
        assert_eq!(spec.ending(), Ending::Length);
        spec.set_end_offset(9);
        assert_eq!(spec.ending(), Ending::Offset);
        assert_eq!(spec.end_offset(), 9);
        spec.set_to_the_end();
        assert_eq!(spec.ending(), Ending::ToEnd);
        assert_eq!(spec.start_offset(), 3);
    }

    #[test]
    #[should_panic(expected = "length read from a range ending in Offset")]
    fn test_wrong_accessor() {
        RangeSpec::with_end_offset(0, 4).length();
    }

    #[test]
    #[should_panic(expected = "uninitialized range")]
    fn test_uninitialized_start() {
        RangeSpec::new().start_offset();
    }

    #[test]
    fn test_span_len() {
        assert_eq!(RangeSpec::with_length(2, 4).span_len(), Some(4));
        assert_eq!(RangeSpec::with_end_offset(2, 5).span_len(), Some(4));
        assert_eq!(RangeSpec::to_the_end(2).span_len(), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(RangeSpec::with_length(1, 2).resolve(4), Some(1..3));
        assert_eq!(RangeSpec::with_length(-2, 2).resolve(4), Some(2..4));
        assert_eq!(RangeSpec::with_end_offset(1, -1).resolve(4), Some(1..4));
        assert_eq!(RangeSpec::to_the_end(4).resolve(4), Some(4..4));
        assert_eq!(RangeSpec::with_length(3, 2).resolve(4), None);
        assert_eq!(RangeSpec::with_length(-5, 1).resolve(4), None);
        assert_eq!(RangeSpec::with_end_offset(3, 1).resolve(4), None);
        assert_eq!(RangeSpec::with_length(0, -1).resolve(4), None);
    }

    #[test]
    fn test_none_is_a_no_op() {
        let mut list = RangeList::new();
        list.append(None);
        list.prepend(None);
        assert!(list.is_empty());
        assert!(list.has_total_length());
        assert_eq!(list.min_start_offset(), i32::MAX);
        assert_eq!(list.max_start_offset(), i32::MIN);
    }

    #[test]
    fn test_prepend_order() {
        let mut list = RangeList::new();
        list.append(RangeSpec::with_length(5, 1));
        list.prepend(RangeSpec::with_length(1, 1));
        list.append(RangeSpec::to_the_end(9));
        assert_eq!(list.to_string(), "1:1,5:1,9:");
        assert_eq!(list.min_start_offset(), 1);
        assert_eq!(list.max_start_offset(), 9);
    }

    #[test]
    fn test_apply_concatenates() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let list: RangeList = [RangeSpec::with_length(6, 2), RangeSpec::with_end_offset(0, 1)]
            .into_iter()
            .collect();
        assert_eq!(list.apply(&data), Some(vec![6, 7, 0, 1]));

        let out_of_bounds = RangeList::from_specs([RangeSpec::with_length(7, 2)]);
        assert_eq!(out_of_bounds.apply(&data), None);
    }
}
