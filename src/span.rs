// Source spans
//
//  Copyright (C) 2014-2021 Ryan Specialty Group, LLC.
//
//  This file is part of CIDIDL.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Mapping to source input byte intervals.
//!
//! A [`Span`] is a byte offset and length into the single IDL source
//!   document being compiled.
//! Every node of the document tree carries one,
//!   and so does every declaration derived from it,
//!   which allows diagnostics to point back at the exact location in the
//!   source that caused them
//!     (see [`crate::diagnose`]).
//!
//! The compiler processes exactly one document per invocation,
//!   so unlike a multi-file compiler a span does not carry a reference to
//!   its source context;
//!     the context is owned by the
//!     [`SpanResolver`](crate::diagnose::resolver::SpanResolver)
//!     used for rendering.
//!
//! Spans are intentionally small and [`Copy`] so that they can be
//!   attached to everything without thought.

use static_assertions::assert_eq_size;
use std::fmt::{self, Display};

/// A byte interval into the source document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    offset: u32,
    len: u32,
}

assert_eq_size!(Span, u64);

impl Span {
    /// Create a span from a byte offset and length.
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create a span from `usize` values as produced by readers,
    ///   saturating at [`u32::MAX`].
    ///
    /// Documents larger than 4GiB are not something that this compiler is
    ///   expected to ever see;
    ///     saturation produces a bad location rather than a panic.
    pub fn from_usize(offset: usize, len: usize) -> Self {
        Self::new(saturate(offset), saturate(len))
    }

    /// Create a span covering the half-open byte interval `[start, end)`.
    pub fn from_byte_interval((start, end): (usize, usize)) -> Self {
        Self::from_usize(start, end.saturating_sub(start))
    }

    pub const fn offset(&self) -> u32 {
        self.offset
    }

    pub const fn len(&self) -> u32 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the last byte of the span.
    pub const fn end(&self) -> u32 {
        self.offset.saturating_add(self.len)
    }

    /// Zero-length spans at the start and end of this span.
    pub const fn endpoints(&self) -> (Span, Span) {
        (Span::new(self.offset, 0), Span::new(self.end(), 0))
    }

    /// Span covering both `self` and `other`,
    ///   including anything between them.
    pub fn merge(self, other: Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = self.end().max(other.end());

        Span::new(start, end - start)
    }

    /// Whether `self` is entirely contained within `other`.
    pub const fn is_within(&self, other: Span) -> bool {
        self.offset >= other.offset && self.end() <= other.end()
    }

    /// Offset of this span relative to the start of `parent`,
    ///   if it lies within it.
    pub fn relative_to(&self, parent: Span) -> Option<Span> {
        self.is_within(parent)
            .then(|| Span::new(self.offset - parent.offset, self.len))
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.offset, self.end())
    }
}

/// A span that is not associated with any location in the source.
///
/// This is used for generated declarations
///   (such as the interface identifier constant)
///   and for trees constructed programmatically.
pub const UNKNOWN_SPAN: Span = Span::new(0, 0);

/// A dummy span for tests that do not care about locations.
#[cfg(test)]
pub const DUMMY_SPAN: Span = Span::new(0, 0);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn span_end_and_endpoints() {
        let span = Span::new(10, 5);

        assert_eq!(15, span.end());
        assert_eq!((Span::new(10, 0), Span::new(15, 0)), span.endpoints());
    }

    #[test]
    fn merge_is_order_independent() {
        let a = Span::new(5, 2);
        let b = Span::new(20, 3);

        assert_eq!(Span::new(5, 18), a.merge(b));
        assert_eq!(Span::new(5, 18), b.merge(a));
    }

    #[test]
    fn relative_to_parent() {
        let parent = Span::new(100, 50);

        assert_eq!(
            Some(Span::new(10, 4)),
            Span::new(110, 4).relative_to(parent)
        );
        assert_eq!(None, Span::new(90, 4).relative_to(parent));
    }

    #[test]
    fn from_usize_saturates() {
        let span = Span::from_usize(usize::MAX, 1);
        assert_eq!(u32::MAX, span.offset());
    }

    #[test]
    fn from_byte_interval_computes_len() {
        assert_eq!(Span::new(3, 4), Span::from_byte_interval((3, 7)));
    }
}
