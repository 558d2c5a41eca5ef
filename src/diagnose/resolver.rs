// Diagnostic span resolver
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

//! Resolve [`Span`]s into line:column source locations.

use crate::span::Span;
use std::{
    error::Error,
    fmt::{self, Display},
    num::NonZeroU32,
};
use unicode_width::UnicodeWidthChar;

/// Resolves [`Span`]s into line:column source locations.
///
/// A [`Span`] contains only raw byte offsets gathered during parsing.
/// Those offsets are resolved into line and column numbers only when a
///   diagnostic is actually rendered,
///     which is not the typical happy path of the compiler.
pub trait SpanResolver {
    /// Resolve the provided [`Span`] into line:column source locations.
    fn resolve(
        &mut self,
        span: Span,
    ) -> Result<ResolvedSpan, SpanResolverError>;

    /// Name of the source that spans are resolved against,
    ///   used as the context in report headings.
    fn context(&self) -> &str;
}

/// A [`Span`] resolved to its source location.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The original [`Span`] whose resolution was requested.
    span: Span,

    /// 1-indexed line number of the first byte of the span.
    num: NonZeroU32,

    /// 1-indexed column(s) relative to the beginning of the line,
    ///   if they could be computed.
    column: Option<Column>,

    /// The [`Span`] representing the entire first source line,
    ///   excluding its newline.
    line_span: Span,

    /// Source text of the first line.
    text: String,
}

/// Data interpreted from a [`ResolvedSpan`] or equivalent.
pub trait ResolvedSpanData {
    /// Line number representing the offset of the [`Span`].
    fn line_num(&self) -> NonZeroU32;

    /// Column number(s) relative to the beginning of the first line.
    ///
    /// The column may not be able to be resolved if the span does not fall
    ///   on a character boundary.
    fn col_num(&self) -> Option<Column>;

    /// A [`Span`] representing the first line.
    fn first_line_span(&self) -> Span;

    /// The original [`Span`] before resolution.
    fn unresolved_span(&self) -> Span;

    /// Source text of the first line.
    fn line_text(&self) -> &str;
}

impl ResolvedSpanData for ResolvedSpan {
    fn line_num(&self) -> NonZeroU32 {
        self.num
    }

    fn col_num(&self) -> Option<Column> {
        self.column
    }

    fn first_line_span(&self) -> Span {
        self.line_span
    }

    fn unresolved_span(&self) -> Span {
        self.span
    }

    fn line_text(&self) -> &str {
        &self.text
    }
}

/// Source column offsets.
///
/// A "column" is somewhat loosely defined as a terminal cell.
/// Certain unicode characters occupy more than one cell,
///   while others occupy none.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Column {
    /// A range of 1-indexed columns, inclusive.
    Endpoints(NonZeroU32, NonZeroU32),

    /// Immediately before a column.
    ///
    /// This is caused by a zero-length [`Span`].
    Before(NonZeroU32),
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Coerces to a single column number.
            Self::Endpoints(at, _) | Self::Before(at) => Display::fmt(at, f),
        }
    }
}

/// Resolve spans against an in-memory source document.
///
/// The compiler reads the entire IDL file into memory before parsing it,
///   so there is no need to go back to the filesystem to resolve spans.
pub struct SourceSpanResolver<'s> {
    name: String,
    text: &'s str,
}

impl<'s> SourceSpanResolver<'s> {
    pub fn new<S: Into<String>>(name: S, text: &'s str) -> Self {
        Self {
            name: name.into(),
            text,
        }
    }
}

impl<'s> SpanResolver for SourceSpanResolver<'s> {
    fn resolve(
        &mut self,
        span: Span,
    ) -> Result<ResolvedSpan, SpanResolverError> {
        let bytes = self.text.as_bytes();
        let offset = span.offset() as usize;

        if offset > bytes.len() || span.end() as usize > bytes.len() {
            return Err(SpanResolverError::OutOfRange {
                span,
                len: bytes.len(),
            });
        }

        let line_start = memchr::memrchr(b'\n', &bytes[..offset])
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = memchr::memchr(b'\n', &bytes[offset..])
            .map(|i| offset + i)
            .unwrap_or(bytes.len());

        let nl_count = memchr::memchr_iter(b'\n', &bytes[..line_start]).count();
        let num = NonZeroU32::MIN
            .saturating_add(u32::try_from(nl_count).unwrap_or(u32::MAX));

        // The newline itself is not part of the line text;
        //   trim a preceding carriage return as well.
        let mut text_end = line_end;
        if text_end > line_start && bytes[text_end - 1] == b'\r' {
            text_end -= 1;
        }

        let text = self.text.get(line_start..text_end).unwrap_or("");
        let rel_start = offset - line_start;
        let rel_end = (span.end() as usize).min(text_end) - line_start;

        Ok(ResolvedSpan {
            span,
            num,
            column: column_for(text, rel_start, rel_end.max(rel_start)),
            line_span: Span::from_byte_interval((line_start, text_end)),
            text: text.to_string(),
        })
    }

    fn context(&self) -> &str {
        &self.name
    }
}

/// Compute visual columns for the byte interval `[start, end)` of `line`.
///
/// Yields [`None`] if either offset does not fall on a character
///   boundary.
fn column_for(line: &str, start: usize, end: usize) -> Option<Column> {
    let width = |s: &str| -> u32 {
        s.chars()
            .map(|c| c.width().unwrap_or(0) as u32)
            .sum::<u32>()
    };

    let before = width(line.get(..start)?);
    let at = NonZeroU32::MIN.saturating_add(before);

    if start == end {
        return Some(Column::Before(at));
    }

    let through = width(line.get(..end)?).max(before + 1);

    Some(Column::Endpoints(
        at,
        NonZeroU32::new(through).unwrap_or(at),
    ))
}

/// Error attempting to resolve a [`Span`].
#[derive(Debug, PartialEq, Eq)]
pub enum SpanResolverError {
    /// The span lies beyond the end of the source.
    OutOfRange { span: Span, len: usize },
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { span, len } => write!(
                f,
                "span {span} is out of range of the {len}-byte source"
            ),
        }
    }
}

impl Error for SpanResolverError {}
