// CIDIDL formatting helpers
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

//! Formatting helpers.
//!
//! [`ConjList`] renders a list of names as English text for use in
//!   diagnostic messages:
//!
//! ```
//! # use cididl::fmt::ConjList;
//! assert_eq!(
//!     ConjList::or(&["CIDIDL:Globals", "CIDIDL:ClassIntf"]).to_string(),
//!     "`CIDIDL:Globals` or `CIDIDL:ClassIntf`",
//! );
//!
//! assert_eq!(
//!     ConjList::and(&["a", "b", "c"]).to_string(),
//!     "`a`, `b`, and `c`",
//! );
//! ```
//!
//! [`Indent`] is a [`fmt::Write`] adapter used by code generation to
//!   indent blocks of generated text without threading an indentation
//!   level through every write.

use std::fmt::{self, Display};

/// A list of items each quoted in backticks,
///   joined with a serial comma and a conjunction.
///
/// The serial comma is omitted for two items.
pub struct ConjList<'a, T: Display> {
    items: &'a [T],
    conj: &'static str,
}

impl<'a, T: Display> ConjList<'a, T> {
    /// Alternatives ("`a`, `b`, or `c`").
    pub fn or(items: &'a [T]) -> Self {
        Self { items, conj: "or" }
    }

    pub fn and(items: &'a [T]) -> Self {
        Self { items, conj: "and" }
    }
}

impl<'a, T: Display> Display for ConjList<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items {
            [] => Ok(()),
            [only] => write!(f, "`{only}`"),
            [first, second] => write!(f, "`{first}` {} `{second}`", self.conj),
            [init @ .., last] => {
                for item in init {
                    write!(f, "`{item}`, ")?;
                }
                write!(f, "{} `{last}`", self.conj)
            }
        }
    }
}

/// Indent each non-empty line written through the wrapped writer.
pub struct Indent<'w, W: fmt::Write> {
    inner: &'w mut W,
    width: usize,
    line_start: bool,
}

impl<'w, W: fmt::Write> Indent<'w, W> {
    pub fn new(inner: &'w mut W, width: usize) -> Self {
        Self {
            inner,
            width,
            line_start: true,
        }
    }
}

impl<'w, W: fmt::Write> fmt::Write for Indent<'w, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            if self.line_start && line != "\n" {
                write!(self.inner, "{:1$}", "", self.width)?;
            }

            self.inner.write_str(line)?;
            self.line_start = line.ends_with('\n');
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn conj_list_empty() {
        assert_eq!("", ConjList::<&str>::or(&[]).to_string());
    }

    #[test]
    fn conj_list_single() {
        assert_eq!("`a`", ConjList::or(&["a"]).to_string());
    }

    #[test]
    fn conj_list_pair_has_no_comma() {
        assert_eq!("`a` and `b`", ConjList::and(&["a", "b"]).to_string());
    }

    #[test]
    fn conj_list_many() {
        assert_eq!(
            "`a`, `b`, `c`, or `d`",
            ConjList::or(&["a", "b", "c", "d"]).to_string()
        );
    }

    #[test]
    fn indent_prefixes_lines_across_writes() -> fmt::Result {
        let mut out = String::new();

        {
            let mut ind = Indent::new(&mut out, 4);
            write!(ind, "foo")?;
            write!(ind, "bar\nbaz\n")?;
            write!(ind, "\nquux\n")?;
        }

        assert_eq!("    foobar\n    baz\n\n    quux\n", out);
        Ok(())
    }
}
