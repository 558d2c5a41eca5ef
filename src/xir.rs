// XML IR (XIR)
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

//! Intermediate representation (IR) of an XML document.
//!
//! XIR serves as an abstraction layer atop of whatever XML library is
//!   used (currently `quick_xml`).
//! XIR is _not_ intended to be comprehensive,
//!   or even general-purpose---it
//!     exists only to hand the IDL compiler a tree it can navigate.
//!
//! The compiler never sees the tree type directly;
//!   it is written against the [`DocumentNode`] capability,
//!   which is all it needs from a document:
//!     indexed children,
//!     attribute lookup,
//!     and character data.
//!
//! To parse an entire XML document,
//!   see [`reader`].

mod error;
pub mod reader;
pub mod tree;

pub use error::{Error, MissingAttr};
pub use reader::XmlTreeReader;
pub use tree::{Attr, DocType, Document, Element};

use crate::span::Span;

/// Navigation capability over a node of an XML document tree.
///
/// Children are elements only;
///   character data is accumulated into [`DocumentNode::text`].
pub trait DocumentNode: Sized {
    /// Qualified name of the element
    ///   (e.g. `CIDIDL:Method`).
    fn name(&self) -> &str;

    /// Source location of the element.
    fn span(&self) -> Span;

    fn child_count(&self) -> usize;

    /// Child element at the 0-based `index`,
    ///   in document order.
    fn child_at(&self, index: usize) -> Option<&Self>;

    /// Value of the attribute `name`,
    ///   if present.
    fn attr(&self, name: &str) -> Option<&str>;

    /// Source location of the attribute `name`,
    ///   if present and known.
    fn attr_span(&self, name: &str) -> Option<Span>;

    /// Concatenated character data of this element.
    fn text(&self) -> &str;

    /// Value of the attribute `name`,
    ///   failing if it is absent.
    fn required_attr(&self, name: &str) -> Result<&str, MissingAttr> {
        self.attr(name).ok_or_else(|| MissingAttr {
            element: self.name().to_string(),
            attr: name.to_string(),
            span: self.span(),
        })
    }

    /// Location of the attribute `name` if known,
    ///   otherwise the location of this element.
    fn attr_span_or_self(&self, name: &str) -> Span {
        self.attr_span(name).unwrap_or_else(|| self.span())
    }

    /// Iterate over child elements in document order.
    fn iter_children(&self) -> Children<'_, Self> {
        Children {
            node: self,
            index: 0,
        }
    }
}

/// Iterator over the children of a [`DocumentNode`].
///
/// See [`DocumentNode::iter_children`].
pub struct Children<'a, N: DocumentNode> {
    node: &'a N,
    index: usize,
}

impl<'a, N: DocumentNode> Iterator for Children<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.node.child_at(self.index)?;
        self.index += 1;
        Some(child)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remain = self.node.child_count().saturating_sub(self.index);
        (remain, Some(remain))
    }
}
