// XIR document tree
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

//! Owned XML document tree.
//!
//! IDL documents are small,
//!   and the compiler needs random access to children by index
//!   (method ordinals are child positions),
//!   so the whole document is materialized as a tree of [`Element`]s
//!   rather than processed as a stream.
//!
//! Trees are usually produced by [`XmlTreeReader`](super::XmlTreeReader),
//!   but can also be built directly using the builder-style methods on
//!   [`Element`],
//!     which is convenient for tests:
//!
//! ```
//! use cididl::xir::{DocumentNode, Element};
//! use cididl::span::UNKNOWN_SPAN;
//!
//! let ele = Element::new("CIDIDL:Param", UNKNOWN_SPAN)
//!     .with_attr("CIDIDL:Name", "key")
//!     .with_attr("CIDIDL:Dir", "In")
//!     .with_child(Element::new("CIDIDL:TString", UNKNOWN_SPAN));
//!
//! assert_eq!(Some("key"), ele.attr("CIDIDL:Name"));
//! assert_eq!(1, ele.child_count());
//! ```

use super::DocumentNode;
use crate::span::{Span, UNKNOWN_SPAN};

/// A parsed document:
///   the optional DOCTYPE declaration and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<DocType>,
    pub root: Element,
}

/// External identifiers of a `<!DOCTYPE ...>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    pub root_name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    pub span: Span,
}

/// A single attribute of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: String,
    value: String,
    span: Span,

    /// Whether the value was supplied by a schema default rather than by
    ///   the document.
    defaulted: bool,
}

impl Attr {
    pub fn new<N: Into<String>, V: Into<String>>(
        name: N,
        value: V,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
            defaulted: false,
        }
    }

    /// Attribute whose value was filled in from a schema default.
    pub fn new_default<N: Into<String>, V: Into<String>>(
        name: N,
        value: V,
        span: Span,
    ) -> Self {
        Self {
            defaulted: true,
            ..Self::new(name, value, span)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }
}

/// An element node with its attributes,
///   child elements,
///   and accumulated character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<Attr>,
    children: Vec<Element>,
    text: String,
    span: Span,
}

impl Element {
    pub fn new<N: Into<String>>(name: N, span: Span) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            span,
        }
    }

    /// Add an attribute with an unknown span.
    pub fn with_attr<N: Into<String>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.push_attr(Attr::new(name, value, UNKNOWN_SPAN));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn with_text<T: AsRef<str>>(mut self, text: T) -> Self {
        self.push_text(text.as_ref());
        self
    }

    /// Add an attribute,
    ///   replacing any existing attribute of the same name.
    pub fn push_attr(&mut self, attr: Attr) {
        match self.attrs.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => *existing = attr,
            None => self.attrs.push(attr),
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    pub fn find_attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Extend the span of this element,
    ///   e.g. to cover its closing tag.
    pub fn extend_span(&mut self, span: Span) {
        self.span = self.span.merge(span);
    }

    /// Whether the character data of this element is only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl DocumentNode for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn span(&self) -> Span {
        self.span
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.find_attr(name).map(Attr::value)
    }

    fn attr_span(&self, name: &str) -> Option<Span> {
        self.find_attr(name).map(Attr::span)
    }

    fn text(&self) -> &str {
        &self.text
    }
}
