// XIR error information
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

//! XIR error information.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
};
use std::{
    fmt::{self, Display},
    str::Utf8Error,
};

/// Error attempting to read an XML document into a tree.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Syntax error reported by the underlying XML parser.
    ///
    /// The parser's own error is rendered to a string so that it can be
    ///   compared and cloned.
    Syntax(String, Span),

    /// A UTF-8 error together with the span of the offending bytes.
    InvalidUtf8(Utf8Error, Span),

    /// XML 1.0 only.
    UnsupportedXmlVersion(String, Span),

    /// The compiler expects UTF-8 encoding for everything,
    ///   which should not be an unreasonable expectation.
    UnsupportedEncoding(String, Span),

    /// The DOCTYPE declaration could not be understood.
    BadDocType(String, Span),

    /// An element was still open when the document ended.
    UnclosedElement(String, Span),

    /// A second root element follows the first.
    MultipleRoots { first: Span, second: Span },

    /// Non-whitespace character data outside of the root element.
    TextOutsideRoot(Span),

    /// The document contains no root element.
    EmptyDocument,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg, _) => write!(f, "XML syntax error: {msg}"),
            Self::InvalidUtf8(inner, _) => write!(f, "{inner}"),
            Self::UnsupportedXmlVersion(ver, _) => write!(
                f,
                "expected XML version `1.0`, \
                   but found unsupported version `{ver}`"
            ),
            Self::UnsupportedEncoding(enc, _) => write!(
                f,
                "expected `utf-8` or `UTF-8` encoding, \
                   but found unsupported encoding `{enc}`"
            ),
            Self::BadDocType(msg, _) => {
                write!(f, "malformed DOCTYPE declaration: {msg}")
            }
            Self::UnclosedElement(name, _) => {
                write!(f, "element `{name}` is never closed")
            }
            Self::MultipleRoots { .. } => {
                write!(f, "document contains more than one root element")
            }
            Self::TextOutsideRoot(_) => {
                write!(f, "character data outside of the root element")
            }
            Self::EmptyDocument => write!(f, "document has no root element"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUtf8(err, ..) => Some(err),
            _ => None,
        }
    }
}

impl Diagnostic for Error {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Syntax(_, span) | Self::InvalidUtf8(_, span) => {
                vec![span.mark_error()]
            }
            Self::UnsupportedXmlVersion(_, span) => span
                .error("unsupported version")
                .with_help("use `version=\"1.0\"`")
                .into(),
            Self::UnsupportedEncoding(_, span) => span
                .error("unsupported encoding")
                .with_help("use `encoding=\"utf-8\"` or remove the attribute")
                .into(),
            Self::BadDocType(_, span) => vec![span.mark_error()],
            Self::UnclosedElement(_, span) => {
                vec![span.error("element opened here")]
            }
            Self::MultipleRoots { first, second } => vec![
                first.note("first root element"),
                second.error("second root element"),
            ],
            Self::TextOutsideRoot(span) => vec![span.mark_error()],
            Self::EmptyDocument => vec![],
        }
    }
}

/// A required attribute is absent from an element.
///
/// This is raised by [`DocumentNode::required_attr`](super::DocumentNode)
///   and is converted by callers into an error carrying the context of
///   the declaration being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAttr {
    pub element: String,
    pub attr: String,
    pub span: Span,
}

impl Display for MissingAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "element `{}` is missing required attribute `{}`",
            self.element, self.attr
        )
    }
}

impl std::error::Error for MissingAttr {}

impl Diagnostic for MissingAttr {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        vec![self.span.error(format!("expected `{}` here", self.attr))]
    }
}
