// IDL semantic errors
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

//! Errors raised while building the IDL model from a document tree.
//!
//! These are raised only for documents that are well-formed and,
//!   ordinarily,
//!   schema-valid;
//!     they describe rules that the schema cannot express.

use super::TextVal;
use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    fmt::ConjList,
    span::Span,
    types::{ParamDir, TypeGroup, TypeKind, UnknownType},
    xir::MissingAttr,
};
use std::{error::Error, fmt::Display};

/// A semantic error in an IDL document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdlError {
    /// A declaration violates a rule not captured by the schema.
    ///
    /// `decl` names the declaration
    ///   (e.g. the enum or method)
    ///   or,
    ///     if it has no name,
    ///     the element.
    MalformedInput {
        decl: String,
        reason: Malformed,
        span: Span,
    },

    /// A type name is not in the type catalog.
    UnknownType(UnknownType, Span),

    /// A parameter was marked moveable but cannot be moved.
    InvalidMoveRequest {
        method: String,
        param: String,
        reason: MoveDenied,
        span: Span,
    },

    /// A parameter type cannot be used with the parameter's direction.
    InvalidParameterType {
        method: String,
        param: String,
        ty: TypeKind,
        dir: ParamDir,
        span: Span,
    },

    /// An element other than one of `expected` was found.
    UnexpectedElement {
        expected: &'static [&'static str],
        found: String,
        span: Span,
    },
}

impl IdlError {
    pub(super) fn malformed<D: Into<String>>(
        decl: D,
        reason: Malformed,
        span: Span,
    ) -> Self {
        Self::MalformedInput {
            decl: decl.into(),
            reason,
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::MalformedInput { span, .. }
            | Self::UnknownType(_, span)
            | Self::InvalidMoveRequest { span, .. }
            | Self::InvalidParameterType { span, .. }
            | Self::UnexpectedElement { span, .. } => *span,
        }
    }
}

impl From<MissingAttr> for IdlError {
    fn from(e: MissingAttr) -> Self {
        Self::MalformedInput {
            decl: e.element,
            reason: Malformed::MissingAttr(e.attr),
            span: e.span,
        }
    }
}

impl Display for IdlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput { decl, reason, .. } => {
                write!(f, "malformed declaration `{decl}`: {reason}")
            }
            Self::UnknownType(e, _) => Display::fmt(e, f),
            Self::InvalidMoveRequest {
                method,
                param,
                reason,
                ..
            } => write!(
                f,
                "parameter `{param}` of method `{method}` cannot be moved: \
                    {reason}"
            ),
            Self::InvalidParameterType {
                method,
                param,
                ty,
                dir,
                ..
            } => write!(
                f,
                "parameter `{param}` of method `{method}` cannot be \
                    of type `{ty}` with direction `{dir}`"
            ),
            Self::UnexpectedElement {
                expected, found, ..
            } => write!(
                f,
                "expected {}, found `{found}`",
                ConjList::or(expected)
            ),
        }
    }
}

impl Error for IdlError {}

impl Diagnostic for IdlError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::MalformedInput { reason, span, .. } => reason.describe(*span),
            Self::UnknownType(UnknownType(name), span) => {
                vec![span.error(format!("`{name}` is not a known type"))]
            }
            Self::InvalidMoveRequest { reason, span, .. } => span
                .error("moveable requested here")
                .with_help(match reason {
                    MoveDenied::OutParam => {
                        "output parameters are never moved; \
                            remove `CIDIDL:Moveable`"
                    }
                    MoveDenied::NotEligible(_) => {
                        "only strings, buffers, objects, and collections \
                            may be moved"
                    }
                })
                .into(),
            Self::InvalidParameterType { ty, span, .. } => span
                .error(format!("`{ty}` may only be an input parameter"))
                .with_help("use `CIDIDL:THeapBuf` for output parameters")
                .into(),
            Self::UnexpectedElement { expected, span, .. } => span
                .error("unexpected element")
                .with_help(format!("expected {}", ConjList::or(expected)))
                .into(),
        }
    }
}

/// Why a parameter cannot be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDenied {
    OutParam,
    NotEligible(TypeKind),
}

impl Display for MoveDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutParam => write!(f, "it is an output parameter"),
            Self::NotEligible(ty) => {
                write!(f, "values of type `{ty}` are not moveable")
            }
        }
    }
}

/// The rule broken by a [`IdlError::MalformedInput`] declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// Enum type is neither `Std` nor `Bmp`.
    BadEnumShape(String),

    /// A bitmap enum value has no `CIDIDL:Value`.
    ValueRequired(String),

    /// A standard enum value has a `CIDIDL:Value`.
    ValueNotUsed(String),

    BadAltTextSrc(String),

    /// Alt text pattern lacks the `%(v)` token.
    PatternMissingToken(String),

    BitmapBaseNotUnsigned(TypeKind),

    /// A text mapping attribute names an unknown text value.
    BadTextTarget { attr: &'static str, value: String },

    /// A text mapping refers to text that the enum does not provide.
    TextSourceDisabled { attr: &'static str, target: TextVal },

    MissingAttr(String),

    /// A bitmap enum value is not a hexadecimal literal.
    BadBitmapValue { value: String, literal: String },

    BadNumber { attr: &'static str, value: String },

    BadKeyword { attr: &'static str, value: String },

    /// A sub-structure references a structure not yet declared.
    UnknownStruct(String),

    /// A section appears more than once within an interface.
    DuplicateSection(&'static str),

    /// The root element is not `CIDIDL:Interface`.
    BadRoot(String),

    /// An enum declares no values.
    NoValues,

    /// An element with no type element.
    MissingType,

    /// A type is used where its group does not permit it.
    TypeNotAllowed(TypeKind, TypeGroup),

    /// A buffer parameter has a `CIDIDL:DefVal`.
    BufferDefault(String),
}

impl Malformed {
    fn describe(&self, span: Span) -> Vec<AnnotatedSpan<'static>> {
        use Malformed::*;

        match self {
            BadEnumShape(_) => span
                .error("unknown enum type")
                .with_help("expected `Std` or `Bmp`")
                .into(),
            ValueRequired(_) => span
                .error("bitmap values require `CIDIDL:Value`")
                .into(),
            ValueNotUsed(_) => span
                .error("`CIDIDL:Value` is not permitted here")
                .with_help(
                    "standard enums are numbered automatically; \
                        use `CIDIDL:Type=\"Bmp\"` for explicit values",
                )
                .into(),
            BadAltTextSrc(_) => span
                .error("unknown alt text source")
                .with_help("expected `No`, `Inline`, or `Pattern`")
                .into(),
            PatternMissingToken(_) => span
                .error("pattern does not contain `%(v)`")
                .with_help("`%(v)` is replaced by the name of each value")
                .into(),
            BitmapBaseNotUnsigned(_) => span
                .error("bitmap enums must have an unsigned base type")
                .into(),
            BadTextTarget { .. } => span
                .error("unknown text value")
                .with_help(
                    "expected `No`, `AltText`, `AltText2`, `BaseName`, \
                        `Name`, or `Text`",
                )
                .into(),
            TextSourceDisabled { target, .. } => span
                .error(format!("this enum does not provide {target} text"))
                .into(),
            MissingAttr(attr) => span.error(format!("missing `{attr}`")).into(),
            BadBitmapValue { .. } => span
                .error("invalid bitmap value")
                .with_help("bitmap values must be hexadecimal, e.g. `0x10`")
                .into(),
            BadNumber { .. } => span.error("expected a number").into(),
            BadKeyword { .. } => span.error("unknown keyword").into(),
            UnknownStruct(name) => span
                .error(format!("structure `{name}` has not been declared"))
                .with_help("structures must be declared before they are used")
                .into(),
            DuplicateSection(_) => {
                span.error("section has already been declared").into()
            }
            BadRoot(_) => span
                .error("expected `CIDIDL:Interface` as the root element")
                .into(),
            NoValues => {
                span.error("enum must declare at least one value").into()
            }
            MissingType => span.error("expected a type element").into(),
            TypeNotAllowed(ty, _) => {
                span.error(format!("`{ty}` is not permitted here")).into()
            }
            BufferDefault(_) => span
                .error("buffer parameters cannot have a default value")
                .into(),
        }
    }
}

impl Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Malformed::*;

        match self {
            BadEnumShape(value) => write!(f, "unknown enum type `{value}`"),
            ValueRequired(name) => {
                write!(f, "bitmap value `{name}` requires a value")
            }
            ValueNotUsed(name) => {
                write!(f, "value `{name}` of a standard enum may not have a value")
            }
            BadAltTextSrc(value) => {
                write!(f, "unknown alt text source `{value}`")
            }
            PatternMissingToken(pattern) => {
                write!(f, "alt text pattern `{pattern}` does not contain `%(v)`")
            }
            BitmapBaseNotUnsigned(ty) => {
                write!(f, "bitmap base type `{ty}` is not unsigned")
            }
            BadTextTarget { attr, value } => {
                write!(f, "unknown text value `{value}` for `{attr}`")
            }
            TextSourceDisabled { attr, target } => write!(
                f,
                "`{attr}` maps to {target} text, which is not enabled"
            ),
            MissingAttr(attr) => write!(f, "missing required attribute `{attr}`"),
            BadBitmapValue { value, literal } => write!(
                f,
                "bitmap value `{value}` has non-hexadecimal value `{literal}`"
            ),
            BadNumber { attr, value } => {
                write!(f, "`{attr}` value `{value}` is not a valid number")
            }
            BadKeyword { attr, value } => {
                write!(f, "unknown `{attr}` value `{value}`")
            }
            UnknownStruct(name) => write!(f, "unknown structure `{name}`"),
            DuplicateSection(section) => {
                write!(f, "duplicate section `{section}`")
            }
            BadRoot(found) => write!(
                f,
                "root element is `{found}`, not `CIDIDL:Interface`"
            ),
            NoValues => write!(f, "enum has no values"),
            MissingType => write!(f, "missing type element"),
            TypeNotAllowed(ty, group) => write!(
                f,
                "type `{ty}` is not permitted in {}",
                group.entity_name()
            ),
            BufferDefault(param) => {
                write!(f, "buffer parameter `{param}` has a default value")
            }
        }
    }
}
