// IDL declaration model
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

//! Typed model of IDL declarations.
//!
//! Each declaration is parsed from a [`DocumentNode`] that is expected to
//!   have already been validated against the schema
//!     (see [`crate::dtd`]),
//!   with default attribute values filled in.
//! Parsing does not trust that expectation completely:
//!   a missing attribute or element is reported as an [`IdlError`] rather
//!   than a panic,
//!     since schema validation may be skipped by callers that construct
//!     trees themselves.
//!
//! Models are immutable once parsed and know nothing of the target
//!   language,
//!     with the exception of [`EnumInfo`],
//!     whose rendering is tied to the runtime mapping table that its
//!     generated functions share.

mod decl;
mod enum_info;
mod error;
mod struct_info;
mod type_info;

pub use decl::{
    ClassIntf, ConstantDecl, GlobalBlock, GlobalSection, IdlDocument,
    MethodDecl, TypeDecl, DEFAULT_CLIENT_BASE, DEFAULT_SERVER_BASE,
    INTERFACE_ID_CONST, POLL_TIMEOUT_MS, TIMEOUT_MS,
};
pub use enum_info::{
    AltTextSrc, EnumInfo, EnumShape, EnumSynonym, EnumValue, IncDecOps,
    TextSrc, TextVal, PATTERN_TOKEN,
};
pub use error::{IdlError, Malformed, MoveDenied};
pub use struct_info::{StructInfo, StructMember};
pub use type_info::{MethodParam, TypeInfo};

use crate::{
    qname::{QN_DOC_TEXT, YES},
    xir::DocumentNode,
};

/// Value of the optional attribute `name`,
///   or `default` if absent.
fn attr_or<'n, N: DocumentNode>(
    node: &'n N,
    name: &str,
    default: &'n str,
) -> &'n str {
    node.attr(name).unwrap_or(default)
}

/// Whether the `(Yes|No)` attribute `name` is `Yes`.
fn is_yes<N: DocumentNode>(node: &N, name: &str) -> bool {
    node.attr(name) == Some(YES)
}

/// Documentation text of the first `CIDIDL:DocText` child,
///   if any.
fn doc_text<N: DocumentNode>(node: &N) -> Option<String> {
    node.iter_children()
        .find(|child| child.name() == QN_DOC_TEXT)
        .map(|doc| doc.text().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Fail unless `node` is named `expected`.
fn expect_element<N: DocumentNode>(
    node: &N,
    expected: &'static [&'static str],
) -> Result<(), IdlError> {
    match expected.iter().any(|name| *name == node.name()) {
        true => Ok(()),
        false => Err(IdlError::UnexpectedElement {
            expected,
            found: node.name().into(),
            span: node.span(),
        }),
    }
}
