// Structure declarations
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

//! Structure declarations (`CIDIDL:Struct`).
//!
//! Whether a referenced sub-structure exists is not known here;
//!   the compiler checks references against the structures declared
//!   before it.

use super::{IdlError, Malformed};
use crate::{
    qname::*,
    span::Span,
    types::{TypeGroup, TypeKind},
    xir::DocumentNode,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructMember {
    /// A scalar field.
    Field {
        name: String,
        ty: TypeKind,
        span: Span,
    },

    /// A field whose type is a previously declared structure.
    SubStruct {
        name: String,
        struct_name: String,
        span: Span,
    },
}

impl StructMember {
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::SubStruct { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Field { span, .. } | Self::SubStruct { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
    name: String,
    members: Vec<StructMember>,
    span: Span,
}

impl StructInfo {
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        let name = node.required_attr(QN_TYPE)?.to_string();

        let members = node
            .iter_children()
            .map(|child| match child.name() {
                n if n == QN_MEMBER => {
                    let ty_name = child.required_attr(QN_TYPE)?;
                    let ty_span = child.attr_span_or_self(QN_TYPE);

                    let ty = TypeKind::resolve(ty_name)
                        .map_err(|e| IdlError::UnknownType(e, ty_span))?;

                    if !ty.in_group(TypeGroup::Constant) {
                        return Err(IdlError::malformed(
                            name.as_str(),
                            Malformed::TypeNotAllowed(ty, TypeGroup::Constant),
                            ty_span,
                        ));
                    }

                    Ok(StructMember::Field {
                        name: child.required_attr(QN_NAME)?.into(),
                        ty,
                        span: child.span(),
                    })
                }
                n if n == QN_SUB_STRUCT => Ok(StructMember::SubStruct {
                    name: child.required_attr(QN_NAME)?.into(),
                    struct_name: child.required_attr(QN_TYPE)?.into(),
                    span: child.span(),
                }),
                other => Err(IdlError::UnexpectedElement {
                    expected: &[QN_MEMBER, QN_SUB_STRUCT],
                    found: other.into(),
                    span: child.span(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            members,
            span: node.span(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[StructMember] {
        &self.members
    }

    /// Names of the structures referenced by members,
    ///   in member order.
    pub fn sub_structs(&self) -> impl Iterator<Item = (&str, Span)> {
        self.members.iter().filter_map(|member| match member {
            StructMember::SubStruct {
                struct_name, span, ..
            } => Some((struct_name.as_str(), *span)),
            StructMember::Field { .. } => None,
        })
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
