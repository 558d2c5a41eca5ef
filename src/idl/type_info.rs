// Type references and method parameters
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

//! Type references and method parameters.
//!
//! A [`TypeInfo`] is parsed from a type element
//!   (e.g. `<CIDIDL:TVector CIDIDL:ElemType="TString"/>`)
//!   appearing as the child of a `CIDIDL:Param` or `CIDIDL:RetType`.

use super::{is_yes, IdlError, Malformed, MoveDenied};
use crate::{
    qname::*,
    span::Span,
    types::{AuxAttr, ParamDir, TypeGroup, TypeKind},
    xir::DocumentNode,
};

/// A resolved type along with its auxiliary attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    kind: TypeKind,
    aux: Vec<(AuxAttr, String)>,
    span: Span,
}

impl TypeInfo {
    /// Parse a type element used in the position `group`.
    pub fn parse<N: DocumentNode>(
        node: &N,
        group: TypeGroup,
    ) -> Result<Self, IdlError> {
        let kind = TypeKind::resolve_element(node.name())
            .map_err(|e| IdlError::UnknownType(e, node.span()))?;

        if !kind.in_group(group) {
            return Err(IdlError::malformed(
                node.name(),
                Malformed::TypeNotAllowed(kind, group),
                node.span(),
            ));
        }

        let aux = kind
            .aux_attrs()
            .iter()
            .map(|&(aux, _)| {
                node.required_attr(aux.attr_name())
                    .map(|value| (aux, value.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind,
            aux,
            span: node.span(),
        })
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn aux(&self, attr: AuxAttr) -> Option<&str> {
        self.aux
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, value)| value.as_str())
    }

    /// Element type of a collection,
    ///   or the named type of an `Enumerated` or `Object`.
    pub fn elem_type(&self) -> Option<&str> {
        self.aux(AuxAttr::ElemType).or_else(|| self.aux(AuxAttr::Type))
    }

    pub fn key_type(&self) -> Option<&str> {
        self.aux(AuxAttr::KeyType)
    }

    pub fn key_ops(&self) -> Option<&str> {
        self.aux(AuxAttr::KeyOps)
    }

    pub fn key_extract(&self) -> Option<&str> {
        self.aux(AuxAttr::KeyExtract)
    }

    pub fn modulus(&self) -> Option<&str> {
        self.aux(AuxAttr::Modulus)
    }

    pub fn is_move_eligible(&self) -> bool {
        self.kind.is_move_eligible()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A parameter of a method or server constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParam {
    name: String,
    dir: ParamDir,
    default: Option<String>,
    moveable: bool,
    ty: TypeInfo,
    span: Span,
}

impl MethodParam {
    /// Parse a `CIDIDL:Param` of the method named `method`.
    pub fn parse<N: DocumentNode>(
        method: &str,
        node: &N,
    ) -> Result<Self, IdlError> {
        let name = node.required_attr(QN_NAME)?.to_string();
        let dir_attr = node.required_attr(QN_DIR)?;

        let dir = ParamDir::from_attr(dir_attr).ok_or_else(|| {
            IdlError::malformed(
                method,
                Malformed::BadKeyword {
                    attr: QN_DIR,
                    value: dir_attr.into(),
                },
                node.attr_span_or_self(QN_DIR),
            )
        })?;

        let ty_node = node.child_at(0).ok_or_else(|| {
            IdlError::malformed(method, Malformed::MissingType, node.span())
        })?;
        let ty = TypeInfo::parse(ty_node, TypeGroup::Param)?;

        let moveable = is_yes(node, QN_MOVEABLE);

        if moveable {
            let reason = match (dir, ty.kind()) {
                (ParamDir::Out, _) => Some(MoveDenied::OutParam),
                (_, kind) if !kind.is_move_eligible() => {
                    Some(MoveDenied::NotEligible(kind))
                }
                _ => None,
            };

            if let Some(reason) = reason {
                return Err(IdlError::InvalidMoveRequest {
                    method: method.into(),
                    param: name,
                    reason,
                    span: node.attr_span_or_self(QN_MOVEABLE),
                });
            }
        }

        // An abstract buffer cannot be reconstructed by the receiver.
        if ty.kind() == TypeKind::TMemBuf && dir != ParamDir::In {
            return Err(IdlError::InvalidParameterType {
                method: method.into(),
                param: name,
                ty: ty.kind(),
                dir,
                span: node.attr_span_or_self(QN_DIR),
            });
        }

        let default = node.attr(QN_DEF_VAL).map(String::from);

        // A buffer's byte count precedes it and has no default.
        if default.is_some() && ty.kind().is_mem_buf() {
            return Err(IdlError::malformed(
                method,
                Malformed::BufferDefault(name),
                node.attr_span_or_self(QN_DEF_VAL),
            ));
        }

        Ok(Self {
            name,
            dir,
            default,
            moveable,
            ty,
            span: node.span(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> ParamDir {
        self.dir
    }

    /// Default value expression.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_moveable(&self) -> bool {
        self.moveable
    }

    pub fn ty(&self) -> &TypeInfo {
        &self.ty
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod test;
