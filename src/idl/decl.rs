// Document-level IDL declarations
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

//! Constants,
//!   types,
//!   methods,
//!   and the sections that contain them.
//!
//! [`IdlDocument::parse`] builds the entire model before anything is
//!   emitted,
//!     so that a document with an error anywhere produces no output.

use super::{
    doc_text, expect_element, is_yes, EnumInfo, IdlError, Malformed,
    MethodParam, StructInfo, TypeInfo,
};
use crate::{
    qname::*,
    span::Span,
    types::{TypeGroup, TypeKind},
    xir::DocumentNode,
};
use fxhash::FxHashSet;
use log::trace;

/// Name of the constant holding the interface id,
///   emitted first in every client and server interface.
pub const INTERFACE_ID_CONST: &str = "strInterfaceId";

/// Default timeout of a `CIDIDL:Method`.
pub const TIMEOUT_MS: u32 = 30000;

/// Default timeout of a `CIDIDL:PollMethod`.
pub const POLL_TIMEOUT_MS: u32 = 10000;

/// A named constant (`CIDIDL:Constant`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDecl {
    name: String,
    ty: TypeKind,
    value: String,
    doc: Option<String>,
    span: Span,
}

impl ConstantDecl {
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        let name = node.required_attr(QN_NAME)?.to_string();
        let ty_span = node.attr_span_or_self(QN_TYPE);

        let ty = TypeKind::resolve(node.required_attr(QN_TYPE)?)
            .map_err(|e| IdlError::UnknownType(e, ty_span))?;

        if !ty.in_group(TypeGroup::Constant) {
            return Err(IdlError::malformed(
                name,
                Malformed::TypeNotAllowed(ty, TypeGroup::Constant),
                ty_span,
            ));
        }

        Ok(Self {
            value: node.required_attr(QN_VALUE)?.into(),
            name,
            ty,
            doc: doc_text(node),
            span: node.span(),
        })
    }

    /// The [`INTERFACE_ID_CONST`] constant for the interface id `id`.
    pub fn interface_id(id: &str, span: Span) -> Self {
        Self {
            name: INTERFACE_ID_CONST.into(),
            ty: TypeKind::TString,
            value: id.into(),
            doc: None,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeKind {
        self.ty
    }

    /// Value expression.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A declaration within a `CIDIDL:Types` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    Enum { doc: Option<String>, info: EnumInfo },
    Struct(StructInfo),
}

impl TypeDecl {
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        match node.name() {
            n if n == QN_ENUM => Ok(Self::Enum {
                doc: doc_text(node),
                info: EnumInfo::parse(node)?,
            }),
            n if n == QN_STRUCT => StructInfo::parse(node).map(Self::Struct),
            other => Err(IdlError::UnexpectedElement {
                expected: &[QN_ENUM, QN_STRUCT],
                found: other.into(),
                span: node.span(),
            }),
        }
    }

    /// Parse each child of a `CIDIDL:Types` section.
    pub fn parse_all<N: DocumentNode>(node: &N) -> Result<Vec<Self>, IdlError> {
        node.iter_children().map(Self::parse).collect()
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum { info, .. } => info.name(),
            Self::Struct(info) => info.name(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Enum { info, .. } => info.span(),
            Self::Struct(info) => info.span(),
        }
    }
}

/// A `CIDIDL:Method` or `CIDIDL:PollMethod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    name: String,
    ret: TypeInfo,
    params: Vec<MethodParam>,
    is_poll: bool,
    timeout_ms: u32,
    in_base_class: bool,
    ordinal: usize,
    span: Span,
}

impl MethodDecl {
    /// Parse the method at position `ordinal` of its `CIDIDL:Methods`
    ///   section.
    ///
    /// The ordinal determines the method's slot in the server's dispatch
    ///   table and so must be its position in the document.
    pub fn parse<N: DocumentNode>(
        node: &N,
        ordinal: usize,
    ) -> Result<Self, IdlError> {
        expect_element(node, &[QN_METHOD, QN_POLL_METHOD])?;

        let name = node.required_attr(QN_NAME)?.to_string();
        let is_poll = node.name() == QN_POLL_METHOD;

        let timeout_ms = match node.attr(QN_TIMEOUT) {
            None if is_poll => POLL_TIMEOUT_MS,
            None => TIMEOUT_MS,
            Some(value) => value.trim().parse().map_err(|_| {
                IdlError::malformed(
                    name.as_str(),
                    Malformed::BadNumber {
                        attr: QN_TIMEOUT,
                        value: value.into(),
                    },
                    node.attr_span_or_self(QN_TIMEOUT),
                )
            })?,
        };

        let mut children = node.iter_children();

        let ret = children
            .next()
            .filter(|ret| ret.name() == QN_RET_TYPE)
            .and_then(|ret| ret.child_at(0))
            .ok_or_else(|| {
                IdlError::malformed(
                    name.as_str(),
                    Malformed::MissingType,
                    node.span(),
                )
            })?;
        let ret = TypeInfo::parse(ret, TypeGroup::Return)?;

        let params = children
            .map(|param| {
                expect_element(param, &[QN_PARAM])?;
                MethodParam::parse(&name, param)
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!("parsed method {ordinal} `{name}` ({} params)", params.len());

        Ok(Self {
            ret,
            params,
            is_poll,
            timeout_ms,
            in_base_class: is_yes(node, QN_IN_BASE_CLASS),
            ordinal,
            span: node.span(),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ret(&self) -> &TypeInfo {
        &self.ret
    }

    pub fn params(&self) -> &[MethodParam] {
        &self.params
    }

    pub fn is_poll(&self) -> bool {
        self.is_poll
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Whether the method is declared by the base class,
    ///   and so must not be redeclared.
    pub fn in_base_class(&self) -> bool {
        self.in_base_class
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A block of a `CIDIDL:Globals` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalBlock {
    Constants(Vec<ConstantDecl>),
    Types(Vec<TypeDecl>),
}

/// A `CIDIDL:Globals` section,
///   whose blocks are kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSection {
    blocks: Vec<GlobalBlock>,
    span: Span,
}

impl GlobalSection {
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        let blocks = node
            .iter_children()
            .map(|child| match child.name() {
                n if n == QN_CONSTANTS => {
                    parse_constants(child).map(GlobalBlock::Constants)
                }
                n if n == QN_TYPES => {
                    TypeDecl::parse_all(child).map(GlobalBlock::Types)
                }
                other => Err(IdlError::UnexpectedElement {
                    expected: &[QN_CONSTANTS, QN_TYPES],
                    found: other.into(),
                    span: child.span(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            blocks,
            span: node.span(),
        })
    }

    pub fn blocks(&self) -> &[GlobalBlock] {
        &self.blocks
    }

    /// Type declarations of every block,
    ///   in document order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.blocks.iter().flat_map(|block| match block {
            GlobalBlock::Types(types) => types.as_slice(),
            GlobalBlock::Constants(_) => &[],
        })
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A `CIDIDL:ClassIntf` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIntf {
    name: String,
    id: String,
    client_base: String,
    server_base: String,
    constants: Vec<ConstantDecl>,
    types: Option<Vec<TypeDecl>>,
    ctor: Vec<MethodParam>,
    methods: Vec<MethodDecl>,
    span: Span,
}

/// Base class of client proxies when `CIDIDL:ClientBase` is absent.
pub const DEFAULT_CLIENT_BASE: &str = "TOrbClientBase";

/// Base class of server stubs when `CIDIDL:ServerBase` is absent.
pub const DEFAULT_SERVER_BASE: &str = "TOrbServerBase";

impl ClassIntf {
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        let name = node.required_attr(QN_NAME)?.to_string();

        let mut constants = None;
        let mut types = None;
        let mut ctor = None;
        let mut methods = None;

        for child in node.iter_children() {
            let section = match child.name() {
                n if n == QN_CONSTANTS => {
                    Section::Constants(parse_constants(child)?)
                }
                n if n == QN_TYPES => Section::Types(TypeDecl::parse_all(child)?),
                n if n == QN_CTOR => Section::Ctor(
                    child
                        .iter_children()
                        .map(|param| {
                            expect_element(param, &[QN_PARAM])?;
                            MethodParam::parse(QN_CTOR, param)
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                n if n == QN_METHODS => Section::Methods(
                    child
                        .iter_children()
                        .enumerate()
                        .map(|(ordinal, method)| MethodDecl::parse(method, ordinal))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                other => {
                    return Err(IdlError::UnexpectedElement {
                        expected: &[QN_CONSTANTS, QN_TYPES, QN_CTOR, QN_METHODS],
                        found: other.into(),
                        span: child.span(),
                    })
                }
            };

            let duplicate = match section {
                Section::Constants(x) => constants.replace(x).is_some(),
                Section::Types(x) => types.replace(x).is_some(),
                Section::Ctor(x) => ctor.replace(x).is_some(),
                Section::Methods(x) => methods.replace(x).is_some(),
            };

            if duplicate {
                return Err(IdlError::malformed(
                    name,
                    Malformed::DuplicateSection(section_name(child.name())),
                    child.span(),
                ));
            }
        }

        Ok(Self {
            id: node.required_attr(QN_INTERFACE_ID)?.into(),
            client_base: node
                .attr(QN_CLIENT_BASE)
                .unwrap_or(DEFAULT_CLIENT_BASE)
                .into(),
            server_base: node
                .attr(QN_SERVER_BASE)
                .unwrap_or(DEFAULT_SERVER_BASE)
                .into(),
            constants: constants.unwrap_or_default(),
            types,
            ctor: ctor.unwrap_or_default(),
            methods: methods.unwrap_or_default(),
            span: node.span(),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Globally unique interface id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client_base(&self) -> &str {
        &self.client_base
    }

    pub fn server_base(&self) -> &str {
        &self.server_base
    }

    /// User-declared constants,
    ///   excluding [`INTERFACE_ID_CONST`].
    pub fn constants(&self) -> &[ConstantDecl] {
        &self.constants
    }

    pub fn types(&self) -> Option<&[TypeDecl]> {
        self.types.as_deref()
    }

    /// Server constructor parameters.
    pub fn ctor(&self) -> &[MethodParam] {
        &self.ctor
    }

    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A section of a `CIDIDL:ClassIntf` awaiting placement.
enum Section {
    Constants(Vec<ConstantDecl>),
    Types(Vec<TypeDecl>),
    Ctor(Vec<MethodParam>),
    Methods(Vec<MethodDecl>),
}

fn section_name(qname: &str) -> &'static str {
    [QN_CONSTANTS, QN_TYPES, QN_CTOR, QN_METHODS]
        .into_iter()
        .find(|name| *name == qname)
        .unwrap_or(QN_CLASS_INTF)
}

fn parse_constants<N: DocumentNode>(
    node: &N,
) -> Result<Vec<ConstantDecl>, IdlError> {
    node.iter_children()
        .map(|child| {
            expect_element(child, &[QN_CONSTANT])?;
            ConstantDecl::parse(child)
        })
        .collect()
}

/// A complete `CIDIDL:Interface` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlDocument {
    globals: Vec<GlobalSection>,
    class_intf: Option<ClassIntf>,
}

impl IdlDocument {
    /// Parse the document rooted at `root`.
    ///
    /// Structures may reference only structures declared earlier in the
    ///   document.
    pub fn parse<N: DocumentNode>(root: &N) -> Result<Self, IdlError> {
        if root.name() != QN_INTERFACE {
            return Err(IdlError::malformed(
                root.name(),
                Malformed::BadRoot(root.name().into()),
                root.span(),
            ));
        }

        let mut globals = Vec::new();
        let mut class_intf = None;

        for child in root.iter_children() {
            match child.name() {
                n if n == QN_GLOBALS => globals.push(GlobalSection::parse(child)?),
                n if n == QN_CLASS_INTF => {
                    let intf = ClassIntf::parse(child)?;

                    if class_intf.replace(intf).is_some() {
                        return Err(IdlError::malformed(
                            QN_INTERFACE,
                            Malformed::DuplicateSection(QN_CLASS_INTF),
                            child.span(),
                        ));
                    }
                }
                other => {
                    return Err(IdlError::UnexpectedElement {
                        expected: &[QN_GLOBALS, QN_CLASS_INTF],
                        found: other.into(),
                        span: child.span(),
                    })
                }
            }
        }

        let doc = Self {
            globals,
            class_intf,
        };

        doc.check_struct_refs()?;
        Ok(doc)
    }

    fn check_struct_refs(&self) -> Result<(), IdlError> {
        let intf_types = self
            .class_intf
            .iter()
            .flat_map(|intf| intf.types().unwrap_or_default());

        let mut declared: FxHashSet<&str> = FxHashSet::default();
        let decls = self
            .globals
            .iter()
            .flat_map(GlobalSection::types)
            .chain(intf_types);

        for decl in decls {
            if let TypeDecl::Struct(info) = decl {
                if let Some((name, span)) =
                    info.sub_structs().find(|(name, _)| !declared.contains(*name))
                {
                    return Err(IdlError::malformed(
                        info.name(),
                        Malformed::UnknownStruct(name.into()),
                        span,
                    ));
                }

                declared.insert(info.name());
            }
        }

        Ok(())
    }

    pub fn globals(&self) -> &[GlobalSection] {
        &self.globals
    }

    pub fn class_intf(&self) -> Option<&ClassIntf> {
        self.class_intf.as_ref()
    }
}
