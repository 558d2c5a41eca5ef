// IDL document schema
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

//! Embedded document schema.
//!
//! The legal shape of an IDL document is described by a DTD.
//! Rather than embedding DTD text and parsing it back out,
//!   the schema is held as data ([`Schema`]);
//!     the DTD text is _rendered_ from that data
//!       (see [`Schema::dtd_text`])
//!     and the same data drives validation of a parsed tree
//!       (see [`Schema::validate`]).
//!
//! The type-name parameter entities
//!   (`%IDLPTypes;`, `%IDLRTypes;`, `%IDLCTypes;`, `%BaseTypes;`)
//!   and the empty type elements are generated from the
//!   [type catalog](crate::types),
//!     so the schema and the compiler agree on the set of legal types by
//!     construction.

mod validate;

pub use validate::SchemaViolation;

use crate::{
    qname::*,
    types::{AuxValue, TypeGroup, TypeKind, NS_PREFIX},
};
use fxhash::FxHashMap;
use std::fmt::{self, Display, Write};

/// System identifier under which the schema is registered.
pub const SYSTEM_ID: &str = "CIDIDL.DTD";

/// Public identifier under which the schema is registered.
pub const PUBLIC_ID: &str = "urn:charmedquark.com:XML-CIDIDL.Dtd";

/// A parameter entity expanding to a choice of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDecl {
    name: &'static str,
    values: Vec<String>,
}

impl EntityDecl {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Content model of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentModel {
    Empty,
    PcData,
    Children(Particle),
}

impl Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::PcData => write!(f, "(#PCDATA)"),
            Self::Children(p) => {
                let s = p.to_string();

                if s.starts_with('(') {
                    f.write_str(&s)
                } else {
                    write!(f, "({s})")
                }
            }
        }
    }
}

/// A term of an element-only content model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Particle {
    Elem(String),
    EntityRef(&'static str),
    Seq(Vec<Particle>),
    Choice(Vec<Particle>),
    Opt(Box<Particle>),
    Star(Box<Particle>),
    Plus(Box<Particle>),
}

impl Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter, ps: &[Particle], sep: &str| {
            f.write_char('(')?;
            for (i, p) in ps.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{p}")?;
            }
            f.write_char(')')
        };

        match self {
            Self::Elem(name) => f.write_str(name),
            Self::EntityRef(name) => write!(f, "%{name};"),
            Self::Seq(ps) => join(f, ps, ", "),
            Self::Choice(ps) => join(f, ps, "|"),
            Self::Opt(p) => write!(f, "{p}?"),
            Self::Star(p) => write!(f, "{p}*"),
            Self::Plus(p) => write!(f, "{p}+"),
        }
    }
}

fn elem(name: &str) -> Particle {
    Particle::Elem(name.to_string())
}

fn opt(p: Particle) -> Particle {
    Particle::Opt(Box::new(p))
}

fn star(p: Particle) -> Particle {
    Particle::Star(Box::new(p))
}

fn plus(p: Particle) -> Particle {
    Particle::Plus(Box::new(p))
}

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    CData,
    NmToken,
    Enumerated(&'static [&'static str]),
    /// Enumerated by the values of a parameter entity.
    EntityEnum(&'static str),
}

impl Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CData => write!(f, "CDATA"),
            Self::NmToken => write!(f, "NMTOKEN"),
            Self::Enumerated(values) => write!(f, "({})", values.join("|")),
            Self::EntityEnum(name) => write!(f, "(%{name};)"),
        }
    }
}

impl From<AuxValue> for AttrType {
    fn from(value: AuxValue) -> Self {
        match value {
            AuxValue::CData => Self::CData,
            AuxValue::NmToken => Self::NmToken,
        }
    }
}

/// Default declaration of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrDefault {
    Required,
    Implied,
    Value(&'static str),
}

impl Display for AttrDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "#REQUIRED"),
            Self::Implied => write!(f, "#IMPLIED"),
            Self::Value(value) => write!(f, "'{value}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDecl {
    name: String,
    ty: AttrType,
    default: AttrDefault,
}

impl AttrDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &AttrType {
        &self.ty
    }

    pub fn default(&self) -> &AttrDefault {
        &self.default
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDecl {
    name: String,
    content: ContentModel,
    attrs: Vec<AttrDecl>,
}

impl ElementDecl {
    fn new(name: &str, content: ContentModel) -> Self {
        Self {
            name: name.to_string(),
            content,
            attrs: Vec::new(),
        }
    }

    fn attr(mut self, name: &str, ty: AttrType, default: AttrDefault) -> Self {
        self.attrs.push(AttrDecl {
            name: name.to_string(),
            ty,
            default,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    pub fn attrs(&self) -> &[AttrDecl] {
        &self.attrs
    }

    pub fn find_attr(&self, name: &str) -> Option<&AttrDecl> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

const YES_NO: &[&str] = &[YES, NO];
const NO_YES: &[&str] = &[NO, YES];
const TEXT_TARGETS: &[&str] =
    &["No", "AltText", "AltText2", "BaseName", "Name", "Text"];

/// The document schema.
#[derive(Debug, Clone)]
pub struct Schema {
    public_id: &'static str,
    system_id: &'static str,
    entities: Vec<EntityDecl>,
    elements: Vec<ElementDecl>,
    index: FxHashMap<String, usize>,
}

impl Schema {
    /// The schema of CIDIDL interface documents.
    pub fn cididl() -> Self {
        use AttrDefault::*;
        use AttrType::*;
        use ContentModel::{Children, Empty, PcData};
        use Particle::{Choice, EntityRef, Seq};

        let entities = TypeGroup::ALL
            .iter()
            .map(|&group| EntityDecl {
                name: group.entity_name(),
                values: group.member_names(),
            })
            .collect::<Vec<_>>();

        // Types referenced as elements.
        let mut elements = TypeKind::ALL
            .iter()
            .filter(|kind| {
                kind.in_group(TypeGroup::Param)
                    || kind.in_group(TypeGroup::Return)
            })
            .map(|kind| {
                kind.aux_attrs().iter().fold(
                    ElementDecl::new(&format!("{NS_PREFIX}{kind}"), Empty),
                    |decl, &(aux, ty)| {
                        decl.attr(aux.attr_name(), ty.into(), Required)
                    },
                )
            })
            .collect::<Vec<_>>();

        let method = |name: &str, timeout: &'static str| {
            ElementDecl::new(
                name,
                Children(Seq(vec![elem(QN_RET_TYPE), star(elem(QN_PARAM))])),
            )
            .attr(QN_TIMEOUT, CData, Value(timeout))
            .attr(QN_NAME, NmToken, Required)
            .attr(QN_IN_BASE_CLASS, Enumerated(YES_NO), Value(NO))
        };

        let text_target = |decl: ElementDecl, name: &str| {
            decl.attr(name, Enumerated(TEXT_TARGETS), Value(NO))
        };

        elements.extend([
            ElementDecl::new(
                QN_PARAM,
                Children(Choice(vec![EntityRef(
                    TypeGroup::Param.entity_name(),
                )])),
            )
            .attr(QN_NAME, NmToken, Required)
            .attr(QN_DIR, Enumerated(&["In", "Out", "InOut"]), Required)
            .attr(QN_DEF_VAL, CData, Implied)
            .attr(QN_MOVEABLE, Enumerated(YES_NO), Value(NO)),
            ElementDecl::new(
                QN_RET_TYPE,
                Children(Choice(vec![EntityRef(
                    TypeGroup::Return.entity_name(),
                )])),
            ),
            ElementDecl::new(QN_CTOR, Children(plus(elem(QN_PARAM)))),
            method(QN_METHOD, "30000"),
            method(QN_POLL_METHOD, "10000"),
            ElementDecl::new(QN_DOC_TEXT, PcData),
            ElementDecl::new(QN_CONSTANT, Children(opt(elem(QN_DOC_TEXT))))
                .attr(QN_NAME, NmToken, Required)
                .attr(
                    QN_TYPE,
                    EntityEnum(TypeGroup::Constant.entity_name()),
                    Required,
                )
                .attr(QN_VALUE, CData, Required),
            ElementDecl::new(QN_CONSTANTS, Children(plus(elem(QN_CONSTANT)))),
            ElementDecl::new(QN_MEMBER, Empty)
                .attr(QN_NAME, NmToken, Required)
                .attr(
                    QN_TYPE,
                    EntityEnum(TypeGroup::Constant.entity_name()),
                    Required,
                ),
            ElementDecl::new(QN_SUB_STRUCT, Empty)
                .attr(QN_NAME, NmToken, Required)
                .attr(QN_TYPE, NmToken, Required),
            ElementDecl::new(
                QN_STRUCT,
                Children(star(Choice(vec![
                    elem(QN_MEMBER),
                    elem(QN_SUB_STRUCT),
                ]))),
            )
            .attr(QN_TYPE, NmToken, Required),
            ElementDecl::new(QN_ENUM_VAL, Empty)
                .attr(QN_NAME, NmToken, Required)
                .attr(QN_ALT_TEXT, CData, Implied)
                .attr(QN_ALT_TEXT2, CData, Implied)
                .attr(QN_TEXT, CData, Implied)
                .attr(QN_VALUE, CData, Implied)
                .attr(QN_ALT_NUM_VAL, CData, Implied),
            ElementDecl::new(QN_ENUM_SYN, Empty)
                .attr(QN_NAME, NmToken, Required)
                .attr(QN_VALUE, CData, Implied),
            [
                QN_ALT_MAP,
                QN_ALT_MAP2,
                QN_FORMAT_MAP,
                QN_LOAD_MAP,
                QN_XLAT_MAP,
                QN_TEXT_STREAM_MAP,
            ]
            .into_iter()
            .fold(
                ElementDecl::new(
                    QN_ENUM,
                    Children(Seq(vec![
                        opt(elem(QN_DOC_TEXT)),
                        plus(elem(QN_ENUM_VAL)),
                        star(elem(QN_ENUM_SYN)),
                    ])),
                )
                .attr(QN_NAME, NmToken, Required)
                .attr(
                    QN_BASE_TYPE,
                    EntityEnum(TypeGroup::EnumBase.entity_name()),
                    Implied,
                )
                .attr(QN_TYPE, Enumerated(&["Std", "Bmp"]), Value("Std"))
                .attr(QN_ALT_NUM_VAL, Enumerated(YES_NO), Value(NO))
                .attr(
                    QN_ALT_TEXT_SRC,
                    Enumerated(&["No", "Inline", "Pattern"]),
                    Value(NO),
                )
                .attr(QN_ALT_TEXT2, Enumerated(NO_YES), Value(NO))
                .attr(QN_ALT_PATTERN, CData, Value(""))
                .attr(QN_BIN_STREAM, Enumerated(NO_YES), Value(NO))
                .attr(QN_INC_DEC, Enumerated(&["No", "Inc", "Both"]), Value(NO))
                .attr(QN_MSG_FAC, CData, Implied)
                .attr(QN_MSG_NS, CData, Implied),
                text_target,
            ),
            ElementDecl::new(
                QN_TYPES,
                Children(star(Choice(vec![elem(QN_ENUM), elem(QN_STRUCT)]))),
            ),
            ElementDecl::new(
                QN_GLOBALS,
                Children(Seq(vec![
                    opt(elem(QN_CONSTANTS)),
                    opt(elem(QN_TYPES)),
                ])),
            ),
            ElementDecl::new(
                QN_METHODS,
                Children(star(Choice(vec![
                    elem(QN_POLL_METHOD),
                    elem(QN_METHOD),
                ]))),
            ),
            ElementDecl::new(
                QN_CLASS_INTF,
                Children(Seq(vec![
                    opt(elem(QN_CONSTANTS)),
                    opt(elem(QN_TYPES)),
                    opt(elem(QN_CTOR)),
                    elem(QN_METHODS),
                ])),
            )
            .attr(QN_NAME, NmToken, Required)
            .attr(QN_INTERFACE_ID, CData, Required)
            .attr(QN_CLIENT_BASE, NmToken, Value("TOrbClientBase"))
            .attr(QN_SERVER_BASE, NmToken, Value("TOrbServerBase")),
            ElementDecl::new(
                QN_INTERFACE,
                Children(Seq(vec![
                    star(elem(QN_GLOBALS)),
                    opt(elem(QN_CLASS_INTF)),
                ])),
            ),
        ]);

        let index = elements
            .iter()
            .enumerate()
            .map(|(i, decl)| (decl.name.clone(), i))
            .collect();

        Self {
            public_id: PUBLIC_ID,
            system_id: SYSTEM_ID,
            entities,
            elements,
            index,
        }
    }

    pub fn public_id(&self) -> &str {
        self.public_id
    }

    pub fn system_id(&self) -> &str {
        self.system_id
    }

    pub fn entities(&self) -> &[EntityDecl] {
        &self.entities
    }

    pub fn elements(&self) -> &[ElementDecl] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.index.get(name).map(|&i| &self.elements[i])
    }

    /// Values of the parameter entity `name`,
    ///   or an empty slice if there is no such entity.
    pub fn entity_values(&self, name: &str) -> &[String] {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .map(EntityDecl::values)
            .unwrap_or(&[])
    }

    /// Render the schema as DTD text.
    pub fn dtd_text(&self) -> String {
        let mut out = String::from("<?xml encoding='UTF-8'?>\n\n");

        // Parameter entities must be declared before they are referenced.
        for entity in &self.entities {
            out.push_str(&format!(
                "<!ENTITY % {} '{}'>\n",
                entity.name,
                entity.values.join(" | ")
            ));
        }

        for decl in &self.elements {
            out.push_str(&format!(
                "\n<!ELEMENT   {} {}>\n",
                decl.name, decl.content
            ));

            if !decl.attrs.is_empty() {
                out.push_str(&format!("<!ATTLIST   {}", decl.name));

                for attr in &decl.attrs {
                    out.push_str(&format!(
                        "\n            {} {} {}",
                        attr.name, attr.ty, attr.default
                    ));
                }

                out.push_str(">\n");
            }
        }

        out
    }
}

#[cfg(test)]
mod test;
