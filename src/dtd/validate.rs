// Validation of IDL documents against the schema
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

//! Validation of a document tree against a [`Schema`].
//!
//! This performs the work that a validating XML parser would:
//!   every element must be declared,
//!   its children must match its content model,
//!   and its attributes must be declared and well-typed.
//! Attributes that are absent but have a default value in the schema are
//!   added to the tree,
//!     marked as [defaulted](crate::xir::Attr::is_defaulted),
//!     so that later passes never need to know the schema defaults.

use super::{AttrDefault, AttrType, ContentModel, Particle, Schema};
use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
    xir::{Attr, DocType, DocumentNode, Element},
};
use fxhash::FxHashMap;
use std::{error::Error, fmt::Display};

/// A document that does not conform to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// The DOCTYPE names a schema other than the embedded one.
    UnknownSchema { system_id: String, span: Span },

    /// The DOCTYPE root name does not match the root element.
    DocTypeRootMismatch {
        declared: String,
        found: String,
        span: Span,
    },

    UndeclaredElement { name: String, span: Span },

    UndeclaredAttr {
        element: String,
        attr: String,
        span: Span,
    },

    MissingRequiredAttr {
        element: String,
        attr: String,
        span: Span,
    },

    /// Value not in the attribute's enumeration.
    BadAttrValue {
        element: String,
        attr: String,
        value: String,
        expected: String,
        span: Span,
    },

    BadNmToken {
        element: String,
        attr: String,
        value: String,
        span: Span,
    },

    /// Children do not match the content model.
    ContentMismatch {
        element: String,
        model: String,
        span: Span,
    },

    /// Character data in element-only or empty content.
    UnexpectedText { element: String, span: Span },
}

impl Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SchemaViolation::*;

        match self {
            UnknownSchema { system_id, .. } => {
                write!(f, "document references unknown schema `{system_id}`")
            }
            DocTypeRootMismatch {
                declared, found, ..
            } => write!(
                f,
                "document type declares root `{declared}` \
                    but root element is `{found}`"
            ),
            UndeclaredElement { name, .. } => {
                write!(f, "element `{name}` is not declared")
            }
            UndeclaredAttr { element, attr, .. } => write!(
                f,
                "attribute `{attr}` is not declared for element `{element}`"
            ),
            MissingRequiredAttr { element, attr, .. } => write!(
                f,
                "element `{element}` is missing required attribute `{attr}`"
            ),
            BadAttrValue {
                element,
                attr,
                value,
                ..
            } => write!(
                f,
                "invalid value `{value}` for attribute `{attr}` \
                    of element `{element}`"
            ),
            BadNmToken {
                element,
                attr,
                value,
                ..
            } => write!(
                f,
                "value `{value}` of attribute `{attr}` of element \
                    `{element}` is not a valid name token"
            ),
            ContentMismatch { element, .. } => {
                write!(f, "content of element `{element}` is invalid")
            }
            UnexpectedText { element, .. } => {
                write!(f, "character data is not permitted in `{element}`")
            }
        }
    }
}

impl Error for SchemaViolation {}

impl Diagnostic for SchemaViolation {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use SchemaViolation::*;

        match self {
            UnknownSchema { span, .. } => span
                .error("this document type is not supported")
                .with_help(format!(
                    "use system id `{}` or provide a public id mapping",
                    super::SYSTEM_ID
                ))
                .into(),
            DocTypeRootMismatch { declared, span, .. } => vec![span
                .error(format!("document type expects root `{declared}`"))],
            UndeclaredElement { span, .. } => {
                vec![span.error("unknown element")]
            }
            UndeclaredAttr { span, .. } => {
                vec![span.error("unknown attribute")]
            }
            MissingRequiredAttr { attr, span, .. } => {
                vec![span.error(format!("missing `{attr}`"))]
            }
            BadAttrValue { expected, span, .. } => span
                .error("invalid value")
                .with_help(format!("expected one of {expected}"))
                .into(),
            BadNmToken { span, .. } => span
                .error("invalid name token")
                .with_help(
                    "name tokens may contain only letters, digits, \
                        and `.`, `-`, `_`, `:`",
                )
                .into(),
            ContentMismatch { model, span, .. } => span
                .error("children do not match the content model")
                .with_help(format!("expected content {model}"))
                .into(),
            UnexpectedText { span, .. } => {
                vec![span.error("unexpected character data")]
            }
        }
    }
}

/// Whether `value` is an XML name token.
fn is_nmtoken(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ':'))
}

fn push_unique(out: &mut Vec<usize>, pos: usize) {
    if !out.contains(&pos) {
        out.push(pos);
    }
}

impl Particle {
    /// Positions in `names` at which a match of this particle beginning at
    ///   `start` may end.
    pub(super) fn ends(
        &self,
        schema: &Schema,
        names: &[&str],
        start: usize,
        out: &mut Vec<usize>,
    ) {
        match self {
            Self::Elem(name) => {
                if names.get(start) == Some(&name.as_str()) {
                    push_unique(out, start + 1);
                }
            }

            Self::EntityRef(entity) => {
                if let Some(found) = names.get(start) {
                    if schema.entity_values(entity).iter().any(|v| v == found)
                    {
                        push_unique(out, start + 1);
                    }
                }
            }

            Self::Seq(parts) => {
                let mut cur = vec![start];

                for part in parts {
                    let mut next = Vec::new();
                    for &pos in &cur {
                        part.ends(schema, names, pos, &mut next);
                    }

                    if next.is_empty() {
                        return;
                    }
                    cur = next;
                }

                cur.into_iter().for_each(|pos| push_unique(out, pos));
            }

            Self::Choice(parts) => parts
                .iter()
                .for_each(|part| part.ends(schema, names, start, out)),

            Self::Opt(inner) => {
                push_unique(out, start);
                inner.ends(schema, names, start, out);
            }

            Self::Star(inner) => {
                inner.closure(schema, names, vec![start], out);
            }

            Self::Plus(inner) => {
                let mut first = Vec::new();
                inner.ends(schema, names, start, &mut first);
                inner.closure(schema, names, first, out);
            }
        }
    }

    /// Every position reachable from `seeds` by zero or more matches of
    ///   this particle.
    pub(super) fn closure(
        &self,
        schema: &Schema,
        names: &[&str],
        seeds: Vec<usize>,
        out: &mut Vec<usize>,
    ) {
        let mut seen = seeds.clone();
        let mut frontier = seeds;

        while let Some(pos) = frontier.pop() {
            let mut next = Vec::new();
            self.ends(schema, names, pos, &mut next);

            // A particle that matches nothing cannot make progress.
            for found in next.into_iter().filter(|&n| n > pos) {
                if !seen.contains(&found) {
                    seen.push(found);
                    frontier.push(found);
                }
            }
        }

        seen.into_iter().for_each(|pos| push_unique(out, pos));
    }

    /// Whether this particle matches exactly the sequence `names`.
    pub(super) fn matches(&self, schema: &Schema, names: &[&str]) -> bool {
        let mut ends = Vec::new();
        self.ends(schema, names, 0, &mut ends);

        ends.contains(&names.len())
    }
}

impl Schema {
    /// Check the DOCTYPE of a document against this schema.
    ///
    /// A public id present in `mappings` is mapped to its system id;
    ///   the public id of this schema maps to its own system id.
    /// A document without a DOCTYPE is assumed to use this schema.
    pub fn check_doctype(
        &self,
        doctype: Option<&DocType>,
        root: &Element,
        mappings: &FxHashMap<String, String>,
    ) -> Result<(), SchemaViolation> {
        let doctype = match doctype {
            Some(doctype) => doctype,
            None => return Ok(()),
        };

        if doctype.root_name != root.name() {
            return Err(SchemaViolation::DocTypeRootMismatch {
                declared: doctype.root_name.clone(),
                found: root.name().to_string(),
                span: doctype.span,
            });
        }

        let mapped = doctype.public_id.as_deref().and_then(|public| {
            mappings.get(public).map(String::as_str).or_else(|| {
                (public == self.public_id).then_some(self.system_id)
            })
        });

        match mapped.or(doctype.system_id.as_deref()) {
            Some(system_id) if system_id != self.system_id => {
                Err(SchemaViolation::UnknownSchema {
                    system_id: system_id.to_string(),
                    span: doctype.span,
                })
            }
            _ => Ok(()),
        }
    }

    /// Validate the tree rooted at `root`,
    ///   filling in default attribute values.
    ///
    /// All violations are collected;
    ///   validation does not stop at the first.
    pub fn validate(&self, root: &mut Element) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        self.validate_element(root, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn validate_element(
        &self,
        ele: &mut Element,
        violations: &mut Vec<SchemaViolation>,
    ) {
        let decl = match self.element(ele.name()) {
            Some(decl) => decl,
            None => {
                violations.push(SchemaViolation::UndeclaredElement {
                    name: ele.name().to_string(),
                    span: ele.span(),
                });
                return;
            }
        };

        self.validate_attrs(ele, violations);

        match decl.content() {
            ContentModel::PcData => {
                if let Some(child) = ele.children().first() {
                    violations.push(SchemaViolation::ContentMismatch {
                        element: ele.name().to_string(),
                        model: decl.content().to_string(),
                        span: child.span(),
                    });
                }
            }

            model @ (ContentModel::Empty | ContentModel::Children(_)) => {
                if !ele.is_blank() {
                    violations.push(SchemaViolation::UnexpectedText {
                        element: ele.name().to_string(),
                        span: ele.span(),
                    });
                }

                let names = ele
                    .children()
                    .iter()
                    .map(|child| child.name())
                    .collect::<Vec<_>>();

                let ok = match model {
                    ContentModel::Children(particle) => {
                        particle.matches(self, &names)
                    }
                    _ => names.is_empty(),
                };

                if !ok {
                    violations.push(SchemaViolation::ContentMismatch {
                        element: ele.name().to_string(),
                        model: model.to_string(),
                        span: ele.span(),
                    });
                }
            }
        }

        for child in ele.children_mut() {
            self.validate_element(child, violations);
        }
    }

    fn validate_attrs(
        &self,
        ele: &mut Element,
        violations: &mut Vec<SchemaViolation>,
    ) {
        let decl = match self.element(ele.name()) {
            Some(decl) => decl,
            None => return,
        };

        let element = ele.name().to_string();

        for attr in ele.attrs() {
            let adecl = match decl.find_attr(attr.name()) {
                Some(adecl) => adecl,
                None => {
                    violations.push(SchemaViolation::UndeclaredAttr {
                        element: element.clone(),
                        attr: attr.name().to_string(),
                        span: attr.span(),
                    });
                    continue;
                }
            };

            let value = attr.value();

            let expected = match adecl.ty() {
                AttrType::CData => None,
                AttrType::NmToken => {
                    if !is_nmtoken(value) {
                        violations.push(SchemaViolation::BadNmToken {
                            element: element.clone(),
                            attr: attr.name().to_string(),
                            value: value.to_string(),
                            span: attr.span(),
                        });
                    }
                    None
                }
                AttrType::Enumerated(values) => {
                    (!values.iter().any(|v| *v == value))
                        .then(|| values.join(", "))
                }
                AttrType::EntityEnum(entity) => {
                    let values = self.entity_values(entity);
                    (!values.iter().any(|v| v == value))
                        .then(|| values.join(", "))
                }
            };

            if let Some(expected) = expected {
                violations.push(SchemaViolation::BadAttrValue {
                    element: element.clone(),
                    attr: attr.name().to_string(),
                    value: value.to_string(),
                    expected,
                    span: attr.span(),
                });
            }
        }

        for adecl in decl.attrs() {
            if ele.find_attr(adecl.name()).is_some() {
                continue;
            }

            match adecl.default() {
                AttrDefault::Required => {
                    violations.push(SchemaViolation::MissingRequiredAttr {
                        element: element.clone(),
                        attr: adecl.name().to_string(),
                        span: ele.span(),
                    })
                }
                AttrDefault::Implied => (),
                AttrDefault::Value(value) => ele.push_attr(Attr::new_default(
                    adecl.name(),
                    *value,
                    ele.span(),
                )),
            }
        }
    }
}
