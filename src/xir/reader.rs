// XIR reader
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

//! Parse XML text into a XIR [`Document`] tree.
//!
//! This uses [`quick_xml`] as the parser.
//! The source is held in memory in its entirety,
//!   which allows spans of names and attribute values to be derived
//!   directly from the borrowed slices that the parser hands back.

use super::{
    tree::{Attr, DocType, Document, Element},
    DocumentNode, Error,
};
use crate::span::Span;
use quick_xml::{
    events::{BytesDecl, BytesStart, Event as QuickXmlEvent},
    Reader,
};
use std::result;

pub type Result<T> = result::Result<T, Error>;

/// Read an XML document from a string into a [`Document`].
///
/// Comments and processing instructions are discarded.
/// The DOCTYPE declaration is retained so that its external identifiers
///   can be checked against the schema,
///     but any internal subset is ignored.
pub struct XmlTreeReader<'s> {
    src: &'s str,
    reader: Reader<&'s [u8]>,
}

impl<'s> XmlTreeReader<'s> {
    pub fn new(src: &'s str) -> Self {
        let mut reader = Reader::from_str(src);

        // Whitespace is retained so that element text is reproduced
        //   faithfully;
        //     blank text is discarded below where it is not content.
        reader.config_mut().trim_text(false);

        Self { src, reader }
    }

    fn pos(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    /// Span of a slice borrowed from the source,
    ///   if it is indeed borrowed from the source.
    fn slice_span(&self, slice: &[u8]) -> Option<Span> {
        let base = self.src.as_ptr() as usize;
        let addr = slice.as_ptr() as usize;

        (addr >= base && addr + slice.len() <= base + self.src.len())
            .then(|| Span::from_usize(addr - base, slice.len()))
    }

    /// Read the entire document.
    pub fn read_document(mut self) -> Result<Document> {
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut doctype = None;

        loop {
            let prev_pos = self.pos();

            let ev = self.reader.read_event().map_err(|e| {
                let span = Span::from_byte_interval((prev_pos, self.pos()));
                Error::Syntax(e.to_string(), span)
            })?;

            let span = Span::from_byte_interval((prev_pos, self.pos()));

            match ev {
                QuickXmlEvent::Eof => break,

                QuickXmlEvent::Decl(decl) => self.validate_decl(&decl, span)?,

                QuickXmlEvent::DocType(text) => {
                    let text = std::str::from_utf8(&text)
                        .map_err(|e| Error::InvalidUtf8(e, span))?;
                    doctype = Some(parse_doctype(text, span)?);
                }

                QuickXmlEvent::Start(ele) => {
                    if stack.is_empty() {
                        if let Some(first) = &root {
                            return Err(Error::MultipleRoots {
                                first: first.span(),
                                second: span,
                            });
                        }
                    }

                    stack.push(self.parse_element(&ele, span)?);
                }

                QuickXmlEvent::Empty(ele) => {
                    let ele = self.parse_element(&ele, span)?;
                    attach(&mut stack, &mut root, ele)?;
                }

                // The parser has already verified that the name matches.
                QuickXmlEvent::End(_) => match stack.pop() {
                    Some(mut ele) => {
                        ele.extend_span(span);
                        attach(&mut stack, &mut root, ele)?;
                    }
                    None => {
                        return Err(Error::Syntax(
                            "unexpected closing tag".into(),
                            span,
                        ))
                    }
                },

                QuickXmlEvent::Text(bytes) => {
                    let text = bytes
                        .unescape()
                        .map_err(|e| Error::Syntax(e.to_string(), span))?;

                    push_text(&mut stack, &text, span)?;
                }

                // CDATA is not escaped.
                QuickXmlEvent::CData(bytes) => {
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| Error::InvalidUtf8(e, span))?;

                    push_text(&mut stack, text, span)?;
                }

                QuickXmlEvent::Comment(..) | QuickXmlEvent::PI(..) => (),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(Error::UnclosedElement(
                open.name().to_string(),
                open.span(),
            ));
        }

        root.map(|root| Document { doctype, root })
            .ok_or(Error::EmptyDocument)
    }

    /// Validate an that an XML declaration contains expected values.
    ///
    /// A declaration looks like `<?xml version="1.0" encoding="utf-8"?>`,
    ///   where `@encoding` is optional but `@version` is not.
    ///
    /// We expect version 1.0 and UTF-8 encoding.
    fn validate_decl(&self, decl: &BytesDecl, decl_span: Span) -> Result<()> {
        let ver = decl
            .version()
            .map_err(|e| Error::Syntax(e.to_string(), decl_span))?;

        if &ver[..] != b"1.0" {
            let span = self.slice_span(&ver).unwrap_or(decl_span);

            return Err(Error::UnsupportedXmlVersion(
                String::from_utf8_lossy(&ver).into_owned(),
                span,
            ));
        }

        if let Some(enc) = decl.encoding() {
            let enc = enc.map_err(|e| Error::Syntax(e.to_string(), decl_span))?;

            match &enc[..] {
                b"utf-8" | b"UTF-8" => (),
                invalid => {
                    let span = self.slice_span(invalid).unwrap_or(decl_span);

                    return Err(Error::UnsupportedEncoding(
                        String::from_utf8_lossy(invalid).into_owned(),
                        span,
                    ));
                }
            }
        }

        Ok(())
    }

    /// Parse an opening (or self-closing) tag and its attributes.
    ///
    /// Attribute spans cover the attribute name through its value,
    ///   falling back to the span of the tag if they cannot be
    ///   determined.
    fn parse_element(&self, ele: &BytesStart, span: Span) -> Result<Element> {
        let qname = ele.name();
        let name = std::str::from_utf8(qname.as_ref())
            .map_err(|e| Error::InvalidUtf8(e, span))?;

        if name.is_empty() {
            return Err(Error::Syntax("missing element name".into(), span));
        }

        let mut element = Element::new(name, span);

        for attr in ele.attributes() {
            let attr = attr.map_err(|e| Error::Syntax(e.to_string(), span))?;

            let attr_span = match (
                self.slice_span(attr.key.as_ref()),
                self.slice_span(&attr.value),
            ) {
                (Some(kspan), Some(vspan)) => kspan.merge(vspan),
                (Some(kspan), None) => kspan,
                _ => span,
            };

            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::InvalidUtf8(e, attr_span))?;

            let value = attr
                .unescape_value()
                .map_err(|e| Error::Syntax(e.to_string(), attr_span))?;

            element.push_attr(Attr::new(key, value.into_owned(), attr_span));
        }

        Ok(element)
    }
}

/// Attach a completed element to its parent,
///   or make it the root if there is no parent.
fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    ele: Element,
) -> Result<()> {
    match (stack.last_mut(), root.as_ref()) {
        (Some(parent), _) => parent.push_child(ele),
        (None, Some(first)) => {
            return Err(Error::MultipleRoots {
                first: first.span(),
                second: ele.span(),
            })
        }
        (None, None) => *root = Some(ele),
    }

    Ok(())
}

/// Append character data to the open element.
///
/// Whitespace between top-level constructs is not content and is
///   discarded.
fn push_text(stack: &mut [Element], text: &str, span: Span) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_text(text),
        None if text.trim().is_empty() => (),
        None => return Err(Error::TextOutsideRoot(span)),
    }

    Ok(())
}

/// Parse the body of a DOCTYPE declaration
///   (everything between `<!DOCTYPE` and `>`).
///
/// Only external identifiers are recognized:
///
/// ```text
/// <!DOCTYPE root>
/// <!DOCTYPE root SYSTEM "system-id">
/// <!DOCTYPE root PUBLIC "public-id" "system-id">
/// ```
fn parse_doctype(text: &str, span: Span) -> Result<DocType> {
    let mut rest = text.trim_start();

    let name_end = rest
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(rest.len());
    let root_name = &rest[..name_end];

    if root_name.is_empty() {
        return Err(Error::BadDocType("missing root element name".into(), span));
    }

    rest = rest[name_end..].trim_start();

    let (public_id, system_id) = if let Some(after) = rest.strip_prefix("PUBLIC")
    {
        let (public_id, after) = quoted_literal(after, span)?;
        let (system_id, _) = quoted_literal(after, span)?;
        (Some(public_id), Some(system_id))
    } else if let Some(after) = rest.strip_prefix("SYSTEM") {
        let (system_id, _) = quoted_literal(after, span)?;
        (None, Some(system_id))
    } else if rest.is_empty() || rest.starts_with('[') {
        (None, None)
    } else {
        return Err(Error::BadDocType(
            format!("expected PUBLIC or SYSTEM, found `{rest}`"),
            span,
        ));
    };

    Ok(DocType {
        root_name: root_name.to_string(),
        public_id,
        system_id,
        span,
    })
}

/// Parse a single- or double-quoted literal,
///   returning it along with the remaining text.
fn quoted_literal(text: &str, span: Span) -> Result<(String, &str)> {
    let text = text.trim_start();

    let quote = match text.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            return Err(Error::BadDocType("expected quoted literal".into(), span))
        }
    };

    let body = &text[1..];
    let end = body.find(quote).ok_or_else(|| {
        Error::BadDocType("unterminated quoted literal".into(), span)
    })?;

    Ok((body[..end].to_string(), &body[end + 1..]))
}
