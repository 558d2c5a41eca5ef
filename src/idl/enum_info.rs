// Enumerated type declarations
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

//! Enumerated type declarations (`CIDIDL:Enum`).
//!
//! An enum is either _standard_,
//!   whose values are numbered contiguously from zero,
//!   or a _bitmap_,
//!     whose values are explicit hexadecimal bit masks.
//! Each value may carry several kinds of text,
//!   and an enum may request generated functions that map between values
//!   and one of those texts
//!     (translation, alternate mappings, formatting, loading from a
//!     resource, and text streaming).
//! All of these are served at runtime by a single mapping table generated
//!   alongside the enum;
//!     the generated functions are thin wrappers that select a column of
//!     that table.
//!
//! Parsing validates the combination of options,
//!   which the schema cannot express;
//!     rendering is split into [`EnumInfo::fmt_header`] and
//!     [`EnumInfo::fmt_impl`].

use super::{attr_or, is_yes, IdlError, Malformed};
use crate::{
    fmt::Indent,
    qname::*,
    span::Span,
    types::{TypeKind, ENUM_BASE_DEFAULT},
    xir::DocumentNode,
};
use log::warn;
use std::fmt::{self, Display, Write};

/// Token in an alt text pattern that is replaced by the value name.
pub const PATTERN_TOKEN: &str = "%(v)";

/// Storage shape of an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumShape {
    /// Contiguous values from zero.
    Standard,
    /// Explicit bit mask values.
    Bitmap,
}

/// A column of the generated mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVal {
    Off,
    AltText,
    AltText2,
    BaseName,
    Name,
    Text,
}

impl TextVal {
    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "No" => Some(Self::Off),
            "AltText" => Some(Self::AltText),
            "AltText2" => Some(Self::AltText2),
            "BaseName" => Some(Self::BaseName),
            "Name" => Some(Self::Name),
            "Text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    /// Name of the column selector in generated code.
    pub fn selector(self) -> &'static str {
        match self {
            Self::Off => "TEnumMap::ETextVals::None",
            Self::AltText => "TEnumMap::ETextVals::AltText",
            Self::AltText2 => "TEnumMap::ETextVals::AltText2",
            Self::BaseName => "TEnumMap::ETextVals::BaseName",
            Self::Name => "TEnumMap::ETextVals::Name",
            Self::Text => "TEnumMap::ETextVals::Text",
        }
    }
}

impl Display for TextVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "no"),
            Self::AltText => write!(f, "alternate"),
            Self::AltText2 => write!(f, "second alternate"),
            Self::BaseName => write!(f, "base name"),
            Self::Name => write!(f, "name"),
            Self::Text => write!(f, "value"),
        }
    }
}

/// Source of the alternate text of each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltTextSrc {
    Off,
    /// `CIDIDL:AltText` on each value.
    Inline,
    /// Generated from `CIDIDL:AltPattern`.
    Pattern,
}

/// Source of the main text of each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSrc {
    Off,
    Inline,
    /// Loaded at runtime from a message resource.
    LoadRes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOps {
    Off,
    Inc,
    Both,
}

/// A value of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    name: String,
    value: Option<String>,
    text: Option<String>,
    alt_text: String,
    alt_text2: String,
    alt_num: i32,
    span: Span,
}

impl EnumValue {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit value expression (bitmap enums only).
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    pub fn alt_text2(&self) -> &str {
        &self.alt_text2
    }

    pub fn alt_num(&self) -> i32 {
        self.alt_num
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// An additional name for a value,
///   emitted after all other values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSynonym {
    pub name: String,
    pub value: String,
}

/// A parsed `CIDIDL:Enum` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    name: String,
    base_type: Option<TypeKind>,
    shape: EnumShape,
    values: Vec<EnumValue>,
    synonyms: Vec<EnumSynonym>,
    all_bits: u32,

    alt_num_val: bool,
    alt_text2: bool,
    bin_stream: bool,
    alt_text_src: AltTextSrc,
    alt_pattern: String,
    inc_dec: IncDecOps,
    text_src: TextSrc,
    msg_fac: Option<String>,
    msg_ns: Option<String>,

    alt_map: TextVal,
    alt_map2: TextVal,
    format_map: TextVal,
    load_map: TextVal,
    text_stream_map: TextVal,
    xlat_map: TextVal,

    span: Span,
}

impl EnumInfo {
    /// Parse a `CIDIDL:Enum` element.
    pub fn parse<N: DocumentNode>(node: &N) -> Result<Self, IdlError> {
        let name = node.required_attr(QN_NAME)?.to_string();
        let malformed =
            |reason, span| IdlError::malformed(name.as_str(), reason, span);

        let shape = match attr_or(node, QN_TYPE, "Std") {
            "Std" => EnumShape::Standard,
            "Bmp" => EnumShape::Bitmap,
            other => {
                return Err(malformed(
                    Malformed::BadEnumShape(other.into()),
                    node.attr_span_or_self(QN_TYPE),
                ))
            }
        };

        let base_type = match node.attr(QN_BASE_TYPE) {
            None => None,
            Some(base) if base == ENUM_BASE_DEFAULT => None,
            Some(base) => Some(TypeKind::resolve(base).map_err(|e| {
                IdlError::UnknownType(e, node.attr_span_or_self(QN_BASE_TYPE))
            })?),
        };

        let base_type = match (shape, base_type) {
            (EnumShape::Bitmap, None) => Some(TypeKind::TCard4),
            (EnumShape::Bitmap, Some(base)) if !base.is_unsigned_int() => {
                return Err(malformed(
                    Malformed::BitmapBaseNotUnsigned(base),
                    node.attr_span_or_self(QN_BASE_TYPE),
                ))
            }
            (_, base) => base,
        };

        let alt_text_src = match attr_or(node, QN_ALT_TEXT_SRC, NO) {
            "No" => AltTextSrc::Off,
            "Inline" => AltTextSrc::Inline,
            "Pattern" => AltTextSrc::Pattern,
            other => {
                return Err(malformed(
                    Malformed::BadAltTextSrc(other.into()),
                    node.attr_span_or_self(QN_ALT_TEXT_SRC),
                ))
            }
        };

        let text_val = |attr: &'static str| {
            let value = attr_or(node, attr, NO);

            TextVal::from_attr(value).ok_or_else(|| {
                malformed(
                    Malformed::BadTextTarget {
                        attr,
                        value: value.into(),
                    },
                    node.attr_span_or_self(attr),
                )
            })
        };

        let alt_map = text_val(QN_ALT_MAP)?;
        let alt_map2 = text_val(QN_ALT_MAP2)?;
        let format_map = text_val(QN_FORMAT_MAP)?;
        let load_map = text_val(QN_LOAD_MAP)?;
        let text_stream_map = text_val(QN_TEXT_STREAM_MAP)?;
        let xlat_map = text_val(QN_XLAT_MAP)?;

        let alt_pattern = attr_or(node, QN_ALT_PATTERN, "").to_string();

        if alt_text_src == AltTextSrc::Pattern
            && !alt_pattern.contains(PATTERN_TOKEN)
        {
            return Err(malformed(
                Malformed::PatternMissingToken(alt_pattern),
                node.attr_span_or_self(QN_ALT_PATTERN),
            ));
        }

        let inc_dec = match attr_or(node, QN_INC_DEC, NO) {
            "No" => IncDecOps::Off,
            "Inc" => IncDecOps::Inc,
            "Both" => IncDecOps::Both,
            other => {
                return Err(malformed(
                    Malformed::BadKeyword {
                        attr: QN_INC_DEC,
                        value: other.into(),
                    },
                    node.attr_span_or_self(QN_INC_DEC),
                ))
            }
        };

        let mut info = Self {
            name: name.clone(),
            base_type,
            shape,
            values: Vec::new(),
            synonyms: Vec::new(),
            all_bits: 0,
            alt_num_val: is_yes(node, QN_ALT_NUM_VAL),
            alt_text2: is_yes(node, QN_ALT_TEXT2),
            bin_stream: is_yes(node, QN_BIN_STREAM),
            alt_text_src,
            alt_pattern,
            inc_dec,
            text_src: TextSrc::Off,
            msg_fac: None,
            msg_ns: None,
            alt_map,
            alt_map2,
            format_map,
            load_map,
            text_stream_map,
            xlat_map,
            span: node.span(),
        };

        for child in node.iter_children() {
            match child.name() {
                n if n == QN_DOC_TEXT => continue,
                n if n == QN_ENUM_SYN => info.synonyms.push(EnumSynonym {
                    name: child.required_attr(QN_NAME)?.into(),
                    value: child.required_attr(QN_VALUE)?.into(),
                }),
                n if n == QN_ENUM_VAL => {
                    let value = info.parse_value(child)?;
                    info.values.push(value);
                }
                other => {
                    return Err(IdlError::UnexpectedElement {
                        expected: &[QN_DOC_TEXT, QN_ENUM_VAL, QN_ENUM_SYN],
                        found: other.into(),
                        span: child.span(),
                    })
                }
            }
        }

        if info.values.is_empty() {
            return Err(malformed(Malformed::NoValues, node.span()));
        }

        if info.values.iter().any(|v| v.text.is_some()) {
            match (node.attr(QN_MSG_FAC), node.attr(QN_MSG_NS)) {
                (Some(fac), Some(ns)) => {
                    info.text_src = TextSrc::LoadRes;
                    info.msg_fac = Some(fac.into());
                    info.msg_ns = Some(ns.into());
                }
                _ => info.text_src = TextSrc::Inline,
            }
        }

        info.check_text_maps(node)?;

        Ok(info)
    }

    fn parse_value<N: DocumentNode>(
        &mut self,
        node: &N,
    ) -> Result<EnumValue, IdlError> {
        let name = node.required_attr(QN_NAME)?.to_string();
        let value = node.attr(QN_VALUE);

        let value = match (self.shape, value) {
            (EnumShape::Standard, Some(_)) => {
                return Err(IdlError::malformed(
                    self.name.as_str(),
                    Malformed::ValueNotUsed(name),
                    node.attr_span_or_self(QN_VALUE),
                ))
            }
            (EnumShape::Bitmap, None) => {
                return Err(IdlError::malformed(
                    self.name.as_str(),
                    Malformed::ValueRequired(name),
                    node.span(),
                ))
            }
            (EnumShape::Standard, None) => None,
            (EnumShape::Bitmap, Some(literal)) => {
                let bits = parse_hex(literal).ok_or_else(|| {
                    IdlError::malformed(
                        self.name.as_str(),
                        Malformed::BadBitmapValue {
                            value: name.clone(),
                            literal: literal.into(),
                        },
                        node.attr_span_or_self(QN_VALUE),
                    )
                })?;

                self.all_bits |= bits;
                Some(literal.to_string())
            }
        };

        let alt_text = match self.alt_text_src {
            AltTextSrc::Off => String::new(),
            AltTextSrc::Inline => node.required_attr(QN_ALT_TEXT)?.into(),
            AltTextSrc::Pattern => self.alt_pattern.replace(PATTERN_TOKEN, &name),
        };

        let alt_text2 = match self.alt_text2 {
            true => node.required_attr(QN_ALT_TEXT2)?.into(),
            false => String::new(),
        };

        let alt_num = match (self.alt_num_val, node.attr(QN_ALT_NUM_VAL)) {
            (false, _) => 0,
            (true, Some(num)) => num.trim().parse().map_err(|_| {
                IdlError::malformed(
                    self.name.as_str(),
                    Malformed::BadNumber {
                        attr: QN_ALT_NUM_VAL,
                        value: num.into(),
                    },
                    node.attr_span_or_self(QN_ALT_NUM_VAL),
                )
            })?,
            (true, None) => {
                warn!(
                    "enum `{}` value `{name}` has no `{QN_ALT_NUM_VAL}`; \
                        assuming 0",
                    self.name
                );
                0
            }
        };

        Ok(EnumValue {
            name,
            value,
            text: node.attr(QN_TEXT).map(String::from),
            alt_text,
            alt_text2,
            alt_num,
            span: node.span(),
        })
    }

    /// Every text mapping must refer to a text that this enum provides.
    ///
    /// Name and base name are always available.
    fn check_text_maps<N: DocumentNode>(&self, node: &N) -> Result<(), IdlError> {
        let unavailable = |target: TextVal| match target {
            TextVal::AltText => self.alt_text_src == AltTextSrc::Off,
            TextVal::AltText2 => !self.alt_text2,
            TextVal::Text => self.text_src == TextSrc::Off,
            TextVal::Off | TextVal::BaseName | TextVal::Name => false,
        };

        match self.text_maps().into_iter().find(|&(_, t)| unavailable(t)) {
            Some((attr, target)) => Err(IdlError::malformed(
                self.name.as_str(),
                Malformed::TextSourceDisabled { attr, target },
                node.attr_span_or_self(attr),
            )),
            None => Ok(()),
        }
    }

    /// Text mapping attributes with their targets.
    pub fn text_maps(&self) -> [(&'static str, TextVal); 6] {
        [
            (QN_ALT_MAP, self.alt_map),
            (QN_ALT_MAP2, self.alt_map2),
            (QN_FORMAT_MAP, self.format_map),
            (QN_LOAD_MAP, self.load_map),
            (QN_TEXT_STREAM_MAP, self.text_stream_map),
            (QN_XLAT_MAP, self.xlat_map),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> EnumShape {
        self.shape
    }

    pub fn is_contiguous(&self) -> bool {
        self.shape == EnumShape::Standard
    }

    pub fn base_type(&self) -> Option<TypeKind> {
        self.base_type
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn synonyms(&self) -> &[EnumSynonym] {
        &self.synonyms
    }

    /// Union of all bitmap values.
    pub fn all_bits(&self) -> Option<u32> {
        match self.shape {
            EnumShape::Bitmap => Some(self.all_bits),
            EnumShape::Standard => None,
        }
    }

    pub fn alt_text_src(&self) -> AltTextSrc {
        self.alt_text_src
    }

    pub fn text_src(&self) -> TextSrc {
        self.text_src
    }

    pub fn inc_dec(&self) -> IncDecOps {
        self.inc_dec
    }

    pub fn is_bin_streamable(&self) -> bool {
        self.bin_stream
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Render the header declarations of this enum.
    ///
    /// `class_type` indicates that the enum is nested in a generated class
    ///   named `enclosing`,
    ///     otherwise it is in the namespace `enclosing`.
    /// Declarations that must appear at global scope are written to
    ///   `xhdr`,
    ///     which the caller emits after closing the enclosing scope.
    pub fn fmt_header<W: Write, X: Write>(
        &self,
        class_type: bool,
        enclosing: &str,
        export: &str,
        out: &mut W,
        xhdr: &mut X,
    ) -> fmt::Result {
        let indent = if class_type { 8 } else { 4 };

        self.fmt_def(&mut Indent::new(out, indent))?;
        self.fmt_method_sigs(&mut Indent::new(out, indent), class_type, export)?;
        self.fmt_global_sigs(xhdr, enclosing, export)?;

        if class_type {
            self.fmt_operators(xhdr, enclosing, export)
        } else {
            self.fmt_operators(&mut Indent::new(out, indent), enclosing, export)
        }
    }

    /// Render the implementation of this enum:
    ///   its mapping table and the functions declared by
    ///   [`fmt_header`](EnumInfo::fmt_header).
    pub fn fmt_impl<W: Write>(&self, enclosing: &str, out: &mut W) -> fmt::Result {
        self.fmt_map(out, enclosing)?;
        self.fmt_methods(out, enclosing)
    }

    /// The enum definition,
    ///   including sentinels and synonyms.
    pub fn fmt_def<W: Write>(&self, out: &mut W) -> fmt::Result {
        let name = &self.name;

        match self.base_type {
            Some(base) => writeln!(out, "enum class {name} : tCIDLib::{base}")?,
            None => writeln!(out, "enum class {name}")?,
        }
        writeln!(out, "{{")?;

        for (i, value) in self.values.iter().enumerate() {
            let sep = if i > 0 { ", " } else { "" };

            match &value.value {
                Some(expr) => writeln!(out, "    {sep}{} = {expr}", value.name)?,
                None => writeln!(out, "    {sep}{}", value.name)?,
            }
        }

        match self.shape {
            EnumShape::Standard => {
                // Parsing guarantees at least one value.
                let first = self.values.first().map(EnumValue::name);
                let last = self.values.last().map(EnumValue::name);

                writeln!(out, "    , Count")?;
                writeln!(out, "    , Min = {}", first.unwrap_or_default())?;
                writeln!(out, "    , Max = {}", last.unwrap_or_default())?;
            }
            EnumShape::Bitmap => {
                writeln!(out, "    , Count = {}", self.values.len())?;
                writeln!(out, "    , None = 0")?;
                writeln!(out, "    , AllBits = 0x{:X}", self.all_bits)?;
            }
        }

        for syn in &self.synonyms {
            writeln!(out, "    , {} = {}", syn.name, syn.value)?;
        }

        writeln!(out, "}};")
    }

    fn fmt_method_sigs<W: Write>(
        &self,
        out: &mut W,
        class_type: bool,
        export: &str,
    ) -> fmt::Result {
        let t = &self.name;
        let lead = match (class_type, export) {
            (true, _) => "static ".to_string(),
            (false, "") => String::new(),
            (false, export) => format!("{export} "),
        };

        if self.xlat_map.is_enabled() {
            writeln!(
                out,
                "[[nodiscard]] {lead}{t} eXlat{t}(const TString& strToXlat, \
                    const tCIDLib::TBoolean bThrowIfNot = kCIDLib::False);"
            )?;
            writeln!(
                out,
                "[[nodiscard]] {lead}const TString& strXlat{t}(const {t} eToXlat, \
                    const tCIDLib::TBoolean bThrowIfNot = kCIDLib::True);"
            )?;
        }

        if self.load_map.is_enabled() {
            writeln!(
                out,
                "{lead}const TString& strLoad{t}(const {t} eToXlat, \
                    const tCIDLib::TBoolean bThrowIfNot = kCIDLib::False);"
            )?;
        }

        for (map, suffix) in [(self.alt_map, ""), (self.alt_map2, "2")] {
            if map.is_enabled() {
                writeln!(
                    out,
                    "[[nodiscard]] {lead}const TString& strAltXlat{suffix}{t}\
                        (const {t} eToXlat, \
                        const tCIDLib::TBoolean bThrowIfNot = kCIDLib::True);"
                )?;
                writeln!(
                    out,
                    "[[nodiscard]] {lead}{t} eAltXlat{suffix}{t}\
                        (const TString& strToXlat, \
                        const tCIDLib::TBoolean bThrowIfNot = kCIDLib::False);"
                )?;
            }
        }

        if self.alt_num_val {
            writeln!(
                out,
                "[[nodiscard]] {lead}tCIDLib::TInt4 i4AltNum{t}(const {t} eToXlat, \
                    const tCIDLib::TBoolean bThrowIfNot = kCIDLib::False);"
            )?;
            writeln!(
                out,
                "[[nodiscard]] {lead}{t} eAltNum{t}(const tCIDLib::TInt4 i4Xlat, \
                    const tCIDLib::TBoolean bThrowIfNot = kCIDLib::False);"
            )?;
        }

        if self.format_map.is_enabled() {
            writeln!(out, "{lead}tCIDLib::TVoid Format{t}")?;
            writeln!(out, "(")?;
            writeln!(out, "               TString&            strTarget")?;
            writeln!(out, "    , const    TString&            strPrefix")?;
            writeln!(out, "    , const    tCIDLib::TCh        chSepChar")?;
            writeln!(
                out,
                "    , const    TEnumMap::ETextVals eVal = {}",
                self.format_map.selector()
            )?;
            writeln!(out, ");")?;
        }

        writeln!(
            out,
            "[[nodiscard]] {lead}tCIDLib::TBoolean bIsValidEnum(const {t} eVal);"
        )?;
        writeln!(out)
    }

    fn fmt_global_sigs<W: Write>(
        &self,
        out: &mut W,
        enclosing: &str,
        export: &str,
    ) -> fmt::Result {
        if !self.bin_stream {
            return Ok(());
        }

        let full = self.full_type(enclosing);
        let lead = lead(export);

        writeln!(
            out,
            "{lead}tCIDLib::TVoid TBinInStream_ReadArray(TBinInStream& strmSrc, \
                {full}* const aeList, const tCIDLib::TCard4 c4Count);"
        )?;
        writeln!(
            out,
            "{lead}tCIDLib::TVoid TBinOutStream_WriteArray(TBinOutStream& strmTar, \
                const {full}* const aeList, const tCIDLib::TCard4 c4Count);"
        )
    }

    fn fmt_operators<W: Write>(
        &self,
        out: &mut W,
        enclosing: &str,
        export: &str,
    ) -> fmt::Result {
        let full = self.full_type(enclosing);

        let step = |out: &mut W, op: &str, sign: char| {
            writeln!(out, "inline {full} operator{op}({full}& eVal, int)")?;
            writeln!(out, "{{")?;
            writeln!(out, "    {full} eTmp = eVal;")?;
            writeln!(out, "    eVal = {full}(int(eVal){sign}1);")?;
            writeln!(out, "    return eTmp;")?;
            writeln!(out, "}}\n")
        };

        if self.inc_dec != IncDecOps::Off {
            step(out, "++", '+')?;
        }

        if self.inc_dec == IncDecOps::Both {
            step(out, "--", '-')?;
        }

        if self.bin_stream {
            writeln!(
                out,
                "inline TBinOutStream& operator<<(TBinOutStream& strmTar, \
                    const {full} eVal)"
            )?;
            writeln!(out, "{{")?;
            writeln!(out, "    strmTar.WriteEnum(tCIDLib::TCard4(eVal));")?;
            writeln!(out, "    return strmTar;")?;
            writeln!(out, "}}")?;

            writeln!(
                out,
                "inline TBinInStream& operator>>(TBinInStream& strmSrc, \
                    COP {full}& eToFill)"
            )?;
            writeln!(out, "{{")?;
            writeln!(out, "    eToFill = {full}(strmSrc.c4ReadEnum());")?;
            writeln!(out, "    return strmSrc;")?;
            writeln!(out, "}}")?;
        }

        if self.shape == EnumShape::Bitmap {
            for op in ['|', '&'] {
                writeln!(
                    out,
                    "[[nodiscard]] constexpr {full} operator{op}\
                        (const {full} eLHS, const {full} eRHS)"
                )?;
                writeln!(out, "{{")?;
                writeln!(
                    out,
                    "    return {full}(tCIDLib::TEnumMaskType(eLHS) \
                        {op} tCIDLib::TEnumMaskType(eRHS));"
                )?;
                writeln!(out, "}}")?;

                writeln!(
                    out,
                    "constexpr {full}& operator{op}=\
                        ({full}& eLHS, const {full} eRHS)"
                )?;
                writeln!(out, "{{")?;
                writeln!(
                    out,
                    "    eLHS = {full}(tCIDLib::TEnumMaskType(eLHS) \
                        {op} tCIDLib::TEnumMaskType(eRHS));"
                )?;
                writeln!(out, "    return eLHS;")?;
                writeln!(out, "}}")?;
            }
        }

        if self.text_stream_map.is_enabled() {
            writeln!(
                out,
                "{}TTextOutStream& operator<<(TTextOutStream& strmTar, \
                    const {full} eToStream);",
                lead(export)
            )?;
        }

        Ok(())
    }

    /// The mapping table and the map object constructed from it.
    fn fmt_map<W: Write>(&self, out: &mut W, enclosing: &str) -> fmt::Result {
        let t = &self.name;
        let count = self.values.len();
        let load_res = self.text_src == TextSrc::LoadRes;

        write!(out, "\n\nstatic TEnumMap::TEnumValItem aeitemValues_{t}[{count}] = \n{{\n")?;

        for (i, value) in self.values.iter().enumerate() {
            let lead = if i > 0 { "  , { " } else { "    { " };
            let text = value.text.as_deref().unwrap_or_default();

            write!(
                out,
                "{lead} tCIDLib::TInt4({enclosing}::{t}::{}), {}, ",
                value.name, value.alt_num
            )?;

            // Loadable text is referenced by resource id rather than
            //   embedded in the table.
            let text = match (&self.msg_ns, load_res) {
                (Some(ns), true) => {
                    write!(out, "{ns}::{text}, ")?;
                    ""
                }
                _ => {
                    write!(out, "0, ")?;
                    text
                }
            };

            writeln!(
                out,
                " {{ L\"\", L\"{}\", L\"{}\", L\"{}\", L\"{t}::{}\", L\"{text}\" }} }}",
                value.alt_text, value.alt_text2, value.name, value.name,
            )?;
        }

        write!(out, "\n}};\n\n")?;

        let facility = match (&self.msg_fac, load_res) {
            (Some(fac), true) => format!("&fac{fac}"),
            _ => "nullptr".into(),
        };

        let (discontig, limit) = match self.is_contiguous() {
            true => ("kCIDLib::False", "Count"),
            false => ("kCIDLib::True", "None"),
        };

        writeln!(out, "static TEnumMap emap{t}")?;
        writeln!(out, "(")?;
        writeln!(out, "     L\"{t}\"")?;
        writeln!(out, "     , {count}")?;
        writeln!(out, "     , {discontig}")?;
        writeln!(out, "     , aeitemValues_{t}")?;
        writeln!(out, "     , {facility}")?;
        writeln!(out, "     , tCIDLib::TCard4({enclosing}::{t}::{limit})")?;
        write!(out, ");\n\n")
    }

    /// Out-of-line implementations of the enum's functions.
    fn fmt_methods<W: Write>(&self, out: &mut W, enclosing: &str) -> fmt::Result {
        let t = &self.name;
        let full = self.full_type(enclosing);

        let to_text = |out: &mut W, func: &str, map: TextVal| {
            writeln!(
                out,
                "const TString& {enclosing}::{func}{t}(const {full} eVal, \
                    const tCIDLib::TBoolean bThrowIfNot)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    return emap{t}.strMapEnumVal(tCIDLib::TCard4(eVal), {}, \
                    bThrowIfNot);",
                map.selector()
            )?;
            writeln!(out, "}}\n")
        };

        let from_text = |out: &mut W, func: &str, map: TextVal| {
            writeln!(
                out,
                "{full} {enclosing}::{func}{t}(const TString& strVal, \
                    const tCIDLib::TBoolean bThrowIfNot)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    return {full}(emap{t}.i4MapEnumText(strVal, {}, \
                    bThrowIfNot));",
                map.selector()
            )?;
            writeln!(out, "}}\n")
        };

        if self.alt_map.is_enabled() {
            to_text(out, "strAltXlat", self.alt_map)?;
            from_text(out, "eAltXlat", self.alt_map)?;
        }

        if self.alt_map2.is_enabled() {
            to_text(out, "strAltXlat2", self.alt_map2)?;
            from_text(out, "eAltXlat2", self.alt_map2)?;
        }

        if self.load_map.is_enabled() {
            to_text(out, "strLoad", self.load_map)?;
        }

        if self.format_map.is_enabled() {
            writeln!(
                out,
                "tCIDLib::TVoid {enclosing}::Format{t}(TString& strToFill, \
                    const TString& strPrefix, const tCIDLib::TCh chSepChar, \
                    const TEnumMap::ETextVals eVal)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    emap{t}.FormatValues(strToFill, strPrefix, chSepChar, eVal);"
            )?;
            writeln!(out, "}}\n")?;
        }

        if self.xlat_map.is_enabled() {
            to_text(out, "strXlat", self.xlat_map)?;
            from_text(out, "eXlat", self.xlat_map)?;
        }

        if self.alt_num_val {
            writeln!(
                out,
                "tCIDLib::TInt4 {enclosing}::i4AltNum{t}(const {full} eVal, \
                    const tCIDLib::TBoolean bThrowIfNot)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    return emap{t}.i4MapEnumAltNum(tCIDLib::c4EnumOrd(eVal), \
                    bThrowIfNot);"
            )?;
            writeln!(out, "}}\n")?;

            writeln!(
                out,
                "{full} {enclosing}::eAltNum{t}(const tCIDLib::TInt4 i4Val, \
                    const tCIDLib::TBoolean bThrowIfNot)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    return {full}(emap{t}.eMapEnumAltNum(i4Val, bThrowIfNot));"
            )?;
            writeln!(out, "}}\n")?;
        }

        if self.text_stream_map.is_enabled() {
            writeln!(
                out,
                "TTextOutStream& {enclosing}::operator<<(TTextOutStream& strmTar, \
                    const {full} eVal)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    strmTar << emap{t}.strMapEnumVal(tCIDLib::TCard4(eVal), {}, \
                    kCIDLib::False);",
                self.text_stream_map.selector()
            )?;
            writeln!(out, "    return strmTar;")?;
            writeln!(out, "}}")?;
        }

        if self.bin_stream {
            writeln!(
                out,
                "tCIDLib::TVoid TBinInStream_ReadArray(TBinInStream& strmSrc, \
                    {full}* const aeList, const tCIDLib::TCard4 c4Count)"
            )?;
            writeln!(out, "{{")?;
            writeln!(out, "    tCIDLib::TCard4 c4Cur;")?;
            writeln!(
                out,
                "    for (tCIDLib::TCard4 c4Index = 0; c4Index < c4Count; c4Index++)"
            )?;
            writeln!(out, "    {{")?;
            writeln!(out, "        strmSrc >> c4Cur;")?;
            writeln!(out, "        aeList[c4Index] = {full}(c4Cur);")?;
            writeln!(out, "    }}")?;
            writeln!(out, "}}")?;

            writeln!(
                out,
                "tCIDLib::TVoid TBinOutStream_WriteArray(TBinOutStream& strmTar, \
                    const {full}* const aeList, const tCIDLib::TCard4 c4Count)"
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "    for (tCIDLib::TCard4 c4Index = 0; c4Index < c4Count; c4Index++)"
            )?;
            writeln!(out, "        strmTar << tCIDLib::TCard4(aeList[c4Index]);")?;
            writeln!(out, "}}")?;
        }

        writeln!(
            out,
            "tCIDLib::TBoolean {enclosing}::bIsValidEnum(const {full} eVal)"
        )?;
        writeln!(out, "{{")?;
        writeln!(out, "    return emap{t}.bIsValidEnum(tCIDLib::TCard4(eVal));")?;
        writeln!(out, "}}")
    }

    fn full_type(&self, enclosing: &str) -> String {
        match enclosing {
            "" => self.name.clone(),
            _ => format!("{enclosing}::{}", self.name),
        }
    }
}

/// Export keyword followed by a space,
///   or nothing.
fn lead(export: &str) -> String {
    match export {
        "" => String::new(),
        _ => format!("{export} "),
    }
}

/// Parse a `0x`-prefixed hexadecimal literal.
fn parse_hex(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))?;

    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod test;
