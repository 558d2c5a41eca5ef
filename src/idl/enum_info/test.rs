// Enum declaration tests
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

use super::*;
use crate::xir::{Element, XmlTreeReader};

fn parse_enum(src: &str) -> Result<EnumInfo, IdlError> {
    let root: Element = XmlTreeReader::new(src)
        .read_document()
        .expect("test enum is not well-formed")
        .root;

    EnumInfo::parse(&root)
}

fn reason(result: Result<EnumInfo, IdlError>) -> Malformed {
    match result {
        Err(IdlError::MalformedInput { reason, .. }) => reason,
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

fn def(info: &EnumInfo) -> String {
    let mut out = String::new();
    info.fmt_def(&mut out).expect("fmt_def failed");
    out
}

#[test]
fn standard_enum_has_contiguous_sentinels() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EColors">
             <CIDIDL:DocText>Some colors</CIDIDL:DocText>
             <CIDIDL:EnumVal CIDIDL:Name="Red"/>
             <CIDIDL:EnumVal CIDIDL:Name="Green"/>
             <CIDIDL:EnumVal CIDIDL:Name="Blue"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(EnumShape::Standard, info.shape());
    assert!(info.values().iter().all(|v| v.value().is_none()));
    assert_eq!(None, info.all_bits());

    assert_eq!(
        "enum class EColors\n\
         {\n    \
             Red\n    \
             , Green\n    \
             , Blue\n    \
             , Count\n    \
             , Min = Red\n    \
             , Max = Blue\n\
         };\n",
        def(&info),
    );
}

#[test]
fn bitmap_enum_all_bits_is_union_of_values() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EFlags" CIDIDL:Type="Bmp">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Value="0x1"/>
             <CIDIDL:EnumVal CIDIDL:Name="B" CIDIDL:Value="0x2"/>
             <CIDIDL:EnumVal CIDIDL:Name="C" CIDIDL:Value="0x4"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(EnumShape::Bitmap, info.shape());
    assert_eq!(Some(0x7), info.all_bits());
    assert_eq!(Some(TypeKind::TCard4), info.base_type());

    let out = def(&info);
    assert!(out.starts_with("enum class EFlags : tCIDLib::TCard4\n"));
    assert!(out.contains("    A = 0x1\n    , B = 0x2\n    , C = 0x4\n"));
    assert!(out.contains("    , Count = 3\n"));
    assert!(out.contains("    , None = 0\n"));
    assert!(out.contains("    , AllBits = 0x7\n"));
    assert!(!out.contains("Min"));
    assert!(!out.contains("Max"));
}

#[test]
fn synonyms_follow_sentinels() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="ESizes">
             <CIDIDL:EnumVal CIDIDL:Name="Small"/>
             <CIDIDL:EnumVal CIDIDL:Name="Large"/>
             <CIDIDL:EnumSyn CIDIDL:Name="Default" CIDIDL:Value="Small"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    let out = def(&info);
    let max = out.find(", Max = Large").unwrap();
    let syn = out.find(", Default = Small").unwrap();

    assert!(max < syn);
}

#[test]
fn explicit_base_type_is_rendered() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="ESmall" CIDIDL:BaseType="TCard1">
             <CIDIDL:EnumVal CIDIDL:Name="One"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert!(def(&info).starts_with("enum class ESmall : tCIDLib::TCard1\n"));
}

#[test]
fn default_base_type_is_omitted() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EOne" CIDIDL:BaseType="Default">
             <CIDIDL:EnumVal CIDIDL:Name="One"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(None, info.base_type());
}

#[test]
fn bitmap_value_required() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EFlags" CIDIDL:Type="Bmp">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Value="0x1"/>
             <CIDIDL:EnumVal CIDIDL:Name="B"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(Malformed::ValueRequired("B".into()), reason(result));
}

#[test]
fn standard_value_forbidden() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EColors">
             <CIDIDL:EnumVal CIDIDL:Name="Red" CIDIDL:Value="1"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(Malformed::ValueNotUsed("Red".into()), reason(result));
}

#[test]
fn bitmap_value_must_be_hex() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EFlags" CIDIDL:Type="Bmp">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Value="16"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(
        Malformed::BadBitmapValue {
            value: "A".into(),
            literal: "16".into(),
        },
        reason(result),
    );
}

#[test]
fn bitmap_base_must_be_unsigned() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="EFlags" CIDIDL:Type="Bmp"
                        CIDIDL:BaseType="TInt4">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Value="0x1"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(
        Malformed::BitmapBaseNotUnsigned(TypeKind::TInt4),
        reason(result)
    );
}

#[test]
fn unknown_shape_rejected() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:Type="Odd">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(Malformed::BadEnumShape("Odd".into()), reason(result));
}

#[test]
fn enum_without_values_rejected() {
    let result = parse_enum(r#"<CIDIDL:Enum CIDIDL:Name="E"/>"#);

    assert_eq!(Malformed::NoValues, reason(result));
}

#[test]
fn alt_map_requires_alt_text_source() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltMap="AltText">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(
        Malformed::TextSourceDisabled {
            attr: QN_ALT_MAP,
            target: TextVal::AltText,
        },
        reason(result),
    );
}

#[test]
fn alt_map_with_inline_alt_text_succeeds() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltMap="AltText"
                        CIDIDL:AltTextSrc="Inline">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:AltText="alpha"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(AltTextSrc::Inline, info.alt_text_src());
    assert_eq!("alpha", info.values()[0].alt_text());
}

#[test]
fn inline_alt_text_is_required_per_value() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltTextSrc="Inline">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(Malformed::MissingAttr(QN_ALT_TEXT.into()), reason(result));
}

#[test]
fn alt_text2_map_requires_alt_text2() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltMap2="AltText2">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert!(matches!(
        reason(result),
        Malformed::TextSourceDisabled {
            target: TextVal::AltText2,
            ..
        }
    ));
}

#[test]
fn text_map_requires_value_text() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:XlatMap="Text">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert!(matches!(
        reason(result),
        Malformed::TextSourceDisabled {
            attr: QN_XLAT_MAP,
            target: TextVal::Text,
        }
    ));
}

#[test]
fn name_maps_need_no_source() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:XlatMap="BaseName"
                        CIDIDL:FormatMap="Name">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert!(info.is_ok());
}

#[test]
fn bad_text_target_rejected() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:LoadMap="Bogus">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(
        Malformed::BadTextTarget {
            attr: QN_LOAD_MAP,
            value: "Bogus".into(),
        },
        reason(result),
    );
}

#[test]
fn pattern_substitutes_value_name() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltTextSrc="Pattern"
                        CIDIDL:AltPattern="Item %(v)!">
             <CIDIDL:EnumVal CIDIDL:Name="One"/>
             <CIDIDL:EnumVal CIDIDL:Name="Two"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(AltTextSrc::Pattern, info.alt_text_src());
    assert_eq!("Item One!", info.values()[0].alt_text());
    assert_eq!("Item Two!", info.values()[1].alt_text());
}

#[test]
fn pattern_without_token_rejected() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltTextSrc="Pattern"
                        CIDIDL:AltPattern="Item">
             <CIDIDL:EnumVal CIDIDL:Name="One"/>
           </CIDIDL:Enum>"#,
    );

    assert_eq!(Malformed::PatternMissingToken("Item".into()), reason(result));
}

#[test]
fn text_source_inline_or_loadable() {
    let inline = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Text="Alpha"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    let load_res = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:MsgFac="CIDLib"
                        CIDIDL:MsgNS="kCIDMsgs">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Text="midA"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    let none = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:MsgFac="CIDLib"
                        CIDIDL:MsgNS="kCIDMsgs">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(TextSrc::Inline, inline.text_src());
    assert_eq!(TextSrc::LoadRes, load_res.text_src());
    assert_eq!(TextSrc::Off, none.text_src());
}

#[test]
fn alt_num_defaults_to_zero() {
    let info = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltNumVal="Yes">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:AltNumVal="-5"/>
             <CIDIDL:EnumVal CIDIDL:Name="B"/>
           </CIDIDL:Enum>"#,
    )
    .unwrap();

    assert_eq!(-5, info.values()[0].alt_num());
    assert_eq!(0, info.values()[1].alt_num());
}

#[test]
fn alt_num_must_be_numeric() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:AltNumVal="Yes">
             <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:AltNumVal="five"/>
           </CIDIDL:Enum>"#,
    );

    assert!(matches!(
        reason(result),
        Malformed::BadNumber {
            attr: QN_ALT_NUM_VAL,
            ..
        }
    ));
}

#[test]
fn unexpected_child_rejected() {
    let result = parse_enum(
        r#"<CIDIDL:Enum CIDIDL:Name="E">
             <CIDIDL:EnumVal CIDIDL:Name="A"/>
             <CIDIDL:Member CIDIDL:Name="B"/>
           </CIDIDL:Enum>"#,
    );

    assert!(matches!(
        result,
        Err(IdlError::UnexpectedElement { found, .. }) if found == QN_MEMBER
    ));
}

mod render {
    use super::*;

    const FULL_ENUM: &str = r#"
        <CIDIDL:Enum CIDIDL:Name="EModes" CIDIDL:XlatMap="AltText"
                     CIDIDL:AltTextSrc="Inline" CIDIDL:FormatMap="Name"
                     CIDIDL:IncDec="Both" CIDIDL:BinStream="Yes"
                     CIDIDL:TextStreamMap="BaseName">
          <CIDIDL:EnumVal CIDIDL:Name="Off" CIDIDL:AltText="off"/>
          <CIDIDL:EnumVal CIDIDL:Name="On" CIDIDL:AltText="on"/>
        </CIDIDL:Enum>"#;

    fn header(class_type: bool) -> (String, String) {
        let info = parse_enum(FULL_ENUM).unwrap();
        let (mut out, mut xhdr) = (String::new(), String::new());

        info.fmt_header(class_type, "TFoo", "FOOEXP", &mut out, &mut xhdr)
            .expect("fmt_header failed");

        (out, xhdr)
    }

    #[test]
    fn namespace_header_declares_enabled_functions() {
        let (out, _) = header(false);

        assert!(out.contains("    enum class EModes\n    {\n"));
        assert!(out.contains(
            "[[nodiscard]] FOOEXP EModes eXlatEModes(const TString& strToXlat"
        ));
        assert!(out.contains("FOOEXP const TString& strXlatEModes("));
        assert!(out.contains("FOOEXP tCIDLib::TVoid FormatEModes\n"));
        assert!(out.contains("eVal = TEnumMap::ETextVals::Name\n"));
        assert!(out.contains("bIsValidEnum(const EModes eVal);"));
        assert!(!out.contains("strLoad"));
        assert!(!out.contains("i4AltNum"));
    }

    #[test]
    fn namespace_operators_are_inline() {
        let (out, xhdr) = header(false);

        assert!(out.contains("    inline TFoo::EModes operator++(TFoo::EModes& eVal, int)"));
        assert!(out.contains("operator--"));
        assert!(out.contains("operator<<(TBinOutStream& strmTar"));
        assert!(!xhdr.contains("operator++"));
        assert!(xhdr.contains("TBinInStream_ReadArray"));
    }

    #[test]
    fn class_operators_are_deferred() {
        let (out, xhdr) = header(true);

        assert!(out.contains("        enum class EModes\n"));
        assert!(out.contains("static EModes eXlatEModes("));
        assert!(!out.contains("operator++"));
        assert!(xhdr.contains("inline TFoo::EModes operator++(TFoo::EModes& eVal, int)\n"));
        assert!(xhdr.contains("TTextOutStream& operator<<(TTextOutStream& strmTar"));
    }

    #[test]
    fn bitmap_operators_only_for_bitmaps() {
        let (out, _) = header(false);
        assert!(!out.contains("operator|"));

        let info = parse_enum(
            r#"<CIDIDL:Enum CIDIDL:Name="EFlags" CIDIDL:Type="Bmp">
                 <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Value="0x1"/>
               </CIDIDL:Enum>"#,
        )
        .unwrap();

        let (mut out, mut xhdr) = (String::new(), String::new());
        info.fmt_header(false, "TFoo", "", &mut out, &mut xhdr).unwrap();

        assert!(out.contains("operator|(const TFoo::EFlags eLHS"));
        assert!(out.contains("operator&=(TFoo::EFlags& eLHS"));
    }

    #[test]
    fn impl_renders_table_in_value_order() {
        let info = parse_enum(FULL_ENUM).unwrap();
        let mut out = String::new();
        info.fmt_impl("TFoo", &mut out).unwrap();

        assert!(out.contains("static TEnumMap::TEnumValItem aeitemValues_EModes[2] = \n{\n"));

        let off = out
            .find("tCIDLib::TInt4(TFoo::EModes::Off), 0, 0,  { L\"\", L\"off\", L\"\", L\"Off\", L\"EModes::Off\", L\"\" } }")
            .expect("missing Off row");
        let on = out.find("tCIDLib::TInt4(TFoo::EModes::On)").expect("missing On row");
        assert!(off < on);

        assert!(out.contains("     , kCIDLib::False\n"));
        assert!(out.contains("     , nullptr\n"));
        assert!(out.contains("     , tCIDLib::TCard4(TFoo::EModes::Count)\n"));
        assert!(out.contains(
            "emapEModes.strMapEnumVal(tCIDLib::TCard4(eVal), \
                TEnumMap::ETextVals::AltText, bThrowIfNot)"
        ));
        assert!(out.contains("tCIDLib::TBoolean TFoo::bIsValidEnum(const TFoo::EModes eVal)"));
    }

    #[test]
    fn loadable_text_references_resource() {
        let info = parse_enum(
            r#"<CIDIDL:Enum CIDIDL:Name="E" CIDIDL:MsgFac="CIDLib"
                            CIDIDL:MsgNS="kCIDMsgs" CIDIDL:LoadMap="Text">
                 <CIDIDL:EnumVal CIDIDL:Name="A" CIDIDL:Text="midA"/>
               </CIDIDL:Enum>"#,
        )
        .unwrap();

        let mut out = String::new();
        info.fmt_impl("TFoo", &mut out).unwrap();

        assert!(out.contains("kCIDMsgs::midA,  { L\"\", L\"\", L\"\", L\"A\", L\"E::A\", L\"\" } }"));
        assert!(out.contains("     , &facCIDLib\n"));
        assert!(out.contains("TFoo::strLoadE(const TFoo::E eVal"));
    }
}
