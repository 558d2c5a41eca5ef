// Type reference and parameter tests
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
use crate::{
    types::UnknownType,
    xir::{Element, XmlTreeReader},
};

fn tree(src: &str) -> Element {
    XmlTreeReader::new(src)
        .read_document()
        .expect("test document is not well-formed")
        .root
}

fn param(ty: &str, dir: &str, moveable: bool) -> Result<MethodParam, IdlError> {
    let moveable = if moveable { YES } else { NO };

    MethodParam::parse(
        "DoIt",
        &tree(&format!(
            r#"<CIDIDL:Param CIDIDL:Name="p" CIDIDL:Dir="{dir}"
                             CIDIDL:Moveable="{moveable}">
                 <CIDIDL:{ty}/>
               </CIDIDL:Param>"#
        )),
    )
}

#[test]
fn resolves_type_with_aux_attrs() {
    let info = TypeInfo::parse(
        &tree(
            r#"<CIDIDL:TKeyedHashSet CIDIDL:ElemType="TFoo"
                   CIDIDL:KeyType="TString" CIDIDL:KeyOps="TStringKeyOps"
                   CIDIDL:KeyExtract="strKey" CIDIDL:Modulus="29"/>"#,
        ),
        TypeGroup::Param,
    )
    .unwrap();

    assert_eq!(TypeKind::TKeyedHashSet, info.kind());
    assert_eq!(Some("TFoo"), info.elem_type());
    assert_eq!(Some("TString"), info.key_type());
    assert_eq!(Some("TStringKeyOps"), info.key_ops());
    assert_eq!(Some("strKey"), info.key_extract());
    assert_eq!(Some("29"), info.modulus());
    assert!(info.is_move_eligible());
}

#[test]
fn named_type_is_elem_type() {
    let info = TypeInfo::parse(
        &tree(r#"<CIDIDL:Enumerated CIDIDL:Type="tFoo::EBar"/>"#),
        TypeGroup::Return,
    )
    .unwrap();

    assert_eq!(Some("tFoo::EBar"), info.elem_type());
    assert_eq!(None, info.modulus());
}

#[test]
fn collection_without_elem_type_fails() {
    let result = TypeInfo::parse(&tree("<CIDIDL:TVector/>"), TypeGroup::Param);

    assert!(matches!(
        result,
        Err(IdlError::MalformedInput {
            reason: Malformed::MissingAttr(attr),
            ..
        }) if attr == "CIDIDL:ElemType"
    ));
}

#[test]
fn unknown_type_fails() {
    let result = TypeInfo::parse(&tree("<CIDIDL:TWidget/>"), TypeGroup::Param);

    assert!(matches!(
        result,
        Err(IdlError::UnknownType(UnknownType(name), _)) if name == "CIDIDL:TWidget"
    ));
}

#[test]
fn unprefixed_type_element_fails() {
    let result = TypeInfo::parse(&tree("<TString/>"), TypeGroup::Param);

    assert!(matches!(
        result,
        Err(IdlError::UnknownType(UnknownType(name), _)) if name == "TString"
    ));
}

#[test]
fn type_must_belong_to_group() {
    let result = TypeInfo::parse(&tree("<CIDIDL:TVoid/>"), TypeGroup::Param);

    assert!(matches!(
        result,
        Err(IdlError::MalformedInput {
            reason: Malformed::TypeNotAllowed(TypeKind::TVoid, TypeGroup::Param),
            ..
        })
    ));
}

#[test]
fn parses_param_attrs() {
    let p = MethodParam::parse(
        "DoIt",
        &tree(
            r#"<CIDIDL:Param CIDIDL:Name="c4Count" CIDIDL:Dir="InOut"
                             CIDIDL:DefVal="0">
                 <CIDIDL:TCard4/>
               </CIDIDL:Param>"#,
        ),
    )
    .unwrap();

    assert_eq!("c4Count", p.name());
    assert_eq!(ParamDir::InOut, p.dir());
    assert_eq!(Some("0"), p.default());
    assert!(!p.is_moveable());
    assert_eq!(TypeKind::TCard4, p.ty().kind());
}

#[test]
fn mem_buf_in_out_moveable_fails() {
    assert!(param("TMemBuf", "InOut", true).is_err());
}

#[test]
fn mem_buf_in_succeeds() {
    let p = param("TMemBuf", "In", false).unwrap();

    assert_eq!(TypeKind::TMemBuf, p.ty().kind());
}

#[test]
fn heap_buf_in_moveable_succeeds() {
    let p = param("THeapBuf", "In", true).unwrap();

    assert!(p.is_moveable());
}

#[test]
fn mem_buf_must_be_input() {
    for dir in ["Out", "InOut"] {
        assert!(matches!(
            param("TMemBuf", dir, false),
            Err(IdlError::InvalidParameterType {
                ty: TypeKind::TMemBuf,
                ..
            })
        ));
    }
}

#[test]
fn buffer_cannot_have_default() {
    for ty in ["TMemBuf", "THeapBuf"] {
        let result = MethodParam::parse(
            "DoIt",
            &tree(&format!(
                r#"<CIDIDL:Param CIDIDL:Name="mbufData" CIDIDL:Dir="In"
                                 CIDIDL:DefVal="TMemBuf()">
                     <CIDIDL:{ty}/>
                   </CIDIDL:Param>"#
            )),
        );

        assert!(matches!(
            result,
            Err(IdlError::MalformedInput {
                reason: Malformed::BufferDefault(name),
                ..
            }) if name == "mbufData"
        ));
    }
}

#[test]
fn out_param_cannot_move() {
    assert!(matches!(
        param("TString", "Out", true),
        Err(IdlError::InvalidMoveRequest {
            reason: MoveDenied::OutParam,
            ..
        })
    ));
}

#[test]
fn ineligible_type_cannot_move() {
    assert!(matches!(
        param("TCard4", "In", true),
        Err(IdlError::InvalidMoveRequest {
            reason: MoveDenied::NotEligible(TypeKind::TCard4),
            ..
        })
    ));
}

#[test]
fn in_out_string_may_move() {
    assert!(param("TString", "InOut", true).is_ok());
}

#[test]
fn bad_direction_fails() {
    assert!(matches!(
        param("TCard4", "Sideways", false),
        Err(IdlError::MalformedInput {
            reason: Malformed::BadKeyword { attr: QN_DIR, .. },
            ..
        })
    ));
}

#[test]
fn param_without_type_fails() {
    let result = MethodParam::parse(
        "DoIt",
        &tree(r#"<CIDIDL:Param CIDIDL:Name="p" CIDIDL:Dir="In"/>"#),
    );

    assert!(matches!(
        result,
        Err(IdlError::MalformedInput {
            reason: Malformed::MissingType,
            ..
        })
    ));
}
