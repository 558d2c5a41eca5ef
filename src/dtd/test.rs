// Schema tests
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
use crate::xir::{Document, DocumentNode, Element, XmlTreeReader};

fn parse(src: &str) -> Document {
    XmlTreeReader::new(src)
        .read_document()
        .expect("test document is not well-formed")
}

fn validate(src: &str) -> Result<Element, Vec<SchemaViolation>> {
    let mut root = parse(src).root;
    Schema::cididl().validate(&mut root).map(|_| root)
}

const MINIMAL_INTF: &str = r#"
<CIDIDL:Interface>
  <CIDIDL:ClassIntf CIDIDL:Name="Test" CIDIDL:InterfaceId="ABC">
    <CIDIDL:Methods>
      <CIDIDL:Method CIDIDL:Name="GetValue">
        <CIDIDL:RetType><CIDIDL:TCard4/></CIDIDL:RetType>
        <CIDIDL:Param CIDIDL:Name="key" CIDIDL:Dir="In">
          <CIDIDL:TString/>
        </CIDIDL:Param>
      </CIDIDL:Method>
      <CIDIDL:PollMethod CIDIDL:Name="Poll">
        <CIDIDL:RetType><CIDIDL:TBoolean/></CIDIDL:RetType>
      </CIDIDL:PollMethod>
    </CIDIDL:Methods>
  </CIDIDL:ClassIntf>
</CIDIDL:Interface>
"#;

#[test]
fn dtd_text_declares_entities_before_use() {
    let text = Schema::cididl().dtd_text();

    let entity = text
        .find("<!ENTITY % IDLPTypes ")
        .expect("missing param type entity");
    let param = text
        .find("<!ELEMENT   CIDIDL:Param (%IDLPTypes;)>")
        .expect("missing Param declaration");

    assert!(entity < param);
}

#[test]
fn dtd_text_renders_content_models_and_defaults() {
    let text = Schema::cididl().dtd_text();

    assert!(text.contains("<!ELEMENT   CIDIDL:Ctor (CIDIDL:Param+)>"));
    assert!(text.contains(
        "<!ELEMENT   CIDIDL:Methods (CIDIDL:PollMethod|CIDIDL:Method)*>"
    ));
    assert!(text.contains("<!ELEMENT   CIDIDL:DocText (#PCDATA)>"));
    assert!(text.contains("CIDIDL:TimeOut CDATA '10000'"));
    assert!(text.contains("CIDIDL:Dir (In|Out|InOut) #REQUIRED"));
    assert!(text.contains("CIDIDL:Type (%IDLCTypes;) #REQUIRED"));
    assert!(text.contains("<!ELEMENT   CIDIDL:TCard4 EMPTY>"));
}

#[test]
fn every_element_type_name_is_declared() {
    let schema = Schema::cididl();

    for group in [TypeGroup::Param, TypeGroup::Return] {
        for name in group.member_names() {
            let decl = schema
                .element(&name)
                .unwrap_or_else(|| panic!("{name} is not declared"));

            assert_eq!(&ContentModel::Empty, decl.content());
        }
    }
}

#[test]
fn collection_elements_require_aux_attrs() {
    let schema = Schema::cididl();
    let decl = schema.element("CIDIDL:THashSet").expect("missing THashSet");

    let names = decl.attrs().iter().map(AttrDecl::name).collect::<Vec<_>>();

    assert_eq!(
        vec!["CIDIDL:ElemType", "CIDIDL:KeyOps", "CIDIDL:Modulus"],
        names
    );
    assert!(decl
        .attrs()
        .iter()
        .all(|a| *a.default() == AttrDefault::Required));
}

#[test]
fn valid_document_fills_defaults() {
    let root = validate(MINIMAL_INTF).expect("validation failed");

    let intf = root.child_at(0).expect("missing ClassIntf");
    assert_eq!(Some("TOrbClientBase"), intf.attr(QN_CLIENT_BASE));
    assert_eq!(Some("TOrbServerBase"), intf.attr(QN_SERVER_BASE));

    let methods = intf.child_at(0).expect("missing Methods");
    let method = methods.child_at(0).expect("missing Method");
    let poll = methods.child_at(1).expect("missing PollMethod");

    assert_eq!(Some("30000"), method.attr(QN_TIMEOUT));
    assert_eq!(Some("No"), method.attr(QN_IN_BASE_CLASS));
    assert_eq!(Some("10000"), poll.attr(QN_TIMEOUT));

    let param = method.child_at(1).expect("missing Param");
    assert_eq!(Some("No"), param.attr(QN_MOVEABLE));
    assert!(param
        .find_attr(QN_MOVEABLE)
        .map(|a| a.is_defaulted())
        .unwrap_or(false));

    // Implied attributes are not defaulted.
    assert_eq!(None, param.attr(QN_DEF_VAL));
}

#[test]
fn explicit_attr_not_overridden_by_default() {
    let root = validate(
        r#"<CIDIDL:Methods>
             <CIDIDL:Method CIDIDL:Name="M" CIDIDL:TimeOut="500">
               <CIDIDL:RetType><CIDIDL:TVoid/></CIDIDL:RetType>
             </CIDIDL:Method>
           </CIDIDL:Methods>"#,
    )
    .expect("validation failed");

    let method = root.child_at(0).expect("missing Method");
    assert_eq!(Some("500"), method.attr(QN_TIMEOUT));
}

#[test]
fn undeclared_element() {
    let errs = validate("<CIDIDL:Interface><CIDIDL:Bogus/></CIDIDL:Interface>")
        .unwrap_err();

    assert!(errs.iter().any(|e| matches!(
        e,
        SchemaViolation::UndeclaredElement { name, .. } if name == "CIDIDL:Bogus"
    )));
}

#[test]
fn undeclared_attr() {
    let errs = validate(r#"<CIDIDL:Interface CIDIDL:Name="x"/>"#).unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::UndeclaredAttr { attr, .. }] if attr == "CIDIDL:Name"
    ));
}

#[test]
fn missing_required_attr() {
    let errs = validate(
        r#"<CIDIDL:Constants>
             <CIDIDL:Constant CIDIDL:Name="c4Max" CIDIDL:Type="TCard4"/>
           </CIDIDL:Constants>"#,
    )
    .unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::MissingRequiredAttr { element, attr, .. }]
            if element == "CIDIDL:Constant" && attr == "CIDIDL:Value"
    ));
}

#[test]
fn bad_enumerated_value() {
    let errs = validate(
        r#"<CIDIDL:Param CIDIDL:Name="p" CIDIDL:Dir="Sideways">
             <CIDIDL:TCard4/>
           </CIDIDL:Param>"#,
    )
    .unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::BadAttrValue { value, .. }] if value == "Sideways"
    ));
}

#[test]
fn constant_type_must_be_scalar() {
    let errs = validate(
        r#"<CIDIDL:Constants>
             <CIDIDL:Constant CIDIDL:Name="c" CIDIDL:Type="TBag" CIDIDL:Value="1"/>
           </CIDIDL:Constants>"#,
    )
    .unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::BadAttrValue { attr, .. }] if attr == "CIDIDL:Type"
    ));

    validate(
        r#"<CIDIDL:Constants>
             <CIDIDL:Constant CIDIDL:Name="c" CIDIDL:Type="TCard4" CIDIDL:Value="1"/>
           </CIDIDL:Constants>"#,
    )
    .expect("scalar constant rejected");
}

#[test]
fn bad_nmtoken() {
    let errs = validate(
        r#"<CIDIDL:Struct CIDIDL:Type="has space"/>"#,
    )
    .unwrap_err();

    assert!(matches!(&errs[..], [SchemaViolation::BadNmToken { .. }]));
}

#[test]
fn param_type_outside_group_rejected() {
    // TVoid is a return type only.
    let errs = validate(
        r#"<CIDIDL:Param CIDIDL:Name="p" CIDIDL:Dir="In"><CIDIDL:TVoid/></CIDIDL:Param>"#,
    )
    .unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::ContentMismatch { element, .. }]
            if element == "CIDIDL:Param"
    ));
}

#[test]
fn class_intf_requires_methods() {
    let errs = validate(
        r#"<CIDIDL:ClassIntf CIDIDL:Name="T" CIDIDL:InterfaceId="x"/>"#,
    )
    .unwrap_err();

    assert!(matches!(
        &errs[..],
        [SchemaViolation::ContentMismatch { model, .. }]
            if model.contains("CIDIDL:Methods")
    ));
}

#[test]
fn class_intf_sections_are_ordered_and_unique() {
    let out_of_order = r#"
        <CIDIDL:ClassIntf CIDIDL:Name="T" CIDIDL:InterfaceId="x">
          <CIDIDL:Methods/>
          <CIDIDL:Types/>
        </CIDIDL:ClassIntf>"#;

    let duplicate = r#"
        <CIDIDL:ClassIntf CIDIDL:Name="T" CIDIDL:InterfaceId="x">
          <CIDIDL:Types/>
          <CIDIDL:Types/>
          <CIDIDL:Methods/>
        </CIDIDL:ClassIntf>"#;

    let ok = r#"
        <CIDIDL:ClassIntf CIDIDL:Name="T" CIDIDL:InterfaceId="x">
          <CIDIDL:Types/>
          <CIDIDL:Methods/>
        </CIDIDL:ClassIntf>"#;

    assert!(validate(out_of_order).is_err());
    assert!(validate(duplicate).is_err());
    validate(ok).expect("valid ClassIntf rejected");
}

#[test]
fn enum_content_model() {
    let ok = r#"
        <CIDIDL:Enum CIDIDL:Name="EColors">
          <CIDIDL:DocText>Colors</CIDIDL:DocText>
          <CIDIDL:EnumVal CIDIDL:Name="Red"/>
          <CIDIDL:EnumVal CIDIDL:Name="Green"/>
          <CIDIDL:EnumSyn CIDIDL:Name="Default" CIDIDL:Value="Red"/>
        </CIDIDL:Enum>"#;

    let no_values = r#"
        <CIDIDL:Enum CIDIDL:Name="EColors">
          <CIDIDL:EnumSyn CIDIDL:Name="Default" CIDIDL:Value="Red"/>
        </CIDIDL:Enum>"#;

    let root = validate(ok).expect("valid enum rejected");
    assert_eq!(Some("Std"), root.attr(QN_TYPE));
    assert_eq!(Some("No"), root.attr(QN_FORMAT_MAP));
    assert_eq!(Some(""), root.attr(QN_ALT_PATTERN));

    assert!(validate(no_values).is_err());
}

#[test]
fn text_in_element_only_content() {
    let errs = validate("<CIDIDL:Interface>oops</CIDIDL:Interface>").unwrap_err();

    assert!(matches!(&errs[..], [SchemaViolation::UnexpectedText { .. }]));
}

#[test]
fn whitespace_in_element_only_content_is_ignored() {
    validate("<CIDIDL:Interface>\n   \n</CIDIDL:Interface>")
        .expect("whitespace rejected");
}

#[test]
fn violations_are_collected() {
    let errs = validate(
        r#"<CIDIDL:Interface>
             <CIDIDL:Bogus/>
             <CIDIDL:Globals CIDIDL:Junk="1"/>
           </CIDIDL:Interface>"#,
    )
    .unwrap_err();

    // Content mismatch of Interface, undeclared Bogus, undeclared Junk.
    assert_eq!(3, errs.len(), "{errs:?}");
}

#[test]
fn particle_star_of_optional_terminates() {
    let schema = Schema::cididl();
    let p = star(opt(elem("a")));

    assert!(p.matches(&schema, &[]));
    assert!(p.matches(&schema, &["a", "a"]));
    assert!(!p.matches(&schema, &["b"]));
}

#[test]
fn particle_plus_requires_one() {
    let schema = Schema::cididl();
    let p = plus(elem("a"));

    assert!(!p.matches(&schema, &[]));
    assert!(p.matches(&schema, &["a"]));
    assert!(p.matches(&schema, &["a", "a", "a"]));
}

mod doctype {
    use super::*;
    use crate::span::DUMMY_SPAN;
    use crate::xir::DocType;
    use fxhash::FxHashMap;

    fn root() -> Element {
        Element::new(QN_INTERFACE, DUMMY_SPAN)
    }

    fn doctype(public_id: Option<&str>, system_id: Option<&str>) -> DocType {
        DocType {
            root_name: QN_INTERFACE.into(),
            public_id: public_id.map(Into::into),
            system_id: system_id.map(Into::into),
            span: DUMMY_SPAN,
        }
    }

    #[test]
    fn absent_doctype_accepted() {
        Schema::cididl()
            .check_doctype(None, &root(), &FxHashMap::default())
            .expect("missing doctype rejected");
    }

    #[test]
    fn embedded_system_id_accepted() {
        Schema::cididl()
            .check_doctype(
                Some(&doctype(None, Some(SYSTEM_ID))),
                &root(),
                &FxHashMap::default(),
            )
            .expect("embedded system id rejected");
    }

    #[test]
    fn embedded_public_id_accepted_with_any_system_id() {
        Schema::cididl()
            .check_doctype(
                Some(&doctype(Some(PUBLIC_ID), Some("elsewhere/CIDIDL.DTD"))),
                &root(),
                &FxHashMap::default(),
            )
            .expect("embedded public id rejected");
    }

    #[test]
    fn unknown_system_id_rejected() {
        assert!(matches!(
            Schema::cididl().check_doctype(
                Some(&doctype(None, Some("other.dtd"))),
                &root(),
                &FxHashMap::default(),
            ),
            Err(SchemaViolation::UnknownSchema { system_id, .. })
                if system_id == "other.dtd"
        ));
    }

    #[test]
    fn mapped_public_id_accepted() {
        let mut mappings = FxHashMap::default();
        mappings.insert("urn:local:IDL".to_string(), SYSTEM_ID.to_string());

        Schema::cididl()
            .check_doctype(
                Some(&doctype(Some("urn:local:IDL"), Some("x.dtd"))),
                &root(),
                &mappings,
            )
            .expect("mapped public id rejected");
    }

    #[test]
    fn root_mismatch_rejected() {
        let other = Element::new(QN_GLOBALS, DUMMY_SPAN);

        assert!(matches!(
            Schema::cididl().check_doctype(
                Some(&doctype(None, None)),
                &other,
                &FxHashMap::default(),
            ),
            Err(SchemaViolation::DocTypeRootMismatch { .. })
        ));
    }
}
