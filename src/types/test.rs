// IDL type catalog tests
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

#[test]
fn every_group_member_name_resolves_back_to_group() {
    for group in TypeGroup::ALL {
        for name in group.member_names() {
            if name == ENUM_BASE_DEFAULT {
                continue;
            }

            let kind = match group.is_element_group() {
                true => TypeKind::resolve_element(&name),
                false => TypeKind::resolve(&name),
            }
            .unwrap_or_else(|e| panic!("{group:?}: {e}"));

            assert!(kind.in_group(group), "{name} not in {group:?}");
        }
    }
}

#[test]
fn constant_group_excludes_collections_and_objects() {
    for kind in TypeGroup::Constant.members() {
        assert!(!kind.is_collection(), "{kind} is a collection");
        assert!(!kind.is_mem_buf(), "{kind} is a buffer");
        assert_ne!(TypeKind::Object, kind);
        assert_ne!(TypeKind::Enumerated, kind);
        assert_ne!(TypeKind::TVoid, kind);
    }
}

#[test]
fn param_group_includes_collections_and_object() {
    let params = TypeGroup::Param.members().collect::<Vec<_>>();

    assert!(params.contains(&TypeKind::Object));
    assert!(params.iter().any(|k| k.is_collection()));
    assert!(!params.contains(&TypeKind::TVoid));
}

#[test]
fn void_is_return_only() {
    assert_eq!(&[TypeGroup::Return], TypeKind::TVoid.groups());
}

#[test]
fn collections_always_carry_element_type() {
    for &kind in TypeKind::ALL.iter().filter(|k| k.is_collection()) {
        assert!(
            kind.aux_attrs()
                .iter()
                .any(|(attr, _)| *attr == AuxAttr::ElemType),
            "{kind} lacks an element type"
        );
    }
}

#[test]
fn keyed_hash_set_aux_attrs() {
    let attrs = TypeKind::TKeyedHashSet
        .aux_attrs()
        .iter()
        .map(|(attr, _)| *attr)
        .collect::<Vec<_>>();

    assert_eq!(
        vec![
            AuxAttr::ElemType,
            AuxAttr::KeyType,
            AuxAttr::KeyOps,
            AuxAttr::KeyExtract,
            AuxAttr::Modulus,
        ],
        attrs
    );
}

#[test]
fn resolve_attr_value_is_bare() {
    assert_eq!(Ok(TypeKind::TCard4), TypeKind::resolve("TCard4"));
    assert_eq!(
        Err(UnknownType("CIDIDL:TCard4".into())),
        TypeKind::resolve("CIDIDL:TCard4")
    );
}

#[test]
fn resolve_element_requires_prefix() {
    assert_eq!(
        Ok(TypeKind::TCard4),
        TypeKind::resolve_element("CIDIDL:TCard4")
    );
    assert_eq!(
        Err(UnknownType("TCard4".into())),
        TypeKind::resolve_element("TCard4")
    );
}

#[test]
fn resolve_unknown() {
    assert_eq!(
        Err(UnknownType("CIDIDL:TQuux".into())),
        TypeKind::resolve_element("CIDIDL:TQuux")
    );

    // Names are case-sensitive.
    assert!(TypeKind::resolve("tcard4").is_err());
}

#[test]
fn move_eligibility_table() {
    use TypeKind::*;

    let eligible = [
        Object, TBag, THashSet, TKeyedHashSet, TVector, THeapBuf, TString,
        TMemBuf,
    ];

    for &kind in TypeKind::ALL {
        assert_eq!(
            eligible.contains(&kind),
            kind.is_move_eligible(),
            "{kind}"
        );
    }
}

#[test]
fn enum_base_group_admits_default() {
    let names = TypeGroup::EnumBase.member_names();

    assert_eq!(Some(&ENUM_BASE_DEFAULT.to_string()), names.first());
    assert!(names.contains(&"TCard4".to_string()));
    assert!(!names.contains(&"TCard8".to_string()));
}

#[test]
fn element_groups_are_prefixed() {
    assert!(TypeGroup::Param
        .member_names()
        .iter()
        .all(|n| n.starts_with(NS_PREFIX)));

    assert!(TypeGroup::Constant
        .member_names()
        .iter()
        .all(|n| !n.starts_with(NS_PREFIX)));
}

#[test]
fn param_dir_from_attr() {
    for dir in ParamDir::ALL {
        assert_eq!(Some(dir), ParamDir::from_attr(dir.name()));
    }

    assert_eq!(None, ParamDir::from_attr("in"));
    assert!(ParamDir::InOut.is_sent() && ParamDir::InOut.is_returned());
    assert!(!ParamDir::Out.is_sent());
}
