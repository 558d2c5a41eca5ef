// Qualified names of IDL elements and attributes
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

//! Qualified names of IDL elements and attributes.
//!
//! Every name lives in the `CIDIDL` prefix;
//!   these constants are shared by the schema and the compiler so that
//!   a name is spelled exactly once.

/// Declare `&'static str` constants for names in the `CIDIDL` prefix.
macro_rules! qname_const {
    ($($name:ident: $local:literal,)*) => {
        $(
            #[doc = concat!("`CIDIDL:", $local, "`")]
            pub const $name: &str = concat!("CIDIDL:", $local);
        )*
    }
}

// Elements.
qname_const! {
    QN_INTERFACE: "Interface",
    QN_GLOBALS: "Globals",
    QN_CLASS_INTF: "ClassIntf",
    QN_CONSTANTS: "Constants",
    QN_CONSTANT: "Constant",
    QN_TYPES: "Types",
    QN_ENUM: "Enum",
    QN_ENUM_VAL: "EnumVal",
    QN_ENUM_SYN: "EnumSyn",
    QN_STRUCT: "Struct",
    QN_MEMBER: "Member",
    QN_SUB_STRUCT: "SubStruct",
    QN_CTOR: "Ctor",
    QN_METHODS: "Methods",
    QN_METHOD: "Method",
    QN_POLL_METHOD: "PollMethod",
    QN_RET_TYPE: "RetType",
    QN_PARAM: "Param",
    QN_DOC_TEXT: "DocText",
}

// Attributes.
qname_const! {
    QN_NAME: "Name",
    QN_TYPE: "Type",
    QN_VALUE: "Value",
    QN_DIR: "Dir",
    QN_DEF_VAL: "DefVal",
    QN_MOVEABLE: "Moveable",
    QN_TIMEOUT: "TimeOut",
    QN_IN_BASE_CLASS: "InBaseClass",
    QN_INTERFACE_ID: "InterfaceId",
    QN_CLIENT_BASE: "ClientBase",
    QN_SERVER_BASE: "ServerBase",
    QN_BASE_TYPE: "BaseType",
    QN_ALT_NUM_VAL: "AltNumVal",
    QN_ALT_TEXT_SRC: "AltTextSrc",
    QN_ALT_TEXT: "AltText",
    QN_ALT_TEXT2: "AltText2",
    QN_ALT_MAP: "AltMap",
    QN_ALT_MAP2: "AltMap2",
    QN_ALT_PATTERN: "AltPattern",
    QN_FORMAT_MAP: "FormatMap",
    QN_LOAD_MAP: "LoadMap",
    QN_XLAT_MAP: "XlatMap",
    QN_TEXT_STREAM_MAP: "TextStreamMap",
    QN_BIN_STREAM: "BinStream",
    QN_INC_DEC: "IncDec",
    QN_MSG_FAC: "MsgFac",
    QN_MSG_NS: "MsgNS",
    QN_TEXT: "Text",
}

/// Value of a `(Yes|No)` attribute.
pub const YES: &str = "Yes";
pub const NO: &str = "No";
