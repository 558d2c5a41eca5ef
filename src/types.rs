// IDL type catalog
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

//! The closed set of data types that may appear in an IDL document.
//!
//! Types are referenced in two ways:
//!   as _elements_ in parameter and return position
//!     (e.g. `<CIDIDL:TCard4/>`),
//!   and as _attribute values_ for constants and structure members
//!     (e.g. `CIDIDL:Type="TCard4"`).
//! The legal set for each position is a [`TypeGroup`].
//!
//! The catalog is defined once by the `type_catalog!` table below;
//!   both [`TypeKind::resolve`] and the schema's type-name entity groups
//!   (see [`crate::dtd`]) are derived from it,
//!     so the two can never disagree about which names are legal.

use std::fmt::{self, Display};

/// Prefix of every IDL element name.
pub const NS_PREFIX: &str = "CIDIDL:";

/// A position in the document that accepts a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeGroup {
    /// Method parameters (elements).
    Param,
    /// Method return types (elements).
    Return,
    /// Constants and structure members (attribute values).
    Constant,
    /// Storage type of an enumeration (attribute value).
    EnumBase,
}

impl TypeGroup {
    pub const ALL: [TypeGroup; 4] = [
        TypeGroup::Param,
        TypeGroup::Return,
        TypeGroup::Constant,
        TypeGroup::EnumBase,
    ];

    /// Name of the schema parameter entity holding this group.
    pub const fn entity_name(self) -> &'static str {
        match self {
            Self::Param => "IDLPTypes",
            Self::Return => "IDLRTypes",
            Self::Constant => "IDLCTypes",
            Self::EnumBase => "BaseTypes",
        }
    }

    /// Whether members of this group are referenced as elements
    ///   (and so carry the [`NS_PREFIX`]).
    pub const fn is_element_group(self) -> bool {
        matches!(self, Self::Param | Self::Return)
    }

    /// Members of this group,
    ///   in catalog order.
    pub fn members(self) -> impl Iterator<Item = TypeKind> {
        TypeKind::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.in_group(self))
    }

    /// Names of the members of this group as they appear in the document.
    ///
    /// The enumeration base group additionally admits the literal
    ///   `Default`,
    ///     which leaves the choice of storage type to the compiler.
    pub fn member_names(self) -> Vec<String> {
        let prefix = if self.is_element_group() { NS_PREFIX } else { "" };

        let mut names = match self {
            Self::EnumBase => vec![ENUM_BASE_DEFAULT.to_string()],
            _ => vec![],
        };

        names.extend(self.members().map(|kind| format!("{prefix}{kind}")));
        names
    }
}

/// Enumeration base type that defers to the compiler's choice.
pub const ENUM_BASE_DEFAULT: &str = "Default";

/// Auxiliary attributes carried by parametrized type elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxAttr {
    /// Element type of a collection,
    ///   or the named type of an `Enumerated` or `Object`.
    ElemType,
    /// Key type of a keyed hash set.
    KeyType,
    /// Key comparison/hash policy of a hash set.
    KeyOps,
    /// Key extraction function of a keyed hash set.
    KeyExtract,
    /// Hash modulus of a hash set.
    Modulus,
    /// Named type of an `Enumerated` or `Object`.
    Type,
}

impl AuxAttr {
    pub const fn attr_name(self) -> &'static str {
        match self {
            Self::ElemType => "CIDIDL:ElemType",
            Self::KeyType => "CIDIDL:KeyType",
            Self::KeyOps => "CIDIDL:KeyOps",
            Self::KeyExtract => "CIDIDL:KeyExtract",
            Self::Modulus => "CIDIDL:Modulus",
            Self::Type => "CIDIDL:Type",
        }
    }
}

/// Schema attribute type of an auxiliary attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxValue {
    NmToken,
    CData,
}

/// Define [`TypeKind`] and every table derived from it.
///
/// Each entry names the variant,
///   its name in the document,
///   the [`TypeGroup`]s it belongs to,
///   its auxiliary attributes,
///   and whether parameters of the type may be moved.
macro_rules! type_catalog {
    ($(
        $(#[$attr:meta])*
        $variant:ident = $name:literal {
            groups: [$($group:ident),*],
            aux: [$(($aux:ident, $auxty:ident)),*],
            moveable: $moveable:literal,
        }
    )*) => {
        /// A data type known to the IDL compiler.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TypeKind {
            $(
                $(#[$attr])*
                $variant,
            )*
        }

        impl TypeKind {
            /// Every type in catalog order.
            pub const ALL: &'static [TypeKind] = &[
                $(TypeKind::$variant,)*
            ];

            /// Name of the type as it appears in the document,
            ///   without [`NS_PREFIX`].
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Groups in which this type may appear.
            pub const fn groups(self) -> &'static [TypeGroup] {
                match self {
                    $(Self::$variant => &[$(TypeGroup::$group),*],)*
                }
            }

            /// Auxiliary attributes required by this type's element.
            pub const fn aux_attrs(self) -> &'static [(AuxAttr, AuxValue)] {
                match self {
                    $(Self::$variant => &[
                        $((AuxAttr::$aux, AuxValue::$auxty)),*
                    ],)*
                }
            }

            /// Whether a parameter of this type may be moved into the
            ///   callee rather than copied.
            pub const fn is_move_eligible(self) -> bool {
                match self {
                    $(Self::$variant => $moveable,)*
                }
            }

            fn from_bare_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

type_catalog! {
    TBoolean = "TBoolean" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TCh = "TCh" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TInt1 = "TInt1" {
        groups: [Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TInt2 = "TInt2" {
        groups: [Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TInt4 = "TInt4" {
        groups: [Param, Return, Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TInt8 = "TInt8" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TCard1 = "TCard1" {
        groups: [Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TCard2 = "TCard2" {
        groups: [Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TCard4 = "TCard4" {
        groups: [Param, Return, Constant, EnumBase],
        aux: [],
        moveable: false,
    }
    TCard8 = "TCard8" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TFloat4 = "TFloat4" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TFloat8 = "TFloat8" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: false,
    }
    TString = "TString" {
        groups: [Param, Return, Constant],
        aux: [],
        moveable: true,
    }
    /// Return position only.
    TVoid = "TVoid" {
        groups: [Return],
        aux: [],
        moveable: false,
    }
    /// A named enumeration.
    Enumerated = "Enumerated" {
        groups: [Param, Return],
        aux: [(Type, CData)],
        moveable: false,
    }
    /// A named streamable class.
    Object = "Object" {
        groups: [Param, Return],
        aux: [(Type, NmToken)],
        moveable: true,
    }
    /// Abstract memory buffer.
    TMemBuf = "TMemBuf" {
        groups: [Param],
        aux: [],
        moveable: true,
    }
    THeapBuf = "THeapBuf" {
        groups: [Param],
        aux: [],
        moveable: true,
    }
    TBag = "TBag" {
        groups: [Param],
        aux: [(ElemType, NmToken)],
        moveable: true,
    }
    THashSet = "THashSet" {
        groups: [Param],
        aux: [(ElemType, NmToken), (KeyOps, NmToken), (Modulus, NmToken)],
        moveable: true,
    }
    TKeyedHashSet = "TKeyedHashSet" {
        groups: [Param],
        aux: [
            (ElemType, NmToken),
            (KeyType, NmToken),
            (KeyOps, NmToken),
            (KeyExtract, NmToken),
            (Modulus, NmToken)
        ],
        moveable: true,
    }
    TVector = "TVector" {
        groups: [Param],
        aux: [(ElemType, NmToken)],
        moveable: true,
    }
    TFundArray = "TFundArray" {
        groups: [Param],
        aux: [(ElemType, CData)],
        moveable: false,
    }
    TFundVector = "TFundVector" {
        groups: [Param],
        aux: [(ElemType, CData)],
        moveable: false,
    }
}

impl TypeKind {
    /// Resolve a type named by an attribute value,
    ///   which never carries the [`NS_PREFIX`].
    pub fn resolve(name: &str) -> Result<Self, UnknownType> {
        Self::from_bare_name(name).ok_or_else(|| UnknownType(name.to_string()))
    }

    /// Resolve a type named by an element,
    ///   which must carry the [`NS_PREFIX`].
    pub fn resolve_element(name: &str) -> Result<Self, UnknownType> {
        name.strip_prefix(NS_PREFIX)
            .and_then(Self::from_bare_name)
            .ok_or_else(|| UnknownType(name.to_string()))
    }

    pub fn in_group(self, group: TypeGroup) -> bool {
        self.groups().contains(&group)
    }

    /// Parametrized container types,
    ///   which always carry an element type.
    pub const fn is_collection(self) -> bool {
        matches!(
            self,
            Self::TBag
                | Self::THashSet
                | Self::TKeyedHashSet
                | Self::TVector
                | Self::TFundArray
                | Self::TFundVector
        )
    }

    /// Raw memory buffers,
    ///   which are marshalled together with a byte count.
    pub const fn is_mem_buf(self) -> bool {
        matches!(self, Self::TMemBuf | Self::THeapBuf)
    }

    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Self::TCard1 | Self::TCard2 | Self::TCard4 | Self::TCard8
        )
    }

    /// Scalar types that are passed by value rather than by reference.
    pub const fn is_fundamental(self) -> bool {
        matches!(
            self,
            Self::TBoolean
                | Self::TCh
                | Self::TInt1
                | Self::TInt2
                | Self::TInt4
                | Self::TInt8
                | Self::TCard1
                | Self::TCard2
                | Self::TCard4
                | Self::TCard8
                | Self::TFloat4
                | Self::TFloat8
        )
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type `{}`", self.0)
    }
}

impl std::error::Error for UnknownType {}

/// Direction of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamDir {
    In,
    Out,
    InOut,
}

impl ParamDir {
    pub const ALL: [ParamDir; 3] = [ParamDir::In, ParamDir::Out, ParamDir::InOut];

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "In" => Some(Self::In),
            "Out" => Some(Self::Out),
            "InOut" => Some(Self::InOut),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::In => "In",
            Self::Out => "Out",
            Self::InOut => "InOut",
        }
    }

    /// Whether the caller sends a value for this parameter.
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Whether the callee returns a value for this parameter.
    pub const fn is_returned(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

impl Display for ParamDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test;
