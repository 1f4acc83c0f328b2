//! Element type bitmask.
//!
//! Every element carries an `ElementType` composed from orthogonal bit groups:
//! kind (node, link, one of three edge classes), constancy (const, var),
//! edge polarity and permanence, and node structural subtypes. Node subtypes
//! share bit positions with edge polarity/permanence; which group a bit
//! belongs to is decided by the kind bits.
//!
//! A candidate type matches a requested type when every requested bit is
//! set in the candidate. The zero type is the universal wildcard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

/// Bitmask describing the category of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementType(u32);

impl ElementType {
    // ==================== Bit groups ====================

    pub const UNKNOWN: ElementType = ElementType(0);

    pub const NODE: ElementType = ElementType(0x1);
    pub const LINK: ElementType = ElementType(0x2);
    pub const EDGE_UCOMMON: ElementType = ElementType(0x4);
    pub const EDGE_DCOMMON: ElementType = ElementType(0x8);
    pub const EDGE_ACCESS: ElementType = ElementType(0x10);

    pub const CONST: ElementType = ElementType(0x20);
    pub const VAR: ElementType = ElementType(0x40);

    pub const EDGE_POS: ElementType = ElementType(0x80);
    pub const EDGE_NEG: ElementType = ElementType(0x100);
    pub const EDGE_FUZ: ElementType = ElementType(0x200);
    pub const EDGE_TEMP: ElementType = ElementType(0x400);
    pub const EDGE_PERM: ElementType = ElementType(0x800);

    pub const NODE_TUPLE: ElementType = ElementType(0x80);
    pub const NODE_STRUCT: ElementType = ElementType(0x100);
    pub const NODE_ROLE: ElementType = ElementType(0x200);
    pub const NODE_NOROLE: ElementType = ElementType(0x400);
    pub const NODE_CLASS: ElementType = ElementType(0x800);
    pub const NODE_ABSTRACT: ElementType = ElementType(0x1000);
    pub const NODE_MATERIAL: ElementType = ElementType(0x2000);

    const EDGE_MASK: u32 = 0x4 | 0x8 | 0x10;
    const KIND_MASK: u32 = 0x1 | 0x2 | Self::EDGE_MASK;
    const CONSTANCY_MASK: u32 = 0x20 | 0x40;
    const POLARITY_MASK: u32 = 0x80 | 0x100 | 0x200;
    const PERMANENCE_MASK: u32 = 0x400 | 0x800;
    const NODE_SUBTYPE_MASK: u32 = 0x80 | 0x100 | 0x200 | 0x400 | 0x800 | 0x1000 | 0x2000;
    const ALL_BITS: u32 = 0x3fff;

    // ==================== Composite types ====================

    pub const NODE_CONST: ElementType = Self::NODE.with(Self::CONST);
    pub const NODE_VAR: ElementType = Self::NODE.with(Self::VAR);
    pub const NODE_CONST_STRUCT: ElementType = Self::NODE_CONST.with(Self::NODE_STRUCT);
    pub const NODE_VAR_STRUCT: ElementType = Self::NODE_VAR.with(Self::NODE_STRUCT);
    pub const NODE_CONST_TUPLE: ElementType = Self::NODE_CONST.with(Self::NODE_TUPLE);
    pub const NODE_CONST_ROLE: ElementType = Self::NODE_CONST.with(Self::NODE_ROLE);
    pub const NODE_CONST_NOROLE: ElementType = Self::NODE_CONST.with(Self::NODE_NOROLE);
    pub const NODE_CONST_CLASS: ElementType = Self::NODE_CONST.with(Self::NODE_CLASS);
    pub const NODE_CONST_ABSTRACT: ElementType = Self::NODE_CONST.with(Self::NODE_ABSTRACT);
    pub const NODE_CONST_MATERIAL: ElementType = Self::NODE_CONST.with(Self::NODE_MATERIAL);

    pub const LINK_CONST: ElementType = Self::LINK.with(Self::CONST);

    pub const EDGE_UCOMMON_CONST: ElementType = Self::EDGE_UCOMMON.with(Self::CONST);
    pub const EDGE_UCOMMON_VAR: ElementType = Self::EDGE_UCOMMON.with(Self::VAR);
    pub const EDGE_DCOMMON_CONST: ElementType = Self::EDGE_DCOMMON.with(Self::CONST);
    pub const EDGE_DCOMMON_VAR: ElementType = Self::EDGE_DCOMMON.with(Self::VAR);

    pub const EDGE_ACCESS_CONST_POS_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_POS).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_CONST_NEG_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_NEG).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_CONST_FUZ_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_FUZ).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_CONST_POS_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_POS).with(Self::EDGE_TEMP);
    pub const EDGE_ACCESS_CONST_NEG_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_NEG).with(Self::EDGE_TEMP);
    pub const EDGE_ACCESS_CONST_FUZ_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::CONST).with(Self::EDGE_FUZ).with(Self::EDGE_TEMP);
    pub const EDGE_ACCESS_VAR_POS_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_POS).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_VAR_NEG_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_NEG).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_VAR_FUZ_PERM: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_FUZ).with(Self::EDGE_PERM);
    pub const EDGE_ACCESS_VAR_POS_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_POS).with(Self::EDGE_TEMP);
    pub const EDGE_ACCESS_VAR_NEG_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_NEG).with(Self::EDGE_TEMP);
    pub const EDGE_ACCESS_VAR_FUZ_TEMP: ElementType =
        Self::EDGE_ACCESS.with(Self::VAR).with(Self::EDGE_FUZ).with(Self::EDGE_TEMP);

    // ==================== Construction ====================

    /// Build a type from its integer form. Validity is checked separately.
    pub const fn from_int(bits: u32) -> Self {
        Self(bits)
    }

    /// Integer form used for storage and the wire.
    pub const fn to_int(self) -> u32 {
        self.0
    }

    /// Union of two types.
    pub const fn with(self, other: ElementType) -> Self {
        Self(self.0 | other.0)
    }

    /// This type with the bits of `other` cleared.
    pub const fn without(self, other: ElementType) -> Self {
        Self(self.0 & !other.0)
    }

    // ==================== Subsumption ====================

    /// Returns true if every bit of `requested` is set in this type.
    /// The zero type is matched by every candidate.
    pub const fn matches(self, requested: ElementType) -> bool {
        self.0 & requested.0 == requested.0
    }

    /// Returns true if all bits of `other` are set in this type.
    pub const fn contains(self, other: ElementType) -> bool {
        self.matches(other)
    }

    // ==================== Predicates ====================

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }

    pub const fn is_node(self) -> bool {
        self.0 & Self::NODE.0 != 0
    }

    pub const fn is_link(self) -> bool {
        self.0 & Self::LINK.0 != 0
    }

    pub const fn is_edge(self) -> bool {
        self.0 & Self::EDGE_MASK != 0
    }

    pub const fn is_const(self) -> bool {
        self.0 & Self::CONST.0 != 0
    }

    pub const fn is_var(self) -> bool {
        self.0 & Self::VAR.0 != 0
    }

    /// Returns true if no kind bit is set (the type only constrains other groups).
    pub const fn has_no_kind(self) -> bool {
        self.0 & Self::KIND_MASK == 0
    }

    pub const fn is_access_edge(self) -> bool {
        self.0 & Self::EDGE_ACCESS.0 != 0
    }

    pub const fn is_common_edge(self) -> bool {
        self.0 & (Self::EDGE_UCOMMON.0 | Self::EDGE_DCOMMON.0) != 0
    }

    pub const fn is_positive(self) -> bool {
        self.is_edge() && self.0 & Self::EDGE_POS.0 != 0
    }

    pub const fn is_negative(self) -> bool {
        self.is_edge() && self.0 & Self::EDGE_NEG.0 != 0
    }

    pub const fn is_fuzzy(self) -> bool {
        self.is_edge() && self.0 & Self::EDGE_FUZ.0 != 0
    }

    pub const fn is_permanent(self) -> bool {
        self.is_edge() && self.0 & Self::EDGE_PERM.0 != 0
    }

    pub const fn is_temporary(self) -> bool {
        self.is_edge() && self.0 & Self::EDGE_TEMP.0 != 0
    }

    pub const fn is_struct(self) -> bool {
        self.is_node() && self.0 & Self::NODE_STRUCT.0 != 0
    }

    // ==================== Validity ====================

    /// A type is valid when it is non-zero and its bits are consistent.
    pub fn is_valid(self) -> bool {
        self.0 != 0 && self.conflict().is_none()
    }

    /// A valid type that may be stored on a node (`NODE` may be implied).
    pub fn is_node_type(self) -> bool {
        self.conflict().is_none() && !self.is_edge() && !self.is_link()
    }

    /// A valid type that may be stored on an edge.
    pub fn is_edge_type(self) -> bool {
        self.is_edge() && self.conflict().is_none()
    }

    /// Describe why the bit combination is inconsistent, if it is.
    pub fn conflict(self) -> Option<&'static str> {
        let bits = self.0;
        if bits & !Self::ALL_BITS != 0 {
            return Some("unknown bits set");
        }

        let kinds = (bits & Self::NODE.0 != 0) as u32
            + (bits & Self::LINK.0 != 0) as u32
            + (bits & Self::EDGE_MASK != 0) as u32;
        if kinds > 1 {
            return Some("more than one element kind");
        }
        if (bits & Self::EDGE_MASK).count_ones() > 1 {
            return Some("more than one edge class");
        }
        if (bits & Self::CONSTANCY_MASK).count_ones() > 1 {
            return Some("both const and var");
        }

        if self.is_edge() {
            if bits & (Self::NODE_ABSTRACT.0 | Self::NODE_MATERIAL.0) != 0 {
                return Some("node subtype on an edge");
            }
            if (bits & Self::POLARITY_MASK).count_ones() > 1 {
                return Some("more than one edge polarity");
            }
            if (bits & Self::PERMANENCE_MASK).count_ones() > 1 {
                return Some("both temporary and permanent");
            }
        } else if self.is_node() {
            if (bits & Self::NODE_SUBTYPE_MASK).count_ones() > 1 {
                return Some("more than one node subtype");
            }
        } else if self.is_link() && bits & Self::NODE_SUBTYPE_MASK != 0 {
            return Some("structural subtype on a link");
        }

        None
    }
}

impl BitOr for ElementType {
    type Output = ElementType;

    fn bitor(self, rhs: ElementType) -> ElementType {
        ElementType(self.0 | rhs.0)
    }
}

impl BitOrAssign for ElementType {
    fn bitor_assign(&mut self, rhs: ElementType) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ElementType {
    type Output = ElementType;

    fn bitand(self, rhs: ElementType) -> ElementType {
        ElementType(self.0 & rhs.0)
    }
}

impl BitAndAssign for ElementType {
    fn bitand_assign(&mut self, rhs: ElementType) {
        self.0 &= rhs.0;
    }
}

impl From<ElementType> for u32 {
    fn from(ty: ElementType) -> Self {
        ty.0
    }
}

impl From<u32> for ElementType {
    fn from(bits: u32) -> Self {
        ElementType(bits)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "unknown");
        }

        let mut names: Vec<&str> = Vec::new();
        let groups: &[(ElementType, &str)] = &[
            (Self::NODE, "node"),
            (Self::LINK, "link"),
            (Self::EDGE_UCOMMON, "ucommon"),
            (Self::EDGE_DCOMMON, "dcommon"),
            (Self::EDGE_ACCESS, "access"),
            (Self::CONST, "const"),
            (Self::VAR, "var"),
        ];
        for (bit, name) in groups {
            if self.contains(*bit) {
                names.push(*name);
            }
        }

        let shared: &[(ElementType, &str, &str)] = &[
            (Self::EDGE_POS, "pos", "tuple"),
            (Self::EDGE_NEG, "neg", "struct"),
            (Self::EDGE_FUZ, "fuz", "role"),
            (Self::EDGE_TEMP, "temp", "norole"),
            (Self::EDGE_PERM, "perm", "class"),
        ];
        for (bit, edge_name, node_name) in shared {
            if self.contains(*bit) {
                names.push(if self.is_edge() { *edge_name } else { *node_name });
            }
        }
        if self.contains(Self::NODE_ABSTRACT) {
            names.push("abstract");
        }
        if self.contains(Self::NODE_MATERIAL) {
            names.push("material");
        }

        write!(f, "{}", names.join("|"))
    }
}
