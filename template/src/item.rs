//! Template triple items.

use semnet_core::{Addr, ElementType};

/// What a template slot is constrained to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
    /// A fixed element.
    Addr(Addr),
    /// Any element of this type.
    Type(ElementType),
    /// Whatever the named alias is bound to.
    Alias(String),
}

/// One slot of a triple as written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub value: ItemValue,
    /// Name introduced by this slot, if any.
    pub alias: Option<String>,
}

impl TemplateItem {
    /// A reference to an alias introduced elsewhere in the template.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            value: ItemValue::Alias(name.into()),
            alias: None,
        }
    }

    /// Name this slot.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }
}

impl From<Addr> for TemplateItem {
    fn from(addr: Addr) -> Self {
        Self {
            value: ItemValue::Addr(addr),
            alias: None,
        }
    }
}

impl From<ElementType> for TemplateItem {
    fn from(ty: ElementType) -> Self {
        Self {
            value: ItemValue::Type(ty),
            alias: None,
        }
    }
}

impl From<&str> for TemplateItem {
    fn from(name: &str) -> Self {
        Self::reference(name)
    }
}

impl From<String> for TemplateItem {
    fn from(name: String) -> Self {
        Self::reference(name)
    }
}

/// `ty.alias("_x")` / `addr.alias("_x")` shorthand.
pub trait AliasExt {
    fn alias(self, name: impl Into<String>) -> TemplateItem;
}

impl AliasExt for Addr {
    fn alias(self, name: impl Into<String>) -> TemplateItem {
        TemplateItem::from(self).named(name)
    }
}

impl AliasExt for ElementType {
    fn alias(self, name: impl Into<String>) -> TemplateItem {
        TemplateItem::from(self).named(name)
    }
}
