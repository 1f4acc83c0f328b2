//! Template construction and validation.

use crate::{ItemValue, TemplateError, TemplateItem, TemplateResult};
use semnet_core::{Addr, ElementType};
use std::collections::HashMap;

/// Index of a variable in a template's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VarId(pub(crate) usize);

/// Constraint on the element a slot binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Fixed(Addr),
    Type(ElementType),
    Any,
}

/// The type a candidate must carry to satisfy a type constraint.
///
/// `Var` marks a pattern variable and accepts elements of either constancy.
pub(crate) fn pattern_type(ty: ElementType) -> ElementType {
    ty.without(ElementType::VAR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) constraint: Constraint,
    pub(crate) var: Option<VarId>,
}

#[derive(Debug, Clone)]
struct Var {
    name: Option<String>,
    introduced: bool,
}

/// A conjunction of triple constraints sharing named aliases.
///
/// Aliases are interned when a triple is added; slots that mention the
/// same alias share one variable. Checks that need the whole template,
/// such as dangling references, run in [`Template::validate`], which
/// generation and search call before touching the store.
#[derive(Debug, Clone, Default)]
pub struct Template {
    triples: Vec<[Slot; 3]>,
    vars: Vec<Var>,
    alias_ids: HashMap<String, VarId>,
    redefined: Vec<String>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `(source, edge, target)` constraint.
    pub fn triple(
        &mut self,
        source: impl Into<TemplateItem>,
        edge: impl Into<TemplateItem>,
        target: impl Into<TemplateItem>,
    ) -> &mut Self {
        let slots = [
            self.intern(source.into()),
            self.intern(edge.into()),
            self.intern(target.into()),
        ];
        self.triples.push(slots);
        self
    }

    /// Append `(source, edge, target)` and `(attr, attr_edge, edge)`.
    ///
    /// The edge of the first triple is shared with the second even when
    /// the caller gives it no alias.
    pub fn triple_with_relation(
        &mut self,
        source: impl Into<TemplateItem>,
        edge: impl Into<TemplateItem>,
        target: impl Into<TemplateItem>,
        attr_edge: impl Into<TemplateItem>,
        attr: impl Into<TemplateItem>,
    ) -> &mut Self {
        let source = self.intern(source.into());
        let mut edge = self.intern(edge.into());
        let target = self.intern(target.into());
        let edge_var = match edge.var {
            Some(var) => var,
            None => {
                let var = self.new_var(None);
                self.vars[var.0].introduced = true;
                edge.var = Some(var);
                var
            }
        };
        self.triples.push([source, edge, target]);

        let attr = self.intern(attr.into());
        let attr_edge = self.intern(attr_edge.into());
        let shared = Slot {
            constraint: Constraint::Any,
            var: Some(edge_var),
        };
        self.triples.push([attr, attr_edge, shared]);
        self
    }

    fn new_var(&mut self, name: Option<String>) -> VarId {
        let id = VarId(self.vars.len());
        if let Some(name) = &name {
            self.alias_ids.insert(name.clone(), id);
        }
        self.vars.push(Var {
            name,
            introduced: false,
        });
        id
    }

    fn var_for(&mut self, name: &str) -> VarId {
        match self.alias_ids.get(name) {
            Some(id) => *id,
            None => self.new_var(Some(name.to_string())),
        }
    }

    fn intern(&mut self, item: TemplateItem) -> Slot {
        let (constraint, mut var) = match item.value {
            ItemValue::Addr(addr) => (Constraint::Fixed(addr), None),
            ItemValue::Type(ty) => (Constraint::Type(ty), None),
            ItemValue::Alias(name) => (Constraint::Any, Some(self.var_for(&name))),
        };

        if let Some(name) = item.alias {
            match (var, self.alias_ids.get(&name).copied()) {
                (Some(referenced), Some(existing)) if referenced != existing => {
                    self.redefined.push(name);
                }
                (Some(referenced), None) => {
                    self.alias_ids.insert(name, referenced);
                }
                (Some(_), Some(_)) => {}
                (None, _) => var = Some(self.var_for(&name)),
            }
        }

        if let Some(id) = var {
            if constraint != Constraint::Any {
                self.vars[id.0].introduced = true;
            }
        }
        Slot { constraint, var }
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Every alias name declared or referenced by this template.
    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.alias_ids.keys().map(String::as_str)
    }

    /// Check if `alias` is declared or referenced by this template.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.alias_ids.contains_key(alias)
    }

    /// Reject templates that cannot be generated or searched.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.triples.is_empty() {
            return Err(TemplateError::EmptyTemplate);
        }
        if let Some(alias) = self.redefined.first() {
            return Err(TemplateError::AliasRedefined {
                alias: alias.clone(),
            });
        }
        for (id, var) in self.vars.iter().enumerate() {
            if !var.introduced {
                return Err(TemplateError::dangling_alias(self.var_label(VarId(id))));
            }
        }
        for (triple, slots) in self.triples.iter().enumerate() {
            for (position, slot) in slots.iter().enumerate() {
                match slot.constraint {
                    Constraint::Fixed(addr) if !addr.is_valid() => {
                        return Err(TemplateError::InvalidAddress { triple, position });
                    }
                    Constraint::Type(ty) => {
                        if let Some(reason) = ty.conflict() {
                            return Err(TemplateError::InvalidType {
                                triple,
                                ty,
                                reason: reason.to_string(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    // ==================== Crate Accessors ====================

    pub(crate) fn triples(&self) -> &[[Slot; 3]] {
        &self.triples
    }

    pub(crate) fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub(crate) fn var_id(&self, alias: &str) -> Option<VarId> {
        self.alias_ids.get(alias).copied()
    }

    /// Public names bound to each variable.
    pub(crate) fn named_vars(&self) -> impl Iterator<Item = (&str, VarId)> + '_ {
        self.alias_ids
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// Alias name for diagnostics, or a positional label for anonymous variables.
    pub(crate) fn var_label(&self, id: VarId) -> String {
        match self.vars.get(id.0).and_then(|var| var.name.as_ref()) {
            Some(name) => name.clone(),
            None => format!("${}", id.0),
        }
    }
}
