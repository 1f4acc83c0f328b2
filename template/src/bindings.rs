//! Alias bindings passed to and returned from templates.

use crate::template::Template;
use crate::{TemplateError, TemplateResult};
use semnet_core::Addr;
use semnet_graph::Store;
use std::collections::HashMap;
use std::ops::Index;

/// Alias values supplied by the caller before generation or search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams {
    values: HashMap<String, Addr>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `alias` to `addr`, replacing any previous value.
    pub fn insert(&mut self, alias: impl Into<String>, addr: Addr) {
        self.values.insert(alias.into(), addr);
    }

    /// Builder form of [`TemplateParams::insert`].
    pub fn with(mut self, alias: impl Into<String>, addr: Addr) -> Self {
        self.insert(alias, addr);
        self
    }

    pub fn get(&self, alias: &str) -> Option<Addr> {
        self.values.get(alias).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Addr)> + '_ {
        self.values.iter().map(|(alias, addr)| (alias.as_str(), *addr))
    }
}

/// Seed a variable table from caller parameters.
///
/// Every parameter must name an alias of the template and an existing element.
pub(crate) fn bind_params(
    store: &Store,
    template: &Template,
    params: &TemplateParams,
) -> TemplateResult<Vec<Option<Addr>>> {
    let mut vars = vec![None; template.var_count()];
    for (alias, addr) in params.iter() {
        let id = template
            .var_id(alias)
            .ok_or_else(|| TemplateError::unknown_param(alias))?;
        if !store.contains(addr) {
            return Err(TemplateError::invalid_param(
                alias,
                format!("{} is not an element", addr),
            ));
        }
        vars[id.0] = Some(addr);
    }
    Ok(vars)
}

/// One instantiation of a template: every alias and every matched triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateBindings {
    values: HashMap<String, Addr>,
    triples: Vec<[Addr; 3]>,
}

impl TemplateBindings {
    pub(crate) fn from_vars(template: &Template, vars: &[Option<Addr>], triples: Vec<[Addr; 3]>) -> Self {
        let values = template
            .named_vars()
            .filter_map(|(name, id)| {
                vars.get(id.0)
                    .copied()
                    .flatten()
                    .map(|addr| (name.to_string(), addr))
            })
            .collect();
        Self { values, triples }
    }

    /// Address bound to `alias`.
    pub fn get(&self, alias: &str) -> Option<Addr> {
        self.values.get(alias).copied()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.values.contains_key(alias)
    }

    /// Number of bound aliases.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The concrete `(source, edge, target)` of each template triple, in
    /// declaration order.
    pub fn triples(&self) -> &[[Addr; 3]] {
        &self.triples
    }

    /// Every element touched by this instantiation.
    pub fn elements(&self) -> impl Iterator<Item = Addr> + '_ {
        self.triples.iter().flat_map(|triple| triple.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Addr)> + '_ {
        self.values.iter().map(|(alias, addr)| (alias.as_str(), *addr))
    }
}

impl Index<&str> for TemplateBindings {
    type Output = Addr;

    /// Missing aliases index to the invalid address.
    fn index(&self, alias: &str) -> &Addr {
        self.values.get(alias).unwrap_or(&Addr::INVALID)
    }
}

/// Ordered matches of a template search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    items: Vec<TemplateBindings>,
}

impl SearchResult {
    pub(crate) fn new(items: Vec<TemplateBindings>) -> Self {
        Self { items }
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Alias of [`SearchResult::len`].
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TemplateBindings> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TemplateBindings> {
        self.items.iter()
    }
}

impl Index<usize> for SearchResult {
    type Output = TemplateBindings;

    fn index(&self, index: usize) -> &TemplateBindings {
        &self.items[index]
    }
}

impl IntoIterator for SearchResult {
    type Item = TemplateBindings;
    type IntoIter = std::vec::IntoIter<TemplateBindings>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a TemplateBindings;
    type IntoIter = std::slice::Iter<'a, TemplateBindings>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
