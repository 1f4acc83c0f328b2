//! Template search.

use crate::bindings::bind_params;
use crate::template::{pattern_type, Constraint, Slot};
use crate::{SearchResult, Template, TemplateBindings, TemplateParams, TemplateResult};
use semnet_core::{Addr, ElementType, GraphError};
use semnet_graph::Store;
use semnet_pattern::{IterParam, Iterator3};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Membership edges of a structure node.
const MEMBERSHIP: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;

/// A partial match: one value per variable and one row per processed triple.
#[derive(Debug, Clone)]
struct Partial {
    vars: Vec<Option<Addr>>,
    rows: Vec<Option<[Addr; 3]>>,
}

/// Find every assignment of the template's aliases satisfying all triples.
pub fn search(store: &Arc<Store>, template: &Template) -> TemplateResult<SearchResult> {
    search_with_params(store, template, &TemplateParams::new())
}

/// Search with some aliases fixed in advance.
pub fn search_with_params(
    store: &Arc<Store>,
    template: &Template,
    params: &TemplateParams,
) -> TemplateResult<SearchResult> {
    Searcher::new(store, template, None).run(params)
}

/// Search, keeping only matches whose elements all belong to `structure`.
pub fn search_in_struct(
    store: &Arc<Store>,
    template: &Template,
    structure: Addr,
) -> TemplateResult<SearchResult> {
    if !store.contains(structure) {
        return Err(GraphError::ElementNotFound(structure).into());
    }
    let members: HashSet<Addr> = store
        .outgoing(structure, MEMBERSHIP)
        .into_iter()
        .filter_map(|edge| store.edge_ends(edge).map(|(_, member)| member))
        .collect();
    Searcher::new(store, template, Some(members)).run(&TemplateParams::new())
}

struct Searcher<'a> {
    store: &'a Arc<Store>,
    template: &'a Template,
    members: Option<HashSet<Addr>>,
}

impl<'a> Searcher<'a> {
    fn new(store: &'a Arc<Store>, template: &'a Template, members: Option<HashSet<Addr>>) -> Self {
        Self {
            store,
            template,
            members,
        }
    }

    fn run(&self, params: &TemplateParams) -> TemplateResult<SearchResult> {
        self.template.validate()?;
        let vars = bind_params(self.store, self.template, params)?;

        let triples = self.template.triples();
        let mut candidates = vec![Partial {
            vars,
            rows: vec![None; triples.len()],
        }];
        let mut done = vec![false; triples.len()];

        for _ in 0..triples.len() {
            let Some(next) = self.pick_next(&candidates[0].vars, &done) else {
                break;
            };
            done[next] = true;

            let mut new_candidates = Vec::new();
            for partial in &candidates {
                new_candidates.extend(self.extend(partial, next));
            }
            candidates = new_candidates;
            if candidates.is_empty() {
                break;
            }
        }

        let results: Vec<TemplateBindings> = candidates
            .into_iter()
            .filter_map(|partial| {
                let rows: Option<Vec<[Addr; 3]>> = partial.rows.into_iter().collect();
                rows.map(|rows| TemplateBindings::from_vars(self.template, &partial.vars, rows))
            })
            .collect();
        debug!(
            triples = triples.len(),
            results = results.len(),
            "searched template"
        );
        Ok(SearchResult::new(results))
    }

    /// The unprocessed triple with the most anchored positions.
    ///
    /// Every partial has processed the same triples, so the bound set of
    /// the first one stands for all of them.
    fn pick_next(&self, vars: &[Option<Addr>], done: &[bool]) -> Option<usize> {
        let anchored = |slot: &Slot| {
            matches!(slot.constraint, Constraint::Fixed(_))
                || slot.var.map(|var| vars[var.0].is_some()).unwrap_or(false)
        };
        self.template
            .triples()
            .iter()
            .enumerate()
            .filter(|(index, _)| !done[*index])
            .max_by_key(|(index, slots)| {
                let score = anchored(&slots[1]) as usize * 4
                    + anchored(&slots[0]) as usize * 2
                    + anchored(&slots[2]) as usize * 2;
                // Earlier triples win ties.
                (score, std::cmp::Reverse(*index))
            })
            .map(|(index, _)| index)
    }

    fn param_for(&self, slot: &Slot, vars: &[Option<Addr>]) -> Option<IterParam> {
        let bound = slot.var.and_then(|var| vars[var.0]);
        match (bound, slot.constraint) {
            (Some(addr), Constraint::Fixed(fixed)) if addr != fixed => None,
            (Some(addr), _) | (None, Constraint::Fixed(addr)) => Some(IterParam::Addr(addr)),
            (None, Constraint::Type(ty)) => Some(IterParam::Type(pattern_type(ty))),
            (None, Constraint::Any) => Some(IterParam::Type(ElementType::UNKNOWN)),
        }
    }

    /// Type constraints a bound slot still has to satisfy.
    fn satisfies(&self, slot: &Slot, addr: Addr) -> bool {
        match slot.constraint {
            Constraint::Type(ty) => self
                .store
                .element_type(addr)
                .map(|actual| actual.matches(pattern_type(ty)))
                .unwrap_or(false),
            _ => true,
        }
    }

    fn extend(&self, partial: &Partial, index: usize) -> Vec<Partial> {
        let slots = &self.template.triples()[index];
        let mut params = Vec::with_capacity(3);
        for slot in slots {
            match self.param_for(slot, &partial.vars) {
                Some(param) => params.push(param),
                None => return Vec::new(),
            }
        }

        let iter = Iterator3::new(Arc::clone(self.store), params[0], params[1], params[2]);
        let mut matches = Vec::new();
        'rows: for row in iter.into_rows() {
            if let Some(members) = &self.members {
                if row.iter().any(|addr| !members.contains(addr)) {
                    continue;
                }
            }

            let mut next = partial.clone();
            for (slot, addr) in slots.iter().zip(row) {
                if !self.satisfies(slot, addr) {
                    continue 'rows;
                }
                if let Some(var) = slot.var {
                    match next.vars[var.0] {
                        Some(existing) if existing != addr => continue 'rows,
                        Some(_) => {}
                        None => next.vars[var.0] = Some(addr),
                    }
                }
            }
            next.rows[index] = Some(row);
            matches.push(next);
        }
        matches
    }
}
