//! Template generation.
//!
//! Triples are generated in declaration order. Within a triple the two
//! endpoints are resolved before the edge. Generation is planned against
//! the parameter set and the store before anything is created, so a
//! missing binding, a missing fixed element or a fixed edge between the
//! wrong ends fails without touching the store. Edge changes are held in a
//! batch: a store failure part-way through erases every element created so
//! far and subscribers never hear of them.

use crate::bindings::bind_params;
use crate::template::{pattern_type, Constraint, Slot};
use crate::{Template, TemplateBindings, TemplateError, TemplateParams, TemplateResult};
use semnet_core::{Addr, GraphError};
use semnet_graph::{ChangeBatch, Store};
use tracing::{debug, warn};

/// Materialize `template`, reusing parameter and alias bindings and
/// creating an element for every unbound type slot.
pub fn generate(
    store: &Store,
    template: &Template,
    params: &TemplateParams,
) -> TemplateResult<TemplateBindings> {
    template.validate()?;
    let mut vars = bind_params(store, template, params)?;
    plan(store, template, &vars)?;

    let mut generator = Generator {
        store,
        template,
        vars: &mut vars,
        created: Vec::new(),
        batch: ChangeBatch::new(),
    };
    let outcome = generator.run();
    let Generator { created, batch, .. } = generator;
    match outcome {
        Ok(triples) => {
            debug!(
                triples = triples.len(),
                created = created.len(),
                "generated template"
            );
            store.commit(batch);
            Ok(TemplateBindings::from_vars(template, &vars, triples))
        }
        Err(err) => {
            if !created.is_empty() {
                warn!(
                    created = created.len(),
                    error = %err,
                    "template generation failed, rolling back"
                );
            }
            store.rollback(batch, &created);
            Err(err)
        }
    }
}

/// Walk the triples with only the knowledge of which variables will be
/// bound, rejecting templates that would stop half-way.
///
/// `known` tracks the address of every variable bound before generation
/// starts; variables bound to freshly created elements stay `None`.
fn plan(store: &Store, template: &Template, vars: &[Option<Addr>]) -> TemplateResult<()> {
    let mut available: Vec<bool> = vars.iter().map(Option::is_some).collect();
    let mut known: Vec<Option<Addr>> = vars.to_vec();

    for (triple, slots) in template.triples().iter().enumerate() {
        let mut ends: [Option<Addr>; 3] = [None; 3];
        for position in [0, 2, 1] {
            let slot = slots[position];
            if let Some(var) = slot.var {
                if available[var.0] {
                    ends[position] = known[var.0];
                    continue;
                }
            }
            match slot.constraint {
                Constraint::Fixed(addr) => {
                    if !store.contains(addr) {
                        return Err(GraphError::ElementNotFound(addr).into());
                    }
                    ends[position] = Some(addr);
                    if let Some(var) = slot.var {
                        known[var.0] = Some(addr);
                    }
                }
                Constraint::Type(ty) => {
                    let creatable = if position == 1 {
                        ty.is_edge_type()
                    } else if ty.is_link() {
                        ty.conflict().is_none()
                    } else {
                        ty.is_node_type()
                    };
                    if !creatable {
                        return Err(TemplateError::CannotCreate {
                            triple,
                            position,
                            ty,
                        });
                    }
                }
                Constraint::Any => {
                    let label = slot
                        .var
                        .map(|var| template.var_label(var))
                        .unwrap_or_default();
                    return Err(TemplateError::missing_binding(label, triple));
                }
            }
            if let Some(var) = slot.var {
                available[var.0] = true;
            }
        }

        // An existing edge can only be reused between its own ends, which
        // therefore have to exist before generation starts.
        if let Some(edge) = ends[1] {
            let (from, to) = (ends[0], ends[2]);
            let connects = from
                .zip(to)
                .is_some_and(|wanted| store.edge_ends(edge) == Some(wanted));
            if !connects {
                return Err(TemplateError::EndpointMismatch {
                    edge,
                    from: from.unwrap_or(Addr::INVALID),
                    to: to.unwrap_or(Addr::INVALID),
                });
            }
        }
    }
    Ok(())
}

struct Generator<'a> {
    store: &'a Store,
    template: &'a Template,
    vars: &'a mut Vec<Option<Addr>>,
    created: Vec<Addr>,
    batch: ChangeBatch,
}

impl Generator<'_> {
    fn run(&mut self) -> TemplateResult<Vec<[Addr; 3]>> {
        let mut triples = Vec::with_capacity(self.template.len());
        for (index, slots) in self.template.triples().iter().enumerate() {
            let source = self.resolve_end(index, 0, slots[0])?;
            let target = self.resolve_end(index, 2, slots[2])?;
            let edge = self.resolve_edge(index, slots[1], source, target)?;
            triples.push([source, edge, target]);
        }
        Ok(triples)
    }

    /// Address already bound to the slot, checked against its constraint.
    fn bound(&self, slot: Slot) -> TemplateResult<Option<Addr>> {
        let Some(var) = slot.var else {
            return Ok(None);
        };
        let Some(addr) = self.vars[var.0] else {
            return Ok(None);
        };
        match slot.constraint {
            Constraint::Fixed(fixed) if fixed != addr => Err(TemplateError::ConflictingBinding {
                alias: self.template.var_label(var),
                first: addr,
                second: fixed,
            }),
            Constraint::Type(ty) => {
                let actual = self
                    .store
                    .element_type(addr)
                    .ok_or(GraphError::ElementNotFound(addr))?;
                if actual.matches(pattern_type(ty)) {
                    Ok(Some(addr))
                } else {
                    Err(TemplateError::invalid_param(
                        self.template.var_label(var),
                        format!("{} has type {}, expected {}", addr, actual, ty),
                    ))
                }
            }
            _ => Ok(Some(addr)),
        }
    }

    fn bind(&mut self, slot: Slot, addr: Addr) {
        if let Some(var) = slot.var {
            self.vars[var.0] = Some(addr);
        }
    }

    fn resolve_end(&mut self, triple: usize, position: usize, slot: Slot) -> TemplateResult<Addr> {
        if let Some(addr) = self.bound(slot)? {
            return Ok(addr);
        }
        let addr = match slot.constraint {
            Constraint::Fixed(addr) => {
                if !self.store.contains(addr) {
                    return Err(GraphError::ElementNotFound(addr).into());
                }
                addr
            }
            Constraint::Type(ty) if ty.is_link() => {
                let addr = self.store.create_link_typed(ty)?;
                self.created.push(addr);
                addr
            }
            Constraint::Type(ty) if !ty.is_edge() => {
                let addr = self.store.create_node(ty)?;
                self.created.push(addr);
                addr
            }
            Constraint::Type(ty) => {
                return Err(TemplateError::CannotCreate {
                    triple,
                    position,
                    ty,
                })
            }
            Constraint::Any => {
                let label = slot
                    .var
                    .map(|var| self.template.var_label(var))
                    .unwrap_or_default();
                return Err(TemplateError::missing_binding(label, triple));
            }
        };
        self.bind(slot, addr);
        Ok(addr)
    }

    fn resolve_edge(
        &mut self,
        triple: usize,
        slot: Slot,
        source: Addr,
        target: Addr,
    ) -> TemplateResult<Addr> {
        let existing = match (self.bound(slot)?, slot.constraint) {
            (Some(addr), _) | (None, Constraint::Fixed(addr)) => Some(addr),
            _ => None,
        };
        if let Some(edge) = existing {
            if self.store.edge_ends(edge) != Some((source, target)) {
                return Err(TemplateError::EndpointMismatch {
                    edge,
                    from: source,
                    to: target,
                });
            }
            self.bind(slot, edge);
            return Ok(edge);
        }

        match slot.constraint {
            Constraint::Type(ty) => {
                let edge = self
                    .store
                    .create_edge_in(&mut self.batch, ty, source, target)?;
                self.created.push(edge);
                self.bind(slot, edge);
                Ok(edge)
            }
            _ => {
                let label = slot
                    .var
                    .map(|var| self.template.var_label(var))
                    .unwrap_or_default();
                Err(TemplateError::missing_binding(label, triple))
            }
        }
    }
}
