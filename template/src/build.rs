//! Template reconstruction from structure nodes.

use crate::{AliasExt, Template, TemplateError, TemplateItem, TemplateResult};
use semnet_core::{Addr, ElementType, GraphError};
use semnet_graph::Store;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

const MEMBERSHIP: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;

/// Rebuild a template from the members of `structure`.
///
/// Members are the targets of the structure's outgoing
/// `EDGE_ACCESS_CONST_POS_PERM` edges. Each edge member becomes one
/// triple; both its endpoints must be members too. Members with a `Var`
/// type become typed slots and all others fixed addresses; every slot is
/// aliased `_<addr>`.
pub fn build_template(store: &Store, structure: Addr) -> TemplateResult<Template> {
    if !store.contains(structure) {
        return Err(GraphError::ElementNotFound(structure).into());
    }

    let members: BTreeSet<Addr> = store
        .outgoing(structure, MEMBERSHIP)
        .into_iter()
        .filter_map(|edge| store.edge_ends(edge).map(|(_, member)| member))
        .collect();

    let mut edges = Vec::new();
    for &member in &members {
        let Some((source, target)) = store.edge_ends(member) else {
            continue;
        };
        for endpoint in [source, target] {
            if !members.contains(&endpoint) {
                return Err(TemplateError::MemberOutsideStructure {
                    structure,
                    edge: member,
                    endpoint,
                });
            }
        }
        edges.push((member, source, target));
    }
    if edges.is_empty() {
        return Err(TemplateError::EmptyStructure(structure));
    }

    let mut template = Template::new();
    let mut introduced = HashSet::new();
    for (edge, source, target) in order_edges(edges) {
        let source = item_for(store, source, &mut introduced)?;
        let target = item_for(store, target, &mut introduced)?;
        let edge = item_for(store, edge, &mut introduced)?;
        template.triple(source, edge, target);
    }

    debug!(
        structure = structure.to_int(),
        members = members.len(),
        triples = template.len(),
        "built template from structure"
    );
    Ok(template)
}

/// Order edges so that an edge comes after every edge it connects.
fn order_edges(mut pending: Vec<(Addr, Addr, Addr)>) -> Vec<(Addr, Addr, Addr)> {
    let edge_set: HashSet<Addr> = pending.iter().map(|(edge, _, _)| *edge).collect();
    let mut placed = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&(edge, source, target)| {
            let ready = [source, target]
                .iter()
                .all(|end| !edge_set.contains(end) || placed.contains(end));
            if ready {
                placed.insert(edge);
                ordered.push((edge, source, target));
            }
            !ready
        });
        // Edges only ever connect elements that existed before them, so
        // every pass places at least one edge.
        if pending.len() == before {
            ordered.append(&mut pending);
        }
    }
    ordered
}

fn item_for(
    store: &Store,
    addr: Addr,
    introduced: &mut HashSet<Addr>,
) -> TemplateResult<TemplateItem> {
    let alias = format!("_{}", addr.to_int());
    if !introduced.insert(addr) {
        return Ok(TemplateItem::reference(alias));
    }
    let ty = store
        .element_type(addr)
        .ok_or(GraphError::ElementNotFound(addr))?;
    if ty.is_var() {
        Ok(ty.alias(alias))
    } else {
        Ok(addr.alias(alias))
    }
}
