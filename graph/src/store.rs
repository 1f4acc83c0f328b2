//! Shared element table.

use crate::index::{AdjacencyIndex, ContentIndex, TypeIndex};
use parking_lot::RwLock;
use semnet_core::{
    Addr, Element, ElementBody, ElementType, GraphError, GraphResult, LinkContent,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A structural change published to every registered [`ChangeSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralChange {
    EdgeAdded {
        edge: Addr,
        source: Addr,
        target: Addr,
        edge_type: ElementType,
    },
    EdgeRemoved {
        edge: Addr,
        source: Addr,
        target: Addr,
        edge_type: ElementType,
    },
    ElementErased {
        addr: Addr,
    },
    ContentChanged {
        link: Addr,
    },
}

impl StructuralChange {
    /// The element the change is about.
    pub fn subject(&self) -> Addr {
        match self {
            Self::EdgeAdded { edge, .. } | Self::EdgeRemoved { edge, .. } => *edge,
            Self::ElementErased { addr } => *addr,
            Self::ContentChanged { link } => *link,
        }
    }
}

/// Structural changes held back until [`Store::commit`] publishes them or
/// [`Store::rollback`] discards them.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    changes: Vec<StructuralChange>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Receives structural changes after the store has applied them.
///
/// Called on the mutating thread with no store lock held.
pub trait ChangeSink: Send + Sync {
    fn publish(&self, change: &StructuralChange);
}

/// Element counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub nodes: usize,
    pub edges: usize,
    pub links: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.nodes + self.edges + self.links
    }
}

/// The in-memory element table.
///
/// All methods take `&self`. Each index has its own lock and no method
/// holds two of them at once; a mutation touches the element map first
/// and the indexes afterwards, so readers may briefly observe an element
/// before it shows up in an index.
pub struct Store {
    /// Element records
    elements: RwLock<HashMap<Addr, Element>>,
    /// Next address to hand out (zero is reserved for the invalid address)
    next_addr: AtomicU64,
    /// Type index
    type_index: RwLock<TypeIndex>,
    /// Edges keyed by source
    outgoing: RwLock<AdjacencyIndex>,
    /// Edges keyed by target
    incoming: RwLock<AdjacencyIndex>,
    /// Link payload index
    content_index: RwLock<ContentIndex>,
    /// Change observers
    sinks: RwLock<Vec<Arc<dyn ChangeSink>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("stats", &self.stats())
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

impl Store {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            elements: RwLock::new(HashMap::new()),
            next_addr: AtomicU64::new(1),
            type_index: RwLock::new(TypeIndex::new()),
            outgoing: RwLock::new(AdjacencyIndex::new()),
            incoming: RwLock::new(AdjacencyIndex::new()),
            content_index: RwLock::new(ContentIndex::new()),
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer of structural changes.
    pub fn add_sink(&self, sink: Arc<dyn ChangeSink>) {
        self.sinks.write().push(sink);
    }

    fn alloc_addr(&self) -> Addr {
        Addr::new(self.next_addr.fetch_add(1, Ordering::Relaxed))
    }

    fn publish(&self, changes: &[StructuralChange]) {
        if changes.is_empty() {
            return;
        }
        let sinks: Vec<Arc<dyn ChangeSink>> = self.sinks.read().clone();
        for change in changes {
            for sink in &sinks {
                sink.publish(change);
            }
        }
    }

    // ==================== Node Operations ====================

    /// Create a node. The stored type is `ty | NODE`.
    pub fn create_node(&self, ty: ElementType) -> GraphResult<Addr> {
        if !ty.is_node_type() {
            let reason = ty.conflict().unwrap_or("not a node type");
            return Err(GraphError::invalid_type(ty, reason));
        }
        let ty = ty | ElementType::NODE;
        let addr = self.alloc_addr();

        self.elements.write().insert(addr, Element::node(addr, ty));
        self.type_index.write().insert(ty, addr);

        debug!(addr = addr.to_int(), ty = %ty, "created node");
        Ok(addr)
    }

    // ==================== Link Operations ====================

    /// Create a constant link with no content.
    pub fn create_link(&self) -> Addr {
        let ty = ElementType::LINK_CONST;
        let addr = self.alloc_addr();

        self.elements.write().insert(addr, Element::link(addr, ty));
        self.type_index.write().insert(ty, addr);

        debug!(addr = addr.to_int(), ty = %ty, "created link");
        addr
    }

    /// Create a link of the given type. The stored type is `ty | LINK`.
    pub fn create_link_typed(&self, ty: ElementType) -> GraphResult<Addr> {
        let ty = ty | ElementType::LINK;
        if let Some(reason) = ty.conflict() {
            return Err(GraphError::invalid_type(ty, reason));
        }
        let addr = self.alloc_addr();

        self.elements.write().insert(addr, Element::link(addr, ty));
        self.type_index.write().insert(ty, addr);

        debug!(addr = addr.to_int(), ty = %ty, "created link");
        Ok(addr)
    }

    /// Replace the payload of a link.
    pub fn set_link_content(&self, link: Addr, content: LinkContent) -> GraphResult<()> {
        if !link.is_valid() {
            return Err(GraphError::InvalidAddress);
        }

        let old = {
            let mut elements = self.elements.write();
            let element = elements
                .get_mut(&link)
                .ok_or(GraphError::ElementNotFound(link))?;
            match &mut element.body {
                ElementBody::Link { content: slot } => slot.replace(content.clone()),
                _ => return Err(GraphError::NotALink(link)),
            }
        };

        {
            let mut index = self.content_index.write();
            if let Some(old) = &old {
                index.remove(old, link);
            }
            index.insert(&content, link);
        }

        // An erase racing with this write may have missed the new entry.
        if !self.contains(link) {
            self.content_index.write().remove(&content, link);
            return Err(GraphError::ElementNotFound(link));
        }

        self.publish(&[StructuralChange::ContentChanged { link }]);
        Ok(())
    }

    /// Get the payload of a link. Returns `None` for non-links and empty links.
    pub fn link_content(&self, link: Addr) -> Option<LinkContent> {
        self.elements
            .read()
            .get(&link)
            .and_then(|element| element.content().cloned())
    }

    /// Find every link whose payload equals `content`, in address order.
    pub fn find_links_by_content(&self, content: &LinkContent) -> Vec<Addr> {
        let candidates: Vec<Addr> = self.content_index.read().find(content).collect();
        let elements = self.elements.read();
        let mut links: Vec<Addr> = candidates
            .into_iter()
            .filter(|addr| {
                elements
                    .get(addr)
                    .and_then(|element| element.content())
                    .map(|stored| stored == content)
                    .unwrap_or(false)
            })
            .collect();
        links.sort();
        links
    }

    // ==================== Edge Operations ====================

    /// Create an edge from `source` to `target`. Both ends must exist.
    pub fn create_edge(&self, ty: ElementType, source: Addr, target: Addr) -> GraphResult<Addr> {
        let mut batch = ChangeBatch::new();
        let addr = self.create_edge_in(&mut batch, ty, source, target)?;
        self.commit(batch);
        Ok(addr)
    }

    /// Create an edge, recording its change in `batch` instead of
    /// publishing it.
    pub fn create_edge_in(
        &self,
        batch: &mut ChangeBatch,
        ty: ElementType,
        source: Addr,
        target: Addr,
    ) -> GraphResult<Addr> {
        if !ty.is_edge_type() {
            let reason = ty.conflict().unwrap_or("not an edge type");
            return Err(GraphError::invalid_type(ty, reason));
        }
        if !source.is_valid() || !target.is_valid() {
            return Err(GraphError::InvalidAddress);
        }

        let addr = self.alloc_addr();
        {
            let mut elements = self.elements.write();
            for end in [source, target] {
                if !elements.contains_key(&end) {
                    return Err(GraphError::MissingEndpoint(end));
                }
            }
            elements.insert(addr, Element::edge(addr, ty, source, target));
        }
        self.type_index.write().insert(ty, addr);
        self.outgoing.write().insert(source, ty, addr);
        self.incoming.write().insert(target, ty, addr);

        // An endpoint erased between the insert and the indexing would have
        // missed this edge in its cascade.
        if !self.contains(source) || !self.contains(target) {
            warn!(
                edge = addr.to_int(),
                source = source.to_int(),
                target = target.to_int(),
                "endpoint erased during edge creation, rolling back"
            );
            self.rollback(ChangeBatch::new(), &[addr]);
            let missing = if self.contains(source) { target } else { source };
            return Err(GraphError::MissingEndpoint(missing));
        }

        debug!(
            addr = addr.to_int(),
            ty = %ty,
            source = source.to_int(),
            target = target.to_int(),
            "created edge"
        );
        batch.changes.push(StructuralChange::EdgeAdded {
            edge: addr,
            source,
            target,
            edge_type: ty,
        });
        Ok(addr)
    }

    /// Get `(source, target)` of an edge.
    pub fn edge_ends(&self, edge: Addr) -> Option<(Addr, Addr)> {
        self.elements
            .read()
            .get(&edge)
            .and_then(|element| element.edge_ends())
    }

    // ==================== Erasure ====================

    /// Erase an element and, transitively, every edge incident to it.
    /// Returns false if `addr` does not denote an element.
    pub fn erase(&self, addr: Addr) -> bool {
        let mut changes = Vec::new();
        let erased = self.erase_into(addr, &mut changes);
        self.publish(&changes);
        erased
    }

    fn erase_into(&self, addr: Addr, changes: &mut Vec<StructuralChange>) -> bool {
        if !addr.is_valid() {
            return false;
        }

        let mut worklist = vec![addr];
        let mut erased_any = false;

        while let Some(current) = worklist.pop() {
            let Some(element) = self.elements.write().remove(&current) else {
                continue;
            };
            erased_any = true;

            self.type_index
                .write()
                .remove(element.element_type, current);

            match &element.body {
                ElementBody::Edge { source, target } => {
                    self.outgoing
                        .write()
                        .remove(*source, element.element_type, current);
                    self.incoming
                        .write()
                        .remove(*target, element.element_type, current);
                    changes.push(StructuralChange::EdgeRemoved {
                        edge: current,
                        source: *source,
                        target: *target,
                        edge_type: element.element_type,
                    });
                }
                ElementBody::Link {
                    content: Some(content),
                } => {
                    self.content_index.write().remove(content, current);
                }
                _ => {}
            }

            worklist.extend(self.outgoing.write().take(current));
            worklist.extend(self.incoming.write().take(current));

            debug!(addr = current.to_int(), ty = %element.element_type, "erased element");
            changes.push(StructuralChange::ElementErased { addr: current });
        }

        erased_any
    }

    // ==================== Batches ====================

    /// Publish every change held in `batch`.
    pub fn commit(&self, batch: ChangeBatch) {
        self.publish(&batch.changes);
    }

    /// Erase `created` in reverse order and drop `batch` unpublished.
    ///
    /// Changes about the rolled-back elements themselves are never
    /// published. Edges that other writers attached to them in the meantime
    /// are still reported as removed.
    pub fn rollback(&self, batch: ChangeBatch, created: &[Addr]) {
        let mut changes = Vec::new();
        for addr in created.iter().rev() {
            self.erase_into(*addr, &mut changes);
        }
        changes.retain(|change| !created.contains(&change.subject()));
        debug!(
            created = created.len(),
            dropped = batch.len(),
            "rolled back batch"
        );
        self.publish(&changes);
    }


    // ==================== Query Operations ====================

    /// Check if `addr` denotes an existing element.
    pub fn contains(&self, addr: Addr) -> bool {
        addr.is_valid() && self.elements.read().contains_key(&addr)
    }

    /// Get a copy of an element record.
    pub fn get(&self, addr: Addr) -> Option<Element> {
        self.elements.read().get(&addr).cloned()
    }

    /// Get the stored type of an element.
    pub fn element_type(&self, addr: Addr) -> Option<ElementType> {
        self.elements
            .read()
            .get(&addr)
            .map(|element| element.element_type)
    }

    /// Edges leaving `source` whose type matches `requested`, in address order.
    pub fn outgoing(&self, source: Addr, requested: ElementType) -> Vec<Addr> {
        let mut edges: Vec<Addr> = self.outgoing.read().edges(source, requested).collect();
        edges.sort();
        edges
    }

    /// Edges entering `target` whose type matches `requested`, in address order.
    pub fn incoming(&self, target: Addr, requested: ElementType) -> Vec<Addr> {
        let mut edges: Vec<Addr> = self.incoming.read().edges(target, requested).collect();
        edges.sort();
        edges
    }

    /// Number of edges leaving `source` whose type matches `requested`.
    pub fn outgoing_count(&self, source: Addr, requested: ElementType) -> usize {
        self.outgoing.read().count(source, requested)
    }

    /// Number of edges entering `target` whose type matches `requested`.
    pub fn incoming_count(&self, target: Addr, requested: ElementType) -> usize {
        self.incoming.read().count(target, requested)
    }

    /// All edges whose type matches `requested`, in address order.
    pub fn edges_by_type(&self, requested: ElementType) -> Vec<Addr> {
        let mut edges: Vec<Addr> = self.type_index.read().matching_edges(requested).collect();
        edges.sort();
        edges
    }

    /// All elements whose type matches `requested`, in address order.
    pub fn elements_by_type(&self, requested: ElementType) -> Vec<Addr> {
        let mut elements: Vec<Addr> = self.type_index.read().matching(requested).collect();
        elements.sort();
        elements
    }

    // ==================== Statistics ====================

    /// Count elements by kind.
    pub fn stats(&self) -> StoreStats {
        let elements = self.elements.read();
        let mut stats = StoreStats::default();
        for element in elements.values() {
            match element.body {
                ElementBody::Node => stats.nodes += 1,
                ElementBody::Edge { .. } => stats.edges += 1,
                ElementBody::Link { .. } => stats.links += 1,
            }
        }
        stats
    }
}
