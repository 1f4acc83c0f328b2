//! Indexes for efficient graph lookups.

use semnet_core::{Addr, ElementType, LinkContent};
use std::collections::{HashMap, HashSet};

/// Type index: ElementType -> Set<Addr>
///
/// Keyed by the exact stored type; lookups by a requested type walk the
/// keys and apply subsumption.
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<ElementType, HashSet<Addr>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: ElementType, addr: Addr) {
        self.index.entry(ty).or_default().insert(addr);
    }

    pub fn remove(&mut self, ty: ElementType, addr: Addr) {
        if let Some(set) = self.index.get_mut(&ty) {
            set.remove(&addr);
            if set.is_empty() {
                self.index.remove(&ty);
            }
        }
    }

    /// All elements whose type matches `requested`.
    pub fn matching(&self, requested: ElementType) -> impl Iterator<Item = Addr> + '_ {
        self.index
            .iter()
            .filter(move |(ty, _)| ty.matches(requested))
            .flat_map(|(_, set)| set.iter().copied())
    }

    /// Edges whose type matches `requested`.
    pub fn matching_edges(&self, requested: ElementType) -> impl Iterator<Item = Addr> + '_ {
        self.index
            .iter()
            .filter(move |(ty, _)| ty.is_edge() && ty.matches(requested))
            .flat_map(|(_, set)| set.iter().copied())
    }
}

/// Adjacency index: element -> edge type -> Set<edge>
///
/// The store keeps two of these, one keyed by edge source and one keyed
/// by edge target.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    index: HashMap<Addr, HashMap<ElementType, HashSet<Addr>>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: Addr, edge_type: ElementType, edge: Addr) {
        self.index
            .entry(element)
            .or_default()
            .entry(edge_type)
            .or_default()
            .insert(edge);
    }

    pub fn remove(&mut self, element: Addr, edge_type: ElementType, edge: Addr) {
        if let Some(by_type) = self.index.get_mut(&element) {
            if let Some(set) = by_type.get_mut(&edge_type) {
                set.remove(&edge);
                if set.is_empty() {
                    by_type.remove(&edge_type);
                }
            }
            if by_type.is_empty() {
                self.index.remove(&element);
            }
        }
    }

    /// Edges incident to `element` whose type matches `requested`.
    pub fn edges(&self, element: Addr, requested: ElementType) -> impl Iterator<Item = Addr> + '_ {
        self.index
            .get(&element)
            .into_iter()
            .flat_map(|by_type| by_type.iter())
            .filter(move |(ty, _)| ty.matches(requested))
            .flat_map(|(_, set)| set.iter().copied())
    }

    /// Number of edges incident to `element` whose type matches `requested`.
    pub fn count(&self, element: Addr, requested: ElementType) -> usize {
        self.index
            .get(&element)
            .map(|by_type| {
                by_type
                    .iter()
                    .filter(|(ty, _)| ty.matches(requested))
                    .map(|(_, set)| set.len())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Drop the entry for `element`, returning every edge it held.
    pub fn take(&mut self, element: Addr) -> Vec<Addr> {
        self.index
            .remove(&element)
            .map(|by_type| by_type.into_values().flatten().collect())
            .unwrap_or_default()
    }
}

/// Hashable form of a link payload.
///
/// Floats are keyed by their bit pattern, so `0.0` and `-0.0` are distinct
/// and a NaN payload is found by the same NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentKey {
    Int(i64),
    Float(u64),
    String(String),
    Bytes(Vec<u8>),
}

impl From<&LinkContent> for ContentKey {
    fn from(content: &LinkContent) -> Self {
        match content {
            LinkContent::Int(i) => ContentKey::Int(*i),
            LinkContent::Float(f) => ContentKey::Float(f.to_bits()),
            LinkContent::String(s) => ContentKey::String(s.clone()),
            LinkContent::Bytes(b) => ContentKey::Bytes(b.clone()),
        }
    }
}

/// Content index: payload -> Set<link>
#[derive(Debug, Default)]
pub struct ContentIndex {
    index: HashMap<ContentKey, HashSet<Addr>>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content: &LinkContent, link: Addr) {
        self.index
            .entry(ContentKey::from(content))
            .or_default()
            .insert(link);
    }

    pub fn remove(&mut self, content: &LinkContent, link: Addr) {
        let key = ContentKey::from(content);
        if let Some(set) = self.index.get_mut(&key) {
            set.remove(&link);
            if set.is_empty() {
                self.index.remove(&key);
            }
        }
    }

    pub fn find(&self, content: &LinkContent) -> impl Iterator<Item = Addr> + '_ {
        self.index
            .get(&ContentKey::from(content))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
