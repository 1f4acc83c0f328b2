//! Triple and quintuple iterators.
//!
//! Candidates are materialized once, at construction, from the adjacency
//! index of the most selective fixed position. Each candidate is re-read
//! from the store when it is reached, so an element erased during
//! iteration is never returned as the current row. Edges created after
//! construction are not visited.

use crate::{IterParam, PatternResult};
use semnet_core::{Addr, ElementType};
use semnet_graph::Store;
use std::sync::Arc;
use tracing::trace;

/// Forward-only matcher over (source, edge, target) triples.
#[derive(Debug)]
pub struct Iterator3 {
    store: Arc<Store>,
    params: [IterParam; 3],
    candidates: std::vec::IntoIter<Addr>,
    row: Option<[Addr; 3]>,
    valid: bool,
}

impl Iterator3 {
    /// Create an iterator. Malformed parameters yield an iterator that
    /// reports `is_valid() == false` and produces no rows.
    pub fn new(
        store: Arc<Store>,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
    ) -> Self {
        let params = [p0.into(), p1.into(), p2.into()];
        let valid = Self::validate(&params).is_ok();
        let candidates = if valid {
            Self::candidates(&store, &params)
        } else {
            Vec::new()
        };
        Self {
            store,
            params,
            candidates: candidates.into_iter(),
            row: None,
            valid,
        }
    }

    /// Create an iterator, failing on malformed parameters.
    pub fn try_new(
        store: Arc<Store>,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
    ) -> PatternResult<Self> {
        let params = [p0.into(), p1.into(), p2.into()];
        Self::validate(&params)?;
        Ok(Self::new(store, params[0], params[1], params[2]))
    }

    fn validate(params: &[IterParam; 3]) -> PatternResult<()> {
        for (position, param) in params.iter().enumerate() {
            param.validate(position)?;
        }
        Ok(())
    }

    fn candidates(store: &Store, params: &[IterParam; 3]) -> Vec<Addr> {
        let edge_type = params[1].requested_type();
        let candidates = match (params[0].addr(), params[1].addr(), params[2].addr()) {
            (_, Some(edge), _) => vec![edge],
            (Some(source), None, Some(target)) => {
                if store.outgoing_count(source, edge_type) <= store.incoming_count(target, edge_type)
                {
                    store.outgoing(source, edge_type)
                } else {
                    store.incoming(target, edge_type)
                }
            }
            (Some(source), None, None) => store.outgoing(source, edge_type),
            (None, None, Some(target)) => store.incoming(target, edge_type),
            (None, None, None) => store.edges_by_type(edge_type),
        };
        trace!(
            p0 = %params[0],
            p1 = %params[1],
            p2 = %params[2],
            candidates = candidates.len(),
            "materialized triple candidates"
        );
        candidates
    }

    /// Returns false if the parameters were malformed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Advance to the next matching triple. Returns false when exhausted.
    pub fn next(&mut self) -> bool {
        self.row = None;
        for edge in self.candidates.by_ref() {
            let Some(element) = self.store.get(edge) else {
                continue;
            };
            let Some((source, target)) = element.edge_ends() else {
                continue;
            };
            if !self.params[1].accepts(edge, element.element_type) {
                continue;
            }
            if !accepts(&self.store, &self.params[0], source)
                || !accepts(&self.store, &self.params[2], target)
            {
                continue;
            }
            self.row = Some([source, edge, target]);
            return true;
        }
        false
    }

    /// Get position `index` of the current row, or the invalid address.
    pub fn get(&self, index: usize) -> Addr {
        self.row
            .and_then(|row| row.get(index).copied())
            .unwrap_or(Addr::INVALID)
    }

    /// The current row, if `next()` last returned true.
    pub fn row(&self) -> Option<[Addr; 3]> {
        self.row
    }

    /// Drain the remaining rows.
    pub fn into_rows(mut self) -> impl Iterator<Item = [Addr; 3]> {
        std::iter::from_fn(move || if self.next() { self.row } else { None })
    }
}

fn accepts(store: &Store, param: &IterParam, addr: Addr) -> bool {
    match param {
        IterParam::Addr(fixed) => *fixed == addr,
        IterParam::Type(requested) if requested.is_unknown() => store.contains(addr),
        IterParam::Type(_) => store
            .element_type(addr)
            .map(|ty| param.accepts(addr, ty))
            .unwrap_or(false),
    }
}

/// Forward-only matcher over (source, edge1, target, edge2, attribute)
/// where `attribute --edge2--> edge1`.
#[derive(Debug)]
pub struct Iterator5 {
    store: Arc<Store>,
    main: Iterator3,
    attr_edge: IterParam,
    attr: IterParam,
    inner: Option<Iterator3>,
    row: Option<[Addr; 5]>,
    valid: bool,
}

impl Iterator5 {
    /// Create an iterator. Malformed parameters yield an iterator that
    /// reports `is_valid() == false` and produces no rows.
    pub fn new(
        store: Arc<Store>,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
        p3: impl Into<IterParam>,
        p4: impl Into<IterParam>,
    ) -> Self {
        let attr_edge = p3.into();
        let attr = p4.into();
        let main = Iterator3::new(Arc::clone(&store), p0, p1, p2);
        let valid = main.is_valid() && attr_edge.validate(3).is_ok() && attr.validate(4).is_ok();
        Self {
            store,
            main,
            attr_edge,
            attr,
            inner: None,
            row: None,
            valid,
        }
    }

    /// Create an iterator, failing on malformed parameters.
    pub fn try_new(
        store: Arc<Store>,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
        p3: impl Into<IterParam>,
        p4: impl Into<IterParam>,
    ) -> PatternResult<Self> {
        let params = [p0.into(), p1.into(), p2.into(), p3.into(), p4.into()];
        for (position, param) in params.iter().enumerate() {
            param.validate(position)?;
        }
        Ok(Self::new(
            store, params[0], params[1], params[2], params[3], params[4],
        ))
    }

    /// Returns false if the parameters were malformed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Advance to the next matching quintuple. Returns false when exhausted.
    pub fn next(&mut self) -> bool {
        self.row = None;
        if !self.valid {
            return false;
        }
        loop {
            if let Some(inner) = &mut self.inner {
                if inner.next() {
                    let main = self.main.row;
                    if let Some([source, edge1, target]) = main {
                        self.row = Some([source, edge1, target, inner.get(1), inner.get(0)]);
                        return true;
                    }
                }
                self.inner = None;
            }
            if !self.main.next() {
                return false;
            }
            let edge1 = self.main.get(1);
            self.inner = Some(Iterator3::new(
                Arc::clone(&self.store),
                self.attr,
                self.attr_edge,
                edge1,
            ));
        }
    }

    /// Get position `index` of the current row, or the invalid address.
    pub fn get(&self, index: usize) -> Addr {
        self.row
            .and_then(|row| row.get(index).copied())
            .unwrap_or(Addr::INVALID)
    }

    /// The current row, if `next()` last returned true.
    pub fn row(&self) -> Option<[Addr; 5]> {
        self.row
    }

    /// Drain the remaining rows.
    pub fn into_rows(mut self) -> impl Iterator<Item = [Addr; 5]> {
        std::iter::from_fn(move || if self.next() { self.row } else { None })
    }
}
