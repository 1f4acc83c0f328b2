//! Identifier resolution over the system identifier relation.
//!
//! An identifier `I` of element `A` is stored as
//! `A --dcommon--> L` where link `L` holds the text `I`, and that edge is a
//! member of the naming relation node. Identifier links are owned by the
//! naming service: once their naming edge disappears, whether replaced or
//! cascaded away with the named element, the link is erased too.

use crate::{SessionError, SessionResult};
use parking_lot::Mutex;
use semnet_core::{Addr, ElementType, LinkContent};
use semnet_graph::{ChangeSink, Store, StructuralChange};
use semnet_pattern::Iterator3;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::debug;

const NAMING_EDGE: ElementType = ElementType::EDGE_DCOMMON_CONST;
const MEMBERSHIP: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;

pub(crate) struct Naming {
    nrel: Addr,
    /// Serializes check-then-create sequences.
    lock: Mutex<()>,
    /// Identifier links created by this service.
    links: Arc<Mutex<HashSet<Addr>>>,
}

/// Erases an identifier link when its naming edge is removed.
struct LinkReaper {
    store: Weak<Store>,
    links: Arc<Mutex<HashSet<Addr>>>,
}

impl ChangeSink for LinkReaper {
    fn publish(&self, change: &StructuralChange) {
        let StructuralChange::EdgeRemoved {
            target, edge_type, ..
        } = change
        else {
            return;
        };
        if *edge_type != NAMING_EDGE || !self.links.lock().remove(target) {
            return;
        }
        if let Some(store) = self.store.upgrade() {
            if store.erase(*target) {
                debug!(link = target.to_int(), "erased orphaned identifier link");
            }
        }
    }
}

impl Naming {
    /// Create the naming relation node and give it its own identifier.
    pub(crate) fn bootstrap(store: &Arc<Store>, idtf: &str) -> SessionResult<Self> {
        let nrel = store.create_node(ElementType::NODE_CONST_NOROLE)?;
        let links = Arc::new(Mutex::new(HashSet::new()));
        store.add_sink(Arc::new(LinkReaper {
            store: Arc::downgrade(store),
            links: Arc::clone(&links),
        }));
        let naming = Self {
            nrel,
            lock: Mutex::new(()),
            links,
        };
        naming.set(store, idtf, nrel)?;
        Ok(naming)
    }

    pub(crate) fn nrel(&self) -> Addr {
        self.nrel
    }

    /// Element named `idtf`, or the invalid address.
    pub(crate) fn find(&self, store: &Arc<Store>, idtf: &str) -> Addr {
        let content = LinkContent::from(idtf);
        for link in store.find_links_by_content(&content) {
            for edge in store.incoming(link, NAMING_EDGE) {
                if !self.is_naming_edge(store, edge) {
                    continue;
                }
                if let Some((element, _)) = store.edge_ends(edge) {
                    return element;
                }
            }
        }
        Addr::INVALID
    }

    /// Current identifier of `addr`.
    pub(crate) fn identifier_of(&self, store: &Arc<Store>, addr: Addr) -> Option<String> {
        self.naming_edges(store, addr)
            .into_iter()
            .filter_map(|(_, link)| store.link_content(link))
            .find_map(|content| content.as_str().ok().map(str::to_string))
    }

    /// Name `addr` with `idtf`, replacing its previous identifier.
    pub(crate) fn set(&self, store: &Arc<Store>, idtf: &str, addr: Addr) -> SessionResult<()> {
        let _guard = self.lock.lock();
        self.set_locked(store, idtf, addr)
    }

    /// Element named `idtf`. When missing and `create` is given, a node of
    /// that type is created and named; otherwise the invalid address.
    pub(crate) fn resolve(
        &self,
        store: &Arc<Store>,
        idtf: &str,
        create: Option<ElementType>,
    ) -> SessionResult<Addr> {
        let _guard = self.lock.lock();
        let found = self.find(store, idtf);
        if found.is_valid() {
            return Ok(found);
        }
        let Some(ty) = create else {
            return Ok(Addr::INVALID);
        };
        check_identifier(idtf)?;
        let addr = store.create_node(ty)?;
        if let Err(err) = self.set_locked(store, idtf, addr) {
            store.erase(addr);
            return Err(err);
        }
        debug!(idtf, addr = addr.to_int(), ty = %ty, "created named element");
        Ok(addr)
    }

    fn set_locked(&self, store: &Arc<Store>, idtf: &str, addr: Addr) -> SessionResult<()> {
        check_identifier(idtf)?;
        if !store.contains(addr) {
            return Err(SessionError::ElementNotFound(addr));
        }
        let existing = self.find(store, idtf);
        if existing == addr {
            return Ok(());
        }
        if existing.is_valid() {
            return Err(SessionError::identifier_conflict(idtf, existing));
        }

        let previous = self.naming_edges(store, addr);

        let link = store.create_link();
        self.links.lock().insert(link);
        let named = store
            .set_link_content(link, LinkContent::from(idtf))
            .and_then(|()| store.create_edge(NAMING_EDGE, addr, link))
            .and_then(|edge| store.create_edge(MEMBERSHIP, self.nrel, edge));
        if let Err(err) = named {
            self.links.lock().remove(&link);
            store.erase(link);
            return Err(err.into());
        }

        // The old links go only once the new identifier is in place.
        for (_, old) in previous {
            store.erase(old);
        }
        debug!(idtf, addr = addr.to_int(), "identifier set");
        Ok(())
    }

    /// `(edge, link)` pairs naming `addr`.
    fn naming_edges(&self, store: &Arc<Store>, addr: Addr) -> Vec<(Addr, Addr)> {
        store
            .outgoing(addr, NAMING_EDGE)
            .into_iter()
            .filter(|edge| self.is_naming_edge(store, *edge))
            .filter_map(|edge| store.edge_ends(edge).map(|(_, link)| (edge, link)))
            .collect()
    }

    fn is_naming_edge(&self, store: &Arc<Store>, edge: Addr) -> bool {
        check_edge(store, self.nrel, edge, MEMBERSHIP)
    }
}

fn check_identifier(idtf: &str) -> SessionResult<()> {
    if idtf.trim().is_empty() {
        return Err(SessionError::invalid_identifier("identifier is empty"));
    }
    Ok(())
}

/// Whether an edge of type `ty` runs from `source` to `target`.
pub(crate) fn check_edge(store: &Arc<Store>, source: Addr, target: Addr, ty: ElementType) -> bool {
    if !source.is_valid() || !target.is_valid() {
        return false;
    }
    let mut it = Iterator3::new(Arc::clone(store), source, ty, target);
    it.next()
}
