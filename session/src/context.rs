//! Per-caller façade over a shared memory.

use crate::naming::check_edge;
use crate::{Memory, SessionError, SessionResult};
use semnet_core::{Addr, ElementType, LinkContent};
use semnet_event::{EventKind, EventStats, Notification, Subscription};
use semnet_pattern::{IterParam, Iterator3, Iterator5};
use semnet_template::{
    build_template, generate, search, search_in_struct, search_with_params, SearchResult,
    Template, TemplateBindings, TemplateParams,
};
use std::sync::Arc;
use tracing::debug;

/// A named handle on a [`Memory`].
///
/// Contexts hold no state of their own; any number of them may read and
/// write the same graph concurrently. Expected misses are reported as the
/// invalid address, `None` or `false`; only genuine failures are errors.
#[derive(Clone)]
pub struct MemoryContext {
    name: String,
    memory: Arc<Memory>,
}

impl MemoryContext {
    pub(crate) fn new(name: impl Into<String>, memory: Arc<Memory>) -> Self {
        Self {
            name: name.into(),
            memory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory(&self) -> &Arc<Memory> {
        &self.memory
    }

    // ==================== Elements ====================

    /// Create a node. Returns the invalid address for a non-node type.
    pub fn create_node(&self, ty: ElementType) -> Addr {
        self.store()
            .create_node(ty)
            .unwrap_or_else(|err| self.rejected("create_node", err))
    }

    /// Create a constant link with no content.
    pub fn create_link(&self) -> Addr {
        self.store().create_link()
    }

    /// Create an edge. Returns the invalid address if an endpoint is
    /// missing or the type is not an edge type.
    pub fn create_edge(&self, ty: ElementType, source: Addr, target: Addr) -> Addr {
        self.store()
            .create_edge(ty, source, target)
            .unwrap_or_else(|err| self.rejected("create_edge", err))
    }

    /// Erase an element and every edge incident to it.
    pub fn erase_element(&self, addr: Addr) -> bool {
        self.store().erase(addr)
    }

    pub fn is_element(&self, addr: Addr) -> bool {
        self.store().contains(addr)
    }

    /// Type of `addr`, or the unknown type if it does not exist.
    pub fn element_type(&self, addr: Addr) -> ElementType {
        self.store()
            .element_type(addr)
            .unwrap_or(ElementType::UNKNOWN)
    }

    /// `(source, target)` of an edge, `None` for anything else.
    pub fn edge_info(&self, addr: Addr) -> Option<(Addr, Addr)> {
        self.store().edge_ends(addr)
    }

    // ==================== Link content ====================

    pub fn set_link_content(&self, link: Addr, content: impl Into<LinkContent>) -> SessionResult<()> {
        Ok(self.store().set_link_content(link, content.into())?)
    }

    pub fn link_content(&self, link: Addr) -> Option<LinkContent> {
        self.store().link_content(link)
    }

    pub fn find_links_by_content(&self, content: impl Into<LinkContent>) -> Vec<Addr> {
        self.store().find_links_by_content(&content.into())
    }

    // ==================== Iterators ====================

    pub fn iterator3(
        &self,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
    ) -> Iterator3 {
        Iterator3::new(Arc::clone(self.store()), p0, p1, p2)
    }

    pub fn iterator5(
        &self,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
        p3: impl Into<IterParam>,
        p4: impl Into<IterParam>,
    ) -> Iterator5 {
        Iterator5::new(Arc::clone(self.store()), p0, p1, p2, p3, p4)
    }

    /// Like [`iterator3`](Self::iterator3), but a malformed parameter is an
    /// error instead of an invalid iterator.
    pub fn try_iterator3(
        &self,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
    ) -> SessionResult<Iterator3> {
        Ok(Iterator3::try_new(Arc::clone(self.store()), p0, p1, p2)?)
    }

    pub fn try_iterator5(
        &self,
        p0: impl Into<IterParam>,
        p1: impl Into<IterParam>,
        p2: impl Into<IterParam>,
        p3: impl Into<IterParam>,
        p4: impl Into<IterParam>,
    ) -> SessionResult<Iterator5> {
        Ok(Iterator5::try_new(
            Arc::clone(self.store()),
            p0,
            p1,
            p2,
            p3,
            p4,
        )?)
    }

    // ==================== Naming ====================

    /// Element named `idtf`. With `create`, a missing identifier gets a
    /// new node of that type; without it, the invalid address.
    pub fn resolve_identifier(&self, idtf: &str, create: Option<ElementType>) -> Addr {
        self.memory
            .naming
            .resolve(self.store(), idtf, create)
            .unwrap_or_else(|err| self.rejected("resolve_identifier", err))
    }

    pub fn set_identifier(&self, idtf: &str, addr: Addr) -> SessionResult<()> {
        self.memory.naming.set(self.store(), idtf, addr)
    }

    pub fn get_identifier(&self, addr: Addr) -> Option<String> {
        self.memory.naming.identifier_of(self.store(), addr)
    }

    /// Whether an edge matching `ty` runs from `source` to `target`.
    pub fn check_edge(&self, source: Addr, target: Addr, ty: ElementType) -> bool {
        check_edge(self.store(), source, target, ty)
    }

    // ==================== Templates ====================

    pub fn generate(
        &self,
        template: &Template,
        params: &TemplateParams,
    ) -> SessionResult<TemplateBindings> {
        Ok(generate(self.store(), template, params)?)
    }

    pub fn search(&self, template: &Template) -> SessionResult<SearchResult> {
        Ok(search(self.store(), template)?)
    }

    pub fn search_with_params(
        &self,
        template: &Template,
        params: &TemplateParams,
    ) -> SessionResult<SearchResult> {
        Ok(search_with_params(self.store(), template, params)?)
    }

    pub fn search_in_struct(&self, template: &Template, structure: Addr) -> SessionResult<SearchResult> {
        Ok(search_in_struct(self.store(), template, structure)?)
    }

    pub fn build_template(&self, structure: Addr) -> SessionResult<Template> {
        Ok(build_template(self.store(), structure)?)
    }

    // ==================== Events ====================

    /// Call `callback` for every `kind` event on `subject`.
    pub fn subscribe<F>(&self, subject: Addr, kind: EventKind, callback: F) -> SessionResult<Subscription>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribe_filtered(subject, kind, ElementType::UNKNOWN, callback)
    }

    /// Like [`MemoryContext::subscribe`], for edges matching `edge_type`.
    pub fn subscribe_filtered<F>(
        &self,
        subject: Addr,
        kind: EventKind,
        edge_type: ElementType,
        callback: F,
    ) -> SessionResult<Subscription>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        if !self.is_element(subject) {
            return Err(SessionError::ElementNotFound(subject));
        }
        Ok(self
            .memory
            .events()
            .subscribe_filtered(subject, kind, edge_type, callback)?)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.memory.events().unsubscribe(subscription);
    }

    /// Deliver queued notifications on this thread (manual dispatch only).
    pub fn dispatch_pending(&self) -> usize {
        self.memory.events().dispatch_pending()
    }

    pub fn event_stats(&self) -> EventStats {
        self.memory.events().stats()
    }

    fn store(&self) -> &Arc<semnet_graph::Store> {
        self.memory.store()
    }

    fn rejected(&self, op: &str, err: impl Into<SessionError>) -> Addr {
        let err = err.into();
        debug!(context = %self.name, op, error = %err, "operation rejected");
        Addr::INVALID
    }
}

impl std::fmt::Debug for MemoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryContext")
            .field("name", &self.name)
            .finish()
    }
}
