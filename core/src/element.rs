//! Element records.
//!
//! Nodes, edges and links are the three element kinds of the graph. Edges
//! connect two existing elements, which may themselves be edges.

use crate::{Addr, ElementType, LinkContent};

/// Kind-specific part of an element record.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    /// A node has identity only.
    Node,
    /// An edge from `source` to `target`.
    Edge { source: Addr, target: Addr },
    /// A link with an optional payload (empty until first written).
    Link { content: Option<LinkContent> },
}

/// An element of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Address of this element.
    pub addr: Addr,
    /// Type of this element.
    pub element_type: ElementType,
    /// Endpoints or payload.
    pub body: ElementBody,
}

impl Element {
    /// Create a node record.
    pub fn node(addr: Addr, element_type: ElementType) -> Self {
        Self {
            addr,
            element_type,
            body: ElementBody::Node,
        }
    }

    /// Create an edge record.
    pub fn edge(addr: Addr, element_type: ElementType, source: Addr, target: Addr) -> Self {
        Self {
            addr,
            element_type,
            body: ElementBody::Edge { source, target },
        }
    }

    /// Create a link record with no content.
    pub fn link(addr: Addr, element_type: ElementType) -> Self {
        Self {
            addr,
            element_type,
            body: ElementBody::Link { content: None },
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self.body, ElementBody::Node)
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.body, ElementBody::Edge { .. })
    }

    pub fn is_link(&self) -> bool {
        matches!(self.body, ElementBody::Link { .. })
    }

    /// Get `(source, target)` if this is an edge.
    pub fn edge_ends(&self) -> Option<(Addr, Addr)> {
        match self.body {
            ElementBody::Edge { source, target } => Some((source, target)),
            _ => None,
        }
    }

    /// Get the payload if this is a link with content.
    pub fn content(&self) -> Option<&LinkContent> {
        match &self.body {
            ElementBody::Link { content } => content.as_ref(),
            _ => None,
        }
    }

    /// Check if this edge involves `addr` as source or target.
    pub fn involves(&self, addr: Addr) -> bool {
        self.edge_ends()
            .map(|(source, target)| source == addr || target == addr)
            .unwrap_or(false)
    }
}
