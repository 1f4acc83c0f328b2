//! Notification records.

use semnet_core::{Addr, ElementType};
use semnet_graph::StructuralChange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a subscription listens for on its subject element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An edge leaving the subject was created.
    AddOutputEdge,
    /// An edge entering the subject was created.
    AddInputEdge,
    /// An edge leaving the subject was erased.
    RemoveOutputEdge,
    /// An edge entering the subject was erased.
    RemoveInputEdge,
    /// The subject itself was erased.
    EraseElement,
    /// The subject's link content was replaced.
    ContentChanged,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::AddOutputEdge => "add_output_edge",
            EventKind::AddInputEdge => "add_input_edge",
            EventKind::RemoveOutputEdge => "remove_output_edge",
            EventKind::RemoveInputEdge => "remove_input_edge",
            EventKind::EraseElement => "erase_element",
            EventKind::ContentChanged => "content_changed",
        };
        write!(f, "{}", name)
    }
}

/// One queued event, addressed to a subject element.
///
/// Kinds without an edge carry the invalid address in `edge` and `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: EventKind,
    /// Element the subscription was made on.
    pub subject: Addr,
    /// Edge that was added or removed.
    pub edge: Addr,
    /// The other end of `edge`.
    pub other: Addr,
    /// Type of `edge`, or the unknown type.
    pub edge_type: ElementType,
}

impl Notification {
    fn element(kind: EventKind, subject: Addr) -> Self {
        Self {
            kind,
            subject,
            edge: Addr::INVALID,
            other: Addr::INVALID,
            edge_type: ElementType::UNKNOWN,
        }
    }

    /// Notifications produced by one structural change, one per
    /// interested subject.
    pub fn from_change(change: &StructuralChange) -> Vec<Notification> {
        match *change {
            StructuralChange::EdgeAdded {
                edge,
                source,
                target,
                edge_type,
            } => Self::edge_pair(
                EventKind::AddOutputEdge,
                EventKind::AddInputEdge,
                edge,
                source,
                target,
                edge_type,
            ),
            StructuralChange::EdgeRemoved {
                edge,
                source,
                target,
                edge_type,
            } => Self::edge_pair(
                EventKind::RemoveOutputEdge,
                EventKind::RemoveInputEdge,
                edge,
                source,
                target,
                edge_type,
            ),
            StructuralChange::ElementErased { addr } => {
                vec![Self::element(EventKind::EraseElement, addr)]
            }
            StructuralChange::ContentChanged { link } => {
                vec![Self::element(EventKind::ContentChanged, link)]
            }
        }
    }

    fn edge_pair(
        output: EventKind,
        input: EventKind,
        edge: Addr,
        source: Addr,
        target: Addr,
        edge_type: ElementType,
    ) -> Vec<Notification> {
        vec![
            Notification {
                kind: output,
                subject: source,
                edge,
                other: target,
                edge_type,
            },
            Notification {
                kind: input,
                subject: target,
                edge,
                other: source,
                edge_type,
            },
        ]
    }

    /// The `(source, edge, target)` record of this event.
    pub fn triple(&self) -> (Addr, Addr, Addr) {
        match self.kind {
            EventKind::AddInputEdge | EventKind::RemoveInputEdge => {
                (self.other, self.edge, self.subject)
            }
            _ => (self.subject, self.edge, self.other),
        }
    }
}
