//! System keynodes resolved when a memory starts.

use crate::naming::Naming;
use crate::SessionResult;
use semnet_core::{Addr, ElementType};
use semnet_graph::Store;
use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

pub(crate) const NREL_SYSTEM_IDENTIFIER: &str = "nrel_system_identifier";

/// Addresses of the seeded system identifiers.
#[derive(Debug, Clone, Default)]
pub struct Keynodes {
    by_name: HashMap<String, Addr>,
}

impl Keynodes {
    /// Resolve every name, creating missing ones.
    pub(crate) fn seed<'a>(
        store: &Arc<Store>,
        naming: &Naming,
        names: impl IntoIterator<Item = &'a str>,
    ) -> SessionResult<Self> {
        let mut by_name = HashMap::new();
        by_name.insert(NREL_SYSTEM_IDENTIFIER.to_string(), naming.nrel());
        for name in names {
            if by_name.contains_key(name) {
                continue;
            }
            let addr = naming.resolve(store, name, Some(keynode_type(name)))?;
            by_name.insert(name.to_string(), addr);
        }
        Ok(Self { by_name })
    }

    /// The naming relation.
    pub fn nrel_system_identifier(&self) -> Addr {
        self.get(NREL_SYSTEM_IDENTIFIER)
    }

    /// Keynode address, or the invalid address if it was not seeded.
    pub fn get(&self, name: &str) -> Addr {
        self.by_name.get(name).copied().unwrap_or(Addr::INVALID)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Addr)> + '_ {
        self.by_name.iter().map(|(name, addr)| (name.as_str(), *addr))
    }
}

impl Index<&str> for Keynodes {
    type Output = Addr;

    fn index(&self, name: &str) -> &Addr {
        self.by_name.get(name).unwrap_or(&Addr::INVALID)
    }
}

/// Relations get a norole node, role relations a role node.
fn keynode_type(name: &str) -> ElementType {
    if name.starts_with("nrel_") {
        ElementType::NODE_CONST_NOROLE
    } else if name.starts_with("rrel_") {
        ElementType::NODE_CONST_ROLE
    } else {
        ElementType::NODE_CONST
    }
}
