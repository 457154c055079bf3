//! Node registry and slot→node table, built from `CLUSTER SLOTS` or
//! `CLUSTER NODES` replies and kept current by `MOVED` patches.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::{debug, trace};

use crate::error::{Error, ErrorKind, Result};
use crate::slot::NUM_SLOTS;
use crate::value::Reply;

/// Whether a node is a primary (writable, slot-owning) or a replica.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Primary,
    Replica,
}

/// One cluster member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub role: Role,
    pub primary_id: Option<String>,
}

impl Node {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The slot→node table plus the node registry it indexes into.
///
/// `slots[i]` is the addr (`host:port`) of slot `i`'s primary, or `None` if
/// the slot is currently unassigned. The table is total: every index has a
/// defined entry, possibly `None`.
#[derive(Clone, Debug)]
pub struct Topology {
    slots: Vec<Option<String>>,
    nodes: HashMap<String, Node>,
}

impl Default for Topology {
    fn default() -> Self {
        Topology::empty()
    }
}

impl Topology {
    fn empty() -> Topology {
        Topology {
            slots: vec![None; NUM_SLOTS as usize],
            nodes: HashMap::new(),
        }
    }

    pub fn node_for_slot(&self, slot: u16) -> Option<&Node> {
        self.slots
            .get(slot as usize)
            .and_then(|addr| addr.as_ref())
            .and_then(|addr| self.nodes.get(addr))
    }

    pub fn node(&self, addr: &str) -> Option<&Node> {
        self.nodes.get(addr)
    }

    pub fn primaries(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.role == Role::Primary)
    }

    /// Patches a single slot's owner in place, registering the node if new.
    /// Used for `MOVED` handling, where a full rebuild would be wasteful.
    pub fn apply_moved(&mut self, slot: u16, host: &str, port: u16) {
        let addr = format!("{host}:{port}");
        self.nodes.entry(addr.clone()).or_insert_with(|| Node {
            id: addr.clone(),
            host: host.to_owned(),
            port,
            role: Role::Primary,
            primary_id: None,
        });
        if let Some(entry) = self.slots.get_mut(slot as usize) {
            *entry = Some(addr);
        }
        trace!("applied MOVED for slot {slot}");
    }
}

/// Owns the live [`Topology`] behind an atomically swappable pointer so
/// readers never observe a half-built table during a refresh.
pub struct TopologyTable {
    current: ArcSwap<Topology>,
}

impl Default for TopologyTable {
    fn default() -> Self {
        TopologyTable::new()
    }
}

impl TopologyTable {
    pub fn new() -> TopologyTable {
        TopologyTable {
            current: ArcSwap::from_pointee(Topology::empty()),
        }
    }

    pub fn load(&self) -> Arc<Topology> {
        self.current.load_full()
    }

    /// Installs a fully-built topology, replacing the old one atomically.
    pub fn replace(&self, topology: Topology) {
        debug!("topology table replaced ({} nodes)", topology.nodes.len());
        self.current.store(Arc::new(topology));
    }

    /// Patches a single slot without rebuilding the whole table.
    pub fn apply_moved(&self, slot: u16, host: &str, port: u16) {
        let mut next = (*self.current.load_full()).clone();
        next.apply_moved(slot, host, port);
        self.current.store(Arc::new(next));
    }
}

/// Parses a `CLUSTER SLOTS` reply into a fresh [`Topology`].
///
/// Each top-level element is `[start, end, [host, port, id?], <replica>...]`.
/// Malformed entries (wrong shape, non-integer bounds) are skipped rather
/// than failing the whole refresh — a partial topology beats none.
pub fn parse_cluster_slots(reply: &Reply) -> Result<Topology> {
    let entries = match reply {
        Reply::Array(Some(items)) => items,
        _ => {
            return Err(Error::with_message(
                ErrorKind::ResponseError,
                "CLUSTER SLOTS reply",
                "expected a top-level array".to_owned(),
            ))
        }
    };

    let mut topology = Topology::empty();
    for entry in entries {
        let fields = match entry {
            Reply::Array(Some(f)) if f.len() >= 3 => f,
            _ => continue,
        };
        let start = match fields[0] {
            Reply::Int(n) if (0..NUM_SLOTS as i64).contains(&n) => n as u16,
            _ => continue,
        };
        let end = match fields[1] {
            Reply::Int(n) if (0..NUM_SLOTS as i64).contains(&n) => n as u16,
            _ => continue,
        };
        if end < start {
            continue;
        }

        let mut nodes_in_range: Vec<Node> = Vec::new();
        for (i, node_field) in fields[2..].iter().enumerate() {
            let node_parts = match node_field {
                Reply::Array(Some(p)) if p.len() >= 2 => p,
                _ => continue,
            };
            let host = match node_parts[0].as_bytes() {
                Some(b) => String::from_utf8_lossy(b).into_owned(),
                None => continue,
            };
            let port = match node_parts[1] {
                Reply::Int(p) if p >= 0 && p <= u16::MAX as i64 => p as u16,
                _ => continue,
            };
            if host.is_empty() {
                continue;
            }
            let role = if i == 0 { Role::Primary } else { Role::Replica };
            let id = format!("{host}:{port}");
            nodes_in_range.push(Node {
                id,
                host,
                port,
                role,
                primary_id: None,
            });
        }
        let primary = match nodes_in_range.first() {
            Some(p) => p.clone(),
            None => continue,
        };
        let primary_addr = primary.addr();
        for node in nodes_in_range {
            topology.nodes.entry(node.addr()).or_insert(node);
        }
        for slot in start..=end {
            topology.slots[slot as usize] = Some(primary_addr.clone());
        }
    }
    Ok(topology)
}

/// Parses the text format returned by `CLUSTER NODES`: one line per node,
/// space-separated fields, slot ranges as trailing tokens (`0-5460`,
/// `5461`, or a single-slot importing/migrating marker which is ignored).
pub fn parse_cluster_nodes(text: &str) -> Result<Topology> {
    let mut topology = Topology::empty();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() < 8 {
            continue;
        }
        let id = fields[0].to_owned();
        let addr_field = fields[1];
        let host_port = addr_field.split('@').next().unwrap_or(addr_field);
        let (host, port) = match host_port.rsplit_once(':') {
            Some((h, p)) => match p.parse::<u16>() {
                Ok(p) => (h.to_owned(), p),
                Err(_) => continue,
            },
            None => continue,
        };
        let flags = fields[2];
        let role = if flags.contains("master") {
            Role::Primary
        } else {
            Role::Replica
        };
        let primary_id = fields[3];
        let primary_id = if primary_id == "-" {
            None
        } else {
            Some(primary_id.to_owned())
        };

        let node = Node { id, host, port, role, primary_id };
        let addr = node.addr();

        if role == Role::Primary {
            for token in &fields[8..] {
                if token.starts_with('[') {
                    continue; // importing/migrating marker, not a slot range
                }
                if let Some((s, e)) = token.split_once('-') {
                    if let (Ok(s), Ok(e)) = (s.parse::<u16>(), e.parse::<u16>()) {
                        for slot in s..=e {
                            topology.slots[slot as usize] = Some(addr.clone());
                        }
                    }
                } else if let Ok(s) = token.parse::<u16>() {
                    topology.slots[s as usize] = Some(addr.clone());
                }
            }
        }
        topology.nodes.insert(addr, node);
    }
    Ok(topology)
}
