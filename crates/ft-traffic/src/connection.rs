//! Connection-matrix entries and the short-flow pool.

use ft_core::HostIndex;

use crate::{TrafficError, TrafficResult};

/// One `(source, destination)` pair of the connection matrix.
///
/// `is_large` starts `false` and can only be flipped once, through
/// [`Connection::promote`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source:      HostIndex,
    pub destination: HostIndex,
    is_large:        bool,
}

impl Connection {
    pub fn new(source: HostIndex, destination: HostIndex) -> Self {
        Self { source, destination, is_large: false }
    }

    #[inline]
    pub fn is_large(&self) -> bool {
        self.is_large
    }

    /// Mark this connection as carrying a long-lived flow.
    pub fn promote(&mut self) -> TrafficResult<()> {
        if self.is_large {
            return Err(TrafficError::AlreadyLarge { src: self.source, dst: self.destination });
        }
        self.is_large = true;
        Ok(())
    }
}

// ── ShortFlowPool ─────────────────────────────────────────────────────────────

/// Non-empty, read-only set of connections eligible for short flows.
#[derive(Clone, Debug)]
pub struct ShortFlowPool {
    connections: Vec<Connection>,
}

impl ShortFlowPool {
    /// Wrap `connections`.  Fails on an empty set or on any large connection.
    pub fn new(connections: Vec<Connection>) -> TrafficResult<Self> {
        if connections.is_empty() {
            return Err(TrafficError::EmptyConnectionPool);
        }
        if let Some(c) = connections.iter().find(|c| c.is_large()) {
            return Err(TrafficError::LargeInShortPool { src: c.source, dst: c.destination });
        }
        Ok(Self { connections })
    }

    /// Every connection of `matrix` that was not promoted.
    pub fn from_matrix(matrix: &[Connection]) -> TrafficResult<Self> {
        Self::new(matrix.iter().filter(|c| !c.is_large()).copied().collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Never true for a constructed pool.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> &Connection {
        &self.connections[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }
}
