//! Transport and traffic-pattern selectors.
//!
//! These are names only: the transport implementation and the connection
//! matrix generator live outside this workspace.  Unknown names are a
//! configuration error, never a silent fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FtError;

// ── SocketKind ────────────────────────────────────────────────────────────────

/// The transport flavour flows are installed with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocketKind {
    Tcp,
    Mptcp,
    Scatter,
    #[default]
    Mmptcp,
}

impl SocketKind {
    pub const ALL: [SocketKind; 4] =
        [SocketKind::Tcp, SocketKind::Mptcp, SocketKind::Scatter, SocketKind::Mmptcp];

    pub fn name(self) -> &'static str {
        match self {
            SocketKind::Tcp     => "TCP",
            SocketKind::Mptcp   => "MPTCP",
            SocketKind::Scatter => "SCATTER",
            SocketKind::Mmptcp  => "MMPTCP",
        }
    }

    /// Socket kinds that draw uniform short-flow sizes from the wide
    /// `[lower, upper]` KiB range instead of `[1, threshold]`.
    #[inline]
    pub fn uses_wide_size_range(self) -> bool {
        self == SocketKind::Mmptcp
    }

    /// Socket kinds whose duplicate-ack threshold follows path diversity
    /// when automatic tuning is enabled.
    #[inline]
    pub fn supports_auto_dup_ack(self) -> bool {
        matches!(self, SocketKind::Mmptcp | SocketKind::Scatter)
    }
}

impl fmt::Display for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SocketKind {
    type Err = FtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocketKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| FtError::UnknownName { what: "socket kind", name: s.to_owned() })
    }
}

// ── TrafficPattern ────────────────────────────────────────────────────────────

/// Connection-matrix pattern names.  `ShortFlow` as the top-level pattern
/// means "mixed": a share of the matrix carries long-lived flows and the rest
/// feeds the short-flow arrival process.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficPattern {
    None,
    Permutation,
    Stride,
    Random,
    ShortFlow,
    Incast,
}

impl TrafficPattern {
    pub const ALL: [TrafficPattern; 6] = [
        TrafficPattern::None,
        TrafficPattern::Permutation,
        TrafficPattern::Stride,
        TrafficPattern::Random,
        TrafficPattern::ShortFlow,
        TrafficPattern::Incast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrafficPattern::None        => "NONE",
            TrafficPattern::Permutation => "PERMUTATION",
            TrafficPattern::Stride      => "STRIDE",
            TrafficPattern::Random      => "RANDOM",
            TrafficPattern::ShortFlow   => "SHORT_FLOW",
            TrafficPattern::Incast      => "INCAST",
        }
    }
}

impl fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrafficPattern {
    type Err = FtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrafficPattern::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| FtError::UnknownName { what: "traffic pattern", name: s.to_owned() })
    }
}

// ── FlowKind ──────────────────────────────────────────────────────────────────

/// Tag attached to every installed flow and used to pick a histogram row.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FlowKind {
    Short,
    Large,
}

impl FlowKind {
    pub fn name(self) -> &'static str {
        match self {
            FlowKind::Short => "Short",
            FlowKind::Large => "Large",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
