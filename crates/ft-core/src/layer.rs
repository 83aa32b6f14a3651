//! The four switching layers of a fat-tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FtError;

/// A fat-tree layer.  Ordered from the top of the tree down, which is also
/// the order reports are written in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Layer {
    Core,
    Aggr,
    Tor,
    Host,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Core, Layer::Aggr, Layer::Tor, Layer::Host];

    /// Human-readable name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Layer::Core => "Core",
            Layer::Aggr => "Aggr",
            Layer::Tor  => "Tor",
            Layer::Host => "Host",
        }
    }

    /// Upper-case tag used in per-layer output file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Layer::Core => "CORE",
            Layer::Aggr => "AGGR",
            Layer::Tor  => "TOR",
            Layer::Host => "HOST",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = FtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FtError::UnknownName { what: "layer", name: s.to_owned() })
    }
}
