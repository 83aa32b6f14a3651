//! Traffic-generation error type.

use thiserror::Error;

use ft_core::HostIndex;
use ft_fabric::FabricError;

use crate::arrival::ArrivalState;

/// Errors produced by `ft-traffic`.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("the short-flow connection pool is empty")]
    EmptyConnectionPool,

    #[error("connection {index} references host {host}, but the fabric has {total} hosts")]
    HostOutOfRange { index: usize, host: HostIndex, total: u32 },

    #[error("host {0} has no listening port in the u16 range")]
    PortOutOfRange(HostIndex),

    #[error("connection {src} -> {dst} is already a large flow")]
    AlreadyLarge { src: HostIndex, dst: HostIndex },

    #[error("short-flow pool contains large connection {src} -> {dst}")]
    LargeInShortPool { src: HostIndex, dst: HostIndex },

    #[error("invalid flow-size CDF: {0}")]
    InvalidCdf(String),

    #[error("invalid flow-size range: {0}")]
    InvalidSizeRange(String),

    #[error("hotspot ratio {0}% exceeds 100%")]
    InvalidHotspotRatio(u32),

    #[error("invalid arrival parameters: {0}")]
    InvalidArrival(String),

    #[error("arrival process cannot {op} in state {state:?}")]
    InvalidTransition { op: &'static str, state: ArrivalState },

    #[error("CSV parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fabric(#[from] FabricError),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
