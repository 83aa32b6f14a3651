//! Fabric error type.

use thiserror::Error;

use ft_core::HostIndex;

/// Errors produced by `ft-fabric`.
#[derive(Debug, Error)]
pub enum FabricError {
    #[error("host {host} is outside the fabric ({total} hosts)")]
    UnknownHost { host: HostIndex, total: u32 },
}

pub type FabricResult<T> = Result<T, FabricError>;
