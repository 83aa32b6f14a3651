//! Telemetry error type.

use thiserror::Error;

use ft_core::{Layer, SimTime};

use crate::sampler::SamplerState;
use crate::store::SampleKey;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("bucket {bucket} is beyond the horizon of {horizon} s")]
    BucketOutOfRange { bucket: u32, horizon: u32 },

    #[error("sample {0:?} was already recorded")]
    Overwrite(SampleKey),

    #[error("telemetry sample at {0} is not on a whole second")]
    FractionalSecond(SimTime),

    #[error("sampler cannot fire in state {0:?}")]
    NotArmed(SamplerState),

    #[error("layer {0:?} is sampled twice")]
    DuplicateLayer(Layer),

    #[error("link rate must be > 0")]
    ZeroLinkRate,
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
