//! Driver error type.

use thiserror::Error;

use ft_core::FtError;
use ft_schedule::ScheduleError;
use ft_telemetry::TelemetryError;
use ft_traffic::TrafficError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] FtError),

    #[error("traffic error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("the experiment has already run")]
    AlreadyRun,
}

pub type SimResult<T> = Result<T, SimError>;
