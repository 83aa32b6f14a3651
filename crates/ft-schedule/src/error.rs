use thiserror::Error;

use ft_core::SimTime;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("event scheduled in the past: {at} < now {now}")]
    InThePast { at: SimTime, now: SimTime },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
