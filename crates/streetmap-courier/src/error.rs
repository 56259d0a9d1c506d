//! Courier-subsystem error type.
//!
//! `CourierPlanner::plan` itself never returns `Result` — an infeasible or
//! timed-out request returns an empty plan, same as the other in-band
//! failure modes in this workspace. `CourierError` exists for the one
//! failure mode that has no sensible empty value: malformed request input
//! caught before planning starts.

use thiserror::Error;

/// Errors produced while validating a courier planning request.
#[derive(Debug, Error)]
pub enum CourierError {
    #[error("no depots supplied")]
    NoDepots,

    #[error("no deliveries supplied")]
    NoDeliveries,
}

pub type CourierResult<T> = Result<T, CourierError>;
