//! API route handlers.

pub mod calculate;
pub mod classify;
pub mod extract;
pub mod optimize;
pub mod status;

use std::time::Instant;

/// Milliseconds since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
