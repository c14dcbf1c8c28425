//! Per-case drawing and frame synchronization.

pub(crate) mod driver;
pub(crate) mod sync;
