//! Long-lived background tasks spawned by `main`.

pub mod review_stats;
