//! Flutter-facing bindings for the RateThisMeal core.

pub mod api;
