//! Supplier matching: per-criterion scoring of catalog products against an
//! RFQ, weighted aggregation, ranking and proposal persistence.

pub mod compliance;
pub mod delivery;
pub mod handlers;
pub mod hardware;
pub mod pipeline;
pub mod price;
pub mod ranking;
pub mod scorer;
pub mod specs;
