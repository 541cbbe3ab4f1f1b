pub mod cache;
pub mod enrichment;
pub mod events;
pub mod normalize;
pub mod photos;
pub mod reconcile;
pub mod users;
