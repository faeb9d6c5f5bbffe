pub mod config;
pub mod delivery;
pub mod edges;
pub mod engine;
pub mod feed;
pub mod narrative;
pub mod pipeline;
