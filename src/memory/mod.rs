pub mod maintenance;
pub mod scoring;
pub mod search;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;

pub use store::Store;
