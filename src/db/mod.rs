pub mod attestations;
pub mod codes;
pub mod events;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod workers;
