pub mod attestation;
pub mod calculator;
pub mod checkin;
pub mod clock;
pub mod edit;
pub mod log;
pub mod logic;
pub mod normalizer;
pub mod report;
pub mod sync;
