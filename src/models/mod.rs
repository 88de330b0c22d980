pub mod action;
pub mod attestation;
pub mod checkin_code;
pub mod event;
pub mod shift;
pub mod time_entry;
pub mod worker;
