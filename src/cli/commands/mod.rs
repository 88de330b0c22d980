pub mod clock;
pub mod directory;
pub mod edit;
pub mod init;
pub mod log;
pub mod sync;
pub mod totals;
