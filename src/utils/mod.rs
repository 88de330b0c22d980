pub mod date;
pub mod formatting;
pub mod time;
pub mod tz;

pub use formatting::ms2readable;
