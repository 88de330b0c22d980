pub mod intervals;
pub mod meals;
pub mod status;
