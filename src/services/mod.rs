pub mod emotion;
pub mod stats;
