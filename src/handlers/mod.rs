pub mod emotion;
pub mod habits;
pub mod health;
pub mod journal;
pub mod moods;
pub mod stats;
