//! Bingo round logic. Keep this crate free of IO and platform concerns.

pub mod card;
pub mod config;
pub mod events;
pub mod extraction;
pub mod rng;
pub mod round;
pub mod schedule;

pub use card::*;
pub use config::*;
pub use events::*;
pub use extraction::*;
pub use rng::*;
pub use round::*;
pub use schedule::*;
