//! Seeded, headless bingo rounds on a virtual clock.

mod config;
mod error;
mod simulator;
mod trace;

pub use config::*;
pub use error::*;
pub use simulator::*;
pub use trace::*;
