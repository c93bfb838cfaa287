//! Loading and validation of round configuration files.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
