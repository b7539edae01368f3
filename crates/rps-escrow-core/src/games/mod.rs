//! Move set and outcome rules.

mod rps;

pub use rps::{judge, Move};
