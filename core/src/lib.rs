#![no_std]

extern crate alloc;

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use presets::*;
pub use rng::*;
pub use scoring::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod grid;
mod presets;
mod rng;
mod scoring;
mod types;
