//! Differential selection estimation from deep mutational scanning count tables in Rust

pub mod constants;
pub mod counts;
pub mod diffsel;
pub mod error;
pub mod types;
