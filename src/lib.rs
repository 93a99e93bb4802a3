//! Vyrn: translates a small statement language into C++.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;

pub use crate::core::{Compiler, Translation};
