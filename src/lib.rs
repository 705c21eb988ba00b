pub mod cli;
pub mod common;
