pub mod cli;
pub mod stock;
