// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod auth;
pub mod authz;
pub mod cli;
pub mod config;
pub mod console;
pub mod menu;
pub mod operations;

#[cfg(test)]
mod test_utils;
