// Library exports for testing
// The binary (main.rs) imports these as well

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod terminal;

#[cfg(test)]
mod tests;

/// Directory under the platform config dir holding config, credentials and logs.
pub const APP_DIR_NAME: &str = "admin-console";
