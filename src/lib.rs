pub mod config;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod process;

pub use config::Config;
