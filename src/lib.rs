pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{FileConfig, LocalStorage};
pub use core::client::NightjetClient;
pub use core::engine::CheckEngine;
pub use core::pipeline::OfferPipeline;
pub use utils::error::{CheckError, Result};
