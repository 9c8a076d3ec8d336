#[cfg(feature = "cli")]
pub mod cli;
pub mod file;
pub mod storage;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use file::FileConfig;
pub use storage::LocalStorage;
