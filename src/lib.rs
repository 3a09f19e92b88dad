pub mod check;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod hook;
pub mod recover;
pub mod store;
pub mod sync;
pub mod transcript;

pub use config::Config;
pub use error::{Result, VaultError};
pub use store::Store;
