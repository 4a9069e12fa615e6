//! Run configuration and the `.clj-run.json` settings file

mod run_config;
mod settings;

pub use run_config::{RunConfig, RunMode};
pub use settings::{CONFIG_FILE_NAME, Settings};
