//! clj-run-core - Run Clojure scripts or main classes on a resolved classpath
//!
//! This crate provides functionality to:
//! - Validate a run configuration (script mode vs. main-class mode)
//! - Merge several scripts into one generated loader file
//! - Launch `clojure.main` or a main class through the JVM
pub mod config;
pub mod context;
pub mod error;
pub mod launcher;
pub mod runner;
pub mod script;

// Re-export commonly used types
pub use config::{RunConfig, RunMode, Settings};
pub use context::BuildContext;
pub use error::{Error, Result};
pub use launcher::{ClasspathRunner, JavaCommand, JvmLauncher};
pub use runner::{CLOJURE_MAIN, Invocation, ScriptRunner};
pub use script::{merge_scripts, split_args};
