//! Build context handed to the runtime launcher

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SOURCE_DIRECTORY: &str = "src/main/clojure";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target/classes";

/// Where sources, compiled classes and dependencies live for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    pub source_directories: Vec<PathBuf>,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub classpath_elements: Vec<PathBuf>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            source_directories: vec![PathBuf::from(DEFAULT_SOURCE_DIRECTORY)],
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            classpath_elements: Vec::new(),
        }
    }
}

impl BuildContext {
    pub fn new(
        source_directories: Vec<PathBuf>,
        output_directory: PathBuf,
        classpath_elements: Vec<PathBuf>,
    ) -> Self {
        Self {
            source_directories,
            output_directory,
            classpath_elements,
        }
    }

    /// Classpath entries in lookup order: sources, compiled output, then dependencies.
    pub fn classpath(&self) -> impl Iterator<Item = &PathBuf> {
        self.source_directories
            .iter()
            .chain(std::iter::once(&self.output_directory))
            .chain(self.classpath_elements.iter())
    }
}
