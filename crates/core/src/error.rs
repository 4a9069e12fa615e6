use std::io;

/// Errors that can occur while preparing or running a Clojure invocation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Specify either 'script' or 'mainClass' - not both.")]
    BothModes,

    #[error("Specify either 'script' or 'mainClass'.")]
    NoMode,

    #[error("<script> is undefined")]
    ScriptUndefined,

    #[error("<scripts> is defined but has no <script> entries")]
    ScriptsEmpty,

    #[error("<script> entry cannot be empty")]
    BlankScriptEntry,

    #[error("{path} cannot be found")]
    ScriptNotFound { path: String },

    #[error("Failed to write script loader: {0}")]
    LoaderIo(#[source] io::Error),

    #[error("{message}")]
    Launch {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Process exited with status {}", exit_code(.code))]
    ProcessFailed { code: Option<i32> },

    #[error("Configuration error: {0}")]
    ConfigFile(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Wraps a foreign failure raised while launching the runtime, keeping its cause.
    pub fn launch<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Launch {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// True for failures detected while validating the run configuration or
    /// writing the script loader, before the runtime is launched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::BothModes
                | Error::NoMode
                | Error::ScriptUndefined
                | Error::ScriptsEmpty
                | Error::BlankScriptEntry
                | Error::ScriptNotFound { .. }
                | Error::LoaderIo(_)
        )
    }
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Result type alias for clj-run operations
pub type Result<T> = std::result::Result<T, Error>;
