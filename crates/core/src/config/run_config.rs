use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options for a single run, resolved once per invocation.
///
/// Exactly one of `script` or `main_class` must be set; see [`RunConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Main script path, or an `@`-prefixed classpath resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Additional scripts loaded after `script`; these must exist on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<String>>,

    /// Fully qualified name of a class with a standard `main`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,

    /// Space-delimited arguments forwarded to the script or main class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// What a validated [`RunConfig`] asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode<'a> {
    Script {
        script: &'a str,
        scripts: Option<&'a [String]>,
    },
    MainClass(&'a str),
}

impl RunConfig {
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ..Default::default()
        }
    }

    pub fn main_class(main_class: impl Into<String>) -> Self {
        Self {
            main_class: Some(main_class.into()),
            ..Default::default()
        }
    }

    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts = Some(scripts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Checks that exactly one run mode is selected. Touches nothing on disk.
    pub fn validate(&self) -> Result<RunMode<'_>> {
        match (&self.script, &self.main_class) {
            (Some(_), Some(_)) => Err(Error::BothModes),
            (None, None) => Err(Error::NoMode),
            (Some(script), None) => Ok(RunMode::Script {
                script,
                scripts: self.scripts.as_deref(),
            }),
            (None, Some(main_class)) => Ok(RunMode::MainClass(main_class)),
        }
    }

    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: RunConfig) -> Self {
        Self {
            script: self.script.or(fallback.script),
            scripts: self.scripts.or(fallback.scripts),
            main_class: self.main_class.or(fallback.main_class),
            args: self.args.or(fallback.args),
        }
    }
}
