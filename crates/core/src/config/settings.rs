use crate::{
    context::BuildContext,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::RunConfig;

pub const CONFIG_FILE_NAME: &str = ".clj-run.json";

/// Contents of a `.clj-run.json` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub run: RunConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directories: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classpath_elements: Vec<PathBuf>,

    /// Path to the `java` executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jvm_opts: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigFile(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walks up from `start_path` looking for a config file.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    /// Resolves the build context, relative to `base_dir`, falling back to the
    /// default source and output layout.
    pub fn build_context(&self, base_dir: &Path) -> BuildContext {
        let defaults = BuildContext::default();

        let source_directories = self
            .source_directories
            .clone()
            .unwrap_or(defaults.source_directories);
        let output_directory = self
            .output_directory
            .clone()
            .unwrap_or(defaults.output_directory);

        BuildContext::new(
            source_directories
                .into_iter()
                .map(|dir| base_dir.join(dir))
                .collect(),
            base_dir.join(output_directory),
            self.classpath_elements
                .iter()
                .map(|element| base_dir.join(element))
                .collect(),
        )
    }

    /// Fills unset values from `fallback`. Lists set here replace the
    /// fallback's; `env` entries are combined, with these taking precedence.
    pub fn or(self, fallback: Settings) -> Self {
        let mut env = fallback.env;
        env.extend(self.env);

        Self {
            run: self.run.or(fallback.run),
            source_directories: self.source_directories.or(fallback.source_directories),
            output_directory: self.output_directory.or(fallback.output_directory),
            classpath_elements: if self.classpath_elements.is_empty() {
                fallback.classpath_elements
            } else {
                self.classpath_elements
            },
            java: self.java.or(fallback.java),
            jvm_opts: if self.jvm_opts.is_empty() {
                fallback.jvm_opts
            } else {
                self.jvm_opts
            },
            env,
        }
    }

    /// Starter config written by `clj-run init`.
    pub fn template() -> Self {
        let defaults = BuildContext::default();
        Self {
            run: RunConfig::script("src/main/clojure/main.clj"),
            source_directories: Some(defaults.source_directories),
            output_directory: Some(defaults.output_directory),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let json = r#"{
            "script": "run.clj",
            "scripts": ["a.clj", "b.clj"],
            "args": "foo bar",
            "sourceDirectories": ["src"],
            "outputDirectory": "out",
            "classpathElements": ["lib/clojure.jar"],
            "java": "/opt/jdk/bin/java",
            "jvmOpts": ["-Xmx512m"],
            "env": { "APP_ENV": "test" }
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.run.script.as_deref(), Some("run.clj"));
        assert_eq!(
            settings.run.scripts,
            Some(vec!["a.clj".to_string(), "b.clj".to_string()])
        );
        assert_eq!(settings.run.args.as_deref(), Some("foo bar"));
        assert_eq!(settings.java, Some(PathBuf::from("/opt/jdk/bin/java")));
        assert_eq!(settings.jvm_opts, vec!["-Xmx512m"]);
        assert_eq!(settings.env.get("APP_ENV").map(String::as_str), Some("test"));

        let context = settings.build_context(Path::new("/project"));
        assert_eq!(context.source_directories, vec![PathBuf::from("/project/src")]);
        assert_eq!(context.output_directory, PathBuf::from("/project/out"));
        assert_eq!(
            context.classpath_elements,
            vec![PathBuf::from("/project/lib/clojure.jar")]
        );
    }

    #[test]
    fn test_build_context_defaults() {
        let context = Settings::default().build_context(Path::new("/project"));
        assert_eq!(
            context.source_directories,
            vec![PathBuf::from("/project/src/main/clojure")]
        );
        assert_eq!(context.output_directory, PathBuf::from("/project/target/classes"));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        Settings::template().save_to_file(&config_path).unwrap();

        assert_eq!(Settings::find_config_file(&nested), Some(config_path.clone()));

        let loaded = Settings::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, Settings::template());
    }

    #[test]
    fn test_or_overlays_fallback() {
        let file = Settings {
            run: RunConfig::script("file.clj").with_args("a b"),
            output_directory: Some("out".into()),
            classpath_elements: vec!["lib/a.jar".into()],
            jvm_opts: vec!["-Xmx1g".into()],
            env: BTreeMap::from([
                ("SHARED".to_string(), "file".to_string()),
                ("FILE_ONLY".to_string(), "1".to_string()),
            ]),
            ..Default::default()
        };
        let flags = Settings {
            run: RunConfig::script("flag.clj"),
            classpath_elements: vec!["lib/b.jar".into()],
            env: BTreeMap::from([("SHARED".to_string(), "flag".to_string())]),
            ..Default::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.run.script.as_deref(), Some("flag.clj"));
        assert_eq!(merged.run.args.as_deref(), Some("a b"));
        assert_eq!(merged.output_directory, Some(PathBuf::from("out")));
        assert_eq!(merged.classpath_elements, vec![PathBuf::from("lib/b.jar")]);
        assert_eq!(merged.jvm_opts, vec!["-Xmx1g"]);
        assert_eq!(merged.env["SHARED"], "flag");
        assert_eq!(merged.env["FILE_ONLY"], "1");
    }

    #[test]
    fn test_template_json() {
        let json = serde_json::to_string_pretty(&Settings::template()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "script": "src/main/clojure/main.clj",
          "sourceDirectories": [
            "src/main/clojure"
          ],
          "outputDirectory": "target/classes"
        }
        "#);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = Settings::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, Error::ConfigFile(_)));
    }
}
