//! Validate-and-dispatch for a single run

use crate::{
    config::{RunConfig, RunMode},
    context::BuildContext,
    error::Result,
    launcher::ClasspathRunner,
    script::{merge_scripts_in, split_args},
};
use std::path::PathBuf;
use tracing::debug;

/// Entry point used for script runs.
pub const CLOJURE_MAIN: &str = "clojure.main";

/// What will be handed to the [`ClasspathRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub entry_point: String,
    pub args: Vec<String>,
}

/// Runs a script or main class through a [`ClasspathRunner`].
pub struct ScriptRunner<R> {
    context: BuildContext,
    runner: R,
    loader_dir: PathBuf,
}

impl<R: ClasspathRunner> ScriptRunner<R> {
    pub fn new(context: BuildContext, runner: R) -> Self {
        Self {
            context,
            runner,
            loader_dir: std::env::temp_dir(),
        }
    }

    /// Directory that receives generated loader files.
    pub fn with_loader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.loader_dir = dir.into();
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Validates `config` and resolves the entry point and arguments.
    ///
    /// In script mode this may write a loader file.
    pub fn plan(&self, config: &RunConfig) -> Result<Invocation> {
        match config.validate()? {
            RunMode::Script { script, scripts } => {
                let path = merge_scripts_in(&self.loader_dir, script, scripts)?;
                debug!("Running clojure:run against {}", path);

                let mut args = vec![path];
                args.extend(split_args(config.args.as_deref()));

                Ok(Invocation {
                    entry_point: CLOJURE_MAIN.to_string(),
                    args,
                })
            }
            RunMode::MainClass(main_class) => Ok(Invocation {
                entry_point: main_class.to_string(),
                args: split_args(config.args.as_deref()),
            }),
        }
    }

    pub fn execute(&self, config: &RunConfig) -> Result<()> {
        let invocation = self.plan(config)?;
        self.runner
            .run_with_classpath(&self.context, &invocation.entry_point, &invocation.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        fail_with: Option<i32>,
    }

    impl ClasspathRunner for Recorder {
        fn run_with_classpath(
            &self,
            _context: &BuildContext,
            entry_point: &str,
            args: &[String],
        ) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((entry_point.to_string(), args.to_vec()));
            match self.fail_with {
                Some(code) => Err(Error::ProcessFailed { code: Some(code) }),
                None => Ok(()),
            }
        }
    }

    fn runner(dir: &TempDir) -> ScriptRunner<Recorder> {
        ScriptRunner::new(BuildContext::default(), Recorder::default()).with_loader_dir(dir.path())
    }

    #[test]
    fn test_script_mode() {
        let dir = TempDir::new().unwrap();
        let runner = runner(&dir);

        runner
            .execute(&RunConfig::script("a.clj").with_args("foo bar baz"))
            .unwrap();

        let calls = runner.runner().calls.borrow();
        assert_eq!(
            *calls,
            vec![(
                "clojure.main".to_string(),
                vec!["a.clj".to_string(), "foo".into(), "bar".into(), "baz".into()]
            )]
        );
    }

    #[test]
    fn test_script_mode_without_args() {
        let dir = TempDir::new().unwrap();
        let invocation = runner(&dir).plan(&RunConfig::script("@app/main.clj")).unwrap();
        assert_eq!(invocation.entry_point, CLOJURE_MAIN);
        assert_eq!(invocation.args, vec!["@app/main.clj"]);
    }

    #[test]
    fn test_main_class_mode() {
        let dir = TempDir::new().unwrap();
        let runner = runner(&dir);

        runner
            .execute(&RunConfig::main_class("com.example.Main"))
            .unwrap();

        let calls = runner.runner().calls.borrow();
        assert_eq!(*calls, vec![("com.example.Main".to_string(), Vec::<String>::new())]);
    }

    #[test]
    fn test_main_class_with_args() {
        let dir = TempDir::new().unwrap();
        let invocation = runner(&dir)
            .plan(&RunConfig::main_class("com.example.Main").with_args("-p 8080"))
            .unwrap();
        assert_eq!(invocation.args, vec!["-p", "8080"]);
    }

    #[test]
    fn test_validation_fails_before_delegating() {
        let dir = TempDir::new().unwrap();
        let runner = runner(&dir);

        let both = RunConfig {
            main_class: Some("com.example.Main".into()),
            ..RunConfig::script("a.clj")
        };
        assert!(matches!(runner.execute(&both), Err(Error::BothModes)));
        assert!(matches!(
            runner.execute(&RunConfig::default()),
            Err(Error::NoMode)
        ));
        assert!(matches!(
            runner.execute(&RunConfig::script("a.clj").with_scripts(Vec::<String>::new())),
            Err(Error::ScriptsEmpty)
        ));

        assert!(runner.runner().calls.borrow().is_empty());
    }

    #[test]
    fn test_multiple_scripts_run_through_loader() {
        let dir = TempDir::new().unwrap();
        let scripts_dir = TempDir::new().unwrap();
        let a = scripts_dir.path().join("a.clj");
        let b = scripts_dir.path().join("b.clj");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let config = RunConfig::script(a.to_string_lossy())
            .with_scripts([b.to_string_lossy().into_owned()])
            .with_args("x");
        let invocation = runner(&dir).plan(&config).unwrap();

        let loader = PathBuf::from(&invocation.args[0]);
        assert_eq!(loader.parent(), Some(dir.path()));
        assert_eq!(invocation.args[1], "x");
        assert_eq!(fs::read_to_string(&loader).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_runner_errors_pass_through() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptRunner::new(
            BuildContext::default(),
            Recorder {
                fail_with: Some(2),
                ..Default::default()
            },
        )
        .with_loader_dir(dir.path());

        let err = runner.execute(&RunConfig::main_class("Main")).unwrap_err();
        assert!(matches!(err, Error::ProcessFailed { code: Some(2) }));
    }
}
