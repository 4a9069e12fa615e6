//! Launching the JVM with a resolved classpath

use crate::{
    context::BuildContext,
    error::{Error, Result},
};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// Runs an entry point with the classpath described by a [`BuildContext`],
/// blocking until it finishes.
pub trait ClasspathRunner {
    fn run_with_classpath(
        &self,
        context: &BuildContext,
        entry_point: &str,
        args: &[String],
    ) -> Result<()>;
}

/// A fully resolved `java` invocation.
#[derive(Debug, Clone)]
pub struct JavaCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl JavaCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            env: Vec::new(),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env.push((key, value));
        self
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = quote(&self.program.to_string_lossy());
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote(&arg.to_string_lossy()));
        }
        cmd
    }

    pub fn execute(&self) -> io::Result<ExitStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd.status()
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(' ') {
        format!("'{arg}'")
    } else {
        arg.to_string()
    }
}

/// [`ClasspathRunner`] that spawns `java -cp <classpath> <entry point> <args>`.
#[derive(Debug, Clone, Default)]
pub struct JvmLauncher {
    java: Option<PathBuf>,
    jvm_opts: Vec<String>,
    env: Vec<(String, String)>,
    working_dir: Option<PathBuf>,
}

impl JvmLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `java` instead of the executable found through `JAVA_HOME`/`PATH`.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = Some(java.into());
        self
    }

    pub fn with_jvm_opts<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jvm_opts.extend(opts.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn java_executable(&self) -> PathBuf {
        if let Some(ref java) = self.java {
            return java.clone();
        }

        match std::env::var_os("JAVA_HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home).join("bin").join("java"),
            _ => PathBuf::from("java"),
        }
    }

    /// Builds the command without running it.
    pub fn build_command(
        &self,
        context: &BuildContext,
        entry_point: &str,
        args: &[String],
    ) -> Result<JavaCommand> {
        let classpath = std::env::join_paths(context.classpath()).map_err(Error::launch)?;

        let mut java_args: Vec<OsString> = self.jvm_opts.iter().map(OsString::from).collect();
        java_args.push("-cp".into());
        java_args.push(classpath);
        java_args.push(entry_point.into());
        java_args.extend(args.iter().map(OsString::from));

        let mut command = JavaCommand::new(self.java_executable(), java_args);
        if let Some(ref dir) = self.working_dir {
            command = command.with_working_dir(dir.clone());
        }
        for (key, value) in &self.env {
            command = command.with_env(key.clone(), value.clone());
        }

        Ok(command)
    }
}

impl ClasspathRunner for JvmLauncher {
    fn run_with_classpath(
        &self,
        context: &BuildContext,
        entry_point: &str,
        args: &[String],
    ) -> Result<()> {
        let command = self.build_command(context, entry_point, args)?;
        let shell_cmd = command.to_shell_command();
        info!("Running: {}", shell_cmd);

        let status = command.execute().map_err(|e| Error::Launch {
            message: format!("Failed to execute {}: {e}", command.program.display()),
            source: Some(Box::new(e)),
        })?;

        debug!("{} exited with {}", entry_point, status);
        if status.success() {
            Ok(())
        } else {
            Err(Error::ProcessFailed {
                code: status.code(),
            })
        }
    }
}
