use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{init_command, run_command};

#[derive(Parser, Debug)]
#[command(name = "clj-run")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a Clojure script or a main class
    #[command(visible_alias = "r")]
    Run(RunArgs),
    /// Write a starter .clj-run.json
    Init {
        /// Directory to write the config into (defaults to current directory)
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Main script to run, or an @-prefixed classpath resource
    #[arg(long, env = "CLOJURE_SCRIPT")]
    pub script: Option<String>,

    /// Additional scripts loaded after --script
    #[arg(long, num_args = 0..)]
    pub scripts: Option<Vec<String>>,

    /// Fully qualified name of the main class to run
    #[arg(long, env = "CLOJURE_MAIN_CLASS")]
    pub main_class: Option<String>,

    /// Space-delimited arguments passed to the script or main class
    #[arg(long, env = "CLOJURE_ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Source directory to put on the classpath (repeatable)
    #[arg(long = "source-dir")]
    pub source_dirs: Vec<PathBuf>,

    /// Directory holding compiled classes
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Extra classpath element, e.g. a dependency jar (repeatable)
    #[arg(long = "classpath")]
    pub classpath: Vec<PathBuf>,

    /// Option passed to the JVM before the classpath (repeatable)
    #[arg(long = "jvm-opt", allow_hyphen_values = true)]
    pub jvm_opts: Vec<String>,

    /// Environment variable for the launched JVM, as KEY=VALUE (repeatable)
    #[arg(short, long = "env", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Java executable to use
    #[arg(long)]
    pub java: Option<PathBuf>,

    /// Config file to read instead of searching for .clj-run.json
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Project directory that relative paths resolve against
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Print the command without executing it (a loader file for --scripts is
    /// still written to the temp directory and left there)
    #[arg(short, long)]
    pub dry_run: bool,
}

fn parse_env_pair(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run_command(args),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force),
        }
    }
}
