use anyhow::{Context, Result};
use clj_run_core::{Error, JvmLauncher, RunConfig, ScriptRunner, Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::RunArgs;

pub fn run_command(args: RunArgs) -> Result<()> {
    // script paths are checked relative to the process directory
    if let Some(ref cwd) = args.cwd {
        std::env::set_current_dir(cwd)
            .with_context(|| format!("Failed to change directory to {}", cwd.display()))?;
    }
    let base_dir = std::env::current_dir().context("Failed to get current directory")?;

    let file_settings = load_settings(args.config.as_deref(), &base_dir)?;
    let dry_run = args.dry_run;
    let settings = settings_from_args(args).or(file_settings);
    debug!("Resolved settings: {:?}", settings);

    let context = settings.build_context(&base_dir);
    let launcher = launcher_for(&settings, &base_dir);
    let runner = ScriptRunner::new(context, launcher);

    if dry_run {
        let invocation = runner.plan(&settings.run)?;
        let command = runner.runner().build_command(
            runner.context(),
            &invocation.entry_point,
            &invocation.args,
        )?;

        println!("{}", command.to_shell_command());
        if let Some(ref dir) = command.working_dir {
            println!("Working directory: {}", dir.display());
        }
        if !command.env.is_empty() {
            println!("Environment variables:");
            for (key, value) in &command.env {
                println!("  {}={}", key, value);
            }
        }
        return Ok(());
    }

    match runner.execute(&settings.run) {
        Ok(()) => Ok(()),
        Err(Error::ProcessFailed { code }) => {
            info!("Process failed with code {:?}", code);
            std::process::exit(code.unwrap_or(1));
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads `--config` if given, otherwise the nearest `.clj-run.json` above `base_dir`.
fn load_settings(config: Option<&Path>, base_dir: &Path) -> Result<Settings> {
    let path = match config {
        Some(path) => Some(base_dir.join(path)),
        None => Settings::find_config_file(base_dir),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            Settings::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(Settings::default()),
    }
}

fn settings_from_args(args: RunArgs) -> Settings {
    Settings {
        run: RunConfig {
            script: args.script,
            scripts: args.scripts,
            main_class: args.main_class,
            args: args.args,
        },
        source_directories: (!args.source_dirs.is_empty()).then_some(args.source_dirs),
        output_directory: args.output_dir,
        classpath_elements: args.classpath,
        java: args.java,
        jvm_opts: args.jvm_opts,
        env: args.env.into_iter().collect(),
    }
}

fn launcher_for(settings: &Settings, base_dir: &Path) -> JvmLauncher {
    let mut launcher = JvmLauncher::new()
        .with_working_dir(PathBuf::from(base_dir))
        .with_jvm_opts(settings.jvm_opts.iter().cloned());

    if let Some(ref java) = settings.java {
        launcher = launcher.with_java(java.clone());
    }
    for (key, value) in &settings.env {
        launcher = launcher.with_env(key.clone(), value.clone());
    }

    launcher
}
