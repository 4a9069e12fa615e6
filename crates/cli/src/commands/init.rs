use anyhow::{Context, Result};
use clj_run_core::{Settings, config::CONFIG_FILE_NAME};
use std::{env, path::Path, path::PathBuf};
use tracing::info;

pub fn init_command(cwd: Option<&Path>, force: bool) -> Result<()> {
    let project_root = match cwd {
        Some(cwd) => PathBuf::from(cwd),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    Settings::template()
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    info!("Created config: {}", config_path.display());
    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Next steps:");
    println!("   Point 'script' at your entry script, or replace it with 'mainClass'");
    println!("   Add dependency jars to 'classpathElements'");

    Ok(())
}
