//! Script merging and argument splitting
//!
//! Several scripts are run by generating a single loader file that
//! `load-file`s each of them in order, so `clojure.main` only ever sees one
//! entry point.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

const LOADER_PREFIX: &str = "run";
const LOADER_SUFFIX: &str = ".clj";

/// The line that makes Clojure load and evaluate `path`.
pub fn load_directive(path: &str) -> String {
    format!("(load-file \"{path}\")")
}

/// Returns the entry script for a run, writing the loader to the system temp
/// directory when there is more than one script.
pub fn merge_scripts(script: &str, scripts: Option<&[String]>) -> Result<String> {
    merge_scripts_in(&std::env::temp_dir(), script, scripts)
}

/// Like [`merge_scripts`], with the loader written to `loader_dir`.
///
/// With `scripts` unset, `script` comes back untouched and is never checked
/// against the filesystem, so `@`-prefixed classpath resources work. Once
/// `scripts` is given, every entry must be an existing file. The loader is
/// left on disk after the run.
pub fn merge_scripts_in(
    loader_dir: &Path,
    script: &str,
    scripts: Option<&[String]>,
) -> Result<String> {
    if script.trim().is_empty() {
        return Err(Error::ScriptUndefined);
    }

    let scripts = match scripts {
        None => return Ok(script.to_string()),
        Some([]) => return Err(Error::ScriptsEmpty),
        Some(scripts) => scripts,
    };

    let paths: Vec<&str> = std::iter::once(script)
        .chain(scripts.iter().map(String::as_str))
        .collect();

    for path in &paths {
        if path.trim().is_empty() {
            return Err(Error::BlankScriptEntry);
        }
        if !Path::new(path).exists() {
            return Err(Error::ScriptNotFound {
                path: path.to_string(),
            });
        }
    }

    write_loader(loader_dir, &paths)
}

fn write_loader(loader_dir: &Path, paths: &[&str]) -> Result<String> {
    let mut loader = tempfile::Builder::new()
        .prefix(LOADER_PREFIX)
        .suffix(LOADER_SUFFIX)
        .tempfile_in(loader_dir)
        .map_err(Error::LoaderIo)?;

    for path in paths {
        write!(loader, "{}{}", load_directive(path), LINE_SEPARATOR).map_err(Error::LoaderIo)?;
    }
    loader.flush().map_err(Error::LoaderIo)?;

    let (_, loader_path) = loader.keep().map_err(|e| Error::LoaderIo(e.error))?;
    debug!("Wrote loader for {} scripts to {:?}", paths.len(), loader_path);

    Ok(loader_path.to_string_lossy().into_owned())
}

/// Splits `args` on single spaces. There is no quoting, so consecutive spaces
/// yield empty arguments; trailing empty arguments are dropped.
pub fn split_args(args: Option<&str>) -> Vec<String> {
    let Some(args) = args else {
        return Vec::new();
    };

    let mut parts: Vec<String> = args.split(' ').map(str::to_string).collect();
    if parts.len() > 1 {
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
    }
    parts
}
