//! Fixtures shared by the integration tests under `tests/`.

use std::fs;
use std::io;
use std::path::Path;

/// Writes a Clojure script into `dir` and returns its path as a string.
pub fn write_script(dir: &Path, name: &str, body: &str) -> io::Result<String> {
    let path = dir.join(name);
    fs::write(&path, body)?;
    Ok(path.to_string_lossy().into_owned())
}

/// Writes an executable stand-in for `java` that records its arguments, one
/// per line, to `<dir>/java-args.txt` and exits with `exit_code`.
#[cfg(unix)]
pub fn write_fake_java(dir: &Path, exit_code: i32) -> io::Result<std::path::PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let record = dir.join("java-args.txt");
    let script = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\" >> '{}'; done\npwd > '{}'\nexit {}\n",
        record.display(),
        dir.join("java-cwd.txt").display(),
        exit_code
    );

    let java = dir.join("fake-java");
    fs::write(&java, script)?;
    fs::set_permissions(&java, fs::Permissions::from_mode(0o755))?;
    Ok(java)
}

/// Arguments recorded by the last [`write_fake_java`] run in `dir`.
pub fn recorded_args(dir: &Path) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(dir.join("java-args.txt"))?;
    Ok(contents.lines().map(str::to_string).collect())
}
