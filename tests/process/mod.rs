//! Process pipe tests. These spawn real POSIX utilities.

#[cfg(unix)]
mod generate_test;

#[cfg(unix)]
use std::path::PathBuf;

/// Write an executable shell script into `dir`.
#[cfg(unix)]
pub fn script(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
