use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::freedesktop::entry::DesktopEntry;
use crate::freedesktop::errors::*;

const OPEN_CMD: &str = "xdg-open";

/// Opens `item` (a file, directory or URL) with the user's default handler.
pub fn xdg_open<S: AsRef<OsStr>>(item: S) -> Result<()> {
    let item = item.as_ref();
    info!("Opening '{}'...", item.to_string_lossy());
    let status = init_cmd(OPEN_CMD, item)
        .status()
        .chain_err(|| format!("Error spawning '{}'", OPEN_CMD))?;
    if status.success() {
        Ok(())
    } else {
        Err(ErrorKind::CommandFailed(OPEN_CMD.to_owned(), status.code()).into())
    }
}

fn init_cmd(program: &str, item: &OsStr) -> Command {
    debug!("spawning {} {:?}", program, item);
    let mut cmd = Command::new(program);
    cmd.arg(item)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .stdin(Stdio::null());
    cmd
}

impl DesktopEntry {
    /// False when `TryExec` names a program that is missing or not
    /// executable. Entries without `TryExec` are assumed installed.
    pub fn try_exec_available(&self) -> bool {
        self.try_exec
            .as_ref()
            .map(|try_exec| can_exec(Path::new(try_exec), env::var_os("PATH")))
            .unwrap_or(true)
    }
}

fn can_exec(try_exec: &Path, env_path: Option<OsString>) -> bool {
    if try_exec.is_absolute() {
        is_executable(try_exec)
    } else if let Some(paths) = env_path {
        env::split_paths(&paths)
            .filter(|path| path.is_absolute())
            .map(|path| path.join(try_exec))
            .find(|path| {
                debug!("Looking for '{}'", path.display());
                path.exists()
            })
            .map(|path| is_executable(&path))
            .unwrap_or(false)
    } else {
        false
    }
}

fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => {
            let executable = metadata.is_file() && metadata.permissions().mode() & 0o111 != 0;
            debug!("Path '{}' executable: {}", path.display(), executable);
            executable
        }
        Err(err) => {
            debug!("Could not stat '{}': {}", path.display(), err);
            false
        }
    }
}

#[cfg(test)]
mod can_exec_tests {
    use super::*;
    use crate::freedesktop::entry::{DesktopEntryBuilder, EntryType};
    use spectral::prelude::*;
    use std::fs::{set_permissions, File};
    use tempdir::TempDir;

    fn create(tmp_dir: &TempDir, name: &str, mode: u32) -> std::path::PathBuf {
        let path = tmp_dir.path().join(name);
        let _file = File::create(&path).unwrap();
        set_permissions(&path, PermissionsExt::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_nonexistant() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        assert_that(&can_exec(
            Path::new("test_nonexistant"),
            Some(tmp_dir.path().as_os_str().to_owned()),
        ))
        .is_false();
    }

    #[test]
    fn test_relative() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        create(&tmp_dir, "test_relative", 0o755);
        assert_that(&can_exec(
            Path::new("test_relative"),
            Some(tmp_dir.path().as_os_str().to_owned()),
        ))
        .is_true();
    }

    #[test]
    fn test_relative_not_exec() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        create(&tmp_dir, "test_relative_not_exec", 0o644);
        assert_that(&can_exec(
            Path::new("test_relative_not_exec"),
            Some(tmp_dir.path().as_os_str().to_owned()),
        ))
        .is_false();
    }

    #[test]
    fn test_absolute() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        let path = create(&tmp_dir, "test_absolute", 0o755);
        assert_that(&can_exec(&path, None)).is_true();
    }

    #[test]
    fn test_directory_not_exec() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        assert_that(&can_exec(tmp_dir.path(), None)).is_false();
    }

    #[test]
    fn entry_without_try_exec() {
        let entry = DesktopEntryBuilder::default()
            .entry_type(EntryType::Application)
            .name("App")
            .exec("app")
            .file("/app.desktop")
            .build()
            .unwrap();
        assert_that(&entry.try_exec_available()).is_true();
    }

    #[test]
    fn entry_with_absolute_try_exec() {
        let tmp_dir = TempDir::new("can_exec").unwrap();
        let path = create(&tmp_dir, "app", 0o755);
        let mut entry = DesktopEntryBuilder::default()
            .entry_type(EntryType::Application)
            .name("App")
            .exec("app")
            .file("/app.desktop")
            .try_exec(Some(path.to_string_lossy().into_owned()))
            .build()
            .unwrap();
        assert_that(&entry.try_exec_available()).is_true();

        entry.try_exec = Some(tmp_dir.path().join("missing").to_string_lossy().into_owned());
        assert_that(&entry.try_exec_available()).is_false();
    }
}
