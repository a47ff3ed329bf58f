use std::collections::HashSet;
use std::env;
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::freedesktop::env::SearchPaths;
use crate::freedesktop::errors::*;

const USER_DIRS_FILE: &str = "user-dirs.dirs";

/// First match for `file` across the config search path.
pub fn find_config<P: AsRef<Path>>(paths: &SearchPaths, file: P) -> Option<PathBuf> {
    find(paths.config_dirs(), file.as_ref())
}

/// First match for `file` across the data search path.
pub fn find_data<P: AsRef<Path>>(paths: &SearchPaths, file: P) -> Option<PathBuf> {
    find(paths.data_dirs(), file.as_ref())
}

/// Every file matching `pattern` under each data dir, in search order.
/// Files that resolve to the same absolute path are listed once.
pub fn collect_data(paths: &SearchPaths, pattern: &str) -> Result<Vec<PathBuf>> {
    collect(paths.data_dirs(), pattern)
}

pub fn find_app_config<P: AsRef<Path>>(paths: &SearchPaths, file: P) -> Option<PathBuf> {
    app_path(paths, file.as_ref()).and_then(|file| find_config(paths, file))
}

pub fn find_app_data<P: AsRef<Path>>(paths: &SearchPaths, file: P) -> Option<PathBuf> {
    app_path(paths, file.as_ref()).and_then(|file| find_data(paths, file))
}

pub fn collect_app_data(paths: &SearchPaths, pattern: &str) -> Result<Vec<PathBuf>> {
    match app_path(paths, Path::new(pattern)) {
        Some(pattern) => collect_data(paths, &pattern.to_string_lossy()),
        None => Ok(vec![]),
    }
}

fn app_path(paths: &SearchPaths, file: &Path) -> Option<PathBuf> {
    match paths.app_name() {
        Some(app_name) => Some(Path::new(app_name).join(file)),
        None => {
            warn!("app name not set");
            None
        }
    }
}

fn find(dirs: &[PathBuf], file: &Path) -> Option<PathBuf> {
    dirs.iter().map(|dir| dir.join(file)).find(|path| {
        debug!("Looking for '{}'", path.display());
        path.exists()
    })
}

fn collect(dirs: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut collection = vec![];
    for dir in dirs {
        let dir_pattern = Pattern::escape(&dir.to_string_lossy());
        let full_pattern = format!("{}/{}", dir_pattern.trim_end_matches('/'), pattern);
        for entry in glob::glob(&full_pattern)? {
            match entry {
                Ok(path) => {
                    let absolute = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                    if seen.insert(absolute) {
                        debug!("Found data file '{}'", path.display());
                        collection.push(path);
                    }
                }
                Err(err) => debug!("Skipping unreadable path: {}", err),
            }
        }
    }
    Ok(collection)
}

/// Absolute path of a named user directory, e.g. "music" for
/// `XDG_MUSIC_DIR`. `None` when `user-dirs.dirs` does not list it.
pub fn user_dir(paths: &SearchPaths, name: &str) -> Result<Option<PathBuf>> {
    let user_dirs = find_config(paths, USER_DIRS_FILE).ok_or(ErrorKind::UserDirsNotFound)?;
    debug!("Reading user dirs from '{}'", user_dirs.display());
    let src = fs::read_to_string(&user_dirs)?;
    Ok(lookup_user_dir(&src, name, |var| env::var(var).ok()))
}

fn lookup_user_dir<F>(src: &str, name: &str, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let key = format!("XDG_{}_DIR", name.to_uppercase());
    src.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let mut split = line.split('=');
            match (split.next(), split.next(), split.next()) {
                (Some(name), Some(value), None) => Some((name, value)),
                _ => None,
            }
        })
        .find(|&(name, _)| name == key)
        .map(|(_, value)| PathBuf::from(expand_env(value.trim_matches('"'), &lookup)))
}

/// Replaces `$VAR` and `${VAR}` with their values, or nothing when unset.
fn expand_env<F>(s: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            expanded.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let var = take_var_name(&mut chars);
        if braced && chars.peek() == Some(&'}') {
            chars.next();
        } else if braced {
            expanded.push_str("${");
            expanded.push_str(&var);
            continue;
        }
        if var.is_empty() {
            expanded.push('$');
            if braced {
                expanded.push_str("{}");
            }
            continue;
        }
        expanded.push_str(&lookup(&var).unwrap_or_default());
    }
    expanded
}

fn take_var_name<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

#[cfg(test)]
mod find_tests {
    use super::*;
    use crate::freedesktop::env::SearchPathsBuilder;
    use spectral::prelude::*;
    use std::fs::{create_dir_all, File};
    use tempdir::TempDir;

    fn touch(path: &Path) {
        create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn paths(tmp_dir: &TempDir) -> SearchPaths {
        SearchPathsBuilder::default()
            .config_dirs(vec![tmp_dir.path().join("home"), tmp_dir.path().join("etc")])
            .data_dirs(vec![tmp_dir.path().join("local"), tmp_dir.path().join("usr")])
            .build()
            .unwrap()
    }

    #[test]
    fn first_match_wins() {
        let tmp_dir = TempDir::new("find").unwrap();
        touch(&tmp_dir.path().join("etc/app/app.conf"));
        touch(&tmp_dir.path().join("home/app/app.conf"));
        let paths = paths(&tmp_dir);
        assert_that(&find_config(&paths, "app/app.conf"))
            .is_some()
            .is_equal_to(tmp_dir.path().join("home/app/app.conf"));
    }

    #[test]
    fn not_found() {
        let tmp_dir = TempDir::new("find").unwrap();
        assert_that(&find_data(&paths(&tmp_dir), "missing")).is_none();
    }

    #[test]
    fn app_scoped() {
        let tmp_dir = TempDir::new("find").unwrap();
        touch(&tmp_dir.path().join("usr/editor/state"));
        let paths = paths(&tmp_dir);
        assert_that(&find_app_data(&paths, "state")).is_none();
        assert_that(&collect_app_data(&paths, "*"))
            .is_ok()
            .is_equal_to(Vec::<PathBuf>::new());

        let paths = paths.with_app_name("editor");
        assert_that(&find_app_data(&paths, "state"))
            .is_some()
            .is_equal_to(tmp_dir.path().join("usr/editor/state"));
        assert_that(&find_app_config(&paths, "state")).is_none();
        assert_that(&collect_app_data(&paths, "*"))
            .is_ok()
            .is_equal_to(vec![tmp_dir.path().join("usr/editor/state")]);
    }

    #[test]
    fn collect_in_search_order() {
        let tmp_dir = TempDir::new("collect").unwrap();
        touch(&tmp_dir.path().join("local/applications/b.desktop"));
        touch(&tmp_dir.path().join("usr/applications/a.desktop"));
        touch(&tmp_dir.path().join("usr/applications/a.txt"));
        let collected = collect_data(&paths(&tmp_dir), "applications/*.desktop").unwrap();
        assert_eq!(
            collected,
            vec![
                tmp_dir.path().join("local/applications/b.desktop"),
                tmp_dir.path().join("usr/applications/a.desktop"),
            ]
        );
    }

    #[test]
    fn collect_dedups_same_absolute_path() {
        use std::os::unix::fs::symlink;

        let tmp_dir = TempDir::new("collect").unwrap();
        touch(&tmp_dir.path().join("usr/applications/app.desktop"));
        symlink(tmp_dir.path().join("usr"), tmp_dir.path().join("local")).unwrap();
        let collected = collect_data(&paths(&tmp_dir), "applications/*.desktop").unwrap();
        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn collect_bad_pattern() {
        let tmp_dir = TempDir::new("collect").unwrap();
        assert_that(&collect_data(&paths(&tmp_dir), "[")).is_err();
    }
}


#[cfg(test)]
mod expand_env_tests {
    use super::expand_env;

    fn lookup(var: &str) -> Option<String> {
        match var {
            "HOME" => Some("/home/user".to_owned()),
            "X_Y" => Some("xy".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn plain_and_braced() {
        assert_eq!(expand_env("$HOME/a", lookup), "/home/user/a");
        assert_eq!(expand_env("${X_Y}z", lookup), "xyz");
    }

    #[test]
    fn unset_is_empty() {
        assert_eq!(expand_env("$UNSET/a", lookup), "/a");
    }

    #[test]
    fn lone_dollar_kept() {
        assert_eq!(expand_env("cost $ 5", lookup), "cost $ 5");
        assert_eq!(expand_env("end$", lookup), "end$");
    }
}
