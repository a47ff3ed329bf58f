use std::path::PathBuf;

pub mod desktopfile;
pub mod entry;
pub mod env;
pub mod errors;
pub mod files;
pub mod icon;
pub mod launch;
pub mod locale;
pub mod parse;

use self::entry::*;
use self::env::SearchPaths;
use self::errors::*;
use self::files::collect_data;

pub use std::result::Result as StdResult;

const DESKTOP_FILES_PATTERN: &str = "applications/*.desktop";

/// A desktop file that could not be parsed.
#[derive(Debug)]
pub struct Skipped {
    pub file: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default, Clone)]
pub struct DesktopFiles {
    desktop_files: Vec<PathBuf>,
}

impl DesktopFiles {
    pub fn new(desktop_files: Vec<PathBuf>) -> Self {
        DesktopFiles { desktop_files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.desktop_files
    }

    /// Parses every file, dropping the ones that fail.
    pub fn parse_files(&self, locale: &str) -> Vec<DesktopEntry> {
        self.parse(locale, |_| ())
    }

    /// Like `parse_files`, also recording why each dropped file failed.
    pub fn parse_with_diagnostics(
        &self,
        locale: &str,
        skipped: &mut Vec<Skipped>,
    ) -> Vec<DesktopEntry> {
        self.parse(locale, |skip| skipped.push(skip))
    }

    fn parse<F>(&self, locale: &str, mut on_skip: F) -> Vec<DesktopEntry>
    where
        F: FnMut(Skipped),
    {
        self.desktop_files
            .iter()
            .filter_map(|file| match DesktopEntry::parse_file(file, locale) {
                Ok(e) => {
                    debug!("Found desktop entry '{}'", e.name);
                    Some(e)
                }
                Err(err) => {
                    warn!("Error reading desktop file '{}': {}", file.display(), err);
                    on_skip(Skipped {
                        file: file.clone(),
                        error: err,
                    });
                    None
                }
            })
            .collect()
    }
}

pub fn find_all_desktop_files(paths: &SearchPaths) -> Result<DesktopFiles> {
    let desktop_files = collect_data(paths, DESKTOP_FILES_PATTERN)?;
    Ok(DesktopFiles::new(desktop_files))
}

/// Every parseable desktop entry on the data path matching `predicate`.
pub fn all_desktop_entries<P>(paths: &SearchPaths, predicate: P) -> Vec<DesktopEntry>
where
    P: Fn(&DesktopEntry) -> bool,
{
    match find_all_desktop_files(paths) {
        Ok(desktop_files) => desktop_files
            .parse_files(paths.locale())
            .into_iter()
            .filter(|entry| predicate(entry))
            .collect(),
        Err(err) => {
            warn!("Error finding desktop files: {}", err);
            vec![]
        }
    }
}

/// `all_desktop_entries` restricted to `Type=Application`.
pub fn installed_applications<P>(paths: &SearchPaths, predicate: P) -> Vec<DesktopEntry>
where
    P: Fn(&DesktopEntry) -> bool,
{
    all_desktop_entries(paths, |entry| entry.is_application() && predicate(entry))
}
