use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::freedesktop::env::SearchPaths;
use crate::freedesktop::files::find_config;
use crate::freedesktop::parse::{parse_config_file_with, KeyCheck};

/// In priority order.
pub const ICON_EXTENSIONS: [&str; 3] = [".png", ".svg", ".xpm"];
pub const FALLBACK_THEME: &str = "hicolor";
pub const DEFAULT_ICON_SIZE: &str = "48x48";

/// Source of a theme's inherited themes.
pub trait ThemeParents {
    /// Themes `theme` inherits from, nearest first.
    fn parents(&self, theme: &str) -> Vec<String>;
}

/// Themes are searched on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInheritance;

impl ThemeParents for NoInheritance {
    fn parents(&self, _theme: &str) -> Vec<String> {
        vec![]
    }
}

/// Finds icon files by name: active theme, then `hicolor`, then the icon
/// base dirs themselves.
#[derive(Debug)]
pub struct IconResolver<'a, Parents = NoInheritance> {
    paths: &'a SearchPaths,
    theme: Option<String>,
    parents: Parents,
}

impl<'a> IconResolver<'a> {
    pub fn new(paths: &'a SearchPaths, theme: Option<String>) -> Self {
        IconResolver {
            paths,
            theme: theme.filter(|theme| !theme.is_empty()),
            parents: NoInheritance,
        }
    }

    /// Uses the icon theme configured for the current desktop session.
    pub fn from_session(paths: &'a SearchPaths) -> Self {
        Self::new(paths, session_icon_theme(paths))
    }
}

impl<'a, Parents: ThemeParents> IconResolver<'a, Parents> {
    pub fn with_parents<P: ThemeParents>(self, parents: P) -> IconResolver<'a, P> {
        IconResolver {
            paths: self.paths,
            theme: self.theme,
            parents,
        }
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_ref().map(|theme| theme.as_str())
    }

    pub fn app_icon(&self, icon: &str) -> Option<PathBuf> {
        self.resolve_icon(icon, DEFAULT_ICON_SIZE)
    }

    /// `size` is a size directory name such as "48x48".
    pub fn resolve_icon(&self, icon: &str, size: &str) -> Option<PathBuf> {
        self.theme
            .as_ref()
            .and_then(|theme| self.find_icon_helper(icon, size, theme))
            .or_else(|| self.find_icon_helper(icon, size, FALLBACK_THEME))
            .or_else(|| self.lookup_fallback_icon(icon))
    }

    fn find_icon_helper(&self, icon: &str, size: &str, theme: &str) -> Option<PathBuf> {
        self.lookup_icon(icon, size, theme).or_else(|| {
            self.parents
                .parents(theme)
                .iter()
                .filter_map(|parent| self.lookup_icon(icon, size, parent))
                .next()
        })
    }

    /// Searches `<icon dir>/<theme>/<size>/<category>/<icon><ext>`, with
    /// categories in name order.
    pub fn lookup_icon(&self, icon: &str, size: &str, theme: &str) -> Option<PathBuf> {
        let theme_dirs = self
            .paths
            .icon_dirs()
            .iter()
            .map(|dir| dir.join(theme))
            .filter(|theme_dir| theme_dir.is_dir());

        for theme_dir in theme_dirs {
            let size_dir = theme_dir.join(size);
            let mut categories: Vec<PathBuf> = match fs::read_dir(&size_dir) {
                Ok(entries) => entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .collect(),
                Err(err) => {
                    debug!("Skipping '{}': {}", size_dir.display(), err);
                    continue;
                }
            };
            categories.sort();

            if let Some(file) = categories
                .iter()
                .filter_map(|category| find_with_extension(category, icon))
                .next()
            {
                debug!("Found icon '{}' in theme '{}'", file.display(), theme);
                return Some(file);
            }
        }
        None
    }

    /// Searches `<icon dir>/<icon><ext>` without any theme structure.
    pub fn lookup_fallback_icon(&self, icon: &str) -> Option<PathBuf> {
        self.paths
            .icon_dirs()
            .iter()
            .filter_map(|dir| find_with_extension(dir, icon))
            .next()
    }
}

fn find_with_extension(dir: &Path, icon: &str) -> Option<PathBuf> {
    ICON_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}{}", icon, ext)))
        .find(|file| file.exists())
}

/// The icon theme configured for `$DESKTOP_SESSION`, if it can be found.
pub fn session_icon_theme(paths: &SearchPaths) -> Option<String> {
    let session = env::var("DESKTOP_SESSION").unwrap_or_default();
    debug!("Looking up icon theme for session '{}'", session);
    icon_theme_for_session(&session, paths)
}

fn icon_theme_for_session(session: &str, paths: &SearchPaths) -> Option<String> {
    let theme = match session {
        "gnome" => gnome_icon_theme(),
        "kde" | "plasma" => kde_icon_theme(paths),
        _ => None,
    };
    theme.filter(|theme| !theme.is_empty())
}

fn gnome_icon_theme() -> Option<String> {
    let output = Command::new("gsettings")
        .args(&["get", "org.gnome.desktop.interface", "icon-theme"])
        .output();
    match output {
        Ok(ref output) if output.status.success() => Some(
            String::from_utf8_lossy(&output.stdout)
                .trim_matches(|c: char| c == '\'' || c == ' ' || c == '\n')
                .to_owned(),
        ),
        Ok(output) => {
            debug!("gsettings exited with {}", output.status);
            None
        }
        Err(err) => {
            debug!("Could not run gsettings: {}", err);
            None
        }
    }
}

fn kde_icon_theme(paths: &SearchPaths) -> Option<String> {
    let kdeglobals = find_config(paths, "kdeglobals")?;
    match parse_config_file_with(&kdeglobals, KeyCheck::Lenient) {
        Ok(groups) => groups
            .get("Icons")
            .and_then(|group| group.get("Theme"))
            .cloned(),
        Err(err) => {
            warn!("Error reading '{}': {}", kdeglobals.display(), err);
            None
        }
    }
}
