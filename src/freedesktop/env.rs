use std::env;
use std::path::{Path, PathBuf};

use users::os::unix::UserExt;
use users::{get_current_uid, get_user_by_uid};
use xdg::BaseDirectories as XdgDirs;

use crate::freedesktop::errors::*;

const PIXMAPS_DIR: &str = "/usr/share/pixmaps";

/// Ordered search directories and the current locale.
///
/// Computed once, then shared by reference with every lookup. Tests build
/// one through `SearchPathsBuilder` with fake directories.
#[derive(Debug, Clone, Default, Builder, Eq, PartialEq)]
pub struct SearchPaths {
    #[builder(default = "vec![]")]
    config_dirs: Vec<PathBuf>,
    #[builder(default = "vec![]")]
    data_dirs: Vec<PathBuf>,
    #[builder(default = "vec![]")]
    icon_dirs: Vec<PathBuf>,
    #[builder(setter(into), default = "String::new()")]
    locale: String,
    #[builder(setter(into), default = "None")]
    app_name: Option<String>,
}

impl SearchPaths {
    pub fn from_env() -> Result<SearchPaths> {
        let xdg = XdgDirs::new()?;
        let home = home_dir();
        debug!("Using home directory '{}'", home.display());

        let mut config_dirs = vec![xdg.get_config_home()];
        config_dirs.extend(xdg.get_config_dirs());

        let system_data_dirs = xdg.get_data_dirs();
        let icon_dirs = icon_dirs_for(&home, &system_data_dirs);
        let mut data_dirs = vec![xdg.get_data_home()];
        data_dirs.extend(system_data_dirs);

        let locale = env::var("LANG").unwrap_or_default();
        debug!("Found locale '{}' in $LANG", locale);

        Ok(SearchPaths {
            config_dirs,
            data_dirs,
            icon_dirs,
            locale,
            app_name: None,
        })
    }

    pub fn with_app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn config_dirs(&self) -> &[PathBuf] {
        &self.config_dirs
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    pub fn icon_dirs(&self) -> &[PathBuf] {
        &self.icon_dirs
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Name used to namespace per-application config and data lookups.
    pub fn app_name(&self) -> Option<&str> {
        self.app_name
            .as_ref()
            .map(|name| name.as_str())
            .filter(|name| !name.is_empty())
    }
}

fn home_dir() -> PathBuf {
    get_user_by_uid(get_current_uid())
        .map(|user| user.home_dir().to_owned())
        .or_else(|| env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_default()
}

fn icon_dirs_for(home: &Path, system_data_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut icon_dirs = vec![home.join(".icons")];
    icon_dirs.extend(system_data_dirs.iter().map(|dir| dir.join("icons")));
    icon_dirs.push(PathBuf::from(PIXMAPS_DIR));
    icon_dirs
}
