use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::freedesktop::errors::*;
use crate::freedesktop::StdResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryType {
    Application,
    Link,
    Directory,
}

impl Default for EntryType {
    fn default() -> Self {
        EntryType::Application
    }
}

impl FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        match s {
            "Application" => Ok(EntryType::Application),
            "Link" => Ok(EntryType::Link),
            "Directory" => Ok(EntryType::Directory),
            "" => Err(ErrorKind::MissingRequiredEntryKey("Type".to_owned()).into()),
            other => Err(ErrorKind::InvalidEntryType(other.to_owned()).into()),
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let s = match *self {
            EntryType::Application => "Application",
            EntryType::Link => "Link",
            EntryType::Directory => "Directory",
        };
        write!(f, "{}", s)
    }
}

/// One parsed `.desktop` file. List fields keep empty segments, so an absent
/// list key reads as `[""]`.
#[derive(Debug, Clone, Default, Builder, Eq, PartialEq)]
#[builder(setter(into))]
pub struct DesktopEntry {
    pub entry_type: EntryType,
    pub name: String,
    pub exec: String,
    #[builder(default = "None")]
    pub url: Option<String>,
    #[builder(default = "false")]
    pub no_display: bool,
    #[builder(default = "false")]
    pub hidden: bool,
    #[builder(default = "false")]
    pub terminal: bool,
    #[builder(default = "false")]
    pub startup_notify: bool,
    #[builder(default = "None")]
    pub version: Option<String>,
    #[builder(default = "None")]
    pub generic_name: Option<String>,
    #[builder(default = "None")]
    pub comment: Option<String>,
    #[builder(default = "None")]
    pub icon: Option<String>,
    #[builder(default = "vec![]")]
    pub only_show_in: Vec<String>,
    #[builder(default = "vec![]")]
    pub not_show_in: Vec<String>,
    #[builder(default = "None")]
    pub try_exec: Option<String>,
    #[builder(default = "None")]
    pub path: Option<PathBuf>,
    #[builder(default = "vec![]")]
    pub actions: Vec<String>,
    #[builder(default = "vec![]")]
    pub mime_type: Vec<String>,
    #[builder(default = "vec![]")]
    pub categories: Vec<String>,
    #[builder(default = "vec![]")]
    pub keywords: Vec<String>,
    #[builder(default = "None")]
    pub startup_wm_class: Option<String>,
    /// Source `.desktop` file.
    pub file: PathBuf,
}

impl DesktopEntry {
    pub fn is_application(&self) -> bool {
        self.entry_type == EntryType::Application
    }

    /// Whether the entry should be listed in `desktop` (an `XDG_CURRENT_DESKTOP`
    /// name). Empty list segments are ignored.
    pub fn is_shown_in(&self, desktop: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|name| name == desktop);
        let has_any = |list: &[String]| list.iter().any(|name| !name.is_empty());
        if has_any(&self.only_show_in) {
            listed(&self.only_show_in)
        } else {
            !listed(&self.not_show_in)
        }
    }
}

impl Display for DesktopEntry {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.comment {
            Some(ref comment) => write!(f, "{} - {}", self.name, comment),
            None => write!(f, "{}", self.name),
        }
    }
}
