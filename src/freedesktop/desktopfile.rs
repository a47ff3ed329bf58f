use std::fs::File;
use std::io::{BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

use crate::freedesktop::entry::*;
use crate::freedesktop::errors::*;
use crate::freedesktop::locale::Locale;
use crate::freedesktop::parse::{parse_config, Group};

const DESKTOP_ENTRY_GROUP: &str = "Desktop Entry";

impl DesktopEntry {
    pub fn parse_file<P: AsRef<Path>>(path: P, locale: &str) -> Result<DesktopEntry> {
        let path = path.as_ref();
        debug!("Parsing desktop file '{}'", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file), path, locale)
    }

    pub fn read<R: Read, P: AsRef<Path>>(input: R, file: P, locale: &str) -> Result<DesktopEntry> {
        let input = read_whole(input)?;
        let mut groups = parse_config(&input)?;
        let group = groups.remove(DESKTOP_ENTRY_GROUP).unwrap_or_default();
        Self::from_group(&group, file.as_ref(), locale)
    }

    /// Validates in a fixed order: Type, Name, Exec, URL, the boolean flags,
    /// then OnlyShowIn/NotShowIn.
    pub fn from_group(group: &Group, file: &Path, locale: &str) -> Result<DesktopEntry> {
        let locale = locale.parse::<Locale>().ok();
        let literal = |key: &str| group.get(key).map(|value| value.as_str()).unwrap_or("");
        let localized = |key: &str| {
            locale
                .as_ref()
                .map(|locale| locale.resolve(group, key))
                .unwrap_or_default()
        };

        let entry_type: EntryType = literal("Type").parse()?;

        let name = localized("Name");
        if name.is_empty() {
            bail!(ErrorKind::MissingRequiredEntryKey("Name".to_owned()));
        }

        let exec = literal("Exec");
        if exec.is_empty() {
            bail!(ErrorKind::MissingRequiredEntryKey("Exec".to_owned()));
        }

        let url = literal("URL");
        if url.is_empty() && entry_type == EntryType::Link {
            bail!(ErrorKind::MissingRequiredEntryKey("URL".to_owned()));
        }

        let no_display = parse_bool(group, "NoDisplay")?;
        let hidden = parse_bool(group, "Hidden")?;
        let terminal = parse_bool(group, "Terminal")?;
        let startup_notify = parse_bool(group, "StartupNotify")?;

        if !literal("OnlyShowIn").is_empty() && !literal("NotShowIn").is_empty() {
            bail!(ErrorKind::ConflictingShowIn);
        }

        let mut builder = DesktopEntryBuilder::default();
        builder
            .entry_type(entry_type)
            .name(name)
            .exec(exec)
            .url(non_empty(url))
            .no_display(no_display)
            .hidden(hidden)
            .terminal(terminal)
            .startup_notify(startup_notify)
            .version(non_empty(literal("Version")))
            .generic_name(non_empty(&localized("GenericName")))
            .comment(non_empty(&localized("Comment")))
            .icon(non_empty(&localized("Icon")))
            .only_show_in(split_multi_value(literal("OnlyShowIn")))
            .not_show_in(split_multi_value(literal("NotShowIn")))
            .try_exec(non_empty(literal("TryExec")))
            .path(non_empty(literal("Path")).map(PathBuf::from))
            .actions(split_multi_value(literal("Actions")))
            .mime_type(split_multi_value(literal("MimeType")))
            .categories(split_multi_value(literal("Categories")))
            .keywords(split_multi_value(&localized("Keywords")))
            .startup_wm_class(non_empty(literal("StartupWMClass")))
            .file(file);

        builder.build().map_err(|s| s.into())
    }
}

fn read_whole<R: Read>(mut reader: R) -> Result<String> {
    let mut string = String::new();
    reader.read_to_string(&mut string)?;
    Ok(string)
}

/// An absent or empty key is `false`; anything but `true`/`false` is an error.
fn parse_bool(group: &Group, key: &str) -> Result<bool> {
    match group.get(key).map(|value| value.as_str()) {
        None | Some("") => Ok(false),
        Some(value) => value
            .parse::<bool>()
            .chain_err(|| ErrorKind::InvalidBooleanValue(key.to_owned(), value.to_owned())),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Splits on every `;` not directly preceded by `\`. Escaped separators stay
/// in the value verbatim, backslash included. Empty input gives `[""]`.
pub fn split_multi_value(value: &str) -> Vec<String> {
    let mut values = vec![];
    let mut current = String::new();
    let mut escaped = false;
    for c in value.chars() {
        if c == ';' && !escaped {
            values.push(mem::replace(&mut current, String::new()));
        } else {
            current.push(c);
        }
        escaped = c == '\\';
    }
    values.push(current);
    values
}
