use std::collections::HashMap;
use std::fs;
use std::iter::Peekable;
use std::path::Path;

use peeking_take_while::PeekableExt;

use crate::freedesktop::errors::*;

/// Key (including any `[locale]` suffix) to raw value.
pub type Group = HashMap<String, String>;
/// Group header to group.
pub type Groups = HashMap<String, Group>;

/// How keys are checked while parsing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyCheck {
    /// Any key outside `[A-Za-z0-9-]` (before a `[locale]` suffix) fails
    /// the whole file.
    Strict,
    /// Keys are taken as written, for generic files such as `kdeglobals`.
    Lenient,
}

pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<Groups> {
    parse_config_file_with(path, KeyCheck::Strict)
}

pub fn parse_config_file_with<P: AsRef<Path>>(path: P, key_check: KeyCheck) -> Result<Groups> {
    let path = path.as_ref();
    debug!("Parsing config file '{}'", path.display());
    let src = fs::read_to_string(path)?;
    parse_config_with(&src, key_check)
}

pub fn parse_config(src: &str) -> Result<Groups> {
    parse_config_with(src, KeyCheck::Strict)
}

/// Lines before the first header are ignored, as are lines without `=`.
/// An empty `[]` header closes the current group without opening one.
/// A repeated header continues the earlier group.
pub fn parse_config_with(src: &str, key_check: KeyCheck) -> Result<Groups> {
    let mut groups = Groups::new();
    let mut lines = src.lines().peekable();
    while let Some(header) = find_header(&mut lines) {
        if header.is_empty() {
            continue;
        }
        let group = parse_group(&mut lines, key_check)?;
        groups.entry(header).or_insert_with(Group::new).extend(group);
    }
    Ok(groups)
}

fn find_header<'a, LineIter>(lines: &mut LineIter) -> Option<String>
where
    LineIter: Iterator<Item = &'a str>,
{
    while let Some(line) = lines.next() {
        if let Some(header) = parse_header(line) {
            return Some(header);
        }
    }
    None
}

fn parse_group<'a, LineIter>(lines: &mut Peekable<LineIter>, key_check: KeyCheck) -> Result<Group>
where
    LineIter: Iterator<Item = &'a str>,
{
    let mut group = Group::new();
    for (key, value) in lines
        .peeking_take_while(|line| parse_header(line).is_none())
        .filter_map(|line| split_first('=', line))
    {
        if key_check == KeyCheck::Strict && !is_valid_key(key) {
            return Err(ErrorKind::InvalidKey(key.to_owned()).into());
        }
        group.insert(key.to_owned(), value.to_owned());
    }
    Ok(group)
}

fn parse_header(line: &str) -> Option<String> {
    line.trim()
        .strip_prefix('[')
        .and_then(|header| header.strip_suffix(']'))
        .map(|header| header.trim().to_owned())
}

/// Only the identifier before any `[` is checked; the locale suffix is
/// taken as-is.
fn is_valid_key(key: &str) -> bool {
    let ident = key.split('[').next().unwrap_or_default();
    !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub(crate) fn split_first(delim: char, s: &str) -> Option<(&str, &str)> {
    s.find(delim)
        .map(|i| s.split_at(i))
        .map(|(name, value)| (name.trim(), value[1..value.len()].trim()))
}




#[cfg(test)]
mod split_tests {
    use super::split_first;

    #[test]
    fn split_match() {
        assert_eq!(split_first('b', "abc"), Some(("a", "c")))
    }

    #[test]
    fn no_match() {
        assert_eq!(split_first('-', "abc"), None)
    }
}
