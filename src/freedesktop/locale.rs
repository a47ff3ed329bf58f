use std::collections::HashMap;
use std::str::FromStr;

use crate::freedesktop::errors::*;
use crate::freedesktop::parse::Group;
use crate::freedesktop::StdResult;

/// `lang[_COUNTRY][.ENCODING][@MODIFIER]`
#[derive(Debug, Default, Eq, PartialEq, Hash, Clone)]
pub struct Locale {
    lang: String,
    country: Option<String>,
    encoding: Option<String>,
    modifier: Option<String>,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        let s = s.trim();

        let (modifier, len) = find_after(s, '@');
        let (encoding, len) = find_after(&s[0..len], '.');
        let (country, len) = find_after(&s[0..len], '_');
        let lang = filter_empty(&s[0..len])
            .ok_or_else::<Self::Err, _>(|| ErrorKind::InvalidLocale(s.to_owned()).into())?;

        Ok(Locale {
            lang: lang.to_string(),
            country: country.map(|s| s.to_string()),
            encoding: encoding.map(|s| s.to_string()),
            modifier: modifier.map(|s| s.to_string()),
        })
    }
}

fn find_after(s: &str, after_pat: char) -> (Option<&str>, usize) {
    let pos = s.rfind(after_pat);
    let m = pos.map(|pos| s[pos + 1..s.len()].trim());
    (m.and_then(filter_empty), pos.unwrap_or_else(|| s.len()))
}

fn filter_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Locale-qualified key variants, most specific first.
#[derive(Debug, PartialEq, PartialOrd, Ord, Eq, Clone, Copy)]
pub enum MatchLevel {
    LangCountryModifier,
    LangCountry,
    LangModifier,
    Lang,
}

const MATCH_ORDER: [MatchLevel; 4] = [
    MatchLevel::LangCountryModifier,
    MatchLevel::LangCountry,
    MatchLevel::LangModifier,
    MatchLevel::Lang,
];

impl Locale {
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_ref().map(|s| s.as_str())
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_ref().map(|s| s.as_str())
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_ref().map(|s| s.as_str())
    }

    /// The bracket suffix for `level`, or `None` when this locale lacks the
    /// parts that level needs.
    pub fn tag(&self, level: MatchLevel) -> Option<String> {
        use self::MatchLevel::*;
        match (level, &self.country, &self.modifier) {
            (LangCountryModifier, &Some(ref country), &Some(ref modifier)) => {
                Some(format!("{}_{}@{}", self.lang, country, modifier))
            }
            (LangCountry, &Some(ref country), _) => Some(format!("{}_{}", self.lang, country)),
            (LangModifier, _, &Some(ref modifier)) => Some(format!("{}@{}", self.lang, modifier)),
            (Lang, _, _) => Some(self.lang.clone()),
            _ => None,
        }
    }

    /// Best value for `property` in `group`, falling back to the unsuffixed
    /// key. Empty when nothing matches.
    pub fn resolve(&self, group: &Group, property: &str) -> String {
        MATCH_ORDER
            .iter()
            .filter_map(|level| self.tag(*level))
            .map(|tag| format!("{}[{}]", property, tag))
            .filter_map(|key| group.get(&key))
            .next()
            .or_else(|| group.get(property))
            .cloned()
            .unwrap_or_default()
    }
}

/// Resolves `property` against the raw `locale` string.
///
/// A locale without a language yields an empty string, without consulting
/// the unsuffixed key.
pub fn localized_value(group: &Group, property: &str, locale: &str) -> String {
    match locale.parse::<Locale>() {
        Ok(locale) => locale.resolve(group, property),
        Err(err) => {
            debug!("Not resolving '{}': {}", property, err);
            String::new()
        }
    }
}

/// Every variant of `property` keyed by its locale tag; the unsuffixed value
/// is keyed by the empty string.
pub fn localized_variants(group: &Group, property: &str) -> HashMap<String, String> {
    group
        .iter()
        .filter_map(|(key, value)| {
            if key == property {
                return Some((String::new(), value.clone()));
            }
            key.strip_prefix(property)
                .and_then(|rest| rest.strip_prefix('['))
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(filter_empty)
                .map(|tag| (tag.to_owned(), value.clone()))
        })
        .collect()
}


#[cfg(test)]
mod tag_tests {
    use super::*;

    #[test]
    fn tags_for_full_locale() {
        let locale: Locale = "sr_YU.UTF-8@Latn".parse().unwrap();
        let tags: Vec<_> = MATCH_ORDER
            .iter()
            .filter_map(|level| locale.tag(*level))
            .collect();
        assert_eq!(tags, vec!["sr_YU@Latn", "sr_YU", "sr@Latn", "sr"]);
    }

    #[test]
    fn tags_skip_missing_parts() {
        let locale: Locale = "en_US.UTF-8".parse().unwrap();
        assert_eq!(locale.tag(MatchLevel::LangCountryModifier), None);
        assert_eq!(locale.tag(MatchLevel::LangModifier), None);
        assert_eq!(locale.tag(MatchLevel::LangCountry), Some("en_US".to_owned()));
    }
}

#[cfg(test)]
mod resolve_tests {
    use super::*;

    fn group() -> Group {
        hashmap! {
            "Name".to_owned() => "default".to_owned(),
            "Name[en]".to_owned() => "en".to_owned(),
            "Name[en_US]".to_owned() => "en_US".to_owned(),
            "Name[sr@Latn]".to_owned() => "sr@Latn".to_owned(),
            "Name[sr_YU]".to_owned() => "sr_YU".to_owned(),
            "Name[sr_YU@Latn]".to_owned() => "sr_YU@Latn".to_owned(),
        }
    }

    #[test]
    fn prefers_country() {
        assert_eq!(localized_value(&group(), "Name", "en_US.UTF-8"), "en_US");
    }

    #[test]
    fn falls_back_to_lang() {
        let mut group = group();
        group.remove("Name[en_US]");
        assert_eq!(localized_value(&group, "Name", "en_US.UTF-8"), "en");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(localized_value(&group(), "Name", "de_DE.UTF-8"), "default");
    }

    #[test]
    fn country_and_modifier_first() {
        assert_eq!(localized_value(&group(), "Name", "sr_YU.UTF-8@Latn"), "sr_YU@Latn");
    }

    #[test]
    fn country_before_modifier() {
        let mut group = group();
        group.remove("Name[sr_YU@Latn]");
        assert_eq!(localized_value(&group, "Name", "sr_YU@Latn"), "sr_YU");
        assert_eq!(localized_value(&group, "Name", "sr@Latn"), "sr@Latn");
    }

    #[test]
    fn empty_locale_skips_default() {
        assert_eq!(localized_value(&group(), "Name", ""), "");
    }

    #[test]
    fn missing_property() {
        assert_eq!(localized_value(&group(), "Comment", "en_US"), "");
    }

    #[test]
    fn variants() {
        let mut group = group();
        group.insert("Names[fr]".to_owned(), "other".to_owned());
        group.insert("Name[]".to_owned(), "empty tag".to_owned());
        assert_eq!(
            localized_variants(&group, "Name"),
            hashmap! {
                "".to_owned() => "default".to_owned(),
                "en".to_owned() => "en".to_owned(),
                "en_US".to_owned() => "en_US".to_owned(),
                "sr@Latn".to_owned() => "sr@Latn".to_owned(),
                "sr_YU".to_owned() => "sr_YU".to_owned(),
                "sr_YU@Latn".to_owned() => "sr_YU@Latn".to_owned(),
            }
        );
    }
}
