// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The static whitelist: which tags survive sanitization and which
//! attributes each of them may keep.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Every element that may appear in sanitized output.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tag {
    P,
    Br,
    Div,
    Span,
    Strong,
    Em,
    U,
    S,
    Blockquote,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    A,
    Img,
    Table,
    Thead,
    Tbody,
    Tr,
    Th,
    Td,
    Pre,
    Code,
}

/// Every attribute name the whitelist knows about, `data-*` aside.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttrKey {
    Class,
    Style,
    Id,
    Dir,
    Href,
    Target,
    Rel,
    Src,
    Alt,
    Width,
    Height,
    Colspan,
    Rowspan,
    Contenteditable,
    #[strum(serialize = "data-language")]
    DataLanguage,
}

/// Allowed on every whitelisted tag.
pub const GLOBAL_ATTRIBUTES: &[AttrKey] =
    &[AttrKey::Class, AttrKey::Style, AttrKey::Id, AttrKey::Dir];

const DATA_PREFIX: &str = "data-";

static SCRIPT_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:java|vb|live)script:").unwrap()
});

impl Tag {
    /// Look up a tag name, ignoring case. `None` means "not allowed".
    pub fn lookup(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Attributes this tag accepts on top of [`GLOBAL_ATTRIBUTES`].
    pub fn extra_attributes(self) -> &'static [AttrKey] {
        use AttrKey::*;
        match self {
            Tag::A => &[Href, Target, Rel],
            Tag::Img => &[Src, Alt, Width, Height],
            Tag::Td | Tag::Th => &[Colspan, Rowspan],
            Tag::Div => &[Contenteditable],
            Tag::Table => &[Contenteditable],
            Tag::Pre | Tag::Code => &[DataLanguage],
            _ => &[],
        }
    }

    /// Whether any `data-*` attribute may be kept on this tag.
    pub fn allows_data_attributes(self) -> bool {
        matches!(self, Tag::Div)
    }

    /// Would an attribute called `name` with this `value` survive on this
    /// tag?
    pub fn allows_attribute(self, name: &str, value: &str) -> bool {
        if is_event_handler(name) || is_script_uri(value) {
            return false;
        }
        if self.allows_data_attributes() && is_data_attribute(name) {
            return true;
        }
        AttrKey::from_str(name).is_ok_and(|key| {
            GLOBAL_ATTRIBUTES.contains(&key)
                || self.extra_attributes().contains(&key)
        })
    }
}

/// `data-` followed by at least one character.
pub fn is_data_attribute(name: &str) -> bool {
    name.get(..DATA_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(DATA_PREFIX))
        && name.len() > DATA_PREFIX.len()
}

/// Inline event handlers (`onclick`, `onError`, ...).
pub fn is_event_handler(name: &str) -> bool {
    name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"))
}

/// Does `value` smuggle a script URI, even split up by whitespace or
/// control characters?
pub fn is_script_uri(value: &str) -> bool {
    let squashed: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    SCRIPT_URI.is_match(&squashed)
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!(Tag::lookup("TD"), Some(Tag::Td));
        assert_eq!(Tag::lookup("h3"), Some(Tag::H3));
        assert_eq!(Tag::lookup("script"), None);
        assert_eq!(Tag::lookup("b"), None);
    }

    #[test]
    fn every_tag_name_round_trips() {
        for tag in Tag::iter() {
            assert_eq!(Tag::lookup(tag.as_ref()), Some(tag));
        }
        assert_eq!(Tag::iter().count(), 28);
    }

    #[test]
    fn data_language_uses_its_dashed_name() {
        assert_eq!(AttrKey::DataLanguage.as_ref(), "data-language");
        assert_eq!(AttrKey::from_str("data-language"), Ok(AttrKey::DataLanguage));
    }

    #[test]
    fn global_attributes_are_allowed_everywhere() {
        for tag in Tag::iter() {
            for key in GLOBAL_ATTRIBUTES {
                assert!(tag.allows_attribute(key.as_ref(), "x"), "{tag:?} {key:?}");
            }
        }
    }

    #[test]
    fn tag_specific_attributes_only_where_declared() {
        assert!(Tag::A.allows_attribute("href", "https://example.com"));
        assert!(!Tag::Img.allows_attribute("href", "https://example.com"));
        assert!(Tag::Td.allows_attribute("colspan", "2"));
        assert!(!Tag::P.allows_attribute("colspan", "2"));
        assert!(Tag::Table.allows_attribute("contenteditable", "false"));
        assert!(Tag::Code.allows_attribute("data-language", "rust"));
    }

    #[test]
    fn data_wildcard_is_div_only() {
        assert!(Tag::Div.allows_attribute("data-id", "1"));
        assert!(!Tag::Div.allows_attribute("data-", "1"));
        assert!(!Tag::Span.allows_attribute("data-id", "1"));
        assert!(!Tag::Pre.allows_attribute("data-id", "1"));
    }

    #[test]
    fn event_handlers_are_never_allowed() {
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("ONLOAD"));
        assert!(!is_event_handler("o"));
        assert!(!Tag::Div.allows_attribute("onmouseover", "x()"));
    }

    #[test]
    fn obfuscated_script_uris_are_detected() {
        assert!(is_script_uri("javascript:alert(1)"));
        assert!(is_script_uri("JaVaScRiPt:alert(1)"));
        assert!(is_script_uri(" java\tscript:alert(1)"));
        assert!(is_script_uri("jav\u{0}ascript:x"));
        assert!(is_script_uri("vbscript:msgbox"));
        assert!(!is_script_uri("https://example.com/javascript"));
        assert!(!Tag::A.allows_attribute("href", "java\nscript:x"));
    }
}
