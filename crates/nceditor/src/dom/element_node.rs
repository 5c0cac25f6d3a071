// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;

use super::DomHandle;

#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    pub name: QualName,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<DomHandle>,
}

impl ElementNode {
    pub fn local_name(&self) -> &str {
        self.name.local.as_ref()
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.local_name().eq_ignore_ascii_case(tag)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _v)| n == name)
    }

    /// Overwrite the attribute in place, or append it.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _v)| n == name) {
            Some((_n, v)) => value.clone_into(v),
            None => self.attrs.push((name.to_owned(), value.to_owned())),
        }
    }
}
