// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;

use crate::equivalence::are_equivalent;
use crate::sanitizer::sanitize;

/// A round trip through the raw-HTML source editor.
///
/// The captured markup is handed back untouched unless the user's edits
/// actually changed its meaning, so toggling the view on and off never
/// rewrites content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceView {
    original: String,
    source: String,
    modified: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceViewExit {
    /// Markup to put back into the editable surface.
    pub html: String,
    /// Whether `html` differs from what was captured on entry.
    pub changed: bool,
}

impl SourceView {
    pub fn enter(current_html: &str) -> Self {
        Self {
            original: current_html.to_owned(),
            source: current_html.to_owned(),
            modified: false,
        }
    }

    /// Text currently shown in the source editor.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.source = text.into();
        self.modified = true;
    }

    pub fn leave(self) -> SourceViewExit {
        if self.modified && !are_equivalent(&self.source, &self.original) {
            let html = sanitize(&self.source);
            debug!(bytes = html.len(), "installing edited source");
            let changed = html != self.original;
            SourceViewExit { html, changed }
        } else {
            SourceViewExit {
                html: self.original,
                changed: false,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leaving_without_edits_restores_the_original() {
        let view = SourceView::enter("<p>x</p>");
        assert_eq!(view.source(), "<p>x</p>");
        let exit = view.leave();
        assert_eq!(exit.html, "<p>x</p>");
        assert!(!exit.changed);
    }

    #[test]
    fn whitespace_only_edits_restore_the_original() {
        let mut view = SourceView::enter("<p>a b</p>");
        view.edit("<p>a\n   b</p>");
        assert!(view.is_modified());
        let exit = view.leave();
        assert_eq!(exit.html, "<p>a b</p>");
        assert!(!exit.changed);
    }

    #[test]
    fn real_edits_are_sanitized() {
        let mut view = SourceView::enter("<p>a</p>");
        view.edit("<p onclick=\"x()\">b</p><script>x()</script>");
        let exit = view.leave();
        assert_eq!(exit.html, "<p>b</p>");
        assert!(exit.changed);
    }
}
