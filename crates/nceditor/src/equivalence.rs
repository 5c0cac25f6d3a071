// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{Dom, DomHandle, DomNode};
use crate::sanitizer::sanitize;

/// Do `a` and `b` describe the same content once both are sanitized and
/// whitespace differences are ignored?
pub fn are_equivalent(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    normalized(a) == normalized(b)
}

fn normalized(html: &str) -> String {
    let mut dom = Dom::from_html(&sanitize(html));
    collapse_whitespace(&mut dom);
    dom.to_html()
}

/// Squash every whitespace run in every text node to one space, trim, and
/// drop text nodes left empty.
fn collapse_whitespace(dom: &mut Dom) {
    let root = dom.document_handle();
    let mut emptied: Vec<DomHandle> = Vec::new();
    for handle in dom.descendants(root) {
        if let Some(DomNode::Text(text)) = dom.get_mut_node(handle) {
            let words: Vec<&str> = text.content.split_whitespace().collect();
            text.content = words.join(" ");
            if text.content.is_empty() {
                emptied.push(handle);
            }
        }
    }
    for handle in emptied {
        dom.detach(handle);
    }
}
