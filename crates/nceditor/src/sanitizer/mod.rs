// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Whitelist sanitizer.
//!
//! Disallowed elements are unwrapped rather than deleted so their text
//! survives; `script` and `style` are the exception and go with their
//! content. Attributes are filtered per tag by [`policy`].

pub mod policy;

use tracing::{debug, trace};

use crate::dom::{Dom, DomHandle, DomNode};
use policy::Tag;

pub use policy::{AttrKey, GLOBAL_ATTRIBUTES};

/// Removed together with everything inside them.
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style"];

/// Upper bound on clean-serialize-reparse rounds.
const MAX_PASSES: usize = 8;

/// Restrict `html` to the whitelist.
///
/// Never fails: whatever tree the parser recovers from malformed input is
/// cleaned. The result is a fixed point, so sanitizing it again returns it
/// unchanged.
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let mut current = sanitize_once(html);
    for _ in 1..MAX_PASSES {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    debug!(passes = MAX_PASSES, "sanitized markup did not settle");
    current
}

fn sanitize_once(html: &str) -> String {
    let mut dom = Dom::from_html(html);
    sanitize_dom(&mut dom);
    dom.to_html()
}

/// Clean an already-parsed tree in place.
pub fn sanitize_dom(dom: &mut Dom) {
    let root = dom.document_handle();
    clean_children(dom, root);
    normalize_empty_paragraphs(dom);
    dom.assert_invariants();
}

/// Work out the cleaned child list of `parent` first, then install it in
/// one go.
fn clean_children(dom: &mut Dom, parent: DomHandle) {
    let mut kept = Vec::new();
    for child in dom.children(parent).to_vec() {
        clean_node(dom, child, &mut kept);
    }
    dom.set_children(parent, kept);
}

/// Push whatever should stand in place of `handle` onto `out`.
fn clean_node(dom: &mut Dom, handle: DomHandle, out: &mut Vec<DomHandle>) {
    let tag = match dom.get_node(handle) {
        Some(DomNode::Text(_)) => {
            out.push(handle);
            return;
        }
        Some(DomNode::Comment(_)) | None => {
            trace!("dropped comment");
            return;
        }
        Some(DomNode::Fragment(_)) => None,
        Some(DomNode::Element(e)) => Tag::lookup(e.local_name()),
    };

    match tag {
        Some(tag) => {
            clean_attributes(dom, handle, tag);
            clean_children(dom, handle);
            out.push(handle);
        }
        None if dom.is_element_named(handle, DROPPED_WITH_CONTENT) => {
            trace!(tag = dom.tag_name(handle), "dropped element and content");
        }
        None => {
            trace!(tag = dom.tag_name(handle), "unwrapped element");
            for child in dom.children(handle).to_vec() {
                clean_node(dom, child, out);
            }
        }
    }
}

fn clean_attributes(dom: &mut Dom, handle: DomHandle, tag: Tag) {
    let Some(element) = dom.element_mut(handle) else {
        return;
    };
    element.attrs.retain(|(name, value)| {
        let keep = tag.allows_attribute(name, value);
        if !keep {
            trace!(tag = tag.as_ref(), attr = name.as_str(), "dropped attribute");
        }
        keep
    });
}

/// A paragraph holding nothing, a lone `<br>` or a lone `&nbsp;` gets
/// exactly one `<br>` so it stays visible and editable.
fn normalize_empty_paragraphs(dom: &mut Dom) {
    let root = dom.document_handle();
    let paragraphs: Vec<DomHandle> = dom
        .descendants(root)
        .into_iter()
        .filter(|h| dom.is_element_named(*h, &["p"]))
        .collect();
    for p in paragraphs {
        let inner = dom.inner_html(p);
        if matches!(inner.trim(), "" | "<br>" | "&nbsp;") {
            let br = dom.create_element("br");
            dom.set_children(p, vec![br]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn scripts_are_removed_with_their_content() {
        let out = sanitize("<script>alert(1)</script>text");
        assert_eq!(out, "text");
    }

    #[test]
    fn styles_are_removed_with_their_content() {
        assert_eq!(sanitize("<style>p { }</style><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn unknown_elements_are_unwrapped() {
        assert_eq!(sanitize("<marquee><b>hi</b></marquee>"), "hi");
    }

    #[test]
    fn nested_unknown_elements_fully_unwrap() {
        assert_eq!(
            sanitize("<font><center><em>x</em> <i>y</i></center></font>z"),
            "<em>x</em> yz"
        );
    }

    #[test]
    fn top_level_text_is_untouched() {
        assert_eq!(sanitize("just words"), "just words");
    }

    #[test]
    fn event_handlers_are_stripped() {
        assert_eq!(
            sanitize("<p onclick=\"x()\" class=\"a\">t</p>"),
            "<p class=\"a\">t</p>"
        );
    }

    #[test]
    fn unknown_attributes_are_stripped() {
        assert_eq!(
            sanitize("<span title=\"t\" style=\"color: red\">x</span>"),
            "<span style=\"color: red\">x</span>"
        );
        assert_eq!(sanitize("<img src=\"a.png\" href=\"b\">"), "<img src=\"a.png\">");
    }

    #[test]
    fn script_uris_are_stripped_even_when_obfuscated() {
        assert_eq!(sanitize("<a href=\"javascript:alert(1)\">x</a>"), "<a>x</a>");
        assert_eq!(
            sanitize("<a href=\"jav&#x09;ascript:alert(1)\" rel=\"x\">x</a>"),
            "<a rel=\"x\">x</a>"
        );
        assert_eq!(
            sanitize("<img src=\" VBScript:run\" alt=\"a\">"),
            "<img alt=\"a\">"
        );
    }

    #[test]
    fn data_attributes_only_survive_on_div() {
        assert_eq!(
            sanitize("<div data-id=\"1\" data-=\"x\" contenteditable=\"false\">x</div>"),
            "<div data-id=\"1\" contenteditable=\"false\">x</div>"
        );
        assert_eq!(sanitize("<span data-id=\"1\">x</span>"), "<span>x</span>");
    }

    #[test]
    fn table_cells_keep_their_spans() {
        let html = "<table><tbody><tr><td colspan=\"2\" onclick=\"x\">a</td></tr></tbody></table>";
        assert_eq!(
            sanitize(html),
            "<table><tbody><tr><td colspan=\"2\">a</td></tr></tbody></table>"
        );
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(sanitize("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn tag_names_are_matched_case_insensitively() {
        assert_eq!(sanitize("<P CLASS=\"a\">x</P>"), "<p class=\"a\">x</p>");
    }

    #[test]
    fn empty_paragraphs_get_a_single_break() {
        assert_eq!(sanitize("<p></p>"), "<p><br></p>");
        assert_eq!(sanitize("<p> &nbsp; </p>"), "<p><br></p>");
        assert_eq!(sanitize("<p><br></p>"), "<p><br></p>");
        assert_eq!(sanitize("<p><span></span></p>"), "<p><span></span></p>");
    }

    #[test]
    fn raw_text_of_unwrapped_elements_is_escaped() {
        assert_eq!(
            sanitize("<xmp><b>x</b></xmp>"),
            "&lt;b&gt;x&lt;/b&gt;"
        );
    }

    #[test]
    fn output_is_a_fixed_point() {
        let inputs = [
            "<p><button><div>x</div></button></p>",
            "<table><b>x</b><tr><td>1</td></tr></table>",
            "<ul><li>a<li>b</ul><p>",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "{input}");
        }
    }

    #[test]
    fn blank_lines_at_the_start_of_pre_are_kept() {
        assert_eq!(sanitize("<pre>\n\nx</pre>"), "<pre>\n\nx</pre>");
        assert_eq!(
            sanitize("<pre>\n\n\nbar</pre>"),
            "<pre>\n\n\nbar</pre>"
        );
        assert_eq!(
            sanitize("<pre><font>\nx</font></pre>"),
            "<pre>\n\nx</pre>"
        );
    }

    #[test]
    fn sanitize_dom_cleans_in_place() {
        let mut dom = Dom::from_html("<p><b>a</b><!--c--></p>");
        sanitize_dom(&mut dom);
        assert_eq!(dom.to_html(), "<p>a</p>");
        dom.explicitly_assert_invariants();
    }
}
