// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Serialization with the same rules as a browser's `innerHTML` getter.

use std::fmt;

use super::{Dom, DomHandle, DomNode};

/// Elements that never have an end tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr",
    "img", "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written out unescaped.
const RAW_TEXT_TAGS: &[&str] = &[
    "iframe", "noembed", "noframes", "plaintext", "script", "style", "xmp",
];

/// Elements whose first newline is dropped by the parser.
const LEADING_NEWLINE_TAGS: &[&str] = &["listing", "pre", "textarea"];

impl Dom {
    /// Serialize the children of the document root.
    pub fn to_html(&self) -> String {
        self.inner_html(self.document_handle())
    }

    /// Serialize the children of `handle`, like `innerHTML`.
    pub fn inner_html(&self, handle: DomHandle) -> String {
        self.children(handle)
            .iter()
            .map(|c| HtmlDisplay::new(self, *c).to_string())
            .collect()
    }

    fn is_void(&self, handle: DomHandle) -> bool {
        self.is_element_named(handle, VOID_TAGS)
    }

    /// Would reparsing the serialized `handle` eat a newline its first
    /// text child starts with?
    fn needs_leading_newline(&self, handle: DomHandle) -> bool {
        self.is_element_named(handle, LEADING_NEWLINE_TAGS)
            && self.children(handle).first().is_some_and(|c| {
                matches!(
                    self.get_node(*c),
                    Some(DomNode::Text(t)) if t.content.starts_with('\n')
                )
            })
    }
}

struct HtmlDisplay<'a> {
    dom: &'a Dom,
    handle: DomHandle,
}

impl<'a> HtmlDisplay<'a> {
    fn new(dom: &'a Dom, handle: DomHandle) -> Self {
        Self { dom, handle }
    }

    fn child(&self, handle: DomHandle) -> Self {
        Self::new(self.dom, handle)
    }

    fn parent_is_raw_text(&self) -> bool {
        self.dom
            .parent(self.handle)
            .is_some_and(|p| self.dom.is_element_named(p, RAW_TEXT_TAGS))
    }
}

impl fmt::Display for HtmlDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.dom.get_node(self.handle) else {
            return Ok(());
        };
        match node {
            DomNode::Fragment(fragment) => {
                for child in &fragment.children {
                    self.child(*child).fmt(f)?;
                }
                Ok(())
            }
            DomNode::Element(element) => {
                write!(f, "<{}", element.local_name())?;
                for (name, value) in &element.attrs {
                    write!(f, " {name}=\"")?;
                    write_escaped(f, value, true)?;
                    f.write_str("\"")?;
                }
                f.write_str(">")?;
                if self.dom.is_void(self.handle) {
                    return Ok(());
                }
                if self.dom.needs_leading_newline(self.handle) {
                    f.write_str("\n")?;
                }
                for child in &element.children {
                    self.child(*child).fmt(f)?;
                }
                write!(f, "</{}>", element.local_name())
            }
            DomNode::Text(text) => {
                if self.parent_is_raw_text() {
                    f.write_str(&text.content)
                } else {
                    write_escaped(f, &text.content, false)
                }
            }
            DomNode::Comment(comment) => {
                write!(f, "<!--{}-->", comment.content)
            }
        }
    }
}

fn write_escaped(
    f: &mut fmt::Formatter<'_>,
    value: &str,
    attribute: bool,
) -> fmt::Result {
    for c in value.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '\u{a0}' => f.write_str("&nbsp;")?,
            '"' if attribute => f.write_str("&quot;")?,
            '<' if !attribute => f.write_str("&lt;")?,
            '>' if !attribute => f.write_str("&gt;")?,
            c => fmt::Write::write_char(f, c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::dom::Dom;

    fn round_trip(html: &str) -> String {
        Dom::from_html(html).to_html()
    }

    #[test]
    fn plain_markup_round_trips() {
        let html = "<p class=\"a\">x <strong>y</strong></p><ul><li>z</li></ul>";
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        assert_eq!(round_trip("a<br/>b<img src='x.png'>"), "a<br>b<img src=\"x.png\">");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(round_trip("1 &lt; 2 &amp;&amp; 3 &gt; 2"), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
        assert_eq!(round_trip("a&nbsp;b"), "a&nbsp;b");
    }

    #[test]
    fn attribute_values_escape_quotes_but_not_angles() {
        assert_eq!(
            round_trip("<span title='say \"<hi>\" &amp; go'>x</span>"),
            "<span title=\"say &quot;<hi>&quot; &amp; go\">x</span>"
        );
    }

    #[test]
    fn raw_text_is_not_escaped() {
        assert_eq!(
            round_trip("<style>a > b { }</style>"),
            "<style>a > b { }</style>"
        );
    }

    #[test]
    fn inner_html_excludes_the_element() {
        let dom = Dom::from_html("<div><em>x</em></div>");
        let div = dom.children(dom.document_handle())[0];
        assert_eq!(dom.inner_html(div), "<em>x</em>");
    }

    #[test]
    fn leading_newlines_in_pre_survive_a_round_trip() {
        assert_eq!(round_trip("<pre>\n\nx</pre>"), "<pre>\n\nx</pre>");
        assert_eq!(round_trip("<pre>\nx</pre>"), "<pre>x</pre>");
        assert_eq!(
            round_trip("<textarea>\n\ny</textarea>"),
            "<textarea>\n\ny</textarea>"
        );
    }

    #[test]
    fn comments_are_written_back() {
        assert_eq!(round_trip("a<!--b-->c"), "a<!--b-->c");
    }
}
