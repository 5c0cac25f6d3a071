// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Markup inserted by the toolbar's "insert" actions.

use html_escape::{encode_double_quoted_attribute, encode_safe};

use crate::table::{
    BODY_CELL_CLASS, BODY_CELL_STYLE, HEADER_CELL_CLASS, HEADER_CELL_STYLE,
    HEADER_ROW_CLASS, HEADER_ROW_STYLE, TABLE_CLASS, TABLE_STYLE,
};

const CODE_BLOCK_CLASS: &str =
    "nc-code-block bg-gray-100 rounded-md p-4 my-4 overflow-x-auto";
const COMMENT_CLASS: &str =
    "nc-comment my-4 p-3 bg-yellow-50 border-l-4 border-yellow-400 rounded";
const IMAGE_CONTAINER_STYLE: &str =
    "display: inline-block; position: relative; margin: 5px;";
const IMAGE_STYLE: &str = "display: block; max-width: 100%;";
const RESIZE_HANDLE_STYLE: &str = "position: absolute; right: -6px; \
     bottom: -6px; width: 12px; height: 12px; background-color: #3b82f6; \
     border: 2px solid white; border-radius: 50%; cursor: nwse-resize; \
     z-index: 100;";
const SIZE_INDICATOR_STYLE: &str = "position: absolute; bottom: -20px; \
     right: 0; background-color: rgba(0,0,0,0.6); color: white; \
     font-size: 10px; padding: 2px 4px; border-radius: 3px; display: none;";

/// A table with one header row of `cols` "Header n" cells followed by
/// `rows - 1` body rows of "Cell r, c" cells. Empty when either dimension
/// is zero.
pub fn create_table_html(rows: usize, cols: usize) -> String {
    if rows < 1 || cols < 1 {
        return String::new();
    }

    let mut html = format!(
        "<table class=\"{TABLE_CLASS}\" style=\"{TABLE_STYLE}\"><thead>\
         <tr class=\"{HEADER_ROW_CLASS}\" style=\"{HEADER_ROW_STYLE}\">"
    );
    for col in 1..=cols {
        html.push_str(&format!(
            "<th class=\"{HEADER_CELL_CLASS}\" style=\"{HEADER_CELL_STYLE}\">\
             Header {col}</th>"
        ));
    }
    html.push_str("</tr></thead><tbody>");
    for row in 1..rows {
        html.push_str("<tr>");
        for col in 1..=cols {
            html.push_str(&format!(
                "<td class=\"{BODY_CELL_CLASS}\" style=\"{BODY_CELL_STYLE}\">\
                 Cell {row}, {col}</td>"
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// A `pre > code` block holding `code` as escaped text. `language` ends up
/// in a `language-*` class, so anything but `[A-Za-z0-9_+#-]` is dropped
/// from it.
pub fn code_block_html(code: &str, language: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    let language: String = language
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "_+#-".contains(*c))
        .collect();
    format!(
        "<pre class=\"{CODE_BLOCK_CLASS}\"><code class=\"language-{language} \
         text-sm font-mono\" data-language=\"{language}\">{}</code></pre>",
        encode_safe(code)
    )
}

pub fn comment_html(comment: &str) -> String {
    if comment.is_empty() {
        return String::new();
    }
    format!(
        "<div class=\"{COMMENT_CLASS}\"><div class=\"text-sm text-gray-700\">\
         <span class=\"font-medium\">Comment:</span> {}</div></div>",
        encode_safe(comment)
    )
}

/// A non-editable image container with its resize handle and size
/// indicator.
pub fn image_html(src: &str, alt: &str) -> String {
    if src.is_empty() {
        return String::new();
    }
    format!(
        "<div class=\"nc-image-container\" contenteditable=\"false\" \
         style=\"{IMAGE_CONTAINER_STYLE}\"><img src=\"{}\" alt=\"{}\" \
         class=\"nc-image\" style=\"{IMAGE_STYLE}\">\
         <div class=\"nc-image-resize-handle\" contenteditable=\"false\" \
         style=\"{RESIZE_HANDLE_STYLE}\"></div>\
         <div class=\"nc-image-size-indicator\" \
         style=\"{SIZE_INDICATOR_STYLE}\"></div></div>",
        encode_double_quoted_attribute(src),
        encode_double_quoted_attribute(alt),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::Dom;
    use crate::sanitizer::sanitize;
    use crate::table::TableGrid;

    #[test]
    fn tables_need_both_dimensions() {
        assert_eq!(create_table_html(0, 3), "");
        assert_eq!(create_table_html(3, 0), "");
    }

    #[test]
    fn tables_have_a_header_row_and_body_rows() {
        let dom = Dom::from_html(&create_table_html(3, 2));
        let table = dom.children(dom.document_handle())[0];
        let grid = TableGrid::build(&dom, table);
        assert_eq!(grid.row_widths(), vec![2, 2, 2]);
        assert_eq!(dom.text_content(grid.rows[0].handle), "Header 1Header 2");
        assert_eq!(dom.text_content(grid.rows[2].handle), "Cell 2, 1Cell 2, 2");
    }

    #[test]
    fn a_one_row_table_has_an_empty_body() {
        assert!(create_table_html(1, 1).ends_with("</thead><tbody></tbody></table>"));
    }

    #[test]
    fn snippets_survive_sanitizing() {
        let table = create_table_html(2, 2);
        assert_eq!(sanitize(&table), table);
        let code = code_block_html("let x = 1;", "rust");
        assert_eq!(sanitize(&code), code);
        let comment = comment_html("looks good");
        assert_eq!(sanitize(&comment), comment);
    }

    #[test]
    fn code_is_escaped() {
        let html = code_block_html("<script>alert('x')</script>", "js\"><b");
        assert!(!html.contains("<script>"));
        assert!(html.contains("language-jsb "));
        let dom = Dom::from_html(&html);
        assert_eq!(
            dom.text_content(dom.document_handle()),
            "<script>alert('x')</script>"
        );
    }

    #[test]
    fn empty_inputs_give_nothing() {
        assert_eq!(code_block_html("", "rust"), "");
        assert_eq!(comment_html(""), "");
        assert_eq!(image_html("", "alt"), "");
    }

    #[test]
    fn image_attributes_are_escaped() {
        let html = image_html("a.png\" onerror=\"x()", "cat");
        let dom = Dom::from_html(&html);
        let img = dom
            .descendants(dom.document_handle())
            .into_iter()
            .find(|h| dom.is_element_named(*h, &["img"]))
            .unwrap();
        let img = dom.element(img).unwrap();
        assert_eq!(img.get_attr("src"), Some("a.png\" onerror=\"x()"));
        assert!(!img.has_attr("onerror"));
    }
}
