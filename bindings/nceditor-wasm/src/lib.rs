// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use nceditor::{
    Dom, DomHandle, DomSelection, InsertPosition, MergeDirection, TableEditor,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen(js_name = "sanitizeHtml")]
pub fn sanitize_html(html: &str) -> String {
    nceditor::sanitize(html)
}

#[wasm_bindgen(js_name = "areHtmlEquivalent")]
pub fn are_html_equivalent(a: &str, b: &str) -> bool {
    nceditor::are_equivalent(a, b)
}

#[wasm_bindgen(js_name = "createTableElement")]
pub fn create_table_element(rows: u32, cols: u32) -> String {
    nceditor::create_table_html(rows as usize, cols as usize)
}

#[wasm_bindgen(js_name = "createCodeBlock")]
pub fn create_code_block(code: &str, language: &str) -> String {
    nceditor::code_block_html(code, language)
}

#[wasm_bindgen(js_name = "createComment")]
pub fn create_comment(comment: &str) -> String {
    nceditor::comment_html(comment)
}

#[wasm_bindgen(js_name = "createImage")]
pub fn create_image(src: &str, alt: &str) -> String {
    nceditor::image_html(src, alt)
}

/// A parsed copy of the editable surface that table commands run against.
/// Selections are given as child-index paths from the editable root.
#[wasm_bindgen]
pub struct EditorDocument {
    dom: Dom,
    selection: DomSelection,
    editor: TableEditor,
}

#[wasm_bindgen]
impl EditorDocument {
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str) -> Self {
        Self {
            dom: Dom::from_html(html),
            selection: DomSelection::none(),
            editor: TableEditor::default(),
        }
    }

    /// Select from the node at `anchor_path` to the node at `focus_path`.
    /// Returns `false`, clearing the selection, if either path is invalid.
    pub fn select(&mut self, anchor_path: Vec<u32>, focus_path: Vec<u32>) -> bool {
        let anchor = self.handle_at(&anchor_path);
        let focus = self.handle_at(&focus_path);
        match (anchor, focus) {
            (Some(anchor), Some(focus)) => {
                self.selection = DomSelection::new(anchor, focus);
                true
            }
            _ => {
                self.selection = DomSelection::none();
                false
            }
        }
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.selection = DomSelection::none();
    }

    /// `direction` is "horizontal" or "vertical".
    #[wasm_bindgen(js_name = "mergeCells")]
    pub fn merge_cells(&mut self, direction: &str) -> bool {
        let Ok(direction) = MergeDirection::from_str(direction) else {
            return false;
        };
        let root = self.dom.document_handle();
        let update =
            self.editor
                .merge_cells(&mut self.dom, root, &self.selection, direction);
        update.is_applied()
    }

    /// `position` is "before" or "after".
    #[wasm_bindgen(js_name = "insertTableRow")]
    pub fn insert_table_row(&mut self, position: &str) -> bool {
        let Ok(position) = InsertPosition::from_str(position) else {
            return false;
        };
        let root = self.dom.document_handle();
        let update = self.editor.insert_table_row(
            &mut self.dom,
            root,
            &self.selection,
            position,
        );
        update.is_applied()
    }

    #[wasm_bindgen(js_name = "insertTableColumn")]
    pub fn insert_table_column(&mut self, position: &str) -> bool {
        let Ok(position) = InsertPosition::from_str(position) else {
            return false;
        };
        let root = self.dom.document_handle();
        let update = self.editor.insert_table_column(
            &mut self.dom,
            root,
            &self.selection,
            position,
        );
        update.is_applied()
    }

    #[wasm_bindgen(js_name = "deleteTableRow")]
    pub fn delete_table_row(&mut self) -> bool {
        let root = self.dom.document_handle();
        let update =
            self.editor
                .delete_table_row(&mut self.dom, root, &self.selection);
        update.is_applied()
    }

    #[wasm_bindgen(js_name = "deleteTableColumn")]
    pub fn delete_table_column(&mut self) -> bool {
        let root = self.dom.document_handle();
        let update =
            self.editor
                .delete_table_column(&mut self.dom, root, &self.selection);
        update.is_applied()
    }

    #[wasm_bindgen(js_name = "toHtml")]
    pub fn to_html(&self) -> String {
        self.dom.to_html()
    }
}

impl EditorDocument {
    fn handle_at(&self, path: &[u32]) -> Option<DomHandle> {
        let path: Vec<usize> = path.iter().map(|i| *i as usize).collect();
        self.dom.handle_at_path(&path)
    }
}
