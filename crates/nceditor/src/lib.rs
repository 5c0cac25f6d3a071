// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Editing core of a rich-text widget: a whitelist HTML sanitizer, a
//! semantic equivalence check built on it, and selection-driven table
//! editing over an arena document tree.

pub mod dom;
mod equivalence;
pub mod sanitizer;
mod snippets;
mod source_view;
pub mod table;

pub use crate::dom::{Dom, DomCreationError, DomHandle, DomNode};
pub use crate::equivalence::are_equivalent;
pub use crate::sanitizer::{sanitize, sanitize_dom};
pub use crate::snippets::{
    code_block_html, comment_html, create_table_html, image_html,
};
pub use crate::source_view::{SourceView, SourceViewExit};
pub use crate::table::{
    delete_table_column, delete_table_row, insert_table_column,
    insert_table_row, merge_cells, DomSelection, InsertPosition,
    MergeContent, MergeDirection, SelectionSource, TableEditError,
    TableEditor, TableStyle, TableUpdate,
};
