// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Structural table editing driven by the user's selection.
//!
//! Commands never fail loudly: when a precondition does not hold they leave
//! the tree untouched, log why, and return [`TableUpdate::Refused`].

mod editor;
pub mod grid;
mod selection;
mod style;
mod table_edit_error;

pub use editor::{InsertPosition, MergeContent, MergeDirection, TableEditor};
pub use grid::{RowGroup, TableCell, TableGrid, TableRow};
pub use selection::{DomSelection, SelectionSource};
pub use style::*;
pub use table_edit_error::TableEditError;

use crate::dom::{Dom, DomHandle};

/// Outcome of a table command. [`TableUpdate::Applied`] means the tree
/// changed and the host should fire its "content changed" notification.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableUpdate {
    Applied,
    Refused(TableEditError),
}

impl TableUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

pub fn merge_cells(
    dom: &mut Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
    direction: MergeDirection,
) -> TableUpdate {
    TableEditor::default().merge_cells(dom, root, selection, direction)
}

pub fn insert_table_row(
    dom: &mut Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
    position: InsertPosition,
) -> TableUpdate {
    TableEditor::default().insert_table_row(dom, root, selection, position)
}

pub fn insert_table_column(
    dom: &mut Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
    position: InsertPosition,
) -> TableUpdate {
    TableEditor::default().insert_table_column(dom, root, selection, position)
}

pub fn delete_table_row(
    dom: &mut Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
) -> TableUpdate {
    TableEditor::default().delete_table_row(dom, root, selection)
}

pub fn delete_table_column(
    dom: &mut Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
) -> TableUpdate {
    TableEditor::default().delete_table_column(dom, root, selection)
}
