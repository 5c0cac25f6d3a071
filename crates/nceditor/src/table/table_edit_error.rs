// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

/// Why a table command left the tree alone.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableEditError {
    #[error("there is no selection")]
    NoSelection,
    #[error("the selection refers to a node that is not in this document")]
    StaleSelection,
    #[error("the selection is outside the editable root")]
    SelectionOutsideRoot,
    #[error("the selection is not inside a table cell")]
    NotInCell,
    #[error("the selection is not inside a table")]
    NotInTable,
    #[error("cannot merge cells across different rows horizontally")]
    CellsInDifferentRows,
    #[error("cannot merge cells across different columns vertically")]
    CellsInDifferentColumns,
    #[error("fewer than two cells selected")]
    NothingToMerge,
    #[error("cannot delete the only row of a table")]
    LastRow,
    #[error("cannot delete the only column of a table")]
    LastColumn,
    #[error("the edit would leave rows covering {widths:?} columns")]
    JaggedGrid { widths: Vec<usize> },
}

impl TableEditError {
    /// Refusals worth telling the user about, as opposed to commands
    /// issued where they simply do not apply.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::CellsInDifferentRows
                | Self::CellsInDifferentColumns
                | Self::JaggedGrid { .. }
                | Self::StaleSelection
                | Self::SelectionOutsideRoot
        )
    }
}
