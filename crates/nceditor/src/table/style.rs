// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub const TABLE_CLASS: &str =
    "nc-table w-full border-collapse border border-slate-300 my-4";
pub const TABLE_STYLE: &str = "width: 100%; border-collapse: collapse; \
     margin: 1rem 0; border: 1px solid #cbd5e1;";
pub const HEADER_ROW_CLASS: &str = "bg-slate-100";
pub const HEADER_ROW_STYLE: &str = "background-color: #f1f5f9;";
pub const HEADER_CELL_CLASS: &str =
    "border border-slate-300 p-2 text-left font-medium";
pub const HEADER_CELL_STYLE: &str = "border: 1px solid #cbd5e1; \
     padding: 0.5rem; text-align: left; font-weight: 500;";
pub const BODY_CELL_CLASS: &str = "border border-slate-300 p-2";
pub const BODY_CELL_STYLE: &str = "border: 1px solid #cbd5e1; padding: 0.5rem;";

/// `class` and `style` given to cells the editor creates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableStyle {
    pub header_class: String,
    pub header_style: String,
    pub cell_class: String,
    pub cell_style: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_class: HEADER_CELL_CLASS.to_owned(),
            header_style: HEADER_CELL_STYLE.to_owned(),
            cell_class: BODY_CELL_CLASS.to_owned(),
            cell_style: BODY_CELL_STYLE.to_owned(),
        }
    }
}

impl TableStyle {
    /// Class and style for a new `th` (`header == true`) or `td`.
    pub fn for_cell(&self, header: bool) -> (&str, &str) {
        if header {
            (&self.header_class, &self.header_style)
        } else {
            (&self.cell_class, &self.cell_style)
        }
    }
}
