// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, EnumString};
use tracing::{debug, warn};

use super::grid::{TableGrid, CELL_TAGS};
use super::{
    RowGroup, SelectionSource, TableEditError, TableStyle, TableUpdate,
};
use crate::dom::{Dom, DomHandle};

/// Content of new cells.
const PLACEHOLDER: &str = "\u{a0}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MergeDirection {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InsertPosition {
    Before,
    After,
}

/// What happens to the content of cells absorbed by a merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeContent {
    /// Appended to the surviving cell, each after a single space.
    #[default]
    Concatenate,
    /// Thrown away with the absorbed cell.
    Discard,
}

/// Structural table commands.
///
/// Every command runs against a draft copy of the tree and only replaces
/// the caller's tree when the edit succeeded and did not turn a
/// rectangular grid jagged, so callers never observe a half-done edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableEditor {
    pub style: TableStyle,
    pub merge_content: MergeContent,
}

/// Where a command found the selection.
struct Target {
    table: DomHandle,
    grid: TableGrid,
    /// Row index and positional cell index of the anchor cell.
    anchor: (usize, usize),
}

impl TableEditor {
    pub fn new(style: TableStyle, merge_content: MergeContent) -> Self {
        Self {
            style,
            merge_content,
        }
    }

    /// Merge the cells between the selection's anchor and focus cells.
    pub fn merge_cells(
        &self,
        dom: &mut Dom,
        root: DomHandle,
        selection: &impl SelectionSource,
        direction: MergeDirection,
    ) -> TableUpdate {
        self.run(dom, "merge_cells", |draft| {
            let (anchor, focus) = selected_nodes(draft, root, selection)?;
            if selection.is_collapsed() {
                return Err(TableEditError::NothingToMerge);
            }
            let start = closest_cell(draft, anchor, root)?;
            let end = closest_cell(draft, focus, root)?;
            let common = draft
                .common_ancestor(anchor, focus)
                .ok_or(TableEditError::NotInTable)?;
            let table = closest_table(draft, common, root)?;
            let grid = TableGrid::build(draft, table);
            let (start_row, start_col) =
                grid.locate(start).ok_or(TableEditError::NotInTable)?;
            let (end_row, end_col) =
                grid.locate(end).ok_or(TableEditError::NotInTable)?;

            let (targets, span_attr) = match direction {
                MergeDirection::Horizontal => {
                    if start_row != end_row {
                        return Err(TableEditError::CellsInDifferentRows);
                    }
                    let (lo, hi) = ordered(start_col, end_col);
                    let cells = &grid.rows[start_row].cells[lo..=hi];
                    (cells.to_vec(), "colspan")
                }
                MergeDirection::Vertical => {
                    if start_col != end_col {
                        return Err(TableEditError::CellsInDifferentColumns);
                    }
                    let (lo, hi) = ordered(start_row, end_row);
                    let cells = grid.rows[lo..=hi]
                        .iter()
                        .filter_map(|row| row.cells.get(start_col).copied())
                        .collect();
                    (cells, "rowspan")
                }
            };
            let [first, rest @ ..] = targets.as_slice() else {
                return Err(TableEditError::NothingToMerge);
            };
            if rest.is_empty() {
                return Err(TableEditError::NothingToMerge);
            }

            let total: usize = targets
                .iter()
                .map(|c| match direction {
                    MergeDirection::Horizontal => c.colspan,
                    MergeDirection::Vertical => c.rowspan,
                })
                .sum();
            if let Some(cell) = draft.element_mut(first.handle) {
                cell.set_attr(span_attr, &total.to_string());
            }
            for absorbed in rest {
                if self.merge_content == MergeContent::Concatenate {
                    let gap = draft.create_text(" ");
                    draft.append_child(first.handle, gap);
                    for child in draft.take_children(absorbed.handle) {
                        draft.append_child(first.handle, child);
                    }
                }
                draft.detach(absorbed.handle);
            }
            Ok(table)
        })
    }

    /// Add a row of placeholder cells next to the anchor cell's row.
    pub fn insert_table_row(
        &self,
        dom: &mut Dom,
        root: DomHandle,
        selection: &impl SelectionSource,
        position: InsertPosition,
    ) -> TableUpdate {
        self.run(dom, "insert_table_row", |draft| {
            let target = anchor_target(draft, root, selection)?;
            let reference = &target.grid.rows[target.anchor.0];

            let new_row = draft.create_element("tr");
            for cell in &reference.cells {
                let new_cell = self.placeholder_cell(draft, false);
                if cell.colspan > 1 {
                    if let Some(e) = draft.element_mut(new_cell) {
                        e.set_attr("colspan", &cell.colspan.to_string());
                    }
                }
                draft.append_child(new_row, new_cell);
            }
            let inserted = match position {
                InsertPosition::Before => {
                    draft.insert_before(reference.handle, new_row)
                }
                InsertPosition::After => {
                    draft.insert_after(reference.handle, new_row)
                }
            };
            if !inserted {
                return Err(TableEditError::NotInTable);
            }
            Ok(target.table)
        })
    }

    /// Add a placeholder cell to every row, before or after the anchor
    /// cell's position.
    pub fn insert_table_column(
        &self,
        dom: &mut Dom,
        root: DomHandle,
        selection: &impl SelectionSource,
        position: InsertPosition,
    ) -> TableUpdate {
        self.run(dom, "insert_table_column", |draft| {
            let target = anchor_target(draft, root, selection)?;
            let index = match position {
                InsertPosition::Before => target.anchor.1,
                InsertPosition::After => target.anchor.1 + 1,
            };
            for row in &target.grid.rows {
                let new_cell =
                    self.placeholder_cell(draft, row.group == RowGroup::Head);
                match row.cells.get(index) {
                    Some(next) => draft.insert_before(next.handle, new_cell),
                    None => draft.append_child(row.handle, new_cell),
                };
            }
            Ok(target.table)
        })
    }

    /// Remove the anchor cell's row, unless it is the table's only row.
    pub fn delete_table_row(
        &self,
        dom: &mut Dom,
        root: DomHandle,
        selection: &impl SelectionSource,
    ) -> TableUpdate {
        self.run(dom, "delete_table_row", |draft| {
            let target = anchor_target(draft, root, selection)?;
            if target.grid.rows.len() <= 1 {
                return Err(TableEditError::LastRow);
            }
            draft.detach(target.grid.rows[target.anchor.0].handle);
            Ok(target.table)
        })
    }

    /// Remove the cell at the anchor's position from every row, unless the
    /// first row has only one cell.
    pub fn delete_table_column(
        &self,
        dom: &mut Dom,
        root: DomHandle,
        selection: &impl SelectionSource,
    ) -> TableUpdate {
        self.run(dom, "delete_table_column", |draft| {
            let target = anchor_target(draft, root, selection)?;
            let first_row_cells =
                target.grid.rows.first().map_or(0, |r| r.cells.len());
            if first_row_cells <= 1 {
                return Err(TableEditError::LastColumn);
            }
            let index = target.anchor.1;
            for row in &target.grid.rows {
                if let Some(cell) = row.cells.get(index) {
                    draft.detach(cell.handle);
                }
            }
            Ok(target.table)
        })
    }

    fn placeholder_cell(&self, dom: &mut Dom, header: bool) -> DomHandle {
        let (class, style) = self.style.for_cell(header);
        let cell = dom.create_element(if header { "th" } else { "td" });
        if let Some(e) = dom.element_mut(cell) {
            e.set_attr("class", class);
            e.set_attr("style", style);
        }
        let text = dom.create_text(PLACEHOLDER);
        dom.append_child(cell, text);
        cell
    }

    /// Apply `edit` to a copy of `dom` and commit it if it succeeded
    /// without breaking the grid. `edit` returns the table it changed.
    fn run(
        &self,
        dom: &mut Dom,
        command: &'static str,
        edit: impl FnOnce(&mut Dom) -> Result<DomHandle, TableEditError>,
    ) -> TableUpdate {
        let mut draft = dom.clone();
        let outcome = edit(&mut draft).and_then(|table| {
            let before = TableGrid::build(dom, table);
            let after = TableGrid::build(&draft, table);
            if before.is_rectangular() && !after.is_rectangular() {
                Err(TableEditError::JaggedGrid {
                    widths: after.row_widths(),
                })
            } else {
                Ok(())
            }
        });

        match outcome {
            Ok(()) => {
                *dom = draft;
                dom.assert_invariants();
                debug!(command, "table edit applied");
                TableUpdate::Applied
            }
            Err(err) => {
                if err.is_warning() {
                    warn!(command, "{err}");
                } else {
                    debug!(command, "{err}");
                }
                TableUpdate::Refused(err)
            }
        }
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// The anchor and focus nodes, checked to be live nodes under `root`.
fn selected_nodes(
    dom: &Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
) -> Result<(DomHandle, DomHandle), TableEditError> {
    let anchor = selection
        .anchor_node()
        .ok_or(TableEditError::NoSelection)?;
    let focus = selection.focus_node().unwrap_or(anchor);
    for node in [root, anchor, focus] {
        if !dom.contains(node) {
            return Err(TableEditError::StaleSelection);
        }
    }
    for node in [anchor, focus] {
        if !dom.is_inclusive_ancestor(root, node) {
            return Err(TableEditError::SelectionOutsideRoot);
        }
    }
    Ok((anchor, focus))
}

fn closest_cell(
    dom: &Dom,
    node: DomHandle,
    root: DomHandle,
) -> Result<DomHandle, TableEditError> {
    dom.closest(node, root, |d, h| d.is_element_named(h, CELL_TAGS))
        .ok_or(TableEditError::NotInCell)
}

fn closest_table(
    dom: &Dom,
    node: DomHandle,
    root: DomHandle,
) -> Result<DomHandle, TableEditError> {
    dom.closest(node, root, |d, h| d.is_element_named(h, &["table"]))
        .ok_or(TableEditError::NotInTable)
}

/// Resolve the anchor to a cell, its table and its place in the grid.
fn anchor_target(
    dom: &Dom,
    root: DomHandle,
    selection: &impl SelectionSource,
) -> Result<Target, TableEditError> {
    let (anchor, _focus) = selected_nodes(dom, root, selection)?;
    let cell = closest_cell(dom, anchor, root)?;
    let table = closest_table(dom, cell, root)?;
    let grid = TableGrid::build(dom, table);
    let anchor = grid.locate(cell).ok_or(TableEditError::NotInTable)?;
    Ok(Target {
        table,
        grid,
        anchor,
    })
}
