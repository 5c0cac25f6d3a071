// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Read-only view of a table's rows and cells, with the span arithmetic
//! needed to tell whether every row covers the same number of columns.

use crate::dom::{Dom, DomHandle};

/// Browsers clamp spans to these.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

pub(crate) const CELL_TAGS: &[&str] = &["td", "th"];
const SECTION_TAGS: &[&str] = &["thead", "tbody", "tfoot"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowGroup {
    Head,
    Body,
    Foot,
}

impl RowGroup {
    fn of_section(dom: &Dom, section: DomHandle) -> Self {
        match dom.tag_name(section) {
            Some(t) if t.eq_ignore_ascii_case("thead") => Self::Head,
            Some(t) if t.eq_ignore_ascii_case("tfoot") => Self::Foot,
            _ => Self::Body,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableCell {
    pub handle: DomHandle,
    pub colspan: usize,
    pub rowspan: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub handle: DomHandle,
    /// The `thead`/`tbody`/`tfoot` holding the row, or the table itself.
    pub section: DomHandle,
    pub group: RowGroup,
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableGrid {
    pub table: DomHandle,
    pub rows: Vec<TableRow>,
}

impl TableGrid {
    /// Collect the rows of `table` in document order: rows inside
    /// `thead`/`tbody`/`tfoot` sections and rows placed directly in the
    /// table. Cells of nested tables are not included.
    pub fn build(dom: &Dom, table: DomHandle) -> Self {
        let mut rows = Vec::new();
        for child in dom.children(table) {
            if dom.is_element_named(*child, &["tr"]) {
                rows.push(Self::row(dom, *child, table, RowGroup::Body));
            } else if dom.is_element_named(*child, SECTION_TAGS) {
                let group = RowGroup::of_section(dom, *child);
                for tr in dom.child_elements_named(*child, &["tr"]) {
                    rows.push(Self::row(dom, tr, *child, group));
                }
            }
        }
        Self { table, rows }
    }

    fn row(
        dom: &Dom,
        handle: DomHandle,
        section: DomHandle,
        group: RowGroup,
    ) -> TableRow {
        let cells = dom
            .child_elements_named(handle, CELL_TAGS)
            .into_iter()
            .map(|cell| TableCell {
                handle: cell,
                colspan: span(dom, cell, "colspan", MAX_COLSPAN),
                rowspan: span(dom, cell, "rowspan", MAX_ROWSPAN),
            })
            .collect();
        TableRow {
            handle,
            section,
            group,
            cells,
        }
    }

    /// Row index and positional cell index of `cell`.
    pub fn locate(&self, cell: DomHandle) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.cells
                .iter()
                .position(|c| c.handle == cell)
                .map(|c| (r, c))
        })
    }

    /// Number of grid columns each row covers: its own cells' colspans
    /// plus the slots taken by cells spanning down from rows above. A
    /// rowspan ends with its row group.
    pub fn row_widths(&self) -> Vec<usize> {
        // (rows still to cover, columns covered)
        let mut carried: Vec<(usize, usize)> = Vec::new();
        let mut widths = Vec::with_capacity(self.rows.len());
        let mut section = None;
        for row in &self.rows {
            if section != Some(row.section) {
                carried.clear();
                section = Some(row.section);
            }
            let own: usize = row.cells.iter().map(|c| c.colspan).sum();
            let from_above: usize = carried.iter().map(|(_, cols)| cols).sum();
            widths.push(own + from_above);

            for entry in carried.iter_mut() {
                entry.0 -= 1;
            }
            carried.retain(|(left, _)| *left > 0);
            carried.extend(
                row.cells
                    .iter()
                    .filter(|c| c.rowspan > 1)
                    .map(|c| (c.rowspan - 1, c.colspan)),
            );
        }
        widths
    }

    /// Does every row cover the same number of columns?
    pub fn is_rectangular(&self) -> bool {
        let widths = self.row_widths();
        widths.windows(2).all(|w| w[0] == w[1])
    }
}

/// Effective span from a `colspan`/`rowspan` attribute: the leading digits
/// of its value, with anything unparsable or zero counting as one.
pub(crate) fn span(dom: &Dom, cell: DomHandle, attr: &str, max: usize) -> usize {
    let Some(value) = dom.element(cell).and_then(|e| e.get_attr(attr)) else {
        return 1;
    };
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => 1,
        Ok(n) => n.min(max),
    }
}
