// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::DomHandle;

/// Where the user's selection is. Hosts implement this over whatever
/// selection object they have; [`DomSelection`] is the in-memory one.
pub trait SelectionSource {
    /// Node the selection started in.
    fn anchor_node(&self) -> Option<DomHandle>;

    /// Node the selection ended in.
    fn focus_node(&self) -> Option<DomHandle>;

    fn is_collapsed(&self) -> bool {
        self.anchor_node() == self.focus_node()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DomSelection {
    pub anchor: Option<DomHandle>,
    pub focus: Option<DomHandle>,
}

impl DomSelection {
    pub fn new(anchor: DomHandle, focus: DomHandle) -> Self {
        Self {
            anchor: Some(anchor),
            focus: Some(focus),
        }
    }

    /// A collapsed selection sitting in `handle`.
    pub fn caret(handle: DomHandle) -> Self {
        Self::new(handle, handle)
    }

    /// No selection at all.
    pub fn none() -> Self {
        Self::default()
    }
}

impl SelectionSource for DomSelection {
    fn anchor_node(&self) -> Option<DomHandle> {
        self.anchor
    }

    fn focus_node(&self) -> Option<DomHandle> {
        self.focus
    }
}
