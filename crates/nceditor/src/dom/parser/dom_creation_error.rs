// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

use crate::dom::Dom;

/// The tree builder reported errors. `dom` is the tree it built anyway.
#[derive(Clone, Debug, Error)]
#[error("the markup contained {} parse error(s)", .parse_errors.len())]
pub struct DomCreationError {
    pub dom: Dom,
    pub parse_errors: Vec<String>,
}

impl DomCreationError {
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            parse_errors: Vec::new(),
        }
    }
}

impl Default for DomCreationError {
    fn default() -> Self {
        Self::new()
    }
}
