// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! HTML fragment parsing, backed by html5ever's tree builder.

mod dom_creation_error;
mod dom_creator;

pub use dom_creation_error::DomCreationError;
pub(crate) use dom_creator::DomCreator;

use super::Dom;

pub type DomCreationResult = Result<Dom, DomCreationError>;

/// Parse `html` as the children of a `<div>`, the way `innerHTML` would.
///
/// Any complaint from the tree builder turns the result into an `Err`, which
/// still carries the tree it recovered. Use [`Dom::from_html`] when the
/// recovered tree is all that matters.
pub fn parse(html: &str) -> DomCreationResult {
    DomCreator::parse(html)
}
