// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Arena-backed document tree.
//!
//! Every node lives in one big list owned by the [`Dom`] and is addressed by
//! a [`DomHandle`] (its index in that list). Parents refer to their children
//! by handle, and each slot remembers its parent so ancestor chains can be
//! walked without pointers. Structural edits are splices of child-handle
//! lists; a node removed from the tree simply becomes unreachable garbage
//! and its handle stays valid.

pub mod element_node;
pub mod parser;
mod to_html;
mod to_tree;

use html5ever::{LocalName, Namespace, QualName};

pub use element_node::ElementNode;
pub use parser::{DomCreationError, DomCreationResult};

/// Namespace of every element this crate creates itself.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Build the qualified name of an HTML element.
pub fn html_name(local: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local),
    )
}

/// Index of a node inside its [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomHandle(usize);

/// A node with children but no tag: the root of a parsed fragment, or the
/// contents of a `<template>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentNode {
    pub children: Vec<DomHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentNode {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DomNode {
    Fragment(FragmentNode),
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

impl DomNode {
    pub fn children(&self) -> &[DomHandle] {
        match self {
            Self::Fragment(f) => &f.children,
            Self::Element(e) => &e.children,
            Self::Text(_) | Self::Comment(_) => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<DomHandle>> {
        match self {
            Self::Fragment(f) => Some(&mut f.children),
            Self::Element(e) => Some(&mut e.children),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    pub fn can_have_children(&self) -> bool {
        matches!(self, Self::Fragment(_) | Self::Element(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Slot {
    node: DomNode,
    parent: Option<DomHandle>,
}

/// The document tree. Cloning a `Dom` keeps every handle valid in the
/// clone, which is what lets edits be drafted on a copy and committed whole.
#[derive(Clone, Debug, PartialEq)]
pub struct Dom {
    slots: Vec<Slot>,
    document: DomHandle,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty tree made of a single fragment root.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: DomNode::Fragment(FragmentNode::default()),
                parent: None,
            }],
            document: DomHandle(0),
        }
    }

    /// Parse `html` the way an element's `innerHTML` setter would.
    ///
    /// Never fails: tree-builder errors are logged and the recovered tree
    /// is returned, as a browser would.
    pub fn from_html(html: &str) -> Self {
        parser::parse(html).unwrap_or_else(|err| {
            tracing::trace!(
                errors = err.parse_errors.len(),
                "recovered from malformed markup"
            );
            err.dom
        })
    }

    pub fn document_handle(&self) -> DomHandle {
        self.document
    }

    pub fn contains(&self, handle: DomHandle) -> bool {
        handle.0 < self.slots.len()
    }

    pub fn get_node(&self, handle: DomHandle) -> Option<&DomNode> {
        self.slots.get(handle.0).map(|s| &s.node)
    }

    pub fn get_mut_node(&mut self, handle: DomHandle) -> Option<&mut DomNode> {
        self.slots.get_mut(handle.0).map(|s| &mut s.node)
    }

    /// Store a new, detached node.
    pub fn add_node(&mut self, node: DomNode) -> DomHandle {
        self.slots.push(Slot { node, parent: None });
        DomHandle(self.slots.len() - 1)
    }

    /// Create a detached HTML element with no attributes.
    pub fn create_element(&mut self, tag: &str) -> DomHandle {
        self.create_element_with_attrs(html_name(tag), Vec::new())
    }

    pub fn create_element_with_attrs(
        &mut self,
        name: QualName,
        attrs: Vec<(String, String)>,
    ) -> DomHandle {
        self.add_node(DomNode::Element(ElementNode {
            name,
            attrs,
            children: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, content: &str) -> DomHandle {
        self.add_node(DomNode::Text(TextNode {
            content: content.to_owned(),
        }))
    }

    pub fn parent(&self, handle: DomHandle) -> Option<DomHandle> {
        self.slots.get(handle.0).and_then(|s| s.parent)
    }

    pub fn children(&self, handle: DomHandle) -> &[DomHandle] {
        self.get_node(handle).map(DomNode::children).unwrap_or(&[])
    }

    pub fn element(&self, handle: DomHandle) -> Option<&ElementNode> {
        match self.get_node(handle) {
            Some(DomNode::Element(e)) => Some(e),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, handle: DomHandle) -> Option<&mut ElementNode> {
        match self.get_mut_node(handle) {
            Some(DomNode::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Local name of an element, `None` for any other kind of node.
    pub fn tag_name(&self, handle: DomHandle) -> Option<&str> {
        self.element(handle).map(ElementNode::local_name)
    }

    /// Is `handle` an element whose tag is one of `tags`?
    pub fn is_element_named(&self, handle: DomHandle, tags: &[&str]) -> bool {
        self.element(handle).is_some_and(|e| tags.iter().any(|t| e.is(t)))
    }

    pub fn index_in_parent(&self, handle: DomHandle) -> Option<usize> {
        let parent = self.parent(handle)?;
        self.children(parent).iter().position(|c| *c == handle)
    }

    /// Element children of `handle` whose tag is one of `tags`.
    pub fn child_elements_named(
        &self,
        handle: DomHandle,
        tags: &[&str],
    ) -> Vec<DomHandle> {
        self.children(handle)
            .iter()
            .copied()
            .filter(|c| self.is_element_named(*c, tags))
            .collect()
    }

    /// Remove `handle` from its parent's child list. The node and its
    /// subtree stay in the arena, detached.
    pub fn detach(&mut self, handle: DomHandle) {
        let Some(parent) = self.parent(handle) else {
            return;
        };
        if let Some(children) =
            self.get_mut_node(parent).and_then(DomNode::children_mut)
        {
            children.retain(|c| *c != handle);
        }
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.parent = None;
        }
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count),
    /// moving it out of wherever it was before.
    ///
    /// Returns `false`, leaving the tree untouched, when `parent` cannot
    /// hold children or the move would create a cycle.
    pub fn insert_child(
        &mut self,
        parent: DomHandle,
        index: usize,
        child: DomHandle,
    ) -> bool {
        if !self.contains(child)
            || !self.get_node(parent).is_some_and(DomNode::can_have_children)
            || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(children) =
            self.get_mut_node(parent).and_then(DomNode::children_mut)
        {
            let index = index.min(children.len());
            children.insert(index, child);
        }
        if let Some(slot) = self.slots.get_mut(child.0) {
            slot.parent = Some(parent);
        }
        true
    }

    pub fn append_child(&mut self, parent: DomHandle, child: DomHandle) -> bool {
        self.insert_child(parent, usize::MAX, child)
    }

    pub fn insert_before(&mut self, sibling: DomHandle, child: DomHandle) -> bool {
        self.insert_next_to(sibling, child, 0)
    }

    pub fn insert_after(&mut self, sibling: DomHandle, child: DomHandle) -> bool {
        self.insert_next_to(sibling, child, 1)
    }

    fn insert_next_to(
        &mut self,
        sibling: DomHandle,
        child: DomHandle,
        offset: usize,
    ) -> bool {
        if sibling == child {
            return false;
        }
        let Some(parent) = self.parent(sibling) else {
            return false;
        };
        // Detach first so that the sibling's index is the final one.
        self.detach(child);
        match self.index_in_parent(sibling) {
            Some(index) => self.insert_child(parent, index + offset, child),
            None => false,
        }
    }

    /// Replace the whole child list of `parent` in one go.
    ///
    /// Children dropped from the list become detached; children taken from
    /// another parent are removed from that parent's list.
    pub fn set_children(&mut self, parent: DomHandle, new_children: Vec<DomHandle>) {
        if !self.get_node(parent).is_some_and(DomNode::can_have_children) {
            return;
        }
        let new_children: Vec<DomHandle> = new_children
            .into_iter()
            .filter(|c| self.contains(*c) && !self.is_inclusive_ancestor(*c, parent))
            .collect();

        for old in self.children(parent).to_vec() {
            if !new_children.contains(&old) {
                if let Some(slot) = self.slots.get_mut(old.0) {
                    slot.parent = None;
                }
            }
        }
        for child in &new_children {
            match self.parent(*child) {
                Some(p) if p != parent => self.detach(*child),
                _ => {}
            }
            if let Some(slot) = self.slots.get_mut(child.0) {
                slot.parent = Some(parent);
            }
        }
        if let Some(children) =
            self.get_mut_node(parent).and_then(DomNode::children_mut)
        {
            *children = new_children;
        }
    }

    /// Detach and return every child of `handle`.
    pub fn take_children(&mut self, handle: DomHandle) -> Vec<DomHandle> {
        let children = self.children(handle).to_vec();
        self.set_children(handle, Vec::new());
        children
    }

    /// `handle` itself, then its parent, grandparent and so on.
    pub fn ancestors(&self, handle: DomHandle) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: self.contains(handle).then_some(handle),
        }
    }

    /// Is `ancestor` equal to `handle` or above it in the tree?
    pub fn is_inclusive_ancestor(&self, ancestor: DomHandle, handle: DomHandle) -> bool {
        self.ancestors(handle).any(|h| h == ancestor)
    }

    /// The nearest inclusive ancestor of `handle` satisfying `pred`, never
    /// looking at `boundary` or anything above it.
    pub fn closest(
        &self,
        handle: DomHandle,
        boundary: DomHandle,
        pred: impl Fn(&Self, DomHandle) -> bool,
    ) -> Option<DomHandle> {
        self.ancestors(handle)
            .take_while(|h| *h != boundary)
            .find(|h| pred(self, *h))
    }

    /// Deepest node that is an inclusive ancestor of both `a` and `b`.
    pub fn common_ancestor(&self, a: DomHandle, b: DomHandle) -> Option<DomHandle> {
        let above_b: Vec<DomHandle> = self.ancestors(b).collect();
        self.ancestors(a).find(|h| above_b.contains(h))
    }

    /// Every node below `handle`, in document (pre-)order.
    pub fn descendants(&self, handle: DomHandle) -> Vec<DomHandle> {
        let mut out = Vec::new();
        let mut stack: Vec<DomHandle> =
            self.children(handle).iter().rev().copied().collect();
        while let Some(h) = stack.pop() {
            out.push(h);
            stack.extend(self.children(h).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of every text node under `handle`.
    pub fn text_content(&self, handle: DomHandle) -> String {
        let mut text = String::new();
        if let Some(DomNode::Text(t)) = self.get_node(handle) {
            text.push_str(&t.content);
        }
        for h in self.descendants(handle) {
            if let Some(DomNode::Text(t)) = self.get_node(h) {
                text.push_str(&t.content);
            }
        }
        text
    }

    /// Follow a list of child indices down from the document root.
    pub fn handle_at_path(&self, path: &[usize]) -> Option<DomHandle> {
        path.iter().try_fold(self.document, |h, i| {
            self.children(h).get(*i).copied()
        })
    }

    /// The child-index path from the document root down to `handle`, or
    /// `None` when the node is not attached to the document.
    pub fn path_of(&self, handle: DomHandle) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = handle;
        while current != self.document {
            path.push(self.index_in_parent(current)?);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// Panic if parent links and child lists disagree anywhere in the
    /// attached tree.
    pub fn explicitly_assert_invariants(&self) {
        for h in self.descendants(self.document) {
            let parent = self.parent(h);
            assert!(
                parent.is_some_and(|p| self.children(p).contains(&h)),
                "node {h:?} is listed as a child but its parent link is {parent:?}"
            );
            let occurrences = parent
                .map(|p| self.children(p).iter().filter(|c| **c == h).count())
                .unwrap_or(0);
            assert_eq!(occurrences, 1, "node {h:?} appears {occurrences} times");
        }
    }

    /// Checks invariants only when the `assert-invariants` feature is on.
    pub fn assert_invariants(&self) {
        #[cfg(feature = "assert-invariants")]
        self.explicitly_assert_invariants();
    }
}

pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<DomHandle>,
}

impl Iterator for Ancestors<'_> {
    type Item = DomHandle;

    fn next(&mut self) -> Option<DomHandle> {
        let current = self.next?;
        self.next = self.dom.parent(current);
        Some(current)
    }
}
