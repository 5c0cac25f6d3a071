// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{DomCreationError, DomCreationResult};
use crate::dom::{
    html_name, CommentNode, Dom, DomHandle, DomNode, FragmentNode, TextNode,
};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::borrow::Cow;
use std::cell::{Ref, RefCell};

struct CreationState {
    result: DomCreationError,
    /// Returned by `elem_name` for handles that are not elements, which the
    /// tree builder should never ask about.
    fallback_name: QualName,
}

impl CreationState {
    fn name_of(&self, handle: DomHandle) -> &QualName {
        match self.result.dom.element(handle) {
            Some(e) => &e.name,
            None => &self.fallback_name,
        }
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.result.parse_errors.push(msg.into());
    }

    /// Insert text into `parent` at `index` (or at the end), merging it
    /// into a text node that directly precedes that position.
    fn insert_text(&mut self, parent: DomHandle, index: Option<usize>, text: &str) {
        let dom = &mut self.result.dom;
        let children = dom.children(parent);
        let index = index.unwrap_or(children.len()).min(children.len());
        let previous = index.checked_sub(1).and_then(|i| children.get(i)).copied();

        if let Some(previous) = previous {
            if let Some(DomNode::Text(t)) = dom.get_mut_node(previous) {
                t.content.push_str(text);
                return;
            }
        }

        let handle = dom.add_node(DomNode::Text(TextNode {
            content: text.to_owned(),
        }));
        if !dom.insert_child(parent, index, handle) {
            self.error("text appended to a node that cannot hold children");
        }
    }
}

pub(crate) struct DomCreator {
    state: RefCell<CreationState>,
}

impl DomCreator {
    pub fn parse(html: &str) -> DomCreationResult {
        parse_fragment(
            DomCreator::default(),
            Default::default(),
            html_name("div"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }
}

impl Default for DomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(CreationState {
                result: DomCreationError::new(),
                fallback_name: html_name("div"),
            }),
        }
    }
}

/// Fragment parsing puts everything inside a synthetic `<html>` element.
/// Hoist its children so the fragment root owns them directly.
fn lift_fragment_root(dom: &mut Dom) {
    let document = dom.document_handle();
    let lifted: Vec<DomHandle> = dom
        .children(document)
        .iter()
        .flat_map(|c| {
            if dom.is_element_named(*c, &["html"]) {
                dom.children(*c).to_vec()
            } else {
                vec![*c]
            }
        })
        .collect();
    dom.set_children(document, lifted);
}

impl TreeSink for DomCreator {
    type Handle = DomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let CreationState { mut result, .. } = self.state.into_inner();
        lift_fragment_root(&mut result.dom);
        if result.parse_errors.is_empty() {
            Ok(result.dom)
        } else {
            Err(result)
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().error(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().result.dom.document_handle()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.name_of(*target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect();
        let mut state = self.state.borrow_mut();
        let dom = &mut state.result.dom;
        let handle = dom.create_element_with_attrs(name, attrs);
        if flags.template {
            let contents = dom.add_node(DomNode::Fragment(FragmentNode::default()));
            dom.append_child(handle, contents);
        }
        handle
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().result.dom.add_node(DomNode::Comment(
            CommentNode {
                content: text.as_ref().to_owned(),
            },
        ))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // HTML has no processing instructions; keep it as the bogus comment
        // a browser would make of it.
        self.create_comment(data)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match child {
            NodeOrText::AppendNode(node) => {
                if !state.result.dom.append_child(*parent, node) {
                    state.error("node appended to a node that cannot hold children");
                }
            }
            NodeOrText::AppendText(tendril) => {
                state.insert_text(*parent, None, tendril.as_ref());
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().result.dom.parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Fragments have no doctype.
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        let mut state = self.state.borrow_mut();
        let dom = &mut state.result.dom;
        let existing = dom
            .children(*target)
            .iter()
            .copied()
            .find(|c| matches!(dom.get_node(*c), Some(DomNode::Fragment(_))));
        existing.unwrap_or_else(|| {
            let contents = dom.add_node(DomNode::Fragment(FragmentNode::default()));
            dom.append_child(*target, contents);
            contents
        })
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let dom = &state.result.dom;
        let (Some(parent), Some(index)) =
            (dom.parent(*sibling), dom.index_in_parent(*sibling))
        else {
            state.error("append_before_sibling on a detached node");
            return;
        };
        match new_node {
            NodeOrText::AppendNode(node) => {
                if !state.result.dom.insert_before(*sibling, node) {
                    state.error("append_before_sibling could not move the node");
                }
            }
            NodeOrText::AppendText(tendril) => {
                state.insert_text(parent, Some(index), tendril.as_ref());
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(element) = state.result.dom.element_mut(*target) else {
            state.error("add_attrs_if_missing on a non-element");
            return;
        };
        for attr in attrs {
            let name = attr.name.local.as_ref();
            if !element.has_attr(name) {
                element.attrs.push((name.to_owned(), attr.value.as_ref().to_owned()));
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().result.dom.detach(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut state = self.state.borrow_mut();
        let dom = &mut state.result.dom;
        for child in dom.take_children(*node) {
            dom.append_child(*new_parent, child);
        }
    }

    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(&self, _intended_parent: &Self::Handle) -> bool {
        // Shadow templates are parsed as plain templates.
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(input: &str) -> Dom {
        Dom::from_html(input)
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_dom() {
        let dom = parse("");
        assert!(dom.children(dom.document_handle()).is_empty());
    }

    #[test]
    fn parsing_a_text_snippet_creates_one_node() {
        let dom = parse("foo");
        let children = dom.children(dom.document_handle());
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(dom.document_handle()), "foo");
    }

    #[test]
    fn parsing_nested_structures_produces_them() {
        let dom = parse("A<i>B<b>C</b>D</i>E");
        let root = dom.document_handle();
        let tags: Vec<_> = dom
            .descendants(root)
            .into_iter()
            .filter_map(|h| dom.tag_name(h).map(str::to_owned))
            .collect();
        assert_eq!(tags, vec!["i", "b"]);
        assert_eq!(dom.text_content(root), "ABCDE");
        dom.explicitly_assert_invariants();
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        let dom = parse("<span class='foo'>txt</span>");
        let span = dom.children(dom.document_handle())[0];
        assert_eq!(dom.element(span).unwrap().get_attr("class"), Some("foo"));
    }

    #[test]
    fn parsing_text_node_with_escaped_html_entities() {
        let dom = parse("aaa&lt;strong&gt;bbb&lt;/strong&gt;ccc");
        assert_eq!(
            dom.text_content(dom.document_handle()),
            "aaa<strong>bbb</strong>ccc"
        );
    }

    #[test]
    fn malformed_markup_is_reported_but_recovered() {
        let err = DomCreator::parse("<table><b>x</table>").unwrap_err();
        assert!(!err.parse_errors.is_empty());
        // The stray <b> is foster-parented in front of the table.
        let root = err.dom.document_handle();
        let first = err.dom.children(root)[0];
        assert_eq!(err.dom.tag_name(first), Some("b"));
        err.dom.explicitly_assert_invariants();
    }

    #[test]
    fn table_rows_get_an_implied_body() {
        let dom = parse("<table><tr><td>1</td></tr></table>");
        let table = dom.children(dom.document_handle())[0];
        let body = dom.children(table)[0];
        assert_eq!(dom.tag_name(body), Some("tbody"));
    }

    #[test]
    fn template_contents_live_in_a_fragment_child() {
        let dom = parse("<template><p>x</p></template>");
        let template = dom.children(dom.document_handle())[0];
        let contents = dom.children(template)[0];
        assert!(matches!(dom.get_node(contents), Some(DomNode::Fragment(_))));
        assert_eq!(dom.text_content(template), "x");
    }

    #[test]
    fn comments_are_kept_as_nodes() {
        let dom = parse("a<!-- note -->b");
        let root = dom.document_handle();
        assert_eq!(dom.children(root).len(), 3);
        assert!(matches!(
            dom.get_node(dom.children(root)[1]),
            Some(DomNode::Comment(c)) if c.content == " note "
        ));
    }
}
