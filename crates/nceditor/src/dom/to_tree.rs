// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{Dom, DomHandle, DomNode};

impl Dom {
    /// Debug rendering of the tree, one node per line.
    ///
    /// ```text
    ///
    /// ├>p
    /// │ └>"foo"
    /// └>td colspan=2
    /// ```
    pub fn to_tree(&self) -> String {
        let mut out = String::from("\n");
        self.fmt_children(self.document_handle(), "", &mut out);
        out
    }

    fn fmt_children(&self, handle: DomHandle, prefix: &str, out: &mut String) {
        let children = self.children(handle);
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if last { "└>" } else { "├>" });
            self.fmt_node(*child, out);
            out.push('\n');
            let deeper = format!("{prefix}{}", if last { "  " } else { "│ " });
            self.fmt_children(*child, &deeper, out);
        }
    }

    fn fmt_node(&self, handle: DomHandle, out: &mut String) {
        match self.get_node(handle) {
            Some(DomNode::Element(e)) => {
                out.push_str(e.local_name());
                for (name, value) in &e.attrs {
                    out.push_str(&format!(" {name}={value}"));
                }
            }
            Some(DomNode::Text(t)) => out.push_str(&format!("{:?}", t.content)),
            Some(DomNode::Comment(c)) => {
                out.push_str(&format!("<!--{}-->", c.content))
            }
            Some(DomNode::Fragment(_)) => out.push_str("#fragment"),
            None => {}
        }
    }
}
