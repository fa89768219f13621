// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text dump of a node branch.
//!
//! One line per node, indented by depth, with the node's target geometry,
//! the flags that are set, and the kind of its payload:
//!
//! ```text
//! NodeId(0@gen0) (0.00, 0.00) 4.00x4.00 [show branch_to_display]
//!   NodeId(1@gen0) (0.50, 0.00) 1.00x1.00 [show] mesh
//! ```

use std::fmt::Write;

use sylvan_core::tree::{Flag, NodeId, NodeTree, Prop};

const NAMED_FLAGS: [(Flag, &str); 9] = [
    (Flag::Show, "show"),
    (Flag::Hidden, "hidden"),
    (Flag::Exposed, "exposed"),
    (Flag::BranchToDisplay, "branch_to_display"),
    (Flag::Selectable, "selectable"),
    (Flag::SelectableRoot, "selectable_root"),
    (Flag::NotToAlign, "not_to_align"),
    (Flag::ReshapeRoot, "reshape_root"),
    (Flag::Popping, "popping"),
];

/// Renders the branch of `root` as indented text, in tree order.
#[must_use]
pub fn dump_tree(tree: &NodeTree, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, root, 0, &mut out);
    out
}

fn dump_node(tree: &NodeTree, id: NodeId, depth: usize, out: &mut String) {
    let flags = tree.flags(id);
    let set: Vec<&str> = NAMED_FLAGS
        .iter()
        .filter(|(flag, _)| flags.get(*flag))
        .map(|(_, name)| *name)
        .collect();
    let _ = write!(
        out,
        "{:indent$}{id:?} ({:.2}, {:.2}) {:.2}x{:.2} [{}]",
        "",
        tree.real(id, Prop::X),
        tree.real(id, Prop::Y),
        tree.real(id, Prop::Width),
        tree.real(id, Prop::Height),
        set.join(" "),
        indent = depth * 2,
    );
    if let Some(payload) = tree.payload(id) {
        let _ = write!(out, " {}", payload.kind_name());
    }
    if flags.custom != 0 {
        let _ = write!(out, " custom={:#x}", flags.custom);
    }
    out.push('\n');
    for child in tree.children(id) {
        dump_node(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sylvan_core::tree::{NodeDesc, Payload, ResourceHandle};

    #[test]
    fn indents_children_and_names_payloads() {
        let mut tree = NodeTree::default();
        let root = tree.create(NodeDesc::new(0.0, 0.0, 4.0, 4.0).flag(Flag::Show));
        let group = tree.add_child(root, NodeDesc::new(1.0, -1.0, 2.0, 2.0));
        tree.add_child(
            group,
            NodeDesc::new(0.5, 0.0, 1.0, 1.0).payload(Payload::Mesh(ResourceHandle(7))),
        );
        tree.flags_mut(group).custom = 0x4;

        let text = dump_tree(&tree, root);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("(0.00, 0.00) 4.00x4.00 [show]"), "{text}");
        assert!(lines[1].starts_with("  NodeId("), "{text}");
        assert!(lines[1].ends_with("(1.00, -1.00) 2.00x2.00 [] custom=0x4"), "{text}");
        assert!(lines[2].starts_with("    NodeId("), "{text}");
        assert!(lines[2].ends_with("[] mesh"), "{text}");
    }
}
