//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::utility::GaHashMap;
use std::hash::Hash;

/// Models a type that can be traversed in a tree-like fashion. This is
/// intended for debug APIs / passes that deal in human-readable trees.
///
/// This is **not** for anything that is actually in the hot path, this is
/// meant for human-facing APIs. What this means is that it may be
/// extremely slow.
pub trait IntoTree<'a> {
    /// The node type of the tree
    type Node: Copy;

    /// Returns the root tree node
    fn root(&'a self) -> Self::Node;

    /// Returns the list of children that a given node has
    fn children(&'a self, node: Self::Node) -> Vec<Self::Node>;
}

/// Prints a tree in a consistent format.
///
/// Ex:
///
/// ```none
/// root
/// ├── child 1
/// │   ├── grandchild 1
/// │   └── grandchild 2
/// └── child 2
///     └── grandchild 3
/// ```
pub fn stringify_tree<'a, N, T, F>(tree: &'a T, mut stringify: F) -> String
where
    N: Copy,
    T: IntoTree<'a, Node = N>,
    F: FnMut(N) -> String,
{
    let mut result = String::default();

    stringify_subtree(&mut result, "", tree.root(), tree, &mut stringify);

    result
}

fn stringify_subtree<'a, N, T, F>(
    out: &mut String,
    prefix: &str,
    curr: T::Node,
    tree: &'a T,
    stringify: &mut F,
) where
    N: Copy,
    T: IntoTree<'a, Node = N>,
    F: FnMut(N) -> String,
{
    out.push_str(&stringify(curr));
    out.push('\n');

    let children = tree.children(curr);

    let Some((last, rest)) = children.split_last() else {
        return;
    };

    // subtrees that have siblings after them get a continuing bar in
    // their prefix, the last subtree gets blank padding instead
    for child in rest {
        out.push_str(prefix);
        out.push_str("├── ");
        stringify_subtree(out, &format!("{prefix}│   "), *child, tree, stringify);
    }

    out.push_str(prefix);
    out.push_str("└── ");
    stringify_subtree(out, &format!("{prefix}    "), *last, tree, stringify);
}

/// A self-contained parent/children tree keyed by an arbitrary node type.
///
/// This is the export target for dominator trees: the idom relation is
/// written into one of these node-by-node, and the result can be handed
/// to code that wants a plain tree without knowing anything about CFGs.
pub struct FlatTree<N: Copy + Eq + Hash> {
    values: Vec<N>,
    parents: Vec<usize>,
    children: Vec<Vec<usize>>,
    lookup: GaHashMap<N, usize>,
}

impl<N: Copy + Eq + Hash> FlatTree<N> {
    /// Creates a tree holding only `root`.
    pub fn new(root: N) -> Self {
        let mut lookup = GaHashMap::default();

        lookup.insert(root, 0);

        Self {
            values: vec![root],
            parents: vec![0],
            children: vec![Vec::default()],
            lookup,
        }
    }

    /// Inserts `value` as a child of `parent`.
    ///
    /// `parent` must already be in the tree, and `value` must not be.
    pub fn insert(&mut self, value: N, parent: N) {
        let parent_idx = self.lookup[&parent];
        let idx = self.values.len();
        let prev = self.lookup.insert(value, idx);

        assert!(prev.is_none(), "node inserted into the tree twice");

        self.values.push(value);
        self.parents.push(parent_idx);
        self.children.push(Vec::default());
        self.children[parent_idx].push(idx);
    }

    /// Checks whether `value` has been inserted into the tree.
    pub fn contains(&self, value: N) -> bool {
        self.lookup.contains_key(&value)
    }

    /// Returns the parent of `value`, or `None` if `value` is the root.
    pub fn parent(&self, value: N) -> Option<N> {
        let idx = self.lookup[&value];

        (idx != 0).then(|| self.values[self.parents[idx]])
    }

    /// Returns the number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the tree only holds the root.
    pub fn is_empty(&self) -> bool {
        self.values.len() == 1
    }
}

impl<'a, N: Copy + Eq + Hash> IntoTree<'a> for FlatTree<N> {
    type Node = N;

    fn root(&'a self) -> Self::Node {
        self.values[0]
    }

    fn children(&'a self, node: Self::Node) -> Vec<Self::Node> {
        self.children[self.lookup[&node]]
            .iter()
            .map(|idx| self.values[*idx])
            .collect()
    }
}
