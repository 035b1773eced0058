//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::cfg::{Block, Cfg};
use crate::dom::DomTree;
use crate::utility::{compare_numeric, stringify_tree, FlatTree, IntoTree};

/// Adapts a [`DomTree`] and the [`Cfg`] holding its block names into
/// something the generic tree printer understands.
///
/// Children are ordered by numeric-aware name comparison, so the output is
/// deterministic no matter what order updates arrived in.
pub struct DomTreePrinter<'t> {
    tree: &'t DomTree,
    cfg: &'t Cfg,
}

impl IntoTree<'_> for DomTreePrinter<'_> {
    type Node = Block;

    fn root(&self) -> Self::Node {
        self.tree.root()
    }

    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut result: Vec<Block> = self.tree.children_of(node).to_vec();

        result.sort_by(|a, b| compare_numeric(self.cfg.block_name(*a), self.cfg.block_name(*b)));

        result
    }
}

impl DomTree {
    /// Adapts the tree (and the graph holding its block names) for the
    /// generic [`stringify_tree`] printer, e.g. to print with custom
    /// labels.
    pub fn printer<'t>(&'t self, cfg: &'t Cfg) -> DomTreePrinter<'t> {
        DomTreePrinter { tree: self, cfg }
    }

    /// Renders the tree as indented text, one block per line, children
    /// ordered by name (numeric-aware).
    ///
    /// ```
    /// # use garnet::{Cfg, DomTree};
    /// let mut cfg = Cfg::new();
    /// let entry = cfg.create_block("entry_n_1");
    /// let body = cfg.create_block("n_2");
    ///
    /// cfg.connect(entry, body);
    ///
    /// let tree = DomTree::compute(&cfg, entry);
    ///
    /// assert_eq!(tree.display(&cfg), "entry_n_1\n└── n_2\n");
    /// ```
    pub fn display(&self, cfg: &Cfg) -> String {
        stringify_tree(&self.printer(cfg), |block| cfg.block_name(block).to_string())
    }

    /// Writes the idom relation, node by node, into a self-contained
    /// [`FlatTree`] that knows nothing about CFGs or dominators.
    ///
    /// This is a one-way export: later updates to the dominator tree do
    /// not touch the returned structure.
    pub fn export(&self) -> FlatTree<Block> {
        let mut out = FlatTree::new(self.root());

        for block in self.reachable() {
            self.export_into(block, &mut out);
        }

        out
    }

    // Get-or-create in idom order: a node's parent must be in the flat
    // tree before the node itself can be.
    fn export_into(&self, block: Block, out: &mut FlatTree<Block>) {
        if out.contains(block) {
            return;
        }

        let idom = self.idom(block).unwrap();

        self.export_into(idom, out);
        out.insert(block, idom);
    }
}
