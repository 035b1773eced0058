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
use crate::utility::{GaHashMap, PackedOption};
use smallvec::{smallvec, SmallVec};

/// Per-node data recorded by [`run_dfs`].
///
/// An entry exists for every node *touched* by the walk, i.e. every node
/// some scanned arc points at; only nodes actually descended into get a
/// preorder number.
#[derive(Default)]
pub(crate) struct DfsInfo {
    /// Preorder number, present iff the node was visited.
    pub(crate) num: Option<u32>,
    /// The node this one was first scheduled from. None for the start node
    /// and for nodes that were never scheduled.
    pub(crate) parent: PackedOption<Block>,
    /// Every predecessor observed while scanning arcs, including arcs whose
    /// target was already visited or refused by the descend predicate.
    /// Semi-NCA depends on these staying unpruned.
    pub(crate) predecessors: SmallVec<[Block; 8]>,
}

/// The result of a depth-first walk: a preorder numbering plus per-node
/// parent and predecessor information.
#[derive(Default)]
pub(crate) struct DfsResult {
    /// Visited nodes in preorder, indexed by DFS number.
    pub(crate) num_to_node: Vec<Block>,
    /// Info for every touched node, keyed by the node itself.
    pub(crate) info: GaHashMap<Block, DfsInfo>,
}

impl DfsResult {
    /// The preorder number of `block`, if the walk visited it.
    pub(crate) fn number_of(&self, block: Block) -> Option<u32> {
        self.info.get(&block).and_then(|info| info.num)
    }

    /// Checks if the walk visited `block`.
    pub(crate) fn visited(&self, block: Block) -> bool {
        self.number_of(block).is_some()
    }
}

/// Runs an iterative depth-first walk over `cfg` starting at `start`.
///
/// Successors are scanned in reverse so that the first arc out of a block
/// is the first one explored. Every scanned arc `u -> v` with `v != u`
/// records `u` as a predecessor of `v`; descent into `v` only happens when
/// `v` is unvisited and `descend(u, v)` returns true. Each node is visited
/// at most once.
///
/// The `descend` predicate is how incremental rebuilds stay local: it
/// restricts rediscovery to the region whose dominator structure an update
/// can actually affect.
pub(crate) fn run_dfs<D>(cfg: &Cfg, start: Block, mut descend: D) -> DfsResult
where
    D: FnMut(Block, Block) -> bool,
{
    let mut res = DfsResult::default();
    let mut worklist: SmallVec<[Block; 16]> = smallvec![start];

    res.info.entry(start).or_default();

    while let Some(block) = worklist.pop() {
        let info = res.info.get_mut(&block).unwrap();

        // nodes can be scheduled more than once before their first visit
        if info.num.is_some() {
            continue;
        }

        info.num = Some(res.num_to_node.len() as u32);
        res.num_to_node.push(block);

        let successors: SmallVec<[Block; 4]> = cfg.successors(block).collect();

        for succ in successors.into_iter().rev() {
            let succ_info = res.info.entry(succ).or_default();

            if succ != block {
                succ_info.predecessors.push(block);
            }

            if succ_info.num.is_none() && descend(block, succ) {
                succ_info.parent = PackedOption::some(block);
                worklist.push(succ);
            }
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Cfg, [Block; 4]) {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");
        let lhs = cfg.create_block("lhs");
        let rhs = cfg.create_block("rhs");
        let merge = cfg.create_block("merge");

        cfg.connect(entry, lhs);
        cfg.connect(entry, rhs);
        cfg.connect(lhs, merge);
        cfg.connect(rhs, merge);

        (cfg, [entry, lhs, rhs, merge])
    }

    #[test]
    fn preorder_follows_first_arc_first() {
        let (cfg, [entry, lhs, rhs, merge]) = diamond();

        let dfs = run_dfs(&cfg, entry, |_, _| true);

        assert_eq!(dfs.num_to_node, vec![entry, lhs, merge, rhs]);
        assert_eq!(dfs.number_of(entry), Some(0));
        assert_eq!(dfs.number_of(lhs), Some(1));
        assert_eq!(dfs.number_of(merge), Some(2));
        assert_eq!(dfs.number_of(rhs), Some(3));
    }

    #[test]
    fn parents_point_at_the_scheduler() {
        let (cfg, [entry, lhs, _, merge]) = diamond();

        let dfs = run_dfs(&cfg, entry, |_, _| true);

        assert!(dfs.info[&entry].parent.is_none());
        assert_eq!(dfs.info[&lhs].parent.expand(), Some(entry));
        assert_eq!(dfs.info[&merge].parent.expand(), Some(lhs));
    }

    #[test]
    fn predecessors_include_arcs_to_visited_nodes() {
        let (cfg, [entry, lhs, rhs, merge]) = diamond();

        let dfs = run_dfs(&cfg, entry, |_, _| true);

        // merge was already visited through lhs when rhs's arc is scanned,
        // but the arc must still be recorded
        let mut preds = dfs.info[&merge].predecessors.clone();
        preds.sort();

        assert_eq!(preds.as_slice(), &[lhs, rhs]);
        assert_eq!(dfs.info[&lhs].predecessors.as_slice(), &[entry]);
    }

    #[test]
    fn self_loops_are_not_their_own_predecessor() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");

        cfg.connect(entry, entry);

        let dfs = run_dfs(&cfg, entry, |_, _| true);

        assert_eq!(dfs.num_to_node, vec![entry]);
        assert!(dfs.info[&entry].predecessors.is_empty());
    }

    #[test]
    fn descend_predicate_bounds_the_walk() {
        let (cfg, [entry, lhs, rhs, merge]) = diamond();

        let dfs = run_dfs(&cfg, entry, |_, to| to != merge);

        assert_eq!(dfs.num_to_node, vec![entry, lhs, rhs]);
        assert!(!dfs.visited(merge));

        // the refused node was still touched, so its arcs are on record
        let mut preds = dfs.info[&merge].predecessors.clone();
        preds.sort();

        assert_eq!(preds.as_slice(), &[lhs, rhs]);
    }

    #[test]
    fn cycles_terminate() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");
        let head = cfg.create_block("head");
        let latch = cfg.create_block("latch");

        cfg.connect(entry, head);
        cfg.connect(head, latch);
        cfg.connect(latch, head);

        let dfs = run_dfs(&cfg, entry, |_, _| true);

        assert_eq!(dfs.num_to_node, vec![entry, head, latch]);

        let mut head_preds = dfs.info[&head].predecessors.clone();
        head_preds.sort();

        assert_eq!(head_preds.as_slice(), &[entry, latch]);
    }
}
