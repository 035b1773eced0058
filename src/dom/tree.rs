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
use crate::dom::semi_nca::compute_idoms;
use crate::dom::{run_dfs, DfsResult};
use crate::utility::{GaHashMap, GaHashSet};
use smallvec::{smallvec, SmallVec};
use std::cell::{Cell, RefCell};
use std::collections::BinaryHeap;
use std::mem;

/// Models the dominator tree of a control-flow graph, and keeps it correct
/// while single arcs are inserted into and deleted from that graph.
///
/// # Implementation
///
/// Initial construction (and the from-scratch oracle used by the verifier)
/// is the Semi-NCA algorithm from "Linear-Time Algorithms for Dominators
/// and Related Problems" (Georgiadis, 2005) over a depth-first preorder.
/// Incremental updates follow "An Experimental Study of Dynamic Dominators"
/// (Georgiadis et al., 2016): insertion runs a depth-based search over a
/// bucket queue ordered by decreasing tree level, deletion either rebuilds
/// the affected subtree with a level-bounded Semi-NCA pass or erases the
/// subtree that fell off the graph.
///
/// The tree holds the graph's [`Block`] handles but never the graph itself;
/// the mutators take the [`Cfg`] they should observe, and expect to be told
/// about an arc *after* it was connected or disconnected there. Updates
/// must arrive in the order the graph was actually mutated in.
pub struct DomTree {
    root: Block,
    idoms: GaHashMap<Block, Block>,
    rdoms: GaHashMap<Block, Block>,
    levels: GaHashMap<Block, u32>,
    preorder_parents: GaHashMap<Block, Block>,
    children: GaHashMap<Block, SmallVec<[Block; 6]>>,
    in_out: RefCell<GaHashMap<Block, (u32, u32)>>,
    in_out_valid: Cell<bool>,
}

// The bucket used by reachable insertion: a max-priority queue over
// (level, block) pairs, so the deepest affected candidate pops first.
#[derive(Default)]
struct InsertionInfo {
    bucket: BinaryHeap<(u32, Block)>,
    affected: GaHashSet<Block>,
    visited: GaHashSet<Block>,
    affected_queue: SmallVec<[Block; 8]>,
    visited_not_affected: SmallVec<[Block; 8]>,
}

impl DomTree {
    /// Computes the dominator tree of everything reachable from `root`.
    pub fn compute(cfg: &Cfg, root: Block) -> Self {
        let mut tree = Self {
            root,
            idoms: GaHashMap::default(),
            rdoms: GaHashMap::default(),
            levels: GaHashMap::default(),
            preorder_parents: GaHashMap::default(),
            children: GaHashMap::default(),
            in_out: RefCell::default(),
            in_out_valid: Cell::new(false),
        };

        let dfs = run_dfs(cfg, root, |_, _| true);

        tree.apply_dfs_region(&dfs, None);

        tree
    }

    /// Returns the root (entry) node the tree was built from.
    pub fn root(&self) -> Block {
        self.root
    }

    /// Checks if a block is reachable from the entry node.
    pub fn contains(&self, block: Block) -> bool {
        self.idoms.contains_key(&block)
    }

    /// Gets the immediate dominator of `block`.
    ///
    /// Returns `None` for unreachable blocks; the root is its own
    /// immediate dominator.
    pub fn idom(&self, block: Block) -> Option<Block> {
        self.idoms.get(&block).copied()
    }

    /// Gets the depth of `block` in the dominator tree; the root is at
    /// level 0.
    ///
    /// Panics when `block` is not reachable.
    pub fn level(&self, block: Block) -> u32 {
        self.levels[&block]
    }

    /// Gets the semidominator recorded for `block` by the last Semi-NCA
    /// pass that touched it, if any.
    ///
    /// This is diagnostic information, no query is answered off of it.
    pub fn rdom(&self, block: Block) -> Option<Block> {
        self.rdoms.get(&block).copied()
    }

    /// Finds the nearest common ancestor of two reachable blocks in the
    /// dominator tree, i.e. the deepest block that dominates both.
    ///
    /// Panics when either block is unreachable.
    pub fn find_nca(&self, first: Block, second: Block) -> Block {
        assert!(
            self.contains(first) && self.contains(second),
            "both blocks must be reachable"
        );

        let (mut first, mut second) = (first, second);

        // walk the deeper one up until the levels match, then walk both in
        // lockstep until they meet
        while first != second {
            if self.levels[&first] < self.levels[&second] {
                mem::swap(&mut first, &mut second);
            }

            first = self.idoms[&first];
        }

        first
    }

    /// Checks if `block` dominates `other`.
    ///
    /// Every block dominates itself, and the root dominates everything
    /// reachable. If either block is unreachable (and they aren't the same
    /// block) the answer is `false`.
    ///
    /// This is O(1) off cached pre/post intervals over the tree; the cache
    /// is invalidated by every mutation and lazily rebuilt here.
    pub fn dominates(&self, block: Block, other: Block) -> bool {
        if block == other {
            return true;
        }

        if !self.contains(block) || !self.contains(other) {
            return false;
        }

        if block == self.root {
            return true;
        }

        if !self.in_out_valid.get() {
            self.recompute_in_out_nums();
        }

        let cache = self.in_out.borrow();
        let (a_in, a_out) = cache[&block];
        let (b_in, b_out) = cache[&other];

        a_in <= b_in && b_out <= a_out
    }

    /// Informs the tree that the arc `from -> to` was connected in `cfg`.
    ///
    /// The arc must already be present in the graph.
    pub fn insert_arc(&mut self, cfg: &Cfg, from: Block, to: Block) {
        log::trace!(
            "inserting arc {} -> {}",
            cfg.block_name(from),
            cfg.block_name(to)
        );

        self.in_out_valid.set(false);

        // an arc out of an unreachable region cannot connect anything to
        // the root, the destination's region stays detached
        if !self.contains(from) {
            return;
        }

        if self.contains(to) {
            self.insert_reachable(cfg, from, to);
        } else {
            self.insert_unreachable(cfg, from, to);
        }
    }

    /// Informs the tree that the arc `from -> to` was disconnected in
    /// `cfg`.
    ///
    /// The arc must already be gone from the graph.
    pub fn delete_arc(&mut self, cfg: &Cfg, from: Block, to: Block) {
        log::trace!(
            "deleting arc {} -> {}",
            cfg.block_name(from),
            cfg.block_name(to)
        );

        self.in_out_valid.set(false);

        // deletion inside an unreachable region
        if !self.contains(from) || !self.contains(to) {
            return;
        }

        let nca = self.find_nca(from, to);

        // `to` dominates `from`: a back arc went away, which cannot move
        // any dominator
        if nca == to {
            return;
        }

        if self.idoms[&to] != from || self.is_reachable_from_idom(cfg, to) {
            self.delete_reachable(cfg, from, to);
        } else {
            self.delete_unreachable(cfg, to);
        }
    }

    /// The blocks whose immediate dominator is `block`, in no particular
    /// order.
    pub(crate) fn children_of(&self, block: Block) -> &[Block] {
        self.children.get(&block).map(|kids| kids.as_slice()).unwrap_or(&[])
    }

    /// Iterates over every reachable block, in no particular order.
    pub(crate) fn reachable(&self) -> impl Iterator<Item = Block> + '_ {
        self.idoms.keys().copied()
    }

    pub(crate) fn idoms_map(&self) -> &GaHashMap<Block, Block> {
        &self.idoms
    }

    /// Rewires `block` under `idom`, maintaining the child lists. Levels
    /// are *not* touched, callers restore them afterwards.
    pub(crate) fn set_idom(&mut self, block: Block, idom: Block) {
        self.in_out_valid.set(false);

        if let Some(old) = self.idoms.get(&block).copied() {
            if old == idom {
                return;
            }

            if old != block {
                if let Some(kids) = self.children.get_mut(&old) {
                    if let Some(idx) = kids.iter().position(|kid| *kid == block) {
                        kids.swap_remove(idx);
                    }
                }
            }
        }

        self.idoms.insert(block, idom);

        if idom != block {
            let kids = self.children.entry(idom).or_default();

            if !kids.contains(&block) {
                kids.push(block);
            }
        }
    }

    // Writes the results of a Semi-NCA pass over `dfs` into the tree. The
    // sub-root (preorder number 0) is attached under `attach_to` at its
    // level plus one, or becomes the tree root when `attach_to` is `None`.
    fn apply_dfs_region(&mut self, dfs: &DfsResult, attach_to: Option<Block>) {
        let nodes = compute_idoms(dfs);
        let sub_root = dfs.num_to_node[0];

        match attach_to {
            Some(parent) => {
                let level = self.levels[&parent] + 1;

                self.set_idom(sub_root, parent);
                self.levels.insert(sub_root, level);
            }
            None => {
                self.set_idom(sub_root, sub_root);
                self.levels.insert(sub_root, 0);
            }
        }

        // in increasing preorder, so a node's idom has its level by the
        // time the node needs it
        for i in 1..dfs.num_to_node.len() {
            let block = dfs.num_to_node[i];
            let idom = dfs.num_to_node[nodes[i].idom as usize];
            let sdom = dfs.num_to_node[nodes[i].semi as usize];
            let parent = dfs.num_to_node[nodes[i].parent as usize];
            let level = self.levels[&idom] + 1;

            self.set_idom(block, idom);
            self.levels.insert(block, level);
            self.rdoms.insert(block, sdom);
            self.preorder_parents.insert(block, parent);
        }
    }

    // Attaches a previously unreachable region to the tree. The region is
    // everything reachable from `to` through unreachable nodes; arcs that
    // cross from it back into the reachable part are replayed as ordinary
    // reachable insertions afterwards, since they may hoist dominators
    // further.
    fn insert_unreachable(&mut self, cfg: &Cfg, from: Block, to: Block) {
        log::trace!("inserting {} (unreachable)", cfg.block_name(to));

        let mut crossing: SmallVec<[(Block, Block); 8]> = SmallVec::default();

        let dfs = {
            let idoms = &self.idoms;
            let crossing = &mut crossing;

            run_dfs(cfg, to, |pred, succ| {
                if idoms.contains_key(&succ) {
                    crossing.push((pred, succ));

                    false
                } else {
                    true
                }
            })
        };

        self.apply_dfs_region(&dfs, Some(from));

        for (from, to) in crossing {
            log::trace!(
                "replaying discovered arc {} -> {}",
                cfg.block_name(from),
                cfg.block_name(to)
            );

            self.insert_reachable(cfg, from, to);
        }
    }

    // Depth-based search for the nodes whose immediate dominator gets
    // hoisted to the nearest common ancestor of the arc's endpoints.
    fn insert_reachable(&mut self, cfg: &Cfg, from: Block, to: Block) {
        let nca = self.find_nca(from, to);

        // a back arc into a dominator of `from`, or an arc whose endpoints
        // already meet at `to`'s idom: the NCA property still holds
        if nca == to || nca == self.idoms[&to] {
            return;
        }

        log::trace!("reachable insertion, NCA = {}", cfg.block_name(nca));

        let mut info = InsertionInfo::default();

        info.affected.insert(to);
        info.bucket.push((self.levels[&to], to));

        while let Some((level, block)) = info.bucket.pop() {
            info.affected_queue.push(block);
            info.visited.insert(block);
            self.visit_insertion(cfg, block, level, nca, &mut info);
        }

        for block in info.affected_queue.iter() {
            log::trace!("idom({}) = {}", cfg.block_name(*block), cfg.block_name(nca));

            self.set_idom(*block, nca);
        }

        self.update_levels(&info);
    }

    // Scans the CFG successors below an affected node `block`. Successors
    // deeper than `root_level` are dominated by the affected subtree and
    // only need their levels repaired later; successors at or above it
    // that still sit below `nca`'s children are themselves affected.
    fn visit_insertion(
        &self,
        cfg: &Cfg,
        block: Block,
        root_level: u32,
        nca: Block,
        info: &mut InsertionInfo,
    ) {
        let nca_level = self.levels[&nca];
        let mut stack: SmallVec<[Block; 8]> = smallvec![block];

        while let Some(next) = stack.pop() {
            for succ in cfg.successors(next) {
                // every successor of a reachable block is reachable
                let succ_level = self.levels[&succ];

                if succ_level > root_level {
                    if !info.visited.insert(succ) {
                        continue;
                    }

                    info.visited_not_affected.push(succ);
                    stack.push(succ);
                } else if succ_level > nca_level + 1 && !info.affected.contains(&succ) {
                    info.affected.insert(succ);
                    info.bucket.push((succ_level, succ));
                }
            }
        }
    }

    // Restores `level(n) = level(idom(n)) + 1` over the subtrees the
    // insertion touched, stopping wherever the invariant already holds.
    fn update_levels(&mut self, info: &InsertionInfo) {
        for block in info
            .affected_queue
            .iter()
            .chain(info.visited_not_affected.iter())
        {
            self.update_level_subtree(*block);
        }
    }

    fn update_level_subtree(&mut self, block: Block) {
        if self.levels[&block] == self.levels[&self.idoms[&block]] + 1 {
            return;
        }

        let mut worklist: SmallVec<[Block; 16]> = smallvec![block];

        while let Some(curr) = worklist.pop() {
            let level = self.levels[&self.idoms[&curr]] + 1;

            self.levels.insert(curr, level);

            if let Some(kids) = self.children.get(&curr) {
                for child in kids {
                    if self.levels[child] != level + 1 {
                        worklist.push(*child);
                    }
                }
            }
        }
    }

    // `block` keeps a path from the root that avoids the deleted arc iff
    // one of its predecessors reaches it from outside its own subtree.
    fn is_reachable_from_idom(&self, cfg: &Cfg, block: Block) -> bool {
        for pred in cfg.predecessors(block) {
            // incoming arc from an unreachable node
            if !self.contains(pred) {
                continue;
            }

            if self.find_nca(block, pred) != block {
                return true;
            }
        }

        false
    }

    // The destination stayed reachable, so dominators can only move down
    // inside the subtree of the NCA of the deleted arc's endpoints: rebuild
    // that subtree.
    fn delete_reachable(&mut self, cfg: &Cfg, from: Block, to: Block) {
        let top = self.find_nca(from, to);

        log::trace!(
            "reachable deletion, rebuilding below {}",
            cfg.block_name(top)
        );

        self.rebuild_region(cfg, top);
    }

    // The destination fell off the graph: erase its whole dominator
    // subtree, then rebuild the shallowest region that arcs out of the
    // erased subtree were holding up.
    fn delete_unreachable(&mut self, cfg: &Cfg, to: Block) {
        log::trace!("erasing unreachable subtree of {}", cfg.block_name(to));

        let level = self.levels[&to];
        let mut boundary: SmallVec<[Block; 16]> = SmallVec::default();

        let dfs = {
            let levels = &self.levels;
            let boundary = &mut boundary;

            run_dfs(cfg, to, |_, succ| {
                if levels[&succ] > level {
                    return true;
                }

                if !boundary.contains(&succ) {
                    boundary.push(succ);
                }

                false
            })
        };

        // the shallowest NCA of the erased root and a boundary successor is
        // the top of the region whose dominators may still move
        let mut min_node = to;

        for block in boundary.iter() {
            let nca = self.find_nca(*block, to);

            if nca != *block && self.levels[&nca] < self.levels[&min_node] {
                min_node = nca;
            }
        }

        // children die before their parent
        for block in dfs.num_to_node.iter().rev() {
            self.erase_node(*block);
        }

        if min_node == to {
            return;
        }

        self.rebuild_region(cfg, min_node);
    }

    // Re-runs Semi-NCA over everything below `top`, reattaching `top` to
    // its existing parent. When `top` is the root this degenerates into a
    // from-scratch recomputation of the whole tree.
    fn rebuild_region(&mut self, cfg: &Cfg, top: Block) {
        let attach = (top != self.root).then(|| self.idoms[&top]);
        let bound = self.levels[&top];

        let dfs = {
            let levels = &self.levels;

            run_dfs(cfg, top, |_, succ| {
                levels.get(&succ).is_some_and(|level| *level > bound)
            })
        };

        self.apply_dfs_region(&dfs, attach);
    }

    fn erase_node(&mut self, block: Block) {
        self.in_out_valid.set(false);

        if let Some(parent) = self.idoms.remove(&block) {
            if parent != block {
                if let Some(kids) = self.children.get_mut(&parent) {
                    if let Some(idx) = kids.iter().position(|kid| *kid == block) {
                        kids.swap_remove(idx);
                    }
                }
            }
        }

        self.levels.remove(&block);
        self.rdoms.remove(&block);
        self.preorder_parents.remove(&block);
        self.children.remove(&block);
    }

    // Assigns monotonically increasing entry/exit numbers over the tree so
    // `dominates` is interval containment.
    fn recompute_in_out_nums(&self) {
        let mut cache = self.in_out.borrow_mut();

        cache.clear();

        let mut counter = 0u32;
        let mut stack: SmallVec<[(Block, usize); 16]> = smallvec![(self.root, 0)];

        cache.insert(self.root, (counter, 0));

        while let Some(&(block, next_child)) = stack.last() {
            let child = self.children_of(block).get(next_child).copied();

            match child {
                Some(child) => {
                    stack.last_mut().unwrap().1 += 1;
                    counter += 1;
                    cache.insert(child, (counter, 0));
                    stack.push((child, 0));
                }
                None => {
                    counter += 1;
                    cache.get_mut(&block).unwrap().1 = counter;
                    stack.pop();
                }
            }
        }

        self.in_out_valid.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Verify;

    // materializes the harness-style graph: nodes 1..=n, entry is node 1
    fn graph(n: usize, arcs: &[(usize, usize)]) -> (Cfg, Vec<Block>) {
        let mut cfg = Cfg::new();
        let blocks: Vec<_> = (1..=n)
            .map(|i| {
                if i == 1 {
                    cfg.create_block(format!("entry_n_{i}"))
                } else {
                    cfg.create_block(format!("n_{i}"))
                }
            })
            .collect();

        for (from, to) in arcs {
            cfg.connect(blocks[from - 1], blocks[to - 1]);
        }

        (cfg, blocks)
    }

    fn idoms_of(tree: &DomTree, blocks: &[Block]) -> Vec<Option<Block>> {
        blocks.iter().map(|b| tree.idom(*b)).collect()
    }

    #[test]
    fn linear_chain() {
        let (cfg, b) = graph(4, &[(1, 2), (2, 3), (3, 4)]);
        let tree = DomTree::compute(&cfg, b[0]);

        assert_eq!(tree.idom(b[0]), Some(b[0]));
        assert_eq!(tree.idom(b[1]), Some(b[0]));
        assert_eq!(tree.idom(b[2]), Some(b[1]));
        assert_eq!(tree.idom(b[3]), Some(b[2]));

        for (i, block) in b.iter().enumerate() {
            assert_eq!(tree.level(*block), i as u32);
        }

        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn diamond() {
        let (cfg, b) = graph(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let tree = DomTree::compute(&cfg, b[0]);

        for block in b.iter().skip(1) {
            assert_eq!(tree.idom(*block), Some(b[0]));
        }

        assert!(tree.dominates(b[0], b[3]));
        assert!(!tree.dominates(b[1], b[3]));
        assert!(!tree.dominates(b[2], b[3]));
        assert_eq!(tree.find_nca(b[1], b[2]), b[0]);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn back_arc_insertion_changes_nothing() {
        let (mut cfg, b) = graph(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);
        let before = idoms_of(&tree, &b);

        cfg.connect(b[3], b[2]);
        tree.insert_arc(&cfg, b[3], b[2]);

        assert_eq!(idoms_of(&tree, &b), before);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn deletion_erases_the_unreachable_subtree() {
        let (mut cfg, b) = graph(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        cfg.disconnect(b[0], b[1]);
        tree.delete_arc(&cfg, b[0], b[1]);

        assert!(!tree.contains(b[1]));
        assert_eq!(tree.idom(b[1]), None);
        assert!(!tree.dominates(b[1], b[3]));

        // node 4 is now only reachable through node 3
        assert_eq!(tree.idom(b[3]), Some(b[2]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn loop_with_header_and_shortcut() {
        let (mut cfg, b) = graph(4, &[(1, 2), (2, 3), (3, 2), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        assert_eq!(tree.idom(b[1]), Some(b[0]));
        assert_eq!(tree.idom(b[2]), Some(b[1]));
        assert_eq!(tree.idom(b[3]), Some(b[2]));
        assert!(tree.verify(&cfg, Verify::FULL));

        cfg.connect(b[0], b[3]);
        tree.insert_arc(&cfg, b[0], b[3]);

        assert_eq!(tree.idom(b[3]), Some(b[0]));
        assert_eq!(tree.level(b[3]), 1);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn unreachable_growth() {
        let (mut cfg, b) = graph(4, &[(1, 2)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        assert!(!tree.contains(b[2]));
        assert!(!tree.contains(b[3]));

        // both endpoints unknown: the tree must accept the arc and stay put
        cfg.connect(b[2], b[3]);
        tree.insert_arc(&cfg, b[2], b[3]);

        assert!(!tree.contains(b[2]));
        assert!(!tree.contains(b[3]));
        assert!(tree.verify(&cfg, Verify::FULL));

        // now the detached pair gets connected to the reachable part
        cfg.connect(b[1], b[2]);
        tree.insert_arc(&cfg, b[1], b[2]);

        assert_eq!(tree.idom(b[2]), Some(b[1]));
        assert_eq!(tree.idom(b[3]), Some(b[2]));
        assert_eq!(tree.level(b[3]), 3);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn unreachable_growth_with_crossing_arc() {
        // the detached cluster {4, 5} arcs back into the deep reachable
        // node 3, whose dominators must hoist once the cluster attaches
        let (mut cfg, b) = graph(5, &[(1, 2), (2, 3), (4, 5), (5, 3)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        assert_eq!(tree.idom(b[2]), Some(b[1]));
        assert!(!tree.contains(b[3]));

        cfg.connect(b[0], b[3]);
        tree.insert_arc(&cfg, b[0], b[3]);

        assert_eq!(tree.idom(b[3]), Some(b[0]));
        assert_eq!(tree.idom(b[4]), Some(b[3]));
        assert_eq!(tree.idom(b[2]), Some(b[0]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn insertion_repairs_levels_below_the_hoist() {
        let (mut cfg, b) = graph(5, &[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        cfg.connect(b[0], b[3]);
        tree.insert_arc(&cfg, b[0], b[3]);

        assert_eq!(tree.idom(b[3]), Some(b[0]));
        assert_eq!(tree.level(b[3]), 1);
        assert_eq!(tree.idom(b[4]), Some(b[3]));
        assert_eq!(tree.level(b[4]), 2);
        assert!(!tree.dominates(b[2], b[4]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn inserting_a_present_arc_is_idempotent() {
        let (mut cfg, b) = graph(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);
        let before = idoms_of(&tree, &b);

        cfg.connect(b[1], b[3]);
        tree.insert_arc(&cfg, b[1], b[3]);

        assert_eq!(idoms_of(&tree, &b), before);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn deleting_one_of_two_parallel_arcs_is_idempotent() {
        let (mut cfg, b) = graph(2, &[(1, 2), (1, 2)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        cfg.disconnect(b[0], b[1]);
        tree.delete_arc(&cfg, b[0], b[1]);

        assert_eq!(tree.idom(b[1]), Some(b[0]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn delete_then_reinsert_restores_the_tree() {
        let (mut cfg, b) = graph(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);
        let before = idoms_of(&tree, &b);

        cfg.disconnect(b[2], b[3]);
        tree.delete_arc(&cfg, b[2], b[3]);

        // with only one arc left into node 4, its idom sinks
        assert_eq!(tree.idom(b[3]), Some(b[1]));
        assert!(tree.verify(&cfg, Verify::FULL));

        cfg.connect(b[2], b[3]);
        tree.insert_arc(&cfg, b[2], b[3]);

        assert_eq!(idoms_of(&tree, &b), before);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn insert_then_delete_restores_the_tree() {
        let (mut cfg, b) = graph(4, &[(1, 2), (2, 3), (3, 2), (3, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);
        let before = idoms_of(&tree, &b);

        cfg.connect(b[0], b[3]);
        tree.insert_arc(&cfg, b[0], b[3]);

        assert_eq!(tree.idom(b[3]), Some(b[0]));

        cfg.disconnect(b[0], b[3]);
        tree.delete_arc(&cfg, b[0], b[3]);

        assert_eq!(idoms_of(&tree, &b), before);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn deletion_with_live_successor_rebuilds_through_the_root() {
        let (mut cfg, b) = graph(4, &[(1, 2), (2, 3), (3, 4), (1, 4)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        cfg.disconnect(b[1], b[2]);
        tree.delete_arc(&cfg, b[1], b[2]);

        assert!(!tree.contains(b[2]));
        assert_eq!(tree.idom(b[3]), Some(b[0]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn deleting_a_back_arc_changes_nothing() {
        let (mut cfg, b) = graph(3, &[(1, 2), (2, 3), (3, 2)]);
        let mut tree = DomTree::compute(&cfg, b[0]);
        let before = idoms_of(&tree, &b);

        cfg.disconnect(b[2], b[1]);
        tree.delete_arc(&cfg, b[2], b[1]);

        assert_eq!(idoms_of(&tree, &b), before);
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn self_loops_are_inert() {
        let (mut cfg, b) = graph(2, &[(1, 2)]);
        let mut tree = DomTree::compute(&cfg, b[0]);

        cfg.connect(b[1], b[1]);
        tree.insert_arc(&cfg, b[1], b[1]);

        assert_eq!(tree.idom(b[1]), Some(b[0]));
        assert!(tree.verify(&cfg, Verify::FULL));

        cfg.disconnect(b[1], b[1]);
        tree.delete_arc(&cfg, b[1], b[1]);

        assert_eq!(tree.idom(b[1]), Some(b[0]));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn nca_and_dominates_agree() {
        let (cfg, b) = graph(6, &[(1, 2), (2, 3), (2, 4), (3, 5), (4, 5), (5, 6)]);
        let tree = DomTree::compute(&cfg, b[0]);

        for a in b.iter() {
            for other in b.iter() {
                let by_nca = tree.find_nca(*a, *other) == *a;

                assert_eq!(tree.dominates(*a, *other), by_nca);
            }
        }

        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn update_sequence_matches_the_oracle() {
        // the nine-block irreducible graph from the classic dominator
        // literature, then a pile of updates over it
        let arcs = [
            (1, 2),
            (1, 3),
            (2, 5),
            (2, 9),
            (3, 4),
            (4, 2),
            (5, 6),
            (5, 8),
            (6, 3),
            (6, 7),
            (7, 1),
            (7, 4),
            (8, 7),
            (9, 5),
            (9, 8),
        ];
        let (mut cfg, b) = graph(9, &arcs);
        let mut tree = DomTree::compute(&cfg, b[0]);

        assert!(tree.verify(&cfg, Verify::FULL));

        let updates: &[(char, usize, usize)] = &[
            ('i', 1, 7),
            ('d', 8, 7),
            ('i', 4, 9),
            ('d', 2, 9),
            ('d', 1, 3),
            ('i', 6, 9),
            ('d', 3, 4),
            ('i', 1, 3),
        ];

        for (kind, from, to) in updates.iter().copied() {
            let (from, to) = (b[from - 1], b[to - 1]);

            if kind == 'i' {
                cfg.connect(from, to);
                tree.insert_arc(&cfg, from, to);
            } else {
                cfg.disconnect(from, to);
                tree.delete_arc(&cfg, from, to);
            }

            assert!(tree.verify(&cfg, Verify::FULL));
        }
    }
}
