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
use crate::dom::{run_dfs, DomTree};
use bitflags::bitflags;

bitflags! {
    /// Selects which checks [`DomTree::verify`] runs.
    pub struct Verify: u32 {
        /// Reachability, level arithmetic, and NCA consistency. These only
        /// read the tree and the graph.
        const BASIC = 1;
        /// The parent property: every path from the root to a block goes
        /// through its immediate dominator. Checked by walking the graph
        /// with the idom taken out.
        const CFG = 2;
        /// The sibling property: no block dominates a sibling in the tree.
        /// Checked by walking the graph with one sibling taken out.
        const SIBLING = 4;
        /// Elementwise comparison against a freshly computed tree.
        const ORACLE = 8;
        /// The checks worth running after every update in a debug build.
        const NORMAL = Self::BASIC.bits | Self::CFG.bits | Self::ORACLE.bits;
        /// Everything, including the quadratic sibling check.
        const FULL = Self::BASIC.bits | Self::CFG.bits | Self::SIBLING.bits | Self::ORACLE.bits;
    }
}

impl DomTree {
    /// Runs the selected self-checks against `cfg`, which must be the graph
    /// the tree has been tracking.
    ///
    /// Returns whether every selected check passed; failures are logged
    /// with enough detail to pin down the offending blocks, and the tree is
    /// left intact so it can be inspected afterwards.
    pub fn verify(&self, cfg: &Cfg, checks: Verify) -> bool {
        let mut ok = true;

        if checks.contains(Verify::BASIC) {
            ok &= self.verify_reachability(cfg);
            ok &= self.verify_levels(cfg);
            ok &= self.verify_nca(cfg);
        }

        if checks.contains(Verify::CFG) {
            ok &= self.verify_parent_property(cfg);
        }

        if checks.contains(Verify::SIBLING) {
            ok &= self.verify_sibling_property(cfg);
        }

        if checks.contains(Verify::ORACLE) {
            ok &= self.verify_oracle(cfg);
        }

        ok
    }

    // The tree must cover exactly the set of nodes reachable from the root
    // in the current graph.
    fn verify_reachability(&self, cfg: &Cfg) -> bool {
        let dfs = run_dfs(cfg, self.root(), |_, _| true);
        let mut ok = true;

        for block in dfs.num_to_node.iter() {
            if !self.contains(*block) {
                log::error!(
                    "verification: {} is reachable but not in the tree",
                    cfg.block_name(*block)
                );

                ok = false;
            }
        }

        for block in self.reachable() {
            if !dfs.visited(block) {
                log::error!(
                    "verification: {} is in the tree but unreachable",
                    cfg.block_name(block)
                );

                ok = false;
            }
        }

        ok
    }

    // level(n) = level(idom(n)) + 1 everywhere, with the root at zero.
    fn verify_levels(&self, cfg: &Cfg) -> bool {
        let mut ok = true;

        for block in self.reachable() {
            let level = self.level(block);
            let idom = self.idom(block).unwrap();

            let expected = if block == self.root() {
                0
            } else {
                self.level(idom) + 1
            };

            if level != expected {
                log::error!(
                    "verification: {} has level {level}, expected {expected} (idom {})",
                    cfg.block_name(block),
                    cfg.block_name(idom)
                );

                ok = false;
            }
        }

        ok
    }

    // For every pair of reachable blocks, the NCA must dominate both, and
    // no child of the NCA may dominate both (otherwise the NCA wasn't the
    // nearest one).
    fn verify_nca(&self, cfg: &Cfg) -> bool {
        let mut blocks: Vec<Block> = self.reachable().collect();
        let mut ok = true;

        blocks.sort();

        for first in blocks.iter() {
            for second in blocks.iter() {
                let nca = self.find_nca(*first, *second);

                if !self.dominates(nca, *first) || !self.dominates(nca, *second) {
                    log::error!(
                        "verification: NCA({}, {}) = {} does not dominate both",
                        cfg.block_name(*first),
                        cfg.block_name(*second),
                        cfg.block_name(nca)
                    );

                    ok = false;

                    continue;
                }

                for child in self.children_of(nca) {
                    if self.dominates(*child, *first) && self.dominates(*child, *second) {
                        log::error!(
                            "verification: NCA({}, {}) = {} is not the deepest, {} is closer",
                            cfg.block_name(*first),
                            cfg.block_name(*second),
                            cfg.block_name(nca),
                            cfg.block_name(*child)
                        );

                        ok = false;
                    }
                }
            }
        }

        ok
    }

    // Removing idom(n) from the graph must make n unreachable. Walking
    // with a descend predicate that refuses the idom is equivalent to
    // removing it, without having to touch the graph.
    fn verify_parent_property(&self, cfg: &Cfg) -> bool {
        let mut ok = true;

        for block in self.reachable() {
            let idom = self.idom(block).unwrap();

            // trivially true, every path starts at the root
            if block == self.root() || idom == self.root() {
                continue;
            }

            let dfs = run_dfs(cfg, self.root(), |_, succ| succ != idom);

            if dfs.visited(block) {
                log::error!(
                    "verification: {} is reachable without its idom {}",
                    cfg.block_name(block),
                    cfg.block_name(idom)
                );

                ok = false;
            }
        }

        ok
    }

    // Removing one sibling from the graph must leave every other sibling
    // reachable, i.e. siblings never dominate each other.
    fn verify_sibling_property(&self, cfg: &Cfg) -> bool {
        let mut ok = true;

        for parent in self.reachable() {
            let siblings = self.children_of(parent);

            if siblings.len() < 2 {
                continue;
            }

            for removed in siblings {
                let dfs = run_dfs(cfg, self.root(), |_, succ| succ != *removed);

                for sibling in siblings {
                    if sibling != removed && !dfs.visited(*sibling) {
                        log::error!(
                            "verification: sibling {} dominates sibling {}",
                            cfg.block_name(*removed),
                            cfg.block_name(*sibling)
                        );

                        ok = false;
                    }
                }
            }
        }

        ok
    }

    // The incrementally maintained idoms must match a from-scratch pass.
    fn verify_oracle(&self, cfg: &Cfg) -> bool {
        let fresh = DomTree::compute(cfg, self.root());
        let mut ok = true;

        if fresh.idoms_map().len() != self.idoms_map().len() {
            log::error!(
                "verification: tree covers {} blocks, a fresh computation covers {}",
                self.idoms_map().len(),
                fresh.idoms_map().len()
            );

            ok = false;
        }

        for (block, idom) in self.idoms_map() {
            match fresh.idom(*block) {
                Some(expected) if expected == *idom => {}
                Some(expected) => {
                    log::error!(
                        "verification: idom({}) = {}, a fresh computation says {}",
                        cfg.block_name(*block),
                        cfg.block_name(*idom),
                        cfg.block_name(expected)
                    );

                    ok = false;
                }
                None => {
                    log::error!(
                        "verification: {} is in the tree but not in a fresh computation",
                        cfg.block_name(*block)
                    );

                    ok = false;
                }
            }
        }

        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Cfg, [Block; 4]) {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry_n_1");
        let lhs = cfg.create_block("n_2");
        let rhs = cfg.create_block("n_3");
        let merge = cfg.create_block("n_4");

        cfg.connect(entry, lhs);
        cfg.connect(entry, rhs);
        cfg.connect(lhs, merge);
        cfg.connect(rhs, merge);

        (cfg, [entry, lhs, rhs, merge])
    }

    #[test]
    fn a_correct_tree_passes_everything() {
        let (cfg, [entry, ..]) = diamond();
        let tree = DomTree::compute(&cfg, entry);

        assert!(tree.verify(&cfg, Verify::BASIC));
        assert!(tree.verify(&cfg, Verify::NORMAL));
        assert!(tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn a_misparented_node_is_caught() {
        let (cfg, [entry, lhs, _, merge]) = diamond();
        let mut tree = DomTree::compute(&cfg, entry);

        // hang the merge block under one side of the branch
        tree.set_idom(merge, lhs);

        assert!(!tree.verify(&cfg, Verify::BASIC));
        assert!(!tree.verify(&cfg, Verify::CFG));
        assert!(!tree.verify(&cfg, Verify::ORACLE));
        assert!(!tree.verify(&cfg, Verify::FULL));
    }

    #[test]
    fn masks_compose() {
        assert_eq!(Verify::NORMAL, Verify::BASIC | Verify::CFG | Verify::ORACLE);
        assert_eq!(Verify::FULL, Verify::NORMAL | Verify::SIBLING);
        assert!(Verify::FULL.contains(Verify::SIBLING));
        assert!(!Verify::NORMAL.contains(Verify::SIBLING));
    }
}
