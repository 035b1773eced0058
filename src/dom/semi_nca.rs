//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::dom::DfsResult;
use smallvec::SmallVec;

/// Working state for one node during a Semi-NCA pass, everything stored as
/// preorder numbers into the DFS being processed.
///
/// `parent` starts as the spanning-tree parent and is destroyed by path
/// compression; `idom` also starts as the spanning-tree parent and holds
/// the immediate dominator (as a preorder number) once the pass finishes.
pub(crate) struct SncaNode {
    pub(crate) parent: u32,
    pub(crate) semi: u32,
    pub(crate) label: u32,
    pub(crate) idom: u32,
}

/// Runs the Semi-NCA algorithm over a DFS region and returns the per-node
/// results, indexed by preorder number.
///
/// The algorithm is the one described in "Linear-Time Algorithms for
/// Dominators and Related Problems" (Georgiadis, 2005): semidominators are
/// computed in decreasing preorder with label-based path compression over
/// a virtual forest, then each node's immediate dominator is the nearest
/// common ancestor of its semidominator and its spanning-tree parent,
/// found by ascending the (already final) idom chain.
///
/// Predecessors that the DFS did not number are ignored; that is the
/// mechanism that keeps incremental rebuilds local to the region the
/// update can affect. The sub-root (preorder number 0) is left untouched
/// and its `idom` result is meaningless.
pub(crate) fn compute_idoms(dfs: &DfsResult) -> Vec<SncaNode> {
    let count = dfs.num_to_node.len();
    let mut nodes: Vec<SncaNode> = Vec::with_capacity(count);

    for (i, block) in dfs.num_to_node.iter().enumerate() {
        let parent = dfs.info[block]
            .parent
            .expand()
            .and_then(|p| dfs.number_of(p))
            .unwrap_or(0);

        nodes.push(SncaNode {
            parent,
            semi: i as u32,
            label: i as u32,
            idom: parent,
        });
    }

    // Step 1: semidominators, in decreasing preorder. While processing node
    // `i`, every node numbered above `i` has been linked into the virtual
    // forest, so `eval` is told that `i + 1` is the first linked number.
    let mut eval_stack = SmallVec::<[u32; 32]>::default();

    for i in (1..count).rev() {
        nodes[i].semi = nodes[i].parent;

        let block = dfs.num_to_node[i];

        for pred in dfs.info[&block].predecessors.iter() {
            let Some(pred_num) = dfs.number_of(*pred) else {
                // outside the region this pass covers
                continue;
            };

            let witness = eval(&mut nodes, pred_num, i as u32 + 1, &mut eval_stack);
            let candidate = nodes[witness as usize].semi;

            if candidate < nodes[i].semi {
                nodes[i].semi = candidate;
            }
        }
    }

    // Step 2: idom(w) = NCA(sdom(w), parent(w)), in increasing preorder so
    // that the chain below is final for everything it steps through.
    for i in 1..count {
        let semi = nodes[i].semi;
        let mut idom = nodes[i].idom;

        while idom > semi {
            idom = nodes[idom as usize].idom;
        }

        nodes[i].idom = idom;
    }

    nodes
}

// For a predecessor `v` of the node currently being processed, returns the
// node with the minimal semidominator on the virtual-forest path from `v`
// (inclusive) up to the forest root `v` hangs off of. Returns `v` itself
// when `v` is not linked yet, which covers predecessors numbered before
// the current node.
//
// Walking parent pointers is O(depth), so the walked path is compressed:
// every node on it ends up pointing directly at the root's parent, with
// its label updated to the best witness seen between it and the root.
fn eval(
    nodes: &mut [SncaNode],
    v: u32,
    first_linked: u32,
    stack: &mut SmallVec<[u32; 32]>,
) -> u32 {
    if nodes[v as usize].parent < first_linked {
        return nodes[v as usize].label;
    }

    // collect the linked chain above `v`, excluding the chain root
    stack.clear();

    let mut curr = v;

    loop {
        stack.push(curr);
        curr = nodes[curr as usize].parent;

        if nodes[curr as usize].parent < first_linked {
            break;
        }
    }

    // `curr` is now the chain root; shortcut everything on the chain to the
    // root's parent, pulling the best label down the path
    let root_parent = nodes[curr as usize].parent;
    let mut best = nodes[curr as usize].label;

    while let Some(w) = stack.pop() {
        let w = w as usize;

        nodes[w].parent = root_parent;

        if nodes[nodes[w].label as usize].semi <= nodes[best as usize].semi {
            best = nodes[w].label;
        } else {
            nodes[w].label = best;
        }
    }

    nodes[v as usize].label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::Cfg;
    use crate::dom::run_dfs;

    #[test]
    fn straight_line_idoms_are_parents() {
        let mut cfg = Cfg::new();
        let blocks: Vec<_> = (0..4).map(|i| cfg.create_block(format!("n_{i}"))).collect();

        for pair in blocks.windows(2) {
            cfg.connect(pair[0], pair[1]);
        }

        let dfs = run_dfs(&cfg, blocks[0], |_, _| true);
        let nodes = compute_idoms(&dfs);

        for i in 1..4 {
            assert_eq!(nodes[i].idom, i as u32 - 1);
        }
    }

    #[test]
    fn diamond_merge_hoists_to_the_branch() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");
        let lhs = cfg.create_block("lhs");
        let rhs = cfg.create_block("rhs");
        let merge = cfg.create_block("merge");

        cfg.connect(entry, lhs);
        cfg.connect(entry, rhs);
        cfg.connect(lhs, merge);
        cfg.connect(rhs, merge);

        let dfs = run_dfs(&cfg, entry, |_, _| true);
        let nodes = compute_idoms(&dfs);

        // preorder is entry, lhs, merge, rhs
        assert_eq!(nodes[1].idom, 0);
        assert_eq!(nodes[2].idom, 0);
        assert_eq!(nodes[3].idom, 0);

        // merge's semidominator is the branch, not the spanning parent
        assert_eq!(dfs.num_to_node[nodes[2].semi as usize], entry);
    }

    #[test]
    fn loop_body_stays_under_the_header() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");
        let head = cfg.create_block("head");
        let body = cfg.create_block("body");
        let exit = cfg.create_block("exit");

        cfg.connect(entry, head);
        cfg.connect(head, body);
        cfg.connect(body, head);
        cfg.connect(body, exit);

        let dfs = run_dfs(&cfg, entry, |_, _| true);
        let nodes = compute_idoms(&dfs);

        // preorder is entry, head, body, exit; the back arc body -> head
        // must not hoist anything
        assert_eq!(dfs.num_to_node[nodes[1].idom as usize], entry);
        assert_eq!(dfs.num_to_node[nodes[2].idom as usize], head);
        assert_eq!(dfs.num_to_node[nodes[3].idom as usize], body);
    }

    #[test]
    fn irreducible_region_hoists_to_the_split() {
        // entry branches to both sides of a two-node cycle, so neither side
        // dominates the other
        let mut cfg = Cfg::new();
        let entry = cfg.create_block("entry");
        let left = cfg.create_block("left");
        let right = cfg.create_block("right");

        cfg.connect(entry, left);
        cfg.connect(entry, right);
        cfg.connect(left, right);
        cfg.connect(right, left);

        let dfs = run_dfs(&cfg, entry, |_, _| true);
        let nodes = compute_idoms(&dfs);

        for i in 1..3 {
            assert_eq!(dfs.num_to_node[nodes[i].idom as usize], entry);
        }
    }
}
