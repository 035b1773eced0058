//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::dense_arena_key;
use smallvec::SmallVec;

dense_arena_key! {
    /// References a single basic block in a control-flow graph.
    ///
    /// Must be resolved with a [`Cfg`](crate::cfg::Cfg) into an actual
    /// [`BlockData`] object. Equality and hashing are total, which is all
    /// the dominator engine requires of a node identity.
    pub struct Block;
}

/// Models a single basic block: a name and the ordered arcs leaving it.
///
/// Arcs model the original terminator faithfully: they are a *multiset*,
/// kept in insertion order, and removing an arc removes the first
/// occurrence only. Predecessor arcs are maintained symmetrically so the
/// engine can enumerate them without scanning the whole graph.
pub struct BlockData {
    name: String,
    successors: SmallVec<[Block; 4]>,
    predecessors: SmallVec<[Block; 4]>,
}

impl BlockData {
    pub(in crate::cfg) fn new(name: String) -> Self {
        Self {
            name,
            successors: SmallVec::default(),
            predecessors: SmallVec::default(),
        }
    }

    /// Gets the name of the block.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The blocks this one branches to, in arc insertion order.
    pub fn successors(&self) -> &[Block] {
        &self.successors
    }

    /// The blocks that branch to this one.
    pub fn predecessors(&self) -> &[Block] {
        &self.predecessors
    }

    pub(in crate::cfg) fn push_successor(&mut self, to: Block) {
        self.successors.push(to);
    }

    pub(in crate::cfg) fn push_predecessor(&mut self, from: Block) {
        self.predecessors.push(from);
    }

    pub(in crate::cfg) fn remove_successor(&mut self, to: Block) -> bool {
        remove_first(&mut self.successors, to)
    }

    pub(in crate::cfg) fn remove_predecessor(&mut self, from: Block) -> bool {
        remove_first(&mut self.predecessors, from)
    }
}

fn remove_first(arcs: &mut SmallVec<[Block; 4]>, block: Block) -> bool {
    match arcs.iter().position(|b| *b == block) {
        Some(idx) => {
            arcs.remove(idx);

            true
        }
        None => false,
    }
}
