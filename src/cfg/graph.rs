//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaMap;
use crate::cfg::{Block, BlockData};

/// A directed multigraph of named basic blocks.
///
/// Blocks are created once and never destroyed; arcs are connected and
/// disconnected freely. Successor enumeration is ordered and
/// deterministic, which the depth-first numbering relies on.
///
/// ```
/// # use garnet::cfg::Cfg;
/// let mut cfg = Cfg::new();
/// let entry = cfg.create_block("entry");
/// let exit = cfg.create_block("exit");
///
/// cfg.connect(entry, exit);
///
/// assert_eq!(cfg.successors(entry).collect::<Vec<_>>(), vec![exit]);
/// assert_eq!(cfg.predecessors(exit).collect::<Vec<_>>(), vec![entry]);
/// ```
pub struct Cfg {
    blocks: ArenaMap<Block, BlockData>,
}

impl Cfg {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            blocks: ArenaMap::default(),
        }
    }

    /// Creates a new block with no arcs.
    pub fn create_block(&mut self, name: impl Into<String>) -> Block {
        self.blocks.insert(BlockData::new(name.into()))
    }

    /// Adds the arc `from -> to`.
    ///
    /// Parallel arcs are allowed, each `connect` adds another one.
    pub fn connect(&mut self, from: Block, to: Block) {
        self.blocks[from].push_successor(to);
        self.blocks[to].push_predecessor(from);
    }

    /// Removes one occurrence of the arc `from -> to`.
    ///
    /// The arc must currently be in the graph.
    pub fn disconnect(&mut self, from: Block, to: Block) {
        let removed = self.blocks[from].remove_successor(to);

        assert!(removed, "disconnected an arc that isn't in the graph");

        self.blocks[to].remove_predecessor(from);
    }

    /// Returns an iterator over the successors for a given block, in arc
    /// insertion order.
    pub fn successors(&self, block: Block) -> impl Iterator<Item = Block> + '_ {
        self.blocks[block].successors().iter().copied()
    }

    /// Returns an iterator over the predecessors for a given block.
    pub fn predecessors(&self, block: Block) -> impl Iterator<Item = Block> + '_ {
        self.blocks[block].predecessors().iter().copied()
    }

    /// Gets the name a block was created with.
    pub fn block_name(&self, block: Block) -> &str {
        self.blocks[block].name()
    }

    /// Iterates over every block in the graph in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks.keys()
    }

    /// Returns the number of blocks in the graph.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}
