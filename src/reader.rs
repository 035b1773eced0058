//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Reads the line-oriented graph-script language that test graphs and
//! their update sequences are written in.
//!
//! A script is a problem header, the initial arcs, and a list of deferred
//! updates to replay one at a time; a blank line (or the end of input)
//! terminates it:
//!
//! ```none
//! p 4 4 1 0      problem: 4 nodes, 4 arcs, entry is node 1
//! a 1 2          initial arc 1 -> 2
//! a 1 3
//! a 2 4
//! a 3 4
//! e              end of the initial graph
//! i 4 3          deferred: insert arc 4 -> 3
//! d 1 2          deferred: delete arc 1 -> 2
//! ```

use crate::cfg::{Block, Cfg};
use std::error::Error;
use std::fmt;
use std::str::SplitWhitespace;

/// Whether a deferred update adds or removes its arc.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UpdateKind {
    /// The arc gets connected.
    Insert,
    /// The arc gets disconnected.
    Delete,
}

/// One deferred update from a graph script.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Update {
    /// Whether to insert or delete the arc.
    pub kind: UpdateKind,
    /// The 1-based source node.
    pub from: u32,
    /// The 1-based destination node.
    pub to: u32,
}

/// A parsed graph script: the initial graph plus its deferred updates.
#[derive(Default, Debug)]
pub struct GraphScript {
    /// Number of nodes, numbered `1..=nodes`.
    pub nodes: u32,
    /// The 1-based entry node.
    pub entry: u32,
    /// The initial arcs, in script order.
    pub arcs: Vec<(u32, u32)>,
    /// The deferred updates, in script order.
    pub updates: Vec<Update>,
}

/// The ways a graph script can be malformed.
#[derive(Debug, Eq, PartialEq)]
pub enum ScriptError {
    /// A line had a known action but wasn't otherwise well-formed.
    Parse {
        /// 1-based line the error was found on.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// A line began with an opcode the language doesn't have.
    UnknownAction {
        /// 1-based line the error was found on.
        line: usize,
        /// The offending opcode.
        action: char,
    },
    /// A second problem header was found.
    DoubleInit {
        /// 1-based line the second header was found on.
        line: usize,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Parse { line, message } => {
                write!(f, "line {line}: {message}")
            }
            ScriptError::UnknownAction { line, action } => {
                write!(f, "line {line}: unknown action '{action}'")
            }
            ScriptError::DoubleInit { line } => {
                write!(f, "line {line}: second problem header")
            }
        }
    }
}

impl Error for ScriptError {}

/// Parses a graph script from `source`.
///
/// The script ends at the first blank line or at the end of the input,
/// whichever comes first.
pub fn parse_graph_script(source: &str) -> Result<GraphScript, ScriptError> {
    let mut script = GraphScript::default();

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;

        if text.trim().is_empty() {
            break;
        }

        let mut tokens = text.split_whitespace();
        let action = tokens.next().unwrap();

        if action.len() != 1 {
            return Err(ScriptError::UnknownAction {
                line,
                action: action.chars().next().unwrap(),
            });
        }

        match action {
            "p" => {
                if script.nodes != 0 {
                    return Err(ScriptError::DoubleInit { line });
                }

                let nodes = field(&mut tokens, line, "node count")?;
                let arcs = field(&mut tokens, line, "arc count")?;
                let entry = field(&mut tokens, line, "entry node")?;
                let _dummy = field(&mut tokens, line, "trailing field")?;

                if nodes == 0 {
                    return Err(parse_error(line, "graph must have at least one node"));
                }

                if entry == 0 || entry > nodes {
                    return Err(parse_error(line, "entry node out of range"));
                }

                script.nodes = nodes;
                script.entry = entry;
                script.arcs.reserve(arcs as usize);
            }
            "a" => {
                let (from, to) = arc(&mut tokens, line, &script)?;

                script.arcs.push((from, to));
            }
            "e" => {}
            "i" | "d" => {
                let (from, to) = arc(&mut tokens, line, &script)?;
                let kind = if action == "i" {
                    UpdateKind::Insert
                } else {
                    UpdateKind::Delete
                };

                script.updates.push(Update { kind, from, to });
            }
            _ => {
                return Err(ScriptError::UnknownAction {
                    line,
                    action: action.chars().next().unwrap(),
                });
            }
        }
    }

    if script.nodes == 0 {
        return Err(parse_error(source.lines().count() + 1, "missing problem header"));
    }

    Ok(script)
}

fn parse_error(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Parse {
        line,
        message: message.into(),
    }
}

fn field(tokens: &mut SplitWhitespace<'_>, line: usize, what: &str) -> Result<u32, ScriptError> {
    tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| parse_error(line, format!("expected {what}")))
}

fn arc(
    tokens: &mut SplitWhitespace<'_>,
    line: usize,
    script: &GraphScript,
) -> Result<(u32, u32), ScriptError> {
    if script.nodes == 0 {
        return Err(parse_error(line, "arc before the problem header"));
    }

    let from = field(tokens, line, "source node")?;
    let to = field(tokens, line, "destination node")?;

    if from == 0 || from > script.nodes || to == 0 || to > script.nodes {
        return Err(parse_error(line, "node out of range"));
    }

    Ok((from, to))
}

/// A graph script realized as an actual [`Cfg`].
pub struct BuiltGraph {
    /// The materialized graph.
    pub cfg: Cfg,
    /// The entry block.
    pub entry: Block,
    blocks: Vec<Block>,
}

impl BuiltGraph {
    /// Resolves a 1-based script node number into its block.
    pub fn block(&self, node: u32) -> Block {
        self.blocks[(node - 1) as usize]
    }
}

impl GraphScript {
    /// Materializes the initial graph.
    ///
    /// The entry's block is named `entry_n_<E>`, every other node `K` gets
    /// a block named `n_<K>`, and the initial arcs are connected in script
    /// order. Deferred updates are *not* applied, replaying those is the
    /// caller's job.
    pub fn build(&self) -> BuiltGraph {
        let mut cfg = Cfg::new();
        let blocks: Vec<Block> = (1..=self.nodes)
            .map(|i| {
                if i == self.entry {
                    cfg.create_block(format!("entry_n_{i}"))
                } else {
                    cfg.create_block(format!("n_{i}"))
                }
            })
            .collect();

        for (from, to) in self.arcs.iter() {
            cfg.connect(blocks[(from - 1) as usize], blocks[(to - 1) as usize]);
        }

        let entry = blocks[(self.entry - 1) as usize];

        BuiltGraph { cfg, entry, blocks }
    }
}
