//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![deny(
    unreachable_pub,
    missing_docs,
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # Garnet
//!
//! An incremental dominator tree engine for rooted control-flow graphs.
//!
//! The tree is built with the Georgiadis–Tarjan Semi-NCA algorithm over a
//! depth-first numbering, and is maintained under single-arc insertions and
//! deletions without being recomputed from scratch. Queries (immediate
//! dominator, level, nearest common ancestor, `dominates`) run off cached
//! auxiliary data, and the whole structure can verify itself against a
//! from-scratch oracle.

pub mod arena;
pub mod cfg;
pub mod dom;
pub mod reader;
pub mod utility;

#[cfg(feature = "dev-tools")]
pub mod cli;

pub use cfg::{Block, Cfg};
pub use dom::DomTree;
pub use reader::parse_graph_script;
