//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The dominator tree itself: Semi-NCA construction over a parameterized
//! depth-first numbering, incremental arc insertion/deletion, queries, the
//! self-verifier, and the printer/exporter.

mod dfs;
mod print;
mod semi_nca;
mod tree;
mod verify;

pub use print::*;
pub use tree::*;
pub use verify::*;

pub(crate) use dfs::*;
