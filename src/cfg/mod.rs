//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The control-flow graph that the dominator engine observes.
//!
//! The graph is a plain directed multigraph of named blocks with a
//! distinguished entry chosen by the caller; the dominator tree never owns
//! it, it only holds [`Block`] handles and enumerates arcs through it.

mod block;
mod graph;

pub use block::*;
pub use graph::*;
