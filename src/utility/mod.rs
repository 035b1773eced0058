//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Provides several utility APIs that are used inside of various modules
//! of the dominator engine.
//!
//! This is the general catch-all for random utility code.

mod hash;
mod names;
mod packed_option;
mod trees;

pub use hash::*;
pub use names::*;
pub use packed_option::*;
pub use trees::*;
