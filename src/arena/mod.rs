//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Provides typed arena keys and the arena map they index into.
//!
//! Entities (e.g. basic blocks) are referred to by small copyable keys
//! instead of references, which keeps every data structure that mentions
//! them flat and cheap to hash.

mod key;
mod map;

pub use key::*;
pub use map::*;
