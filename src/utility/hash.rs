//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::collections::{HashMap, HashSet};

/// A `HashMap` hashing with `ahash::RandomState` instead of SipHash.
///
/// Nearly every map in the engine is keyed by [`Block`](crate::cfg::Block),
/// a 4-byte id, and the idom/level maps are hit on every query and on every
/// step of the update algorithms. ahash is much cheaper than the default
/// hasher for keys that small, and we don't need SipHash's DoS resistance
/// for in-process block ids.
pub type GaHashMap<K, V> = HashMap<K, V, ahash::RandomState>;

/// The companion `HashSet`, mostly holding the visited/affected block sets
/// that the insertion search and the verifier carry around. Same hasher,
/// same reasoning as [`GaHashMap`].
pub type GaHashSet<V> = HashSet<V, ahash::RandomState>;
