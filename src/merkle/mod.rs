// This file is part of MIDNIGHT-ZK.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Merkle tree authentication paths.
//!
//! Nodes are combined with a two-to-one hash `H(left, right)`. An
//! authentication path lists, from the leaf level up to the root, the sibling
//! of every node on the way together with a direction bit: `0` if the node is
//! a left child, `1` if it is a right child. The direction bits of the leaf at
//! index `i` are the little-endian bits of `i`.
//!
//! ```text
//!                 root
//!             /          \
//!          n_10          n_11
//!         /    \        /    \
//!       l_0    l_1    l_2    l_3
//! ```
//!
//! The path of `l_2` is `[(l_3, 0), (n_10, 1)]`.

pub mod cpu;
mod merkle_gadget;

pub use merkle_gadget::{balanced_root, recompute_root, AssignedMerklePath};

/// Maximum depth of the trees handled by this crate. Leaf indices are `u64`.
pub const MAX_TREE_DEPTH: usize = 63;
