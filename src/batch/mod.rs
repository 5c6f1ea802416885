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

//! Batch Merkle updates.
//!
//! A batch transitions a tree from a pre-root to a post-root by updating a
//! sequence of leaves, one after the other. Every step proves the current
//! content of the slot against the current root before replacing it:
//!
//!  - insertion of `leaf` at `index`: the slot holds [`EMPTY_LEAF`] under the
//!    current root, the new root has `leaf` at `index`;
//!  - deletion of `leaf` at `index`: the slot holds `leaf` under the current
//!    root, the new root has [`EMPTY_LEAF`] at `index`.
//!
//! The authentication path of a step is taken against the tree as left by the
//! previous step. Insertions target the contiguous range of indices starting
//! at a public start index, deletions target arbitrary indices.
//!
//! Leaf indices are decomposed into exactly `depth` bits, which are the
//! direction bits of the path. This decomposition range-checks the index: a
//! batch that runs past the last leaf of the tree has no valid assignment.

pub mod cpu;
mod batch_gadget;

pub use batch_gadget::{delete_batch, insert_batch};

/// Value of an empty leaf.
pub const EMPTY_LEAF: u64 = 0;
