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

//! Off-circuit Merkle trees.
//!
//! [`MerkleTree`] is a fixed-depth tree whose leaves are all empty (zero) at
//! creation. We do not store all nodes: only the roots of empty subtrees (one
//! per level) and the nodes that have been modified. A tree of depth 30 with a
//! few thousand leaves set is therefore cheap to keep in memory.

use std::{collections::HashMap, marker::PhantomData};

use ff::PrimeField;
use midnight_circuits::instructions::hash::HashCPU;

use super::MAX_TREE_DEPTH;
use crate::{instructions::compress_cpu, Error};

/// A sparse Merkle tree of fixed depth with empty (zero) default leaves.
#[derive(Debug)]
pub struct MerkleTree<F: PrimeField, H> {
    depth: usize,
    root: F,
    // Modified nodes, indexed by their height (0 for leaves) and their
    // position in that level.
    nodes: HashMap<(usize, u64), F>,
    // Roots of empty subtrees, from the leaves (height 0) to the root.
    empty_nodes: Vec<F>,
    _marker: PhantomData<H>,
}

impl<F: PrimeField, H> Clone for MerkleTree<F, H> {
    fn clone(&self) -> Self {
        MerkleTree {
            depth: self.depth,
            root: self.root,
            nodes: self.nodes.clone(),
            empty_nodes: self.empty_nodes.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F: PrimeField, H> PartialEq for MerkleTree<F, H> {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth && self.root == other.root && self.nodes == other.nodes
    }
}

impl<F: PrimeField, H> Eq for MerkleTree<F, H> {}

/// Authentication path of a leaf, from the leaf level to the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath<F: PrimeField> {
    index: u64,
    siblings: Vec<F>,
}

impl<F: PrimeField> MerklePath<F> {
    /// A path for the leaf at `index`.
    pub fn new(index: u64, siblings: Vec<F>) -> Self {
        MerklePath { index, siblings }
    }

    /// Index of the leaf this path authenticates.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Sibling nodes, from the leaf level up.
    pub fn siblings(&self) -> &[F] {
        &self.siblings
    }

    /// Direction bits, from the leaf level up (`true` for a right child).
    pub fn directions(&self) -> Vec<bool> {
        (0..self.siblings.len())
            .map(|height| (self.index >> height) & 1 == 1)
            .collect()
    }

    /// Recomputes the root of a tree holding `leaf` at this path.
    pub fn root_from<H: HashCPU<F, F>>(&self, leaf: &F) -> F {
        self.siblings
            .iter()
            .zip(self.directions())
            .fold(*leaf, |node, (sibling, is_right)| {
                let (left, right) = conditional_swap(is_right, &node, sibling);
                compress_cpu::<F, H>(&left, &right)
            })
    }
}

impl<F, H> MerkleTree<F, H>
where
    F: PrimeField,
    H: HashCPU<F, F>,
{
    /// An empty tree with `2^depth` leaves.
    pub fn new(depth: usize) -> Result<Self, Error> {
        if depth > MAX_TREE_DEPTH {
            return Err(Error::TreeDepth(depth));
        }

        let mut empty_nodes = vec![F::ZERO; depth + 1];
        for height in 1..=depth {
            empty_nodes[height] =
                compress_cpu::<F, H>(&empty_nodes[height - 1], &empty_nodes[height - 1]);
        }

        Ok(Self {
            depth,
            root: empty_nodes[depth],
            nodes: HashMap::new(),
            empty_nodes,
            _marker: PhantomData,
        })
    }

    /// Depth of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current root.
    pub fn root(&self) -> F {
        self.root
    }

    /// Number of leaves.
    pub fn capacity(&self) -> u64 {
        1 << self.depth
    }

    /// Value of the leaf at `index`.
    pub fn leaf(&self, index: u64) -> Result<F, Error> {
        self.check_index(index)?;
        Ok(self.node(0, index))
    }

    /// Sets the leaf at `index` to `value` and updates the root.
    pub fn set(&mut self, index: u64, value: F) -> Result<(), Error> {
        self.check_index(index)?;

        let mut node_index = index;
        let mut node = value;
        for height in 0..self.depth {
            self.nodes.insert((height, node_index), node);
            let sibling = self.node(height, node_index ^ 1);
            let (left, right) = conditional_swap(node_index & 1 == 1, &node, &sibling);
            node = compress_cpu::<F, H>(&left, &right);
            node_index >>= 1;
        }
        self.nodes.insert((self.depth, 0), node);
        self.root = node;

        Ok(())
    }

    /// Authentication path of the leaf at `index`.
    pub fn path(&self, index: u64) -> Result<MerklePath<F>, Error> {
        self.check_index(index)?;

        let siblings = (0..self.depth)
            .map(|height| self.node(height, (index >> height) ^ 1))
            .collect();

        Ok(MerklePath::new(index, siblings))
    }

    fn node(&self, height: usize, index: u64) -> F {
        *self.nodes.get(&(height, index)).unwrap_or(&self.empty_nodes[height])
    }

    fn check_index(&self, index: u64) -> Result<(), Error> {
        if index >= self.capacity() {
            return Err(Error::IndexOutOfRange {
                index,
                depth: self.depth,
            });
        }
        Ok(())
    }
}

/// Root of the balanced tree whose leaves are exactly `leaves`, obtained by
/// hashing consecutive pairs level by level.
///
/// The number of leaves must be a non-zero power of two. A single leaf is its
/// own root.
pub fn balanced_root<F: PrimeField, H: HashCPU<F, F>>(leaves: &[F]) -> Result<F, Error> {
    if !leaves.len().is_power_of_two() {
        return Err(Error::BalancedTreeSize(leaves.len()));
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| compress_cpu::<F, H>(&pair[0], &pair[1]))
            .collect();
    }

    Ok(level[0])
}

// Orders a node and its sibling as (left, right).
fn conditional_swap<F: PrimeField>(is_right: bool, node: &F, sibling: &F) -> (F, F) {
    if is_right {
        (*sibling, *node)
    } else {
        (*node, *sibling)
    }
}
