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

//! In-circuit Merkle root recomputation.

use ff::PrimeField;
use midnight_circuits::{
    instructions::ControlFlowInstructions,
    types::{AssignedBit, AssignedNative},
};
use midnight_proofs::{circuit::Layouter, plonk::Error};

use crate::{instructions::TreeHashInstructions, Error as MbuError};

/// Assigned authentication path: the siblings from the leaf level up, with
/// the direction bit of every node on the way (`1` for a right child).
#[derive(Clone, Debug)]
pub struct AssignedMerklePath<F: PrimeField> {
    siblings: Vec<AssignedNative<F>>,
    directions: Vec<AssignedBit<F>>,
}

impl<F: PrimeField> AssignedMerklePath<F> {
    /// Pairs up siblings and direction bits. Both must have the same length,
    /// the depth of the tree.
    pub fn new(
        siblings: Vec<AssignedNative<F>>,
        directions: Vec<AssignedBit<F>>,
    ) -> Result<Self, MbuError> {
        if siblings.len() != directions.len() {
            return Err(MbuError::PathLength {
                expected: directions.len(),
                actual: siblings.len(),
            });
        }
        Ok(Self {
            siblings,
            directions,
        })
    }

    /// Number of levels of the path.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Sibling nodes, from the leaf level up.
    pub fn siblings(&self) -> &[AssignedNative<F>] {
        &self.siblings
    }

    /// Direction bits, from the leaf level up.
    pub fn directions(&self) -> &[AssignedBit<F>] {
        &self.directions
    }
}

/// Recomputes the root of a tree holding `leaf` at the position described by
/// `path`.
///
/// At every level the current node and its sibling are ordered according to
/// the direction bit and hashed together. Comparing the result against a
/// claimed root is left to the caller.
pub fn recompute_root<F, N, H>(
    native: &N,
    hash: &H,
    layouter: &mut impl Layouter<F>,
    leaf: &AssignedNative<F>,
    path: &AssignedMerklePath<F>,
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    N: ControlFlowInstructions<F, AssignedNative<F>>,
    H: TreeHashInstructions<F>,
{
    path.directions
        .iter()
        .zip(path.siblings.iter())
        .try_fold(leaf.clone(), |node, (is_right, sibling)| {
            let (left, right) = native.cond_swap(layouter, is_right, &node, sibling)?;
            hash.compress(layouter, &left, &right)
        })
}

/// Root of the balanced tree whose leaves are exactly `leaves`.
///
/// Consecutive pairs are hashed level by level until a single node is left.
/// The number of leaves must be a non-zero power of two; a single leaf is its
/// own root and costs no hash.
pub fn balanced_root<F, H>(
    hash: &H,
    layouter: &mut impl Layouter<F>,
    leaves: &[AssignedNative<F>],
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    H: TreeHashInstructions<F>,
{
    if !leaves.len().is_power_of_two() {
        return Err(MbuError::BalancedTreeSize(leaves.len()).into());
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| hash.compress(layouter, &pair[0], &pair[1]))
            .collect::<Result<Vec<_>, Error>>()?;
    }

    Ok(level[0].clone())
}
