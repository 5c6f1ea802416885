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

//! Off-circuit preparation of batch witnesses.
//!
//! Both batch types are built by applying the updates to a [`MerkleTree`],
//! recording the authentication path of every slot right before it is
//! updated. A batch that cannot be applied leaves the tree untouched.

use ff::PrimeField;
use midnight_circuits::instructions::hash::HashCPU;

use super::EMPTY_LEAF;
use crate::{
    merkle::cpu::{MerklePath, MerkleTree},
    Error,
};

/// Insertion of a contiguous range of leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionBatch<F: PrimeField> {
    /// Root before the first insertion.
    pub pre_root: F,
    /// Root after the last insertion.
    pub post_root: F,
    /// Index of the first inserted leaf.
    pub start_index: u64,
    /// Inserted leaves.
    pub leaves: Vec<F>,
    /// Path of every slot, in the tree preceding its insertion.
    pub paths: Vec<MerklePath<F>>,
}

/// Deletion of leaves at arbitrary indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionBatch<F: PrimeField> {
    /// Root before the first deletion.
    pub pre_root: F,
    /// Root after the last deletion.
    pub post_root: F,
    /// Index of every deleted leaf.
    pub indices: Vec<u64>,
    /// Deleted leaves.
    pub leaves: Vec<F>,
    /// Path of every slot, in the tree preceding its deletion.
    pub paths: Vec<MerklePath<F>>,
}

impl<F: PrimeField> InsertionBatch<F> {
    /// Inserts `leaves` in `tree` starting at `start_index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if the range does not fit in the tree and
    /// [`Error::OccupiedLeaf`] if one of its slots is not empty.
    pub fn prepare<H: HashCPU<F, F>>(
        tree: &mut MerkleTree<F, H>,
        start_index: u64,
        leaves: &[F],
    ) -> Result<Self, Error> {
        let mut updated = tree.clone();
        let mut paths = Vec::with_capacity(leaves.len());

        for (offset, leaf) in leaves.iter().enumerate() {
            let index = start_index.checked_add(offset as u64).ok_or(Error::IndexOutOfRange {
                index: u64::MAX,
                depth: tree.depth(),
            })?;
            if updated.leaf(index)? != F::from(EMPTY_LEAF) {
                return Err(Error::OccupiedLeaf(index));
            }
            paths.push(updated.path(index)?);
            updated.set(index, *leaf)?;
        }

        let batch = InsertionBatch {
            pre_root: tree.root(),
            post_root: updated.root(),
            start_index,
            leaves: leaves.to_vec(),
            paths,
        };
        *tree = updated;

        Ok(batch)
    }

    /// Siblings of every path, the shape expected by the circuit.
    pub fn siblings(&self) -> Vec<Vec<F>> {
        self.paths.iter().map(|path| path.siblings().to_vec()).collect()
    }
}

impl<F: PrimeField> DeletionBatch<F> {
    /// Deletes the leaves at `indices` from `tree`, in order.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if an index does not fit in the tree and
    /// [`Error::EmptyLeaf`] if a slot is already empty when its turn comes.
    pub fn prepare<H: HashCPU<F, F>>(
        tree: &mut MerkleTree<F, H>,
        indices: &[u64],
    ) -> Result<Self, Error> {
        let mut updated = tree.clone();
        let mut leaves = Vec::with_capacity(indices.len());
        let mut paths = Vec::with_capacity(indices.len());

        for &index in indices {
            let leaf = updated.leaf(index)?;
            if leaf == F::from(EMPTY_LEAF) {
                return Err(Error::EmptyLeaf(index));
            }
            leaves.push(leaf);
            paths.push(updated.path(index)?);
            updated.set(index, F::from(EMPTY_LEAF))?;
        }

        let batch = DeletionBatch {
            pre_root: tree.root(),
            post_root: updated.root(),
            indices: indices.to_vec(),
            leaves,
            paths,
        };
        *tree = updated;

        Ok(batch)
    }

    /// Siblings of every path, the shape expected by the circuit.
    pub fn siblings(&self) -> Vec<Vec<F>> {
        self.paths.iter().map(|path| path.siblings().to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{instructions::PoseidonTreeHash, F};
    type Tree = MerkleTree<F, PoseidonTreeHash>;

    #[test]
    fn test_insertion_batch() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xa);
        let leaves = (0..5).map(|_| F::random(&mut rng)).collect::<Vec<_>>();

        let mut tree = Tree::new(4).unwrap();
        let mut expected = tree.clone();
        let batch = InsertionBatch::prepare(&mut tree, 6, &leaves).unwrap();

        for (i, leaf) in leaves.iter().enumerate() {
            let path = &batch.paths[i];
            assert_eq!(path.index(), 6 + i as u64);
            // Every path proves an empty slot in the tree before the step.
            assert_eq!(path.root_from::<PoseidonTreeHash>(&F::ZERO), expected.root());
            expected.set(6 + i as u64, *leaf).unwrap();
            assert_eq!(path.root_from::<PoseidonTreeHash>(leaf), expected.root());
        }

        assert_eq!(batch.post_root, expected.root());
        assert_eq!(tree, expected);
        assert_eq!(batch.siblings().len(), 5);
        assert!(batch.siblings().iter().all(|siblings| siblings.len() == 4));
    }

    #[test]
    fn test_failed_batches_leave_tree_untouched() {
        let mut tree = Tree::new(3).unwrap();
        tree.set(5, F::from(7)).unwrap();
        let snapshot = tree.clone();

        let leaves = [F::from(1), F::from(2), F::from(3)];
        assert!(matches!(
            InsertionBatch::prepare(&mut tree, 3, &leaves),
            Err(Error::OccupiedLeaf(5))
        ));
        assert!(matches!(
            InsertionBatch::prepare(&mut tree, 6, &leaves),
            Err(Error::IndexOutOfRange { index: 8, depth: 3 })
        ));
        assert!(matches!(
            DeletionBatch::prepare(&mut tree, &[5, 5]),
            Err(Error::EmptyLeaf(5))
        ));
        assert!(matches!(
            DeletionBatch::prepare(&mut tree, &[9]),
            Err(Error::IndexOutOfRange { index: 9, depth: 3 })
        ));

        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_deletion_batch() {
        let mut tree = Tree::new(3).unwrap();
        let empty_root = tree.root();
        InsertionBatch::prepare(&mut tree, 2, &[F::from(10), F::from(11)]).unwrap();

        let batch = DeletionBatch::prepare(&mut tree, &[3, 2]).unwrap();
        assert_eq!(batch.leaves, vec![F::from(11), F::from(10)]);
        assert_eq!(batch.post_root, empty_root);
        assert_eq!(tree.root(), empty_root);
    }
}
