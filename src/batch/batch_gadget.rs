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

use ff::PrimeField;
use log::{debug, trace};
use midnight_circuits::types::AssignedNative;
use midnight_proofs::{circuit::Layouter, plonk::Error};

use super::EMPTY_LEAF;
use crate::{
    instructions::{FieldArithmetic, TreeHashInstructions},
    merkle::{recompute_root, AssignedMerklePath},
    Error as MbuError,
};

/// Inserts `leaves` at indices `start_index, start_index + 1, ...` of the
/// tree with root `pre_root`, and returns the root after the last insertion.
///
/// `paths[i]` holds the siblings (from the leaf level up) of the `i`-th slot
/// in the tree obtained after the first `i` insertions. The slot must be
/// empty at that point. Comparing the returned root against a claimed
/// post-root is left to the caller.
///
/// # Errors
///
/// Structural errors if `depth` is not supported, if `paths` and `leaves`
/// differ in length or if a path does not have `depth` siblings.
#[allow(clippy::too_many_arguments)]
pub fn insert_batch<F, N, H>(
    native: &N,
    hash: &H,
    layouter: &mut impl Layouter<F>,
    depth: usize,
    pre_root: &AssignedNative<F>,
    start_index: &AssignedNative<F>,
    leaves: &[AssignedNative<F>],
    paths: &[Vec<AssignedNative<F>>],
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
    H: TreeHashInstructions<F>,
{
    check_depth::<F>(depth)?;
    check_length(leaves.len(), paths.len())?;
    debug!(
        "insertion batch of {} leaves in a tree of depth {}",
        leaves.len(),
        depth
    );

    let empty: AssignedNative<F> = native.assign_fixed(layouter, F::from(EMPTY_LEAF))?;
    let mut root = pre_root.clone();

    for (i, (leaf, siblings)) in leaves.iter().zip(paths.iter()).enumerate() {
        trace!("insertion step {i}");
        let index = native.add_constant(layouter, start_index, F::from(i as u64))?;
        let path = assign_path(native, layouter, depth, &index, siblings)?;

        let vacant_root = recompute_root(native, hash, layouter, &empty, &path)?;
        native.assert_equal(layouter, &vacant_root, &root)?;
        root = recompute_root(native, hash, layouter, leaf, &path)?;
    }

    Ok(root)
}

/// Deletes `leaves[i]` from slot `indices[i]`, for every `i` in order,
/// starting from the tree with root `pre_root`. Returns the root after the
/// last deletion.
///
/// `paths[i]` holds the siblings of slot `indices[i]` in the tree obtained
/// after the first `i` deletions, where that slot must hold `leaves[i]`.
///
/// # Errors
///
/// Structural errors if `depth` is not supported, if `indices`, `leaves` and
/// `paths` differ in length or if a path does not have `depth` siblings.
#[allow(clippy::too_many_arguments)]
pub fn delete_batch<F, N, H>(
    native: &N,
    hash: &H,
    layouter: &mut impl Layouter<F>,
    depth: usize,
    pre_root: &AssignedNative<F>,
    indices: &[AssignedNative<F>],
    leaves: &[AssignedNative<F>],
    paths: &[Vec<AssignedNative<F>>],
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
    H: TreeHashInstructions<F>,
{
    check_depth::<F>(depth)?;
    check_length(indices.len(), leaves.len())?;
    check_length(indices.len(), paths.len())?;
    debug!(
        "deletion batch of {} leaves in a tree of depth {}",
        leaves.len(),
        depth
    );

    let empty: AssignedNative<F> = native.assign_fixed(layouter, F::from(EMPTY_LEAF))?;
    let mut root = pre_root.clone();

    for (i, ((index, leaf), siblings)) in indices.iter().zip(leaves).zip(paths).enumerate() {
        trace!("deletion step {i}");
        let path = assign_path(native, layouter, depth, index, siblings)?;

        let occupied_root = recompute_root(native, hash, layouter, leaf, &path)?;
        native.assert_equal(layouter, &occupied_root, &root)?;
        root = recompute_root(native, hash, layouter, &empty, &path)?;
    }

    Ok(root)
}

// The direction bits of a slot are the `depth` little-endian bits of its
// index, which constrains the index to be lower than `2^depth`.
fn assign_path<F, N>(
    native: &N,
    layouter: &mut impl Layouter<F>,
    depth: usize,
    index: &AssignedNative<F>,
    siblings: &[AssignedNative<F>],
) -> Result<AssignedMerklePath<F>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
{
    if siblings.len() != depth {
        return Err(MbuError::PathLength {
            expected: depth,
            actual: siblings.len(),
        }
        .into());
    }
    let directions = native.assigned_to_le_bits(layouter, index, Some(depth), true)?;
    Ok(AssignedMerklePath::new(siblings.to_vec(), directions)?)
}

fn check_depth<F: PrimeField>(depth: usize) -> Result<(), MbuError> {
    if depth == 0 || depth >= F::NUM_BITS as usize {
        return Err(MbuError::TreeDepth(depth));
    }
    Ok(())
}

fn check_length(expected: usize, actual: usize) -> Result<(), MbuError> {
    if expected != actual {
        return Err(MbuError::BatchLength { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use midnight_circuits::{
        compact_std_lib::ZkStdLib,
        instructions::{AssertionInstructions, AssignmentInstructions},
    };
    use midnight_proofs::circuit::Value;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{
        batch::cpu::{DeletionBatch, InsertionBatch},
        instructions::PoseidonTreeHash,
        merkle::cpu::{self, MerkleTree},
        utils::test_std_lib::{run_gadget_test, GadgetTest},
        F,
    };
    type Tree = MerkleTree<F, PoseidonTreeHash>;

    #[derive(Clone, Debug)]
    enum Update {
        Insertion { start_index: u64 },
        Deletion { indices: Vec<u64> },
    }

    #[derive(Clone, Debug)]
    struct BatchTest {
        update: Update,
        depth: usize,
        pre_root: F,
        post_root: F,
        leaves: Vec<F>,
        paths: Vec<Vec<F>>,
    }

    impl BatchTest {
        fn insertion(depth: usize, batch: &InsertionBatch<F>) -> Self {
            BatchTest {
                update: Update::Insertion {
                    start_index: batch.start_index,
                },
                depth,
                pre_root: batch.pre_root,
                post_root: batch.post_root,
                leaves: batch.leaves.clone(),
                paths: batch.siblings(),
            }
        }

        fn deletion(depth: usize, batch: &DeletionBatch<F>) -> Self {
            BatchTest {
                update: Update::Deletion {
                    indices: batch.indices.clone(),
                },
                depth,
                pre_root: batch.pre_root,
                post_root: batch.post_root,
                leaves: batch.leaves.clone(),
                paths: batch.siblings(),
            }
        }
    }

    fn assign_all(
        std_lib: &ZkStdLib,
        layouter: &mut impl Layouter<F>,
        values: &[F],
    ) -> Result<Vec<AssignedNative<F>>, Error> {
        std_lib.assign_many(
            layouter,
            &values.iter().map(|v| Value::known(*v)).collect::<Vec<_>>(),
        )
    }

    impl GadgetTest for BatchTest {
        fn synthesize(
            &self,
            std_lib: &ZkStdLib,
            layouter: &mut impl Layouter<F>,
        ) -> Result<(), Error> {
            let pre_root: AssignedNative<F> =
                std_lib.assign(layouter, Value::known(self.pre_root))?;
            let leaves = assign_all(std_lib, layouter, &self.leaves)?;
            let paths = self
                .paths
                .iter()
                .map(|siblings| assign_all(std_lib, layouter, siblings))
                .collect::<Result<Vec<_>, Error>>()?;

            let post_root = match &self.update {
                Update::Insertion { start_index } => {
                    let start_index: AssignedNative<F> =
                        std_lib.assign(layouter, Value::known(F::from(*start_index)))?;
                    insert_batch(
                        std_lib,
                        std_lib,
                        layouter,
                        self.depth,
                        &pre_root,
                        &start_index,
                        &leaves,
                        &paths,
                    )?
                }
                Update::Deletion { indices } => {
                    let indices = indices.iter().map(|i| F::from(*i)).collect::<Vec<_>>();
                    let indices = assign_all(std_lib, layouter, &indices)?;
                    delete_batch(
                        std_lib,
                        std_lib,
                        layouter,
                        self.depth,
                        &pre_root,
                        &indices,
                        &leaves,
                        &paths,
                    )?
                }
            };

            std_lib.assert_equal_to_fixed(layouter, &post_root, self.post_root)
        }
    }

    fn random_leaves(rng: &mut ChaCha8Rng, n: usize) -> Vec<F> {
        (0..n).map(|_| F::random(&mut *rng)).collect()
    }

    #[test]
    fn test_insertion_into_empty_tree() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x1);
        let leaves = random_leaves(&mut rng, 4);

        let mut tree = Tree::new(2).unwrap();
        let batch = InsertionBatch::prepare(&mut tree, 0, &leaves).unwrap();

        // A full tree of depth 2 is the balanced tree of its leaves.
        let reference = cpu::balanced_root::<F, PoseidonTreeHash>(&leaves).unwrap();
        assert_eq!(batch.post_root, reference);
        assert_eq!(batch.pre_root, Tree::new(2).unwrap().root());

        assert!(run_gadget_test(BatchTest::insertion(2, &batch)));

        let mut test = BatchTest::insertion(2, &batch);
        test.post_root = F::random(&mut rng);
        assert!(!run_gadget_test(test));
    }

    #[test]
    fn test_insertion_into_populated_tree() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x2);
        let mut tree = Tree::new(4).unwrap();
        for index in [0, 1, 2, 9] {
            tree.set(index, F::random(&mut rng)).unwrap();
        }

        let leaves = random_leaves(&mut rng, 4);
        let batch = InsertionBatch::prepare(&mut tree, 5, &leaves).unwrap();
        assert!(run_gadget_test(BatchTest::insertion(4, &batch)));

        // Claiming a different start index moves every slot.
        let mut test = BatchTest::insertion(4, &batch);
        test.update = Update::Insertion { start_index: 4 };
        assert!(!run_gadget_test(test));

        // Swapping two leaves breaks the chain.
        let mut test = BatchTest::insertion(4, &batch);
        test.leaves.swap(0, 1);
        assert!(!run_gadget_test(test));
    }

    #[test]
    fn test_insertion_into_occupied_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x3);
        let mut tree = Tree::new(3).unwrap();
        tree.set(2, F::random(&mut rng)).unwrap();

        let pre_root = tree.root();
        let path = tree.path(2).unwrap();
        let leaf = F::random(&mut rng);
        tree.set(2, leaf).unwrap();

        let test = BatchTest {
            update: Update::Insertion { start_index: 2 },
            depth: 3,
            pre_root,
            post_root: tree.root(),
            leaves: vec![leaf],
            paths: vec![path.siblings().to_vec()],
        };
        assert!(!run_gadget_test(test));
    }

    #[test]
    fn test_insertion_index_out_of_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x4);
        let mut tree = Tree::new(2).unwrap();
        let leaves = random_leaves(&mut rng, 1);
        let batch = InsertionBatch::prepare(&mut tree, 0, &leaves).unwrap();
        assert!(run_gadget_test(BatchTest::insertion(2, &batch)));

        // Index 4 has the same two low bits as index 0.
        let mut test = BatchTest::insertion(2, &batch);
        test.update = Update::Insertion { start_index: 4 };
        assert!(!run_gadget_test(test));
    }

    #[test]
    fn test_delete_after_insert_restores_root() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5);
        let mut tree = Tree::new(3).unwrap();
        tree.set(0, F::random(&mut rng)).unwrap();

        let leaves = random_leaves(&mut rng, 2);
        let insertion = InsertionBatch::prepare(&mut tree, 3, &leaves).unwrap();
        let deletion = DeletionBatch::prepare(&mut tree, &[4, 3]).unwrap();

        assert_eq!(deletion.pre_root, insertion.post_root);
        assert_eq!(deletion.post_root, insertion.pre_root);
        assert!(run_gadget_test(BatchTest::insertion(3, &insertion)));
        assert!(run_gadget_test(BatchTest::deletion(3, &deletion)));

        // Deleting a leaf that is not there.
        let mut test = BatchTest::deletion(3, &deletion);
        test.leaves[0] += F::ONE;
        assert!(!run_gadget_test(test));
    }

    #[derive(Clone, Debug)]
    struct ShapeTest;

    impl GadgetTest for ShapeTest {
        fn synthesize(
            &self,
            std_lib: &ZkStdLib,
            layouter: &mut impl Layouter<F>,
        ) -> Result<(), Error> {
            let nodes = assign_all(std_lib, layouter, &[F::ZERO; 3])?;
            let root = &nodes[0];
            let paths = vec![nodes.clone(), nodes.clone()];

            // Fewer paths than leaves.
            let res = insert_batch(std_lib, std_lib, layouter, 3, root, root, &nodes, &paths);
            assert!(res.is_err());

            // Paths longer than the depth.
            let res = insert_batch(std_lib, std_lib, layouter, 2, root, root, &nodes[..2], &paths);
            assert!(res.is_err());

            // Unsupported depth.
            let res = delete_batch(std_lib, std_lib, layouter, 0, root, &[], &[], &[]);
            assert!(res.is_err());

            // Fewer indices than leaves.
            let res = delete_batch(
                std_lib,
                std_lib,
                layouter,
                3,
                root,
                &nodes[..1],
                &nodes[..2],
                &paths,
            );
            assert!(res.is_err());

            Ok(())
        }
    }

    #[test]
    fn test_shape_errors() {
        assert!(run_gadget_test(ShapeTest));
    }
}
