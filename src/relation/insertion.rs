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

use std::io;

use log::debug;
use midnight_circuits::{
    compact_std_lib::{Relation, ShaTableSize, ZkStdLib, ZkStdLibArch},
    instructions::{AssertionInstructions, PublicInputInstructions},
    types::AssignedNative,
};
use midnight_proofs::{
    circuit::{Layouter, Value},
    plonk::Error,
};

use super::{assign_batch, check_batch, check_known, check_tree, MbuConfig};
use crate::{
    barycentric::{self, evaluate_at_roots_of_unity, CollisionPolicy, RootsOfUnity},
    batch::{cpu::InsertionBatch, insert_batch},
    challenge::{self, derive_challenge},
    instructions::{PoseidonTreeHash, Sha256Transcript},
    merkle::{self, balanced_root, cpu::MerkleTree},
    Error as MbuError, F,
};

/// Public inputs of an insertion batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionInstance {
    /// Root of the balanced tree of the batch leaves.
    pub input_hash: F,
    /// Evaluation of the batch polynomial at the challenge.
    pub expected_evaluation: F,
    /// External commitment to the batch polynomial.
    pub commitment: F,
    /// Index of the first inserted leaf.
    pub start_index: u64,
    /// Root before the batch.
    pub pre_root: F,
    /// Root after the batch.
    pub post_root: F,
}

/// Private inputs of an insertion batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionWitness {
    /// Inserted leaves.
    pub leaves: Vec<F>,
    /// Siblings of every inserted slot, from the leaf level up, in the tree
    /// preceding its insertion.
    pub paths: Vec<Vec<F>>,
}

/// Insertion of a batch of leaves at consecutive indices, consistent with an
/// external commitment to the batch.
///
/// The circuit checks, jointly:
///  1. the balanced tree of the leaves has root `input_hash`;
///  2. `z` is the challenge derived from `input_hash` and `commitment`;
///  3. the polynomial whose first samples over the roots of unity are the
///     leaves evaluates to `expected_evaluation` at `z`;
///  4. inserting the leaves from `start_index` on turns `pre_root` into
///     `post_root`.
#[derive(Clone, Debug)]
pub struct InsertionRelation {
    config: MbuConfig,
    domain: RootsOfUnity<F>,
}

impl InsertionRelation {
    /// The relation for the given configuration.
    pub fn new(config: MbuConfig) -> Result<Self, MbuError> {
        config.validate()?;
        let domain = RootsOfUnity::new(config.polynomial_degree)?;
        Ok(Self { config, domain })
    }

    /// The configuration of this relation.
    pub fn config(&self) -> &MbuConfig {
        &self.config
    }

    /// Inserts `leaves` in `tree` from `start_index` on and returns the
    /// corresponding instance and witness.
    ///
    /// The tree is left untouched on error. With
    /// [`CollisionPolicy::Unguarded`], a challenge hitting one of the nodes
    /// carrying a leaf is reported as [`MbuError::NodeCollision`], since no
    /// proof exists for it.
    pub fn prepare(
        &self,
        tree: &mut MerkleTree<F, PoseidonTreeHash>,
        start_index: u64,
        leaves: &[F],
        commitment: F,
    ) -> Result<(InsertionInstance, InsertionWitness), MbuError> {
        check_tree(&self.config, tree)?;
        if leaves.len() != self.config.batch_size {
            return Err(MbuError::BatchLength {
                expected: self.config.batch_size,
                actual: leaves.len(),
            });
        }

        let input_hash = merkle::cpu::balanced_root::<F, PoseidonTreeHash>(leaves)?;
        let z = challenge::cpu::derive_challenge::<F, Sha256Transcript>(
            &input_hash,
            &commitment,
            &self.config.challenge,
        )?;
        let expected_evaluation = match self.config.collision_policy {
            CollisionPolicy::Unguarded => {
                barycentric::cpu::evaluate_at_roots_of_unity(&self.domain, leaves, z)?
            }
            CollisionPolicy::Guarded => {
                barycentric::cpu::evaluate_at_roots_of_unity_or_sample(&self.domain, leaves, z)?
            }
        };

        let batch = InsertionBatch::prepare(tree, start_index, leaves)?;
        debug!(
            "prepared insertion of {} leaves at index {}",
            leaves.len(),
            start_index
        );

        let instance = InsertionInstance {
            input_hash,
            expected_evaluation,
            commitment,
            start_index,
            pre_root: batch.pre_root,
            post_root: batch.post_root,
        };
        let witness = InsertionWitness {
            paths: batch.siblings(),
            leaves: batch.leaves,
        };

        Ok((instance, witness))
    }
}

impl Relation for InsertionRelation {
    type Instance = InsertionInstance;

    type Witness = InsertionWitness;

    fn format_instance(instance: &Self::Instance) -> Vec<F> {
        vec![
            instance.input_hash,
            instance.expected_evaluation,
            instance.commitment,
            F::from(instance.start_index),
            instance.pre_root,
            instance.post_root,
        ]
    }

    fn circuit(
        &self,
        std_lib: &ZkStdLib,
        layouter: &mut impl Layouter<F>,
        instance: Value<Self::Instance>,
        witness: Value<Self::Witness>,
    ) -> Result<(), Error> {
        let config = &self.config;
        check_known(witness.as_ref(), |w| check_batch(config, &w.leaves, &w.paths))?;
        debug!(
            "insertion circuit: batch of {}, depth {}, degree {}",
            config.batch_size, config.tree_depth, config.polynomial_degree
        );

        let input_hash: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.input_hash))?;
        let expected_evaluation: AssignedNative<F> = std_lib
            .assign_as_public_input(layouter, instance.as_ref().map(|i| i.expected_evaluation))?;
        let commitment: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.commitment))?;
        let start_index: AssignedNative<F> = std_lib.assign_as_public_input(
            layouter,
            instance.as_ref().map(|i| F::from(i.start_index)),
        )?;
        let pre_root: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.pre_root))?;
        let post_root: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.post_root))?;

        let (leaves, paths) = assign_batch(
            std_lib,
            layouter,
            config,
            witness.as_ref().map(|w| &w.leaves),
            witness.as_ref().map(|w| &w.paths),
        )?;

        let leaves_root = balanced_root(std_lib, layouter, &leaves)?;
        std_lib.assert_equal(layouter, &leaves_root, &input_hash)?;

        let z = derive_challenge(
            std_lib,
            std_lib,
            layouter,
            &input_hash,
            &commitment,
            &config.challenge,
        )?;
        let evaluation = evaluate_at_roots_of_unity(
            std_lib,
            layouter,
            &self.domain,
            &leaves,
            &z,
            config.collision_policy,
        )?;
        std_lib.assert_equal(layouter, &evaluation, &expected_evaluation)?;

        let root = insert_batch(
            std_lib,
            std_lib,
            layouter,
            config.tree_depth,
            &pre_root,
            &start_index,
            &leaves,
            &paths,
        )?;
        std_lib.assert_equal(layouter, &root, &post_root)
    }

    fn used_chips(&self) -> ZkStdLibArch {
        ZkStdLibArch {
            jubjub: false,
            poseidon: true,
            sha256: Some(ShaTableSize::Table11),
            ..ZkStdLibArch::default()
        }
    }

    fn write_relation<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.config.write(writer)
    }

    fn read_relation<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let config = MbuConfig::read(reader)?;
        Self::new(config).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}
