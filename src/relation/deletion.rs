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
    compact_std_lib::{Relation, ZkStdLib, ZkStdLibArch},
    instructions::{AssertionInstructions, PublicInputInstructions},
    types::AssignedNative,
};
use midnight_proofs::{
    circuit::{Layouter, Value},
    plonk::Error,
};

use super::{assign_batch, check_batch, check_known, check_tree, MbuConfig};
use crate::{
    batch::{cpu::DeletionBatch, delete_batch},
    instructions::PoseidonTreeHash,
    merkle::cpu::MerkleTree,
    Error as MbuError, F,
};

/// Public inputs of a deletion batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionInstance {
    /// Root before the batch.
    pub pre_root: F,
    /// Root after the batch.
    pub post_root: F,
    /// Index of every deleted leaf, in deletion order.
    pub indices: Vec<u64>,
}

/// Private inputs of a deletion batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionWitness {
    /// Deleted leaves.
    pub leaves: Vec<F>,
    /// Siblings of every deleted slot, from the leaf level up, in the tree
    /// preceding its deletion.
    pub paths: Vec<Vec<F>>,
}

/// Deletion of a batch of leaves at arbitrary indices: emptying every slot
/// in turn, from `pre_root` on, leads to `post_root`.
///
/// Only the tree depth and the batch size of the configuration are used by
/// this relation. The batch size need not be a power of two.
#[derive(Clone, Debug)]
pub struct DeletionRelation {
    config: MbuConfig,
}

impl DeletionRelation {
    /// The relation for the given configuration.
    pub fn new(config: MbuConfig) -> Result<Self, MbuError> {
        config.validate_deletion()?;
        Ok(Self { config })
    }

    /// The configuration of this relation.
    pub fn config(&self) -> &MbuConfig {
        &self.config
    }

    /// Deletes the leaves at `indices` from `tree` and returns the
    /// corresponding instance and witness. The tree is left untouched on
    /// error.
    pub fn prepare(
        &self,
        tree: &mut MerkleTree<F, PoseidonTreeHash>,
        indices: &[u64],
    ) -> Result<(DeletionInstance, DeletionWitness), MbuError> {
        check_tree(&self.config, tree)?;
        check_indices(&self.config, indices)?;

        let batch = DeletionBatch::prepare(tree, indices)?;
        debug!("prepared deletion of {} leaves", indices.len());

        let instance = DeletionInstance {
            pre_root: batch.pre_root,
            post_root: batch.post_root,
            indices: batch.indices.clone(),
        };
        let witness = DeletionWitness {
            paths: batch.siblings(),
            leaves: batch.leaves,
        };

        Ok((instance, witness))
    }
}

fn check_indices(config: &MbuConfig, indices: &[u64]) -> Result<(), MbuError> {
    if indices.len() != config.batch_size {
        return Err(MbuError::BatchLength {
            expected: config.batch_size,
            actual: indices.len(),
        });
    }
    Ok(())
}

impl Relation for DeletionRelation {
    type Instance = DeletionInstance;

    type Witness = DeletionWitness;

    fn format_instance(instance: &Self::Instance) -> Vec<F> {
        [instance.pre_root, instance.post_root]
            .into_iter()
            .chain(instance.indices.iter().map(|index| F::from(*index)))
            .collect()
    }

    fn circuit(
        &self,
        std_lib: &ZkStdLib,
        layouter: &mut impl Layouter<F>,
        instance: Value<Self::Instance>,
        witness: Value<Self::Witness>,
    ) -> Result<(), Error> {
        let config = &self.config;
        check_known(instance.as_ref(), |i| check_indices(config, &i.indices))?;
        check_known(witness.as_ref(), |w| check_batch(config, &w.leaves, &w.paths))?;
        debug!(
            "deletion circuit: batch of {}, depth {}",
            config.batch_size, config.tree_depth
        );

        let pre_root: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.pre_root))?;
        let post_root: AssignedNative<F> =
            std_lib.assign_as_public_input(layouter, instance.as_ref().map(|i| i.post_root))?;
        let indices = instance
            .as_ref()
            .map(|i| i.indices.iter().map(|index| F::from(*index)).collect::<Vec<_>>())
            .transpose_vec(config.batch_size)
            .into_iter()
            .map(|index| -> Result<AssignedNative<F>, Error> {
                std_lib.assign_as_public_input(layouter, index)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let (leaves, paths) = assign_batch(
            std_lib,
            layouter,
            config,
            witness.as_ref().map(|w| &w.leaves),
            witness.as_ref().map(|w| &w.paths),
        )?;

        let root = delete_batch(
            std_lib,
            std_lib,
            layouter,
            config.tree_depth,
            &pre_root,
            &indices,
            &leaves,
            &paths,
        )?;
        std_lib.assert_equal(layouter, &root, &post_root)
    }

    fn used_chips(&self) -> ZkStdLibArch {
        ZkStdLibArch {
            jubjub: false,
            poseidon: true,
            sha256: None,
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
