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

//! Top-level relations, to be proven with
//! [`compact_std_lib`](midnight_circuits::compact_std_lib).
//!
//! [`InsertionRelation`] proves that a batch of leaves was inserted at
//! consecutive indices of a tree, and that the same batch is the one
//! committed to by an external polynomial commitment: the batch leaves are
//! the first samples of the committed polynomial, whose evaluation at a
//! Fiat-Shamir challenge is public.
//!
//! [`DeletionRelation`] proves that a batch of leaves was removed from a
//! tree.

mod config;
mod deletion;
mod insertion;

pub use config::{MbuConfig, BLOB_DEGREE};
pub use deletion::{DeletionInstance, DeletionRelation, DeletionWitness};
pub use insertion::{InsertionInstance, InsertionRelation, InsertionWitness};
use midnight_circuits::{
    compact_std_lib::ZkStdLib,
    instructions::{hash::HashCPU, AssignmentInstructions},
    types::AssignedNative,
};
use midnight_proofs::{
    circuit::{Layouter, Value},
    plonk::Error,
};

use crate::{merkle::cpu::MerkleTree, Error as MbuError, F};

// Runs `check` on a known value and reports its error, if any.
fn check_known<T>(
    value: Value<&T>,
    check: impl FnOnce(&T) -> Result<(), MbuError>,
) -> Result<(), Error> {
    let mut res = Ok(());
    value.map(|v| res = check(v));
    Ok(res?)
}

// Checks the shape of the batch leaves and of their paths.
fn check_batch(config: &MbuConfig, leaves: &[F], paths: &[Vec<F>]) -> Result<(), MbuError> {
    for len in [leaves.len(), paths.len()] {
        if len != config.batch_size {
            return Err(MbuError::BatchLength {
                expected: config.batch_size,
                actual: len,
            });
        }
    }
    if let Some(path) = paths.iter().find(|path| path.len() != config.tree_depth) {
        return Err(MbuError::PathLength {
            expected: config.tree_depth,
            actual: path.len(),
        });
    }
    Ok(())
}

fn check_tree<H: HashCPU<F, F>>(
    config: &MbuConfig,
    tree: &MerkleTree<F, H>,
) -> Result<(), MbuError> {
    if tree.depth() != config.tree_depth {
        return Err(MbuError::TreeDepth(tree.depth()));
    }
    Ok(())
}

// Assigns the leaves and paths of a batch whose shape has been checked.
fn assign_batch(
    std_lib: &ZkStdLib,
    layouter: &mut impl Layouter<F>,
    config: &MbuConfig,
    leaves: Value<&Vec<F>>,
    paths: Value<&Vec<Vec<F>>>,
) -> Result<(Vec<AssignedNative<F>>, Vec<Vec<AssignedNative<F>>>), Error> {
    let leaves = leaves.map(|leaves| leaves.clone()).transpose_vec(config.batch_size);
    let leaves: Vec<AssignedNative<F>> = std_lib.assign_many(layouter, &leaves)?;
    let paths = paths
        .map(|paths| paths.clone())
        .transpose_vec(config.batch_size)
        .into_iter()
        .map(|path| std_lib.assign_many(layouter, &path.transpose_vec(config.tree_depth)))
        .collect::<Result<Vec<Vec<AssignedNative<F>>>, Error>>()?;
    Ok((leaves, paths))
}
