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

//! Interfaces to the collaborators of the gadgets in this crate: field
//! arithmetic, the two-to-one tree hash and the bit-oriented transcript hash.
//!
//! The traits are implemented for [`ZkStdLib`], which provides native field
//! arithmetic over the BLS12-381 scalar field, Poseidon as tree hash and
//! SHA-256 as transcript hash.

use std::fmt::Debug;

use ff::PrimeField;
use midnight_circuits::{
    compact_std_lib::ZkStdLib,
    hash::poseidon::PoseidonChip,
    instructions::{hash::HashCPU, DecompositionInstructions, FieldInstructions},
    types::{AssignedBit, AssignedByte, AssignedNative, InnerConstants, Instantiable},
};
use midnight_proofs::{circuit::Layouter, plonk::Error};
use sha2::{Digest, Sha256};

use crate::{Error as MbuError, F};

/// Size (in bits) of the digests produced by a transcript hash.
pub const TRANSCRIPT_DIGEST_BITS: usize = 256;

/// Field arithmetic over the elements represented by `A`.
///
/// This is the full set of operations the barycentric evaluator and the
/// challenge derivation rely on: assignment, linear combinations,
/// multiplication, inversion (`inv` makes the circuit unsatisfiable on zero,
/// `inv0` maps zero to zero), exponentiation, equality, selection and bit
/// (de)composition. `A` may be [`AssignedNative`] or an emulated field
/// element such as [`midnight_circuits::types::AssignedField`].
pub trait FieldArithmetic<F, A>: FieldInstructions<F, A> + DecompositionInstructions<F, A>
where
    F: PrimeField,
    A::Element: PrimeField,
    A: Instantiable<F> + InnerConstants + Clone,
{
}

impl<F, A, T> FieldArithmetic<F, A> for T
where
    F: PrimeField,
    A::Element: PrimeField,
    A: Instantiable<F> + InnerConstants + Clone,
    T: FieldInstructions<F, A> + DecompositionInstructions<F, A>,
{
}

/// In-circuit two-to-one compression used to combine Merkle tree nodes.
///
/// The off-circuit counterpart is a [`HashCPU`] over two inputs, so that
/// `compress(l, r)` equals `H::hash(&[l, r])`.
pub trait TreeHashInstructions<F: PrimeField>: Clone + Debug {
    /// Hashes `left` and `right` (in that order) into a single node.
    fn compress(
        &self,
        layouter: &mut impl Layouter<F>,
        left: &AssignedNative<F>,
        right: &AssignedNative<F>,
    ) -> Result<AssignedNative<F>, Error>;
}

/// In-circuit bit-oriented hash with a [`TRANSCRIPT_DIGEST_BITS`]-bit output.
///
/// Bits are read in consecutive groups of 8, each group holding one byte of
/// the message, least significant bit first. The digest is returned with the
/// same convention.
pub trait TranscriptHashInstructions<F: PrimeField>: Clone + Debug {
    /// Hashes the given bits.
    ///
    /// Fails with a structural error if the number of bits is not a multiple
    /// of 8.
    fn hash_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<Vec<AssignedBit<F>>, Error>;
}

/// Off-circuit counterpart of [`TranscriptHashInstructions`], over bytes.
pub trait TranscriptHashCPU {
    /// Digest of the given message.
    fn digest(message: &[u8]) -> [u8; TRANSCRIPT_DIGEST_BITS / 8];
}

/// SHA-256 transcript hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Transcript;

impl TranscriptHashCPU for Sha256Transcript {
    fn digest(message: &[u8]) -> [u8; TRANSCRIPT_DIGEST_BITS / 8] {
        Sha256::digest(message).into()
    }
}

/// Poseidon as off-circuit tree hash.
pub type PoseidonTreeHash = PoseidonChip<F>;

impl TreeHashInstructions<F> for ZkStdLib {
    fn compress(
        &self,
        layouter: &mut impl Layouter<F>,
        left: &AssignedNative<F>,
        right: &AssignedNative<F>,
    ) -> Result<AssignedNative<F>, Error> {
        self.poseidon(layouter, &[left.clone(), right.clone()])
    }
}

impl TranscriptHashInstructions<F> for ZkStdLib {
    fn hash_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<Vec<AssignedBit<F>>, Error> {
        if bits.len() % 8 != 0 {
            return Err(MbuError::BitPatternLength(bits.len()).into());
        }

        let message = bits
            .chunks(8)
            .map(|byte_bits| {
                let byte: AssignedNative<F> = self.assigned_from_le_bits(layouter, byte_bits)?;
                self.convert(layouter, &byte)
            })
            .collect::<Result<Vec<AssignedByte<F>>, Error>>()?;

        let digest = self.sha256(layouter, &message)?;

        Ok(digest
            .iter()
            .map(|byte| {
                self.assigned_to_le_bits(layouter, &AssignedNative::from(byte), Some(8), true)
            })
            .collect::<Result<Vec<_>, Error>>()?
            .into_iter()
            .flatten()
            .collect())
    }
}

/// Off-circuit two-to-one compression with a [`HashCPU`].
pub(crate) fn compress_cpu<F: PrimeField, H: HashCPU<F, F>>(left: &F, right: &F) -> F {
    <H as HashCPU<F, F>>::hash(&[*left, *right])
}
