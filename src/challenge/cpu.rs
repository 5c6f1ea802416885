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

//! Off-circuit challenge derivation.

use ff::PrimeField;
use num_bigint::BigUint;

use super::ChallengeConfig;
use crate::{
    instructions::TranscriptHashCPU,
    utils::util::{big_to_fe, fe_to_be_bytes},
    Error,
};

/// Derives the evaluation challenge from the input hash and the external
/// commitment: both are serialized in big-endian over the configured widths,
/// concatenated and hashed with `H`, and the digest is read as a big-endian
/// integer reduced modulo the order of `F`.
///
/// # Errors
///
/// [`Error::SerializationWidth`] if the configuration is not valid and
/// [`Error::ValueTooWide`] if a value does not fit in its width.
pub fn derive_challenge<F: PrimeField, H: TranscriptHashCPU>(
    input_hash: &F,
    commitment: &F,
    config: &ChallengeConfig,
) -> Result<F, Error> {
    config.validate()?;

    let mut message = serialize(input_hash, config.input_hash_bits)?;
    message.extend(serialize(commitment, config.commitment_bits)?);

    let digest = H::digest(&message);
    Ok(big_to_fe(&BigUint::from_bytes_be(&digest)))
}

fn serialize<F: PrimeField>(value: &F, width: usize) -> Result<Vec<u8>, Error> {
    fe_to_be_bytes(value, width / 8).ok_or(Error::ValueTooWide { width })
}
