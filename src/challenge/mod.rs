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

//! Fiat-Shamir derivation of the evaluation challenge.
//!
//! The challenge is the hash of the root of the batch (the input hash) and of
//! the external commitment to the batch data:
//!
//! ```text
//!   z = int_be( H( be(input_hash) || be(commitment) ) ) mod p
//! ```
//!
//! where `be(x)` is the big-endian byte serialization of `x` over a fixed
//! number of bytes. In-circuit values are decomposed least significant bit
//! first, so serializing them in network order amounts to reversing the order
//! of their bytes, see [`swap_endianness`].

pub mod cpu;
mod challenge_gadget;

pub use challenge_gadget::{derive_challenge, from_big_endian_bits, to_big_endian_bits};
use serde::{Deserialize, Serialize};

use crate::{instructions::TRANSCRIPT_DIGEST_BITS, Error};

/// Reverses the order of the 8-bit groups of `bits`, keeping the order of
/// the bits inside every group.
///
/// On assigned bits this is pure rewiring and adds no constraint. It is an
/// involution: applied to the little-endian bits of an integer it gives the
/// big-endian byte order (with bits least significant first within each
/// byte), and conversely.
pub fn swap_endianness<T: Clone>(bits: &[T]) -> Result<Vec<T>, Error> {
    if bits.len() % 8 != 0 {
        return Err(Error::BitPatternLength(bits.len()));
    }
    Ok(bits.chunks(8).rev().flatten().cloned().collect())
}

/// Serialization widths, in bits, of the hashed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Width of the input hash.
    pub input_hash_bits: usize,
    /// Width of the external commitment.
    pub commitment_bits: usize,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        ChallengeConfig {
            input_hash_bits: 256,
            commitment_bits: 256,
        }
    }
}

impl ChallengeConfig {
    /// Checks that both widths are non-zero multiples of 8 of at most 256
    /// bits.
    pub fn validate(&self) -> Result<(), Error> {
        for width in [self.input_hash_bits, self.commitment_bits] {
            check_width(width)?;
        }
        Ok(())
    }
}

pub(crate) fn check_width(width: usize) -> Result<(), Error> {
    if width == 0 || width % 8 != 0 || width > TRANSCRIPT_DIGEST_BITS {
        return Err(Error::SerializationWidth { width });
    }
    Ok(())
}
