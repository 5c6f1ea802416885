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

//! Off-circuit conversions between field elements, integers and bits.
//!
//! Field representations are assumed to be little-endian, which is the case
//! for the scalar fields this crate is instantiated with.

use ff::PrimeField;
use num_bigint::BigUint;
use num_traits::Num;

/// The order of `F`.
pub(crate) fn modulus<F: PrimeField>() -> BigUint {
    BigUint::from_str_radix(&F::MODULUS[2..], 16).unwrap_or_default()
}

/// The element of `F` congruent to `e`.
pub(crate) fn big_to_fe<F: PrimeField>(e: &BigUint) -> F {
    let base = F::from(256);
    e.to_bytes_be()
        .into_iter()
        .fold(F::ZERO, |acc, byte| acc * base + F::from(byte as u64))
}

pub(crate) fn fe_to_big<F: PrimeField>(fe: &F) -> BigUint {
    BigUint::from_bytes_le(fe.to_repr().as_ref())
}

/// Little-endian bits of `value`, padded with zeros to `nb_bits`.
///
/// Returns `None` if the value needs more than `nb_bits` bits.
pub(crate) fn fe_to_le_bits<F: PrimeField>(value: &F, nb_bits: usize) -> Option<Vec<bool>> {
    let big = fe_to_big(value);
    if big.bits() as usize > nb_bits {
        return None;
    }
    Some((0..nb_bits as u64).map(|i| big.bit(i)).collect())
}

/// Big-endian bytes of `value`, left-padded with zeros to `nb_bytes`.
///
/// Returns `None` if the value needs more than `nb_bytes` bytes.
pub(crate) fn fe_to_be_bytes<F: PrimeField>(value: &F, nb_bytes: usize) -> Option<Vec<u8>> {
    let bytes = fe_to_big(value).to_bytes_be();
    if bytes.len() > nb_bytes {
        return None;
    }
    let mut padded = vec![0u8; nb_bytes - bytes.len()];
    padded.extend(bytes);
    Some(padded)
}

/// Packs little-endian bits into bytes, 8 bits per byte.
pub(crate) fn le_bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|bits| {
            bits.iter()
                .enumerate()
                .fold(0u8, |acc, (i, b)| acc | ((*b as u8) << i))
        })
        .collect()
}

/// Unpacks bytes into bits, least-significant bit of each byte first.
pub(crate) fn bytes_to_le_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).map(move |i| (byte >> i) & 1 == 1))
        .collect()
}
