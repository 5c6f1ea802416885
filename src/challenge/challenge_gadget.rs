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
use log::debug;
use midnight_circuits::types::{AssignedBit, AssignedNative};
use midnight_proofs::{circuit::Layouter, plonk::Error};

use super::{check_width, swap_endianness, ChallengeConfig};
use crate::instructions::{FieldArithmetic, TranscriptHashInstructions};

/// Serializes `x` over `width` bits, in big-endian byte order.
///
/// Widths lower than the bit size of `F` constrain `x` to fit in `width`
/// bits. Larger widths are padded with constant zero bits.
pub fn to_big_endian_bits<F, N>(
    native: &N,
    layouter: &mut impl Layouter<F>,
    x: &AssignedNative<F>,
    width: usize,
) -> Result<Vec<AssignedBit<F>>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
{
    check_width(width)?;

    let mut bits = if width < F::NUM_BITS as usize {
        native.assigned_to_le_bits(layouter, x, Some(width), true)?
    } else {
        native.assigned_to_le_bits(layouter, x, None, true)?
    };
    if bits.len() < width {
        let zero: AssignedBit<F> = native.assign_fixed(layouter, false)?;
        bits.resize(width, zero);
    }

    Ok(swap_endianness(&bits)?)
}

/// The element of `F` whose big-endian serialization is `bits`, reduced
/// modulo the order of `F`.
pub fn from_big_endian_bits<F, N>(
    native: &N,
    layouter: &mut impl Layouter<F>,
    bits: &[AssignedBit<F>],
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
{
    let bits = swap_endianness(bits)?;
    native.assigned_from_le_bits(layouter, &bits)
}

/// Derives the evaluation challenge from the input hash and the external
/// commitment, by hashing their big-endian serialization.
pub fn derive_challenge<F, N, T>(
    native: &N,
    transcript: &T,
    layouter: &mut impl Layouter<F>,
    input_hash: &AssignedNative<F>,
    commitment: &AssignedNative<F>,
    config: &ChallengeConfig,
) -> Result<AssignedNative<F>, Error>
where
    F: PrimeField,
    N: FieldArithmetic<F, AssignedNative<F>>,
    T: TranscriptHashInstructions<F>,
{
    debug!(
        "challenge over {} + {} bits",
        config.input_hash_bits, config.commitment_bits
    );

    let mut message = to_big_endian_bits(native, layouter, input_hash, config.input_hash_bits)?;
    message.extend(to_big_endian_bits(
        native,
        layouter,
        commitment,
        config.commitment_bits,
    )?);

    let digest = transcript.hash_bits(layouter, &message)?;
    from_big_endian_bits(native, layouter, &digest)
}

#[cfg(test)]
mod tests {
    use std::panic;

    use ff::Field;
    use midnight_circuits::{
        compact_std_lib::ZkStdLib,
        instructions::{AssertionInstructions, AssignmentInstructions},
    };
    use midnight_proofs::circuit::Value;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{
        challenge::cpu,
        instructions::Sha256Transcript,
        utils::{
            test_std_lib::{run_gadget_test, GadgetTest},
            util::{bytes_to_le_bits, fe_to_be_bytes},
        },
        F,
    };

    #[derive(Clone, Debug)]
    struct SerializationTest {
        x: F,
        width: usize,
        expected: Vec<u8>,
    }

    impl GadgetTest for SerializationTest {
        fn synthesize(
            &self,
            std_lib: &ZkStdLib,
            layouter: &mut impl Layouter<F>,
        ) -> Result<(), Error> {
            let x: AssignedNative<F> = std_lib.assign(layouter, Value::known(self.x))?;
            let bits = to_big_endian_bits(std_lib, layouter, &x, self.width)?;
            let expected_bits = bytes_to_le_bits(&self.expected);
            assert_eq!(bits.len(), expected_bits.len());
            for (bit, expected) in bits.iter().zip(expected_bits) {
                std_lib.assert_equal_to_fixed(layouter, bit, expected)?;
            }

            let y = from_big_endian_bits(std_lib, layouter, &bits)?;
            std_lib.assert_equal(layouter, &x, &y)
        }
    }

    #[test]
    fn test_big_endian_serialization() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5e);
        let x = F::random(&mut rng);
        let expected = fe_to_be_bytes(&x, 32).unwrap();
        assert!(run_gadget_test(SerializationTest {
            x,
            width: 256,
            expected
        }));

        let x = F::from(0x0a0b0c);
        let expected = fe_to_be_bytes(&x, 31).unwrap();
        assert_eq!(expected[28..], [0x00, 0x0a, 0x0b, 0x0c]);
        assert!(run_gadget_test(SerializationTest {
            x,
            width: 248,
            expected
        }));

        let x = F::from(0x0102);
        let mut expected = fe_to_be_bytes(&x, 2).unwrap();
        assert!(run_gadget_test(SerializationTest {
            x,
            width: 16,
            expected: expected.clone()
        }));
        expected.reverse();
        assert!(!run_gadget_test(SerializationTest {
            x,
            width: 16,
            expected
        }));
    }

    // A value wider than the serialization width either fails witness
    // generation or leaves the circuit unsatisfied.
    fn is_rejected(test: SerializationTest) -> bool {
        !panic::catch_unwind(move || run_gadget_test(test)).unwrap_or(false)
    }

    #[test]
    fn test_value_too_wide() {
        let x = F::from(0x1_0000);
        assert!(fe_to_be_bytes(&x, 2).is_none());
        assert!(is_rejected(SerializationTest {
            x,
            width: 16,
            expected: vec![0x00, 0x00]
        }));

        let x = F::from(0xffff);
        assert!(run_gadget_test(SerializationTest {
            x,
            width: 16,
            expected: vec![0xff, 0xff]
        }));
    }

    #[derive(Clone, Debug)]
    struct ChallengeTest {
        input_hash: F,
        commitment: F,
        config: ChallengeConfig,
        expected: F,
    }

    impl GadgetTest for ChallengeTest {
        fn synthesize(
            &self,
            std_lib: &ZkStdLib,
            layouter: &mut impl Layouter<F>,
        ) -> Result<(), Error> {
            let input_hash: AssignedNative<F> =
                std_lib.assign(layouter, Value::known(self.input_hash))?;
            let commitment: AssignedNative<F> =
                std_lib.assign(layouter, Value::known(self.commitment))?;
            let challenge = derive_challenge(
                std_lib,
                std_lib,
                layouter,
                &input_hash,
                &commitment,
                &self.config,
            )?;
            std_lib.assert_equal_to_fixed(layouter, &challenge, self.expected)
        }
    }

    #[test]
    fn test_derive_challenge() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xc4a1);

        let configs = [
            ChallengeConfig::default(),
            ChallengeConfig {
                input_hash_bits: 248,
                commitment_bits: 256,
            },
        ];
        for config in configs {
            let input_hash = F::from(rng.next_u64());
            let commitment = F::random(&mut rng);
            let expected =
                cpu::derive_challenge::<F, Sha256Transcript>(&input_hash, &commitment, &config)
                    .unwrap();

            assert!(run_gadget_test(ChallengeTest {
                input_hash,
                commitment,
                config,
                expected
            }));
            assert!(!run_gadget_test(ChallengeTest {
                input_hash,
                commitment,
                config,
                expected: expected + F::ONE
            }));
        }
    }
}
