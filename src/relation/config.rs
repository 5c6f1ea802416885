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

use ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::{
    barycentric::CollisionPolicy, challenge::ChallengeConfig, merkle::MAX_TREE_DEPTH, Error, F,
};

const MBU_CONFIG_VERSION: u32 = 1;

/// Polynomial degree of an EIP-4844 blob.
pub const BLOB_DEGREE: usize = 4096;

/// Fixed configuration of a batch update circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbuConfig {
    /// Depth of the Merkle tree.
    pub tree_depth: usize,

    /// Number of leaves updated by a batch.
    pub batch_size: usize,

    /// Size of the evaluation domain of the batch polynomial. The batch
    /// leaves are the first `batch_size` samples, the remaining ones are
    /// zero.
    pub polynomial_degree: usize,

    /// Serialization of the values the challenge is derived from.
    pub challenge: ChallengeConfig,

    /// Handling of a challenge that hits an interpolation node.
    pub collision_policy: CollisionPolicy,
}

impl MbuConfig {
    /// Batches of `batch_size` leaves in a tree of depth `tree_depth`,
    /// evaluated over a blob-sized domain.
    pub fn new(tree_depth: usize, batch_size: usize) -> Self {
        MbuConfig {
            tree_depth,
            batch_size,
            polynomial_degree: BLOB_DEGREE,
            challenge: ChallengeConfig::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    /// Checks that the configuration describes an insertion circuit that can
    /// be built.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_deletion()?;
        // The batch leaves are hashed into a balanced tree.
        if !self.batch_size.is_power_of_two() {
            return Err(Error::BalancedTreeSize(self.batch_size));
        }
        if !self.polynomial_degree.is_power_of_two() {
            return Err(Error::DegreeNotPowerOfTwo(self.polynomial_degree));
        }
        if self.polynomial_degree.trailing_zeros() > F::S {
            return Err(Error::DegreeTooLarge {
                degree: self.polynomial_degree,
                two_adicity: F::S,
            });
        }
        if self.batch_size > self.polynomial_degree {
            return Err(Error::TooManySamples {
                samples: self.batch_size,
                degree: self.polynomial_degree,
            });
        }
        self.challenge.validate()
    }

    /// Checks the tree depth and the batch size, the only fields a deletion
    /// circuit depends on.
    pub fn validate_deletion(&self) -> Result<(), Error> {
        if self.tree_depth == 0 || self.tree_depth > MAX_TREE_DEPTH {
            return Err(Error::TreeDepth(self.tree_depth));
        }
        if self.batch_size == 0 {
            return Err(Error::EmptyBatch);
        }
        Ok(())
    }

    /// Writes the configuration to a buffer.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&MBU_CONFIG_VERSION.to_le_bytes())?;
        bincode::serialize_into(writer, self).map_err(io::Error::other)
    }

    /// Reads a configuration from a buffer.
    pub fn read<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;
        let version = u32::from_le_bytes(version);
        match version {
            MBU_CONFIG_VERSION => bincode::deserialize_from(reader)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported MBU config version: {}", version),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(MbuConfig::new(30, 1024).validate().is_ok());
        assert!(MbuConfig::new(1, 1).validate().is_ok());

        assert!(matches!(
            MbuConfig::new(0, 4).validate(),
            Err(Error::TreeDepth(0))
        ));
        assert!(matches!(
            MbuConfig::new(64, 4).validate(),
            Err(Error::TreeDepth(64))
        ));
        assert!(matches!(
            MbuConfig::new(10, 6).validate(),
            Err(Error::BalancedTreeSize(6))
        ));
        assert!(matches!(
            MbuConfig::new(20, 8192).validate(),
            Err(Error::TooManySamples {
                samples: 8192,
                degree: 4096
            })
        ));

        let mut config = MbuConfig::new(10, 4);
        config.polynomial_degree = 100;
        assert!(matches!(
            config.validate(),
            Err(Error::DegreeNotPowerOfTwo(100))
        ));

        config.polynomial_degree = 1 << 33;
        assert!(matches!(
            config.validate(),
            Err(Error::DegreeTooLarge { two_adicity: 32, .. })
        ));

        config.polynomial_degree = 16;
        config.challenge.commitment_bits = 250;
        assert!(matches!(
            config.validate(),
            Err(Error::SerializationWidth { width: 250 })
        ));
    }

    #[test]
    fn test_validate_deletion() {
        assert!(MbuConfig::new(4, 3).validate_deletion().is_ok());
        assert!(matches!(
            MbuConfig::new(4, 3).validate(),
            Err(Error::BalancedTreeSize(3))
        ));

        let mut config = MbuConfig::new(4, 8192);
        config.challenge.commitment_bits = 250;
        assert!(config.validate_deletion().is_ok());

        assert!(matches!(
            MbuConfig::new(4, 0).validate_deletion(),
            Err(Error::EmptyBatch)
        ));
        assert!(matches!(
            MbuConfig::new(64, 3).validate_deletion(),
            Err(Error::TreeDepth(64))
        ));
    }

    #[test]
    fn test_serialization() {
        let mut config = MbuConfig::new(20, 64);
        config.challenge.input_hash_bits = 248;
        config.collision_policy = CollisionPolicy::Guarded;

        let mut buffer = vec![];
        config.write(&mut buffer).unwrap();
        assert_eq!(buffer[..4], MBU_CONFIG_VERSION.to_le_bytes());
        assert_eq!(MbuConfig::read(&mut buffer.as_slice()).unwrap(), config);

        buffer[0] = 2;
        let err = MbuConfig::read(&mut buffer.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
