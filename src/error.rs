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

//! Error type of the crate.

use std::io;

use thiserror::Error;

/// Alias for the error emitted by the proving backend during synthesis.
pub type PlonkError = midnight_proofs::plonk::Error;

/// Error type.
///
/// Shape mismatches are detected while building a circuit and abort its
/// construction. Whether an assignment satisfies the circuit is not an error
/// of this type: it only becomes visible when a proof fails to verify.
#[derive(Error, Debug)]
pub enum Error {
    /// A bit vector whose length is not a whole number of bytes.
    #[error("Bit pattern length was {0} not a total number of bytes")]
    BitPatternLength(usize),

    /// An authentication path of the wrong length.
    #[error("Authentication path has {actual} nodes, expected {expected}")]
    PathLength {
        /// The configured tree depth.
        expected: usize,
        /// The length that was given.
        actual: usize,
    },

    /// A batch array of the wrong length.
    #[error("Batch has {actual} entries, expected {expected}")]
    BatchLength {
        /// The configured batch size.
        expected: usize,
        /// The length that was given.
        actual: usize,
    },

    /// A batch without any leaf.
    #[error("Batch must contain at least one leaf")]
    EmptyBatch,

    /// A tree depth that cannot be handled.
    #[error("Tree depth {0} is not supported")]
    TreeDepth(usize),

    /// The leaves of a balanced tree must be a non-zero power of two.
    #[error("Cannot build a balanced tree from {0} leaves")]
    BalancedTreeSize(usize),

    /// The evaluation domain must have a power-of-two size.
    #[error("Polynomial degree {0} is not a power of two")]
    DegreeNotPowerOfTwo(usize),

    /// The evaluation domain is larger than the 2-adic subgroup of the field.
    #[error("Polynomial degree {degree} exceeds the 2-adic order 2^{two_adicity}")]
    DegreeTooLarge {
        /// The requested domain size.
        degree: usize,
        /// The 2-adicity of the available root of unity.
        two_adicity: u32,
    },

    /// More samples than points in the evaluation domain.
    #[error("{samples} samples do not fit a domain of size {degree}")]
    TooManySamples {
        /// The number of samples.
        samples: usize,
        /// The domain size.
        degree: usize,
    },

    /// A serialization width that is not supported.
    #[error("Serialization width of {width} bits is not supported")]
    SerializationWidth {
        /// The requested width.
        width: usize,
    },

    /// A value that does not fit the requested serialization width.
    #[error("Value does not fit in {width} bits")]
    ValueTooWide {
        /// The requested width.
        width: usize,
    },

    /// A leaf index outside of the tree.
    #[error("Index {index} is out of range for a tree of depth {depth}")]
    IndexOutOfRange {
        /// The offending index.
        index: u64,
        /// The tree depth.
        depth: usize,
    },

    /// Insertion into a slot that is not empty.
    #[error("Leaf {0} is already occupied")]
    OccupiedLeaf(u64),

    /// Deletion of a slot that is already empty.
    #[error("Leaf {0} is empty")]
    EmptyLeaf(u64),

    /// The evaluation point equals the interpolation node with this index.
    #[error("Evaluation point coincides with interpolation node {0}")]
    NodeCollision(usize),

    /// Two interpolation nodes are equal.
    #[error("Interpolation nodes {0} and {1} coincide")]
    DuplicateNodes(usize, usize),

    /// (De)serialization failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Plonk synthesis, proving or verification error.
    #[error("Synthesis error")]
    Plonk(#[from] PlonkError),
}

/// Coarse classification of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shape mismatch detected while building a circuit or its inputs.
    Structural,
    /// An assignment that does not satisfy the circuit.
    ConstraintViolation,
    /// A division by zero in the barycentric formula.
    AlgebraicSingularity,
}

impl Error {
    /// The class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Plonk(_) => ErrorKind::ConstraintViolation,
            Error::NodeCollision(_) | Error::DuplicateNodes(_, _) => {
                ErrorKind::AlgebraicSingularity
            }
            _ => ErrorKind::Structural,
        }
    }
}

impl From<Error> for PlonkError {
    fn from(value: Error) -> Self {
        match value {
            Error::Plonk(err) => err,
            err => Self::Transcript(io::Error::other(err)),
        }
    }
}
