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

//! Circuits proving batched updates of an identity commitment tree.
//!
//! A batch of leaves is inserted into (or deleted from) a fixed-depth Merkle
//! tree, and the same batch is bound to an external blob commitment: the
//! leaves are read as evaluations of a polynomial over a root-of-unity domain,
//! the polynomial is evaluated at a Fiat-Shamir challenge derived from the
//! batch root and the commitment, and the result is exposed as a public input.
//!
//! The crate is organised bottom-up:
//!
//! * [`merkle`]: root recomputation along authentication paths and the root
//!   of a balanced tree built from a batch.
//! * [`batch`]: insertion and deletion chains from `PreRoot` to `PostRoot`.
//! * [`barycentric`]: barycentric evaluation, general form and the
//!   root-of-unity closed form.
//! * [`challenge`]: byte-order controlled serialization and challenge
//!   derivation.
//! * [`relation`]: the top-level relations, built on
//!   [`midnight_circuits::compact_std_lib`].
//!
//! Every gadget is a function generic over the instruction traits it needs,
//! and comes with an off-circuit counterpart in a `cpu` submodule.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod barycentric;
pub mod batch;
pub mod challenge;
mod error;
pub mod instructions;
pub mod merkle;
pub mod relation;
mod utils;

pub use error::{Error, ErrorKind};
pub use relation::{
    DeletionInstance, DeletionRelation, DeletionWitness, InsertionInstance, InsertionRelation,
    InsertionWitness, MbuConfig,
};

/// Scalar field of BLS12-381, native to the proving backend.
pub type F = midnight_curves::Fq;
