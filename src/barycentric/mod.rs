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

//! Barycentric evaluation of the polynomial interpolating a set of samples.
//!
//! Given samples `(x_j, y_j)` for `j = 0..d` on distinct nodes, the unique
//! polynomial `L` of degree lower than `d` with `L(x_j) = y_j` is
//!
//! ```text
//!   w_j  = 1 / prod_{k != j} (x_j - x_k)
//!   L(z) = ( sum_j w_j * y_j / (z - x_j) ) / ( sum_j w_j / (z - x_j) )
//! ```
//!
//! When the nodes are the `d`-th roots of unity `x_j = ω^j`, the weights are
//! `w_j = ω^j / d` and the formula collapses to
//!
//! ```text
//!   L(z) = (z^d - 1) / d * sum_j y_j * ω^j / (z - ω^j)
//! ```
//!
//! which costs a linear number of operations and needs no weights. This is
//! the form used to open a blob commitment at a challenge point; the general
//! form serves as reference.
//!
//! Both formulas divide by zero when `z` is one of the nodes carrying a
//! sample. On a node of the closed form without sample, `z^d - 1` vanishes
//! and so does the evaluation. How circuits deal with collisions is governed
//! by a [`CollisionPolicy`].

pub mod cpu;
mod barycentric_gadget;
mod domain;

pub use barycentric_gadget::{evaluate_at_roots_of_unity, evaluate_general};
pub use domain::RootsOfUnity;
use serde::{Deserialize, Serialize};

/// Handling of an evaluation point that coincides with an interpolation
/// node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Inverses are computed with [`inv`], so a collision leaves the circuit
    /// without valid assignment. Evaluation points derived by hashing hit one
    /// of `d` nodes with probability `d / p`.
    ///
    /// [`inv`]: midnight_circuits::instructions::ArithInstructions::inv
    #[default]
    Unguarded,

    /// Inverses are computed with [`inv0`] and a collision with node `x_j`
    /// returns `y_j`, so that `L` is defined everywhere.
    ///
    /// [`inv0`]: midnight_circuits::instructions::ArithInstructions::inv0
    Guarded,
}
