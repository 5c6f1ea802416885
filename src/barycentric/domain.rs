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

use std::iter;

use ff::PrimeField;

use crate::Error;

/// The multiplicative subgroup of order `d` of a field, where `d` is a power
/// of two dividing its 2-adic order.
///
/// The domain only depends on the field and `d`, and can be shared by every
/// evaluation over the same degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootsOfUnity<F: PrimeField> {
    omega: F,
    powers: Vec<F>,
    degree_inv: F,
}

impl<F: PrimeField> RootsOfUnity<F> {
    /// The `d`-th roots of unity, derived from [`PrimeField::ROOT_OF_UNITY`].
    pub fn new(degree: usize) -> Result<Self, Error> {
        Self::from_root(F::ROOT_OF_UNITY, F::S, degree)
    }

    /// The `d`-th roots of unity, derived from a primitive root of unity of
    /// order `2^log_order` by `log_order - log2(d)` squarings.
    pub fn from_root(root: F, log_order: u32, degree: usize) -> Result<Self, Error> {
        if !degree.is_power_of_two() {
            return Err(Error::DegreeNotPowerOfTwo(degree));
        }
        let log_degree = degree.trailing_zeros();
        if log_degree > log_order {
            return Err(Error::DegreeTooLarge {
                degree,
                two_adicity: log_order,
            });
        }

        let omega = (log_degree..log_order).fold(root, |w, _| w.square());
        let powers = iter::successors(Some(F::ONE), |p| Some(*p * omega))
            .take(degree)
            .collect();
        let degree_inv = Option::<F>::from(F::from(degree as u64).invert()).ok_or(
            Error::DegreeTooLarge {
                degree,
                two_adicity: log_order,
            },
        )?;

        Ok(Self {
            omega,
            powers,
            degree_inv,
        })
    }

    /// Size `d` of the domain.
    pub fn degree(&self) -> usize {
        self.powers.len()
    }

    /// The primitive `d`-th root of unity `ω`.
    pub fn omega(&self) -> F {
        self.omega
    }

    /// The nodes `ω^0, ..., ω^(d-1)`.
    pub fn nodes(&self) -> &[F] {
        &self.powers
    }

    /// `1 / d`.
    pub fn degree_inv(&self) -> F {
        self.degree_inv
    }
}
