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

//! Off-circuit barycentric evaluation, used to compute the expected
//! evaluation of a batch and as a reference for the circuits.

use ff::PrimeField;

use super::RootsOfUnity;
use crate::Error;

/// Barycentric weights `w_j = 1 / prod_{k != j} (x_j - x_k)`.
pub fn weights<F: PrimeField>(nodes: &[F]) -> Result<Vec<F>, Error> {
    nodes
        .iter()
        .enumerate()
        .map(|(j, x_j)| {
            let denominator = nodes
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != j)
                .try_fold(F::ONE, |acc, (k, x_k)| {
                    let diff = *x_j - x_k;
                    if diff.is_zero_vartime() {
                        return Err(Error::DuplicateNodes(j.min(k), j.max(k)));
                    }
                    Ok(acc * diff)
                })?;
            Ok(invert(denominator))
        })
        .collect()
}

/// Evaluates at `z` the polynomial through `(nodes[j], values[j])`.
///
/// # Errors
///
/// [`Error::NodeCollision`] if `z` is one of the nodes,
/// [`Error::DuplicateNodes`] if two nodes are equal.
pub fn evaluate_general<F: PrimeField>(nodes: &[F], values: &[F], z: F) -> Result<F, Error> {
    check_lengths(nodes.len(), values.len())?;
    if let Some(j) = nodes.iter().position(|x_j| *x_j == z) {
        return Err(Error::NodeCollision(j));
    }
    if nodes.is_empty() {
        return Ok(F::ZERO);
    }

    let (numerator, denominator) = weights(nodes)?
        .into_iter()
        .zip(nodes.iter().zip(values))
        .fold((F::ZERO, F::ZERO), |(num, den), (w_j, (x_j, y_j))| {
            let term = w_j * invert(z - x_j);
            (num + term * y_j, den + term)
        });

    Ok(numerator * invert(denominator))
}

/// Same as [`evaluate_general`], but returns `values[j]` when `z` is
/// `nodes[j]`.
pub fn evaluate_general_or_sample<F: PrimeField>(
    nodes: &[F],
    values: &[F],
    z: F,
) -> Result<F, Error> {
    match evaluate_general(nodes, values, z) {
        Err(Error::NodeCollision(j)) => Ok(values[j]),
        res => res,
    }
}

/// Evaluates at `z` the polynomial taking value `values[j]` at `ω^j`, for
/// `j < values.len()`, and zero on the remaining nodes of the domain.
///
/// # Errors
///
/// [`Error::TooManySamples`] if there are more values than nodes,
/// [`Error::NodeCollision`] if `z` is a node carrying one of the samples.
/// On the remaining nodes the formula is defined and yields zero.
pub fn evaluate_at_roots_of_unity<F: PrimeField>(
    domain: &RootsOfUnity<F>,
    values: &[F],
    z: F,
) -> Result<F, Error> {
    check_samples(domain, values)?;
    if let Some(j) = domain.nodes()[..values.len()].iter().position(|x_j| *x_j == z) {
        return Err(Error::NodeCollision(j));
    }

    let first_term = (z.pow_vartime([domain.degree() as u64]) - F::ONE) * domain.degree_inv();
    let second_term = domain
        .nodes()
        .iter()
        .zip(values)
        .map(|(x_j, y_j)| *y_j * x_j * invert(z - x_j))
        .sum::<F>();

    Ok(first_term * second_term)
}

/// Same as [`evaluate_at_roots_of_unity`], but returns the sample at `z`
/// when `z` is a node carrying one of the samples.
pub fn evaluate_at_roots_of_unity_or_sample<F: PrimeField>(
    domain: &RootsOfUnity<F>,
    values: &[F],
    z: F,
) -> Result<F, Error> {
    match evaluate_at_roots_of_unity(domain, values, z) {
        Err(Error::NodeCollision(j)) => Ok(values[j]),
        res => res,
    }
}

fn check_lengths(nodes: usize, values: usize) -> Result<(), Error> {
    if nodes != values {
        return Err(Error::BatchLength {
            expected: nodes,
            actual: values,
        });
    }
    Ok(())
}

pub(super) fn check_samples<F: PrimeField>(
    domain: &RootsOfUnity<F>,
    values: &[impl Sized],
) -> Result<(), Error> {
    if values.len() > domain.degree() {
        return Err(Error::TooManySamples {
            samples: values.len(),
            degree: domain.degree(),
        });
    }
    Ok(())
}

// Only called on values that are known to be non-zero.
fn invert<F: PrimeField>(x: F) -> F {
    x.invert().unwrap_or(F::ZERO)
}
