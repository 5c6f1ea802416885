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
use midnight_circuits::types::{InnerConstants, Instantiable};
use midnight_proofs::{circuit::Layouter, plonk::Error};

use super::{cpu::check_samples, CollisionPolicy, RootsOfUnity};
use crate::{instructions::FieldArithmetic, Error as MbuError};

/// Evaluates at `z` the polynomial through `(nodes[j], values[j])` with the
/// general barycentric formula.
///
/// The nodes must be distinct, otherwise the circuit has no valid
/// assignment. Weights are computed in-circuit, with a quadratic number of
/// multiplications in the number of nodes.
pub fn evaluate_general<F, A, C>(
    chip: &C,
    layouter: &mut impl Layouter<F>,
    nodes: &[A],
    values: &[A],
    z: &A,
    policy: CollisionPolicy,
) -> Result<A, Error>
where
    F: PrimeField,
    A: Instantiable<F> + InnerConstants + Clone,
    A::Element: PrimeField,
    C: FieldArithmetic<F, A>,
{
    if nodes.len() != values.len() {
        return Err(MbuError::BatchLength {
            expected: nodes.len(),
            actual: values.len(),
        }
        .into());
    }
    debug!(
        "general barycentric evaluation over {} nodes ({:?})",
        nodes.len(),
        policy
    );
    if nodes.is_empty() {
        return chip.assign_fixed(layouter, A::Element::ZERO);
    }

    // terms[j] = w_j / (z - x_j)
    let mut terms = Vec::with_capacity(nodes.len());
    for (j, x_j) in nodes.iter().enumerate() {
        let mut product: Option<A> = None;
        for (k, x_k) in nodes.iter().enumerate() {
            if k == j {
                continue;
            }
            let diff = chip.sub(layouter, x_j, x_k)?;
            product = Some(match product {
                None => diff,
                Some(acc) => chip.mul(layouter, &acc, &diff, None)?,
            });
        }
        let weight: A = match product {
            None => chip.assign_fixed(layouter, A::Element::ONE)?,
            Some(product) => chip.inv(layouter, &product)?,
        };

        let diff = chip.sub(layouter, z, x_j)?;
        let diff_inv = match policy {
            CollisionPolicy::Unguarded => chip.inv(layouter, &diff)?,
            CollisionPolicy::Guarded => chip.inv0(layouter, &diff)?,
        };
        terms.push(chip.mul(layouter, &weight, &diff_inv, None)?);
    }

    let weighted_values = terms
        .iter()
        .zip(values)
        .map(|(t_j, y_j)| chip.mul(layouter, t_j, y_j, None))
        .collect::<Result<Vec<_>, Error>>()?;
    let numerator = sum(chip, layouter, &weighted_values)?;
    let denominator = sum(chip, layouter, &terms)?;

    match policy {
        CollisionPolicy::Unguarded => chip.div(layouter, &numerator, &denominator),
        CollisionPolicy::Guarded => {
            let zero: A = chip.assign_fixed(layouter, A::Element::ZERO)?;
            let one: A = chip.assign_fixed(layouter, A::Element::ONE)?;

            // Since the nodes are distinct, at most one of them equals z.
            let mut hits = Vec::with_capacity(nodes.len());
            let mut sample = Vec::with_capacity(nodes.len());
            for (x_j, y_j) in nodes.iter().zip(values) {
                let is_hit = chip.is_equal(layouter, z, x_j)?;
                hits.push(chip.select(layouter, &is_hit, &one, &zero)?);
                sample.push(chip.select(layouter, &is_hit, y_j, &zero)?);
            }
            let nb_hits = sum(chip, layouter, &hits)?;
            let sample = sum(chip, layouter, &sample)?;
            let no_hit = chip.is_equal_to_fixed(layouter, &nb_hits, A::Element::ZERO)?;

            let denominator = chip.select(layouter, &no_hit, &denominator, &one)?;
            let interpolated = chip.div(layouter, &numerator, &denominator)?;
            chip.select(layouter, &no_hit, &interpolated, &sample)
        }
    }
}

/// Evaluates at `z` the polynomial taking value `values[j]` at `ω^j`, where
/// `ω` generates `domain`, with the closed barycentric formula.
///
/// Fewer values than nodes may be given, the polynomial is zero on the
/// remaining nodes. The cost is linear in the number of values plus
/// logarithmic in the size of the domain.
///
/// # Errors
///
/// [`MbuError::TooManySamples`] if there are more values than nodes.
pub fn evaluate_at_roots_of_unity<F, A, C>(
    chip: &C,
    layouter: &mut impl Layouter<F>,
    domain: &RootsOfUnity<A::Element>,
    values: &[A],
    z: &A,
    policy: CollisionPolicy,
) -> Result<A, Error>
where
    F: PrimeField,
    A: Instantiable<F> + InnerConstants + Clone,
    A::Element: PrimeField,
    C: FieldArithmetic<F, A>,
{
    check_samples(domain, values)?;
    debug!(
        "barycentric evaluation of {} samples over {} roots of unity ({:?})",
        values.len(),
        domain.degree(),
        policy
    );
    if values.is_empty() {
        return chip.assign_fixed(layouter, A::Element::ZERO);
    }

    // (z^d - 1) / d
    let z_pow_d = chip.pow(layouter, z, domain.degree() as u64)?;
    let degree_inv = domain.degree_inv();
    let first_term =
        chip.linear_combination(layouter, &[(degree_inv, z_pow_d.clone())], -degree_inv)?;

    // y_j * ω^j / (z - ω^j)
    let terms = domain
        .nodes()
        .iter()
        .zip(values)
        .map(|(x_j, y_j)| {
            let diff = chip.add_constant(layouter, z, -*x_j)?;
            let diff_inv = match policy {
                CollisionPolicy::Unguarded => chip.inv(layouter, &diff)?,
                CollisionPolicy::Guarded => chip.inv0(layouter, &diff)?,
            };
            chip.mul(layouter, y_j, &diff_inv, Some(*x_j))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let second_term = sum(chip, layouter, &terms)?;

    let interpolated = chip.mul(layouter, &first_term, &second_term, None)?;

    match policy {
        CollisionPolicy::Unguarded => Ok(interpolated),
        CollisionPolicy::Guarded => {
            // z is a node iff z^d = 1, in which case the first term vanishes.
            let zero: A = chip.assign_fixed(layouter, A::Element::ZERO)?;
            let sample = domain
                .nodes()
                .iter()
                .zip(values)
                .map(|(x_j, y_j)| {
                    let is_hit = chip.is_equal_to_fixed(layouter, z, *x_j)?;
                    chip.select(layouter, &is_hit, y_j, &zero)
                })
                .collect::<Result<Vec<_>, Error>>()?;
            let sample = sum(chip, layouter, &sample)?;
            let on_domain = chip.is_equal_to_fixed(layouter, &z_pow_d, A::Element::ONE)?;
            chip.select(layouter, &on_domain, &sample, &interpolated)
        }
    }
}

fn sum<F, A, C>(chip: &C, layouter: &mut impl Layouter<F>, terms: &[A]) -> Result<A, Error>
where
    F: PrimeField,
    A: Instantiable<F> + InnerConstants + Clone,
    A::Element: PrimeField,
    C: FieldArithmetic<F, A>,
{
    let terms = terms
        .iter()
        .map(|t| (A::Element::ONE, t.clone()))
        .collect::<Vec<_>>();
    chip.linear_combination(layouter, &terms, A::Element::ZERO)
}
