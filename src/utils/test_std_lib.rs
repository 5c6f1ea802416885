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

//! Harness for running gadgets on top of [`ZkStdLib`] under the mock prover.

use std::{fmt::Debug, io};

use midnight_circuits::compact_std_lib::{MidnightCircuit, Relation, ZkStdLib, ZkStdLibArch};
use midnight_proofs::{
    circuit::{Layouter, Value},
    dev::MockProver,
    plonk::Error,
};

use crate::F;

/// A gadget exercised with constant inputs baked into `self`.
pub(crate) trait GadgetTest: Clone + Debug {
    fn synthesize(&self, std_lib: &ZkStdLib, layouter: &mut impl Layouter<F>)
        -> Result<(), Error>;

    fn used_chips(&self) -> ZkStdLibArch {
        ZkStdLibArch {
            jubjub: false,
            ..ZkStdLibArch::default()
        }
    }
}

#[derive(Clone, Debug)]
struct GadgetRelation<T>(T);

impl<T: GadgetTest> Relation for GadgetRelation<T> {
    type Instance = ();

    type Witness = ();

    fn format_instance(_instance: &Self::Instance) -> Vec<F> {
        vec![]
    }

    fn circuit(
        &self,
        std_lib: &ZkStdLib,
        layouter: &mut impl Layouter<F>,
        _instance: Value<Self::Instance>,
        _witness: Value<Self::Witness>,
    ) -> Result<(), Error> {
        self.0.synthesize(std_lib, layouter)
    }

    fn used_chips(&self) -> ZkStdLibArch {
        self.0.used_chips()
    }

    fn write_relation<W: io::Write>(&self, _writer: &mut W) -> io::Result<()> {
        Ok(())
    }

    fn read_relation<R: io::Read>(_reader: &mut R) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "gadget tests cannot be deserialized",
        ))
    }
}

/// Runs the mock prover on the given gadget test and returns whether all
/// constraints are satisfied.
pub(crate) fn run_gadget_test<T: GadgetTest>(test: T) -> bool {
    run_mock_prover(test, vec![])
}

// A relation run on a known instance and witness.
#[derive(Clone, Debug)]
struct KnownRelation<R: Relation> {
    relation: R,
    instance: R::Instance,
    witness: R::Witness,
}

impl<R> GadgetTest for KnownRelation<R>
where
    R: Relation + Debug,
    R::Instance: Debug,
    R::Witness: Debug,
{
    fn synthesize(
        &self,
        std_lib: &ZkStdLib,
        layouter: &mut impl Layouter<F>,
    ) -> Result<(), Error> {
        self.relation.circuit(
            std_lib,
            layouter,
            Value::known(self.instance.clone()),
            Value::known(self.witness.clone()),
        )
    }
}

/// Runs the mock prover on `relation` with the given instance and witness,
/// and returns whether all constraints are satisfied.
pub(crate) fn run_relation_test<R>(
    relation: &R,
    instance: &R::Instance,
    witness: &R::Witness,
) -> bool
where
    R: Relation + Debug,
    R::Instance: Debug,
    R::Witness: Debug,
{
    let public_inputs = R::format_instance(instance);
    let test = KnownRelation {
        relation: relation.clone(),
        instance: instance.clone(),
        witness: witness.clone(),
    };
    run_mock_prover(test, public_inputs)
}

fn run_mock_prover<T: GadgetTest>(test: T, public_inputs: Vec<F>) -> bool {
    let relation = GadgetRelation(test);
    let circuit = MidnightCircuit::from_relation(&relation);
    let k = circuit.min_k();
    match MockProver::run(k, &circuit, vec![vec![], public_inputs]) {
        Ok(prover) => prover.verify().is_ok(),
        Err(_) => false,
    }
}
