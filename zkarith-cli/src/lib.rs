//! zkarith Command Line Interface
//!
//! Compiles an arithmetic circuit and its input assignment into the converted circuit and the
//! full wire value table, and optionally proves the evaluation with Groth16 over BN254. Every
//! artifact is rendered in memory first so a failure never leaves partial output behind.

#![forbid(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::OsRng, CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, info_span};
use zkarith::{
    arkworks::{
        bn254::{Bn254, Fr},
        groth16::Groth16,
        Fp,
    },
    circuit::{
        collapse::evaluate,
        intermediate::{write_converted, write_wires},
        parser::parse,
        Circuit, ConstDivPolicy, ConstraintOptions, InputAssignment, ProofSystem, ValueTable,
    },
};

/// Circuit Field
pub type F = Fp<Fr>;

/// Proof System
pub type System = Groth16<Bn254>;

/// Converted Circuit File Name
pub const CONVERTED: &str = "arith_converted";

/// Wire Value Table File Name
pub const WIRES: &str = "arith_wires";

/// Proving Key File Name
pub const PROVING_KEY: &str = "proving_key.bin";

/// Verifying Key File Name
pub const VERIFYING_KEY: &str = "verifying_key.bin";

/// Proof File Name
pub const PROOF: &str = "proof.bin";

/// Command Line Arguments
#[derive(Clone, Debug, Parser)]
#[command(name = "zkarith", version)]
#[command(about = "Compile an arithmetic circuit and evaluate its wires", long_about = None)]
pub struct Args {
    /// Path to the circuit source
    pub circuit: PathBuf,

    /// Path to the input assignment
    pub inputs: PathBuf,

    /// Directory the artifacts are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Leave constant divisions unconstrained
    #[arg(long)]
    pub omit_const_div: bool,

    /// Also run Groth16 setup, proving, and verification
    #[arg(long)]
    pub prove: bool,

    /// Seed for deterministic Groth16 randomness
    #[arg(long, requires = "prove")]
    pub seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the constraint lowering options selected by `self`.
    #[inline]
    pub fn options(&self) -> ConstraintOptions {
        ConstraintOptions {
            const_div: if self.omit_const_div {
                ConstDivPolicy::Omit
            } else {
                ConstDivPolicy::Enforce
            },
        }
    }
}

/// Rendered Output File
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    /// File Name inside the Output Directory
    pub name: &'static str,

    /// File Contents
    pub contents: Vec<u8>,
}

impl Artifact {
    /// Builds a new [`Artifact`].
    #[inline]
    pub fn new<C>(name: &'static str, contents: C) -> Self
    where
        C: Into<Vec<u8>>,
    {
        Self {
            name,
            contents: contents.into(),
        }
    }
}

/// Compilation Output
#[derive(Clone, Debug)]
pub struct Compilation {
    /// Parsed Circuit
    pub circuit: Circuit,

    /// Complete Wire Value Table
    pub table: ValueTable<F>,

    /// Converted Circuit and Wire Value Artifacts
    pub artifacts: Vec<Artifact>,
}

/// Parses and evaluates `circuit` over `inputs`, rendering the converted circuit and the wire
/// value table.
#[inline]
pub fn compile(circuit: &str, inputs: &str) -> Result<Compilation> {
    let circuit = info_span!("parse")
        .in_scope(|| parse(circuit))
        .context("failed to parse circuit")?;
    let mut inputs = InputAssignment::<F>::parse(inputs).context("failed to parse inputs")?;
    inputs.retain_inputs(&circuit);
    let table = info_span!("evaluate")
        .in_scope(|| evaluate(&circuit, inputs))
        .context("failed to evaluate circuit")?;
    let artifacts = info_span!("emit").in_scope(|| -> Result<_> {
        Ok(vec![
            Artifact::new(CONVERTED, write_converted::<F>(&circuit)?),
            Artifact::new(WIRES, write_wires(&table, circuit.total_wires())?),
        ])
    })?;
    info!(
        wires = circuit.total_wires(),
        gates = circuit.gates().len(),
        outputs = circuit.outputs().len(),
        "compiled circuit"
    );
    Ok(Compilation {
        circuit,
        table,
        artifacts,
    })
}

/// Proves that `table` satisfies `circuit` and checks the proof, rendering the keys and proof.
#[inline]
pub fn prove<R>(
    circuit: &Circuit,
    table: &ValueTable<F>,
    options: ConstraintOptions,
    rng: &mut R,
) -> Result<Vec<Artifact>>
where
    R: CryptoRng + RngCore,
{
    let _span = info_span!("prove").entered();
    let (proving_context, verifying_context) =
        System::compile(circuit, options, rng).context("failed to generate groth16 keys")?;
    let proof = System::prove(&proving_context, circuit, table, options, rng)
        .context("failed to prove circuit evaluation")?;
    let input = System::public_input(circuit, table)?;
    anyhow::ensure!(
        System::verify(&verifying_context, &input, &proof)?,
        "generated proof does not verify"
    );
    info!(public_inputs = input.len(), "verified groth16 proof");
    Ok(vec![
        Artifact::new(PROVING_KEY, proving_context.to_bytes()?),
        Artifact::new(VERIFYING_KEY, verifying_context.to_bytes()?),
        Artifact::new(PROOF, proof.to_bytes()?),
    ])
}

/// Writes every artifact into `out_dir`, returning the written paths.
#[inline]
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create `{}`", out_dir.display()))?;
    artifacts
        .iter()
        .map(|artifact| {
            let path = out_dir.join(artifact.name);
            fs::write(&path, &artifact.contents)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Runs one compilation described by `args`, returning the written paths.
///
/// Nothing is written unless every phase succeeds.
#[inline]
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let circuit = fs::read_to_string(&args.circuit)
        .with_context(|| format!("failed to read `{}`", args.circuit.display()))?;
    let inputs = fs::read_to_string(&args.inputs)
        .with_context(|| format!("failed to read `{}`", args.inputs.display()))?;
    let Compilation {
        circuit,
        table,
        mut artifacts,
    } = compile(&circuit, &inputs)?;
    if args.prove {
        let options = args.options();
        artifacts.extend(match args.seed {
            Some(seed) => prove(
                &circuit,
                &table,
                options,
                &mut ChaCha20Rng::seed_from_u64(seed),
            )?,
            None => prove(&circuit, &table, options, &mut OsRng)?,
        });
    }
    write_artifacts(&args.out_dir, &artifacts)
}
