//! Command Line Runs

use std::{fs, path::Path};
use tempfile::TempDir;
use zkarith::{
    arkworks::groth16::{Proof, VerifyingContext},
    circuit::{intermediate::read_wires, parser::parse, ProofSystem},
};
use zkarith_cli::{
    compile, run, Args, System, CONVERTED, F, PROOF, PROVING_KEY, VERIFYING_KEY, WIRES,
};

/// Three Wire Adder
const ADDER: &str = "total 3\ninput 0\ninput 1\nadd in 2 <0 1> out 1 <2>\noutput 2\n";

/// Writes `circuit` and `inputs` into a fresh directory and returns arguments writing into its
/// `out` subdirectory.
fn workspace(circuit: &str, inputs: &str) -> (TempDir, Args) {
    let dir = tempfile::tempdir().expect("Temporary directory is available.");
    let circuit_path = dir.path().join("circuit");
    let inputs_path = dir.path().join("inputs");
    fs::write(&circuit_path, circuit).expect("Temporary directory is writable.");
    fs::write(&inputs_path, inputs).expect("Temporary directory is writable.");
    let args = Args {
        circuit: circuit_path,
        inputs: inputs_path,
        out_dir: dir.path().join("out"),
        omit_const_div: false,
        prove: false,
        seed: None,
        verbose: false,
    };
    (dir, args)
}

/// Reads `name` from `out_dir` as text.
fn read(out_dir: &Path, name: &str) -> String {
    fs::read_to_string(out_dir.join(name)).expect("Artifact was written.")
}

/// Checks both text artifacts of the adder.
#[test]
fn adder_writes_converted_circuit_and_wires() {
    let (_dir, args) = workspace(ADDER, "0 0x5\n1 0x3\n");
    let written = run(&args).expect("Run succeeds.");
    assert_eq!(written.len(), 2);
    assert_eq!(
        read(&args.out_dir, CONVERTED),
        "input 3\nout_start 2\nadd 0 1 2\n"
    );
    assert_eq!(read(&args.out_dir, WIRES), "0 0x5\n1 0x3\n2 0x8\n");
}

/// Checks that values assigned to computed wires are ignored.
#[test]
fn non_input_assignments_are_ignored() {
    let compilation = compile(ADDER, "0 0x5\n1 0x3\n2 0x1\n").expect("Compilation succeeds.");
    assert_eq!(
        compilation.artifacts[1].contents,
        b"0 0x5\n1 0x3\n2 0x8\n".to_vec()
    );
}

/// Checks that a failed evaluation leaves the output directory untouched.
#[test]
fn division_by_zero_writes_nothing() {
    let (_dir, args) = workspace(
        "total 3\ninput 0\ninput 1\ndiv in 2 <0 1> out 1 <2>\noutput 2\n",
        "0 0x5\n1 0x0\n",
    );
    let err = run(&args).expect_err("Division by zero fails.");
    assert!(format!("{:#}", err).contains("division by zero"));
    assert!(!args.out_dir.exists());
}

/// Checks that parse failures name the offending line.
#[test]
fn parse_errors_name_the_line() {
    let err = compile("total 2\ninput 0\nsplit in 1 <0> out 1 <1>\n", "0 0x1\n")
        .expect_err("Split is unsupported.");
    assert!(format!("{:#}", err).contains("line 3"));
}

/// Checks that proving writes keys and a proof that verify against the wire table.
#[test]
fn seeded_proving_writes_verifiable_artifacts() {
    let (_dir, mut args) = workspace(ADDER, "0 0x5\n1 0x3\n");
    args.prove = true;
    args.seed = Some(42);
    let written = run(&args).expect("Run succeeds.");
    assert_eq!(written.len(), 5);
    assert!(!fs::read(args.out_dir.join(PROVING_KEY))
        .expect("Artifact was written.")
        .is_empty());
    let verifying_context = VerifyingContext::from_bytes(
        &fs::read(args.out_dir.join(VERIFYING_KEY)).expect("Artifact was written."),
    )
    .expect("Verifying key decodes.");
    let proof = Proof::from_bytes(&fs::read(args.out_dir.join(PROOF)).expect("Artifact was written."))
        .expect("Proof decodes.");
    let circuit = parse(ADDER).expect("Valid circuit.");
    let table = read_wires::<F>(&read(&args.out_dir, WIRES)).expect("Wire table reads back.");
    let input = System::public_input(&circuit, &table).expect("Outputs are present.");
    assert!(System::verify(&verifying_context, &input, &proof).expect("Verification runs."));
}
