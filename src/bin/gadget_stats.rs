use std::{env, time::Duration, time::Instant};

use babybear_gadgets::harness::{run_circuit_test, CircuitTestConfig, Poseidon2ChainCircuit};
use babybear_gadgets::poseidon2::WIDTH;
use babybear_gadgets::{
    BabyBear, BabyBearChip, BabyBearExt4, BabyBearExtensionChip, Poseidon2BabyBearChip,
    Poseidon2Config, R1csBuilder,
};

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() == 0 {
        format!("{:.2} ms", duration.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.3} s", duration.as_secs_f64())
    }
}

fn parse_args() -> Result<usize, Box<dyn std::error::Error>> {
    let permutations = env::args()
        .nth(1)
        .map(|value| value.parse::<usize>())
        .transpose()?
        .unwrap_or(1);
    Ok(permutations)
}

/// Runs `body` on an empty builder and returns the (variables, constraints) it added.
fn measure(body: impl FnOnce(&mut R1csBuilder)) -> (usize, usize) {
    let mut builder = R1csBuilder::new();
    let (vars, constraints) = (builder.num_variables(), builder.num_constraints());
    body(&mut builder);
    (
        builder.num_variables() - vars,
        builder.num_constraints() - constraints,
    )
}

/// Like [`measure`], minus the cost of allocating the operands.
fn measure_op(baseline: (usize, usize), body: impl FnOnce(&mut R1csBuilder)) -> (usize, usize) {
    let (variables, constraints) = measure(body);
    (variables - baseline.0, constraints - baseline.1)
}

fn print_row(name: &str, (variables, constraints): (usize, usize)) {
    println!("  {:<22} {:>10} {:>12}", name, variables, constraints);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let permutations = parse_args()?;
    println!("=== BabyBear Gadget Stats ===\n");

    let base = BabyBearChip::new()?;
    let ext = BabyBearExtensionChip::new()?;
    let poseidon2 = Poseidon2BabyBearChip::new(Poseidon2Config::default())?;
    let x = BabyBear::new(123_456_789);
    let y = BabyBear::new(987_654_321);
    let u = BabyBearExt4::from_u32s([1, 2, 3, 4]);
    let v = BabyBearExt4::from_u32s([5, 6, 7, 8]);

    println!("  {:<22} {:>10} {:>12}", "gadget", "variables", "constraints");
    print_row("babybear.alloc", measure(|b| {
        base.alloc(b, x);
    }));
    let pair = |b: &mut R1csBuilder| (base.alloc(b, x), base.alloc(b, y));
    let baseline = measure(|b| {
        pair(b);
    });
    print_row("babybear.add", measure_op(baseline, |b| {
        let (a, c) = pair(b);
        base.add(b, a, c);
    }));
    print_row("babybear.mul", measure_op(baseline, |b| {
        let (a, c) = pair(b);
        base.mul(b, a, c);
    }));
    print_row("babybear.inv", measure_op(baseline, |b| {
        let (a, _) = pair(b);
        base.inv(b, a);
    }));
    print_row("babybear.assert_ne", measure_op(baseline, |b| {
        let (a, c) = pair(b);
        base.assert_ne(b, a, c);
    }));
    print_row("extension.mul", measure(|b| {
        let a = ext.alloc(b, u);
        let c = ext.alloc(b, v);
        ext.mul(b, a, c);
    }));
    print_row("poseidon2.permute", measure(|b| {
        let state = [BabyBear::ZERO; WIDTH].map(|value| poseidon2.field().alloc(b, value));
        poseidon2.permute(b, state);
    }));

    let circuit = Poseidon2ChainCircuit {
        input: std::array::from_fn(|i| BabyBear::new(i as u32)),
        permutations,
    };
    let start = Instant::now();
    let report = run_circuit_test(&circuit, &CircuitTestConfig::labeled("poseidon2-chain"))?;
    let elapsed = start.elapsed();

    println!("\n--- Poseidon2 chain ({} permutations) ---", permutations);
    println!("  variables:            {}", report.num_variables);
    println!("  constraints:          {}", report.num_constraints);
    println!("  synthesize + check:   {}", format_duration(elapsed));
    println!("  digest:               {}", report.digest_hex());

    Ok(())
}
