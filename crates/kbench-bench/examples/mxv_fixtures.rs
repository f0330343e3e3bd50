//! Write `input.bin` / `output.bin` for the `mxv` example.
//!
//! ```text
//! cargo run --release --example mxv_fixtures -- <DIR> [REPETITIONS]
//! ```
//!
//! The output fixture is the input after `REPETITIONS` applications
//! (default 5, the harness default), matching a testing run with the same
//! repetition count.

use std::path::PathBuf;
use std::process::ExitCode;

use kbench::fixture::store_arrays;
use kbench_bench::Mxv;
use kbench_test_utils::random_values;

fn main() -> ExitCode {
    let mut args = std::env::args_os().skip(1);
    let Some(dir) = args.next().map(PathBuf::from) else {
        eprintln!("usage: mxv_fixtures <DIR> [REPETITIONS]");
        return ExitCode::from(64);
    };
    let repetitions: u32 = args
        .next()
        .and_then(|v| v.to_str().and_then(|s| s.parse().ok()))
        .unwrap_or(5);
    let p = std::env::var("MXV_P")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1024);

    let kernel = Mxv::new(p);
    let a = random_values(1, p * p);
    let b = random_values(2, p);
    let c = random_values(3, p);

    let mut result: Vec<f32> = [a.as_slice(), b.as_slice(), c.as_slice()].concat();
    for _ in 0..repetitions {
        kernel.apply(&mut result);
    }

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create {}: {e}", dir.display());
        return ExitCode::from(20);
    }
    let written = store_arrays(&dir.join("input.bin"), &[&a, &b, &c])
        .and_then(|_| store_arrays(&dir.join("output.bin"), &[&result]));
    match written {
        Ok(n) => {
            println!("{n} elements per fixture in {}", dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(20)
        }
    }
}
