use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

type DynError = Box<dyn std::error::Error>;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{}", e);
        std::process::exit(-1);
    }
}

fn try_main() -> Result<(), DynError> {
    if let Some(name) = env::args().nth(1) {
        if let Some(task) = TASKS.iter().find(|task| name == task.0) {
            (task.1)()?;
            return Ok(());
        }
    }
    print_help();
    Ok(())
}

fn print_help() {
    eprintln!("Tasks:");
    for task in TASKS {
        eprintln!("  {:20}{}", task.0, task.2);
    }
}

type Task = (&'static str, fn() -> Result<(), DynError>, &'static str);

const TASKS: &[Task] = &[
    ("ci", cmd_ci, "runs everything in CI"),
    ("check", cmd_check, "checks everything"),
    ("test", cmd_test, "tests everything"),
    (
        "features",
        cmd_features,
        "tests with various feature combinations",
    ),
    ("msrv", cmd_msrv, "builds the library with the minimum supported Rust version"),
    ("fmt", cmd_fmt, "checks formatting"),
    ("doc", cmd_doc, "generates documentation for everything"),
    ("clippy", cmd_clippy, "run clippy for everything"),
];

/// Packages and the features to test them with, after `--no-default-features`.
const FEATURE_SETS: &[(&str, &str)] = &[
    // `no_std` reader and buffers.
    ("modsect", ""),
    ("modsect", "std"),
    // Library without logging, with logging, and the binary.
    ("modsect-strip", ""),
    ("modsect-strip", "logging"),
    ("modsect-strip", "cli"),
];

fn cmd_ci() -> Result<(), DynError> {
    cmd_check()?;
    cmd_test()?;
    cmd_features()?;
    cmd_msrv()?;
    cmd_fmt()?;
    cmd_doc()?;
    cmd_clippy()?;
    Ok(())
}

fn cmd_check() -> Result<(), DynError> {
    cargo(&["check", "--workspace", "--all-targets", "--features", "all"])
}

fn cmd_test() -> Result<(), DynError> {
    cargo(&["test", "--workspace", "--features", "all"])
}

fn cmd_features() -> Result<(), DynError> {
    cargo(&["test", "--workspace"])?;
    for &(package, features) in FEATURE_SETS {
        let mut args = vec!["test", "-p", package, "--no-default-features"];
        if !features.is_empty() {
            args.extend(["--features", features]);
        }
        cargo(&args)?;
    }
    Ok(())
}

fn cmd_msrv() -> Result<(), DynError> {
    // Tests are excluded: `wasmparser` needs a newer compiler.
    cmd_with(
        "cargo",
        &["+1.70.0", "build", "-p", "modsect", "--no-default-features"],
        |_| (),
    )?;
    cmd_with("cargo", &["+1.70.0", "build", "-p", "modsect"], |_| ())
}

fn cmd_fmt() -> Result<(), DynError> {
    cargo(&["fmt", "--all", "--", "--check"])
}

fn cmd_doc() -> Result<(), DynError> {
    cargo_with(
        &[
            "doc",
            "--workspace",
            "--lib",
            "--no-default-features",
            "--features",
            "doc",
        ],
        |cmd| {
            cmd.env("RUSTDOCFLAGS", "-D warnings");
        },
    )
}

fn cmd_clippy() -> Result<(), DynError> {
    cargo(&[
        "clippy",
        "--workspace",
        "--features",
        "all",
        "--all-targets",
    ])
}

fn cargo(args: &[&str]) -> Result<(), DynError> {
    cargo_with(args, |_| ())
}

fn cargo_with(args: &[&str], f: impl FnOnce(&mut Command)) -> Result<(), DynError> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    cmd_with(&cargo, args, f)
}

fn cmd_with<F>(program: &str, args: &[&str], f: F) -> Result<(), DynError>
where
    F: FnOnce(&mut Command),
{
    println!("Running '{} {}'", program, args.join(" "));
    let mut command = Command::new(program);
    command.current_dir(project_root()).args(args);
    f(&mut command);
    let status = command.status()?;
    if !status.success() {
        Err(format!("'{} {}' failed", program, args.join(" ")))?;
    }
    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}
