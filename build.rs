use std::process::Command;

fn main() {
    // Plugins must be built by the same compiler for the same target; the
    // loader compares these through the descriptor fingerprint.
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(&rustc)
        .arg("-V")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|stdout| stdout.trim().to_string())
        .unwrap_or_else(|| "rustc unknown".to_string());

    let target = std::env::var("TARGET").unwrap_or_default();
    let panic = std::env::var("CARGO_CFG_PANIC").unwrap_or_else(|_| "unwind".to_string());

    println!("cargo:rustc-env=EDGEWARD_RUSTC_VERSION={}", version);
    println!("cargo:rustc-env=EDGEWARD_TARGET={}", target);
    println!("cargo:rustc-env=EDGEWARD_PANIC={}", panic);
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-changed=build.rs");
}
