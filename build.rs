// build.rs

use std::env;

fn main() {
    // Select exactly one instruction-set family at build time and expose it as
    // custom cfg flags. The AVX family is only selected when the compile target
    // enables the feature: without it the intrinsics cannot inline and every
    // register operation becomes an out-of-line call.
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SHORTVEC_ISA");
    println!("cargo:rustc-check-cfg=cfg(shortvec_avx)");
    println!("cargo:rustc-check-cfg=cfg(shortvec_avx2)");
    println!("cargo:rustc-check-cfg=cfg(shortvec_scalar)");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let native = env::var("HOST").ok() == env::var("TARGET").ok();
    let requested = env::var("SHORTVEC_ISA").ok();

    let enabled = |feature: &str| {
        arch == "x86_64" && target_features.split(',').any(|f| f == feature)
    };
    let hint = |feature: &str| {
        if arch == "x86_64" && native && host_has(feature) && !enabled(feature) {
            println!(
                "cargo:warning=host CPU supports {} but the target does not enable it; \
                 build with RUSTFLAGS=\"-C target-cpu=native\" to use it",
                feature
            );
        }
    };

    match requested.as_deref() {
        Some("scalar") => {
            println!("cargo:rustc-cfg=shortvec_scalar");
            return;
        }
        Some("sse2") => return,
        Some("avx") => {
            if enabled("avx") {
                println!("cargo:rustc-cfg=shortvec_avx");
            } else {
                println!("cargo:warning=SHORTVEC_ISA=avx ignored: target does not enable avx, using sse2");
                hint("avx");
            }
            return;
        }
        Some("avx2") => {
            if !enabled("avx2") {
                println!("cargo:warning=SHORTVEC_ISA=avx2 ignored: target does not enable avx2, selecting automatically");
            }
        }
        None => {}
        Some(other) => {
            println!("cargo:warning=unknown SHORTVEC_ISA '{}', selecting automatically", other);
        }
    }

    if enabled("avx") {
        println!("cargo:rustc-cfg=shortvec_avx");
        if enabled("avx2") {
            println!("cargo:rustc-cfg=shortvec_avx2");
        } else {
            hint("avx2");
        }
    } else {
        hint("avx");
    }
    // aarch64 always has NEON; no flag needed.
}

#[cfg(target_arch = "x86_64")]
fn host_has(feature: &str) -> bool {
    match feature {
        "avx" => is_x86_feature_detected!("avx"),
        "avx2" => is_x86_feature_detected!("avx2"),
        _ => false,
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn host_has(_feature: &str) -> bool {
    false
}
