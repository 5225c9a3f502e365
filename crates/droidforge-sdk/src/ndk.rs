//! Native build invocation construction for cargo-ndk.
//!
//! The native library is cross-compiled once per variant by an external
//! `cargo ndk` process. This module assembles that command line; it performs
//! no I/O and spawns nothing, so identical inputs always produce identical
//! invocations. Execution lives in [`crate::pipeline`].

use std::path::Path;
use std::process::Command;

use crate::types::BuildVariant;

/// The primary development ABI.
///
/// Always present and always first in the target list. Some native build
/// tools pick their default target from the first `-t` flag, so ordering
/// is load-bearing.
pub const PRIMARY_ABI: &str = "arm64-v8a";

/// Additional ABIs built only for release, in fixed order after the primary.
const RELEASE_EXTRA_ABIS: [&str; 3] = ["armeabi-v7a", "x86", "x86_64"];

/// Returns the ordered ABI list for a variant.
///
/// Debug builds compile only [`PRIMARY_ABI`] for fast iteration; release
/// builds add the remaining device ABIs for full coverage.
pub fn abis(variant: BuildVariant) -> Vec<&'static str> {
    let mut abis = vec![PRIMARY_ABI];
    if variant == BuildVariant::Release {
        abis.extend(RELEASE_EXTRA_ABIS);
    }
    abis
}

/// A fully assembled native-build command line.
///
/// Constructed fresh per variant by [`invocation`] and never mutated
/// afterwards; [`NativeBuildInvocation::command`] renders it into a
/// [`std::process::Command`] when the pipeline is ready to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBuildInvocation {
    program: &'static str,
    args: Vec<String>,
}

impl NativeBuildInvocation {
    /// The program to spawn.
    pub fn program(&self) -> &str {
        self.program
    }

    /// The argument vector, in invocation order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the invocation into a spawnable command.
    ///
    /// `CARGO_TERM_COLOR` is forced on so cargo's diagnostics keep their
    /// colors when relayed through the orchestrator's terminal.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args);
        cmd.env("CARGO_TERM_COLOR", "always");
        cmd
    }

    /// A shell-style rendering for advisory output and dry runs.
    pub fn rendered(&self) -> String {
        let mut line = self.program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Builds the cargo-ndk invocation for a variant.
///
/// The command takes the shape
/// `cargo ndk --platform <min_sdk> -o <out_dir> -t <abi>... build --profile <tag>`
/// with one `-t` flag per entry of [`abis`], primary ABI first. The output
/// directory must be variant-specific; the caller's project layout keeps
/// debug and release artifacts in distinct directories.
pub fn invocation(variant: BuildVariant, min_sdk: u32, out_dir: &Path) -> NativeBuildInvocation {
    let mut args = vec![
        "ndk".to_string(),
        "--platform".to_string(),
        min_sdk.to_string(),
        "-o".to_string(),
        out_dir.display().to_string(),
    ];
    for abi in abis(variant) {
        args.push("-t".to_string());
        args.push(abi.to_string());
    }
    args.push("build".to_string());
    args.push("--profile".to_string());
    args.push(variant.profile_tag().to_string());

    NativeBuildInvocation {
        program: "cargo",
        args,
    }
}
