//! Variant pipeline orchestration.
//!
//! Per variant the pipeline runs three stages: asset sync and the native
//! build first, as two independent tasks with no mutual ordering, then the
//! Gradle packaging step once both have succeeded. A failure in either
//! prerequisite is terminal for the variant; packaging never starts and
//! nothing is retried.
//!
//! Variant pipelines share no mutable state. The signing identity is
//! resolved once by the caller and passed by shared reference, so debug and
//! release runs are equivalent whether executed sequentially or
//! concurrently.

use std::path::PathBuf;
use std::process::Command;
use std::thread;

use serde::Serialize;

use crate::ndk::{self, NativeBuildInvocation};
use crate::signing::SigningIdentity;
use crate::types::{BuildVariant, ForgeError};
use crate::{assets, gradle};

/// Filesystem layout of the Android project being packaged.
///
/// All paths derive from the project root: the Gradle project directory,
/// the app module inside it, and the shared asset source tree. Per-variant
/// output directories are computed from the variant name, which keeps debug
/// and release artifacts in distinct directories.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Workspace root; the native build runs from here.
    pub project_root: PathBuf,
    /// Gradle project directory, relative to the root.
    pub android_dir: PathBuf,
    /// Name of the Gradle application module.
    pub app_module: String,
    /// Shared asset source tree, relative to the root.
    pub assets_dir: PathBuf,
}

impl ProjectLayout {
    /// Creates a layout with the conventional defaults: the Gradle project
    /// at the root itself, an `app` module, and an `assets/` source tree.
    pub fn with_defaults(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            android_dir: PathBuf::from("."),
            app_module: "app".to_string(),
            assets_dir: PathBuf::from("assets"),
        }
    }

    /// Absolute path of the Gradle project directory.
    pub fn android_root(&self) -> PathBuf {
        self.project_root.join(&self.android_dir)
    }

    /// Absolute path of the app module directory.
    pub fn app_dir(&self) -> PathBuf {
        self.android_root().join(&self.app_module)
    }

    /// Variant-specific jniLibs directory the native build writes into.
    pub fn jni_libs_dir(&self, variant: BuildVariant) -> PathBuf {
        self.app_dir()
            .join("src")
            .join(variant.as_str())
            .join("jniLibs")
    }

    /// Shared asset source tree.
    pub fn asset_source(&self) -> PathBuf {
        self.project_root.join(&self.assets_dir)
    }

    /// Asset destination inside the app module.
    pub fn asset_dest(&self) -> PathBuf {
        self.app_dir().join("src/main/assets")
    }
}

/// Result of a packaged variant.
#[derive(Debug, Clone, Serialize)]
pub struct PackagedArtifact {
    /// The variant that was built.
    pub variant: BuildVariant,
    /// Path to the packaged APK; `None` for dry runs.
    pub apk: Option<PathBuf>,
}

/// Orchestrates the three pipeline stages for one variant at a time.
///
/// # Example
///
/// ```ignore
/// use droidforge_sdk::{BuildPipeline, BuildVariant, ProjectLayout};
///
/// let layout = ProjectLayout::with_defaults(".");
/// let pipeline = BuildPipeline::new(layout, 28).verbose(true);
/// let artifact = pipeline.run(BuildVariant::Debug, None)?;
/// # Ok::<(), droidforge_sdk::ForgeError>(())
/// ```
pub struct BuildPipeline {
    layout: ProjectLayout,
    min_sdk: u32,
    verbose: bool,
    dry_run: bool,
}

impl BuildPipeline {
    /// Creates a pipeline over the given layout.
    ///
    /// `min_sdk` is the minimum Android platform version forwarded to the
    /// native build tool.
    pub fn new(layout: ProjectLayout, min_sdk: u32) -> Self {
        Self {
            layout,
            min_sdk,
            verbose: false,
            dry_run: false,
        }
    }

    /// Enables detailed output showing each stage's command line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Prints the stage commands without executing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the full pipeline for one variant.
    ///
    /// The signing identity, if any, was resolved once by the caller and is
    /// reused across variants; packaging applies it when present and falls
    /// back to the platform default keystore otherwise.
    pub fn run(
        &self,
        variant: BuildVariant,
        signing: Option<&SigningIdentity>,
    ) -> Result<PackagedArtifact, ForgeError> {
        let invocation = ndk::invocation(variant, self.min_sdk, &self.layout.jni_libs_dir(variant));
        let asset_source = self.layout.asset_source();
        let asset_dest = self.layout.asset_dest();

        if self.dry_run {
            println!("[dry-run] asset sync: {} -> {}", asset_source.display(), asset_dest.display());
            println!("[dry-run] native build: {}", invocation.rendered());
            println!(
                "[dry-run] packaging: ./gradlew {}",
                gradle::assemble_args(variant, signing).join(" ")
            );
            return Ok(PackagedArtifact { variant, apk: None });
        }

        if self.verbose {
            println!("Native build command: {}", invocation.rendered());
        }

        let apk = join_then_package(
            || {
                println!("Syncing assets into the app module...");
                let copied = assets::sync(&asset_source, &asset_dest)?;
                println!("Synced {} asset file(s)", copied);
                Ok(())
            },
            || {
                println!("Building native library for {}...", variant.as_str());
                self.run_native_build(&invocation)
            },
            || {
                println!("Packaging {} APK with Gradle...", variant.as_str());
                gradle::package(
                    &self.layout.android_root(),
                    &self.layout.app_module,
                    variant,
                    signing,
                )
            },
        )?;

        Ok(PackagedArtifact {
            variant,
            apk: Some(apk),
        })
    }

    /// Spawns the native build and blocks until it exits.
    ///
    /// Stdio is inherited so the tool's diagnostics reach the user verbatim;
    /// only the exit status is inspected.
    fn run_native_build(&self, invocation: &NativeBuildInvocation) -> Result<(), ForgeError> {
        let mut cmd = invocation.command();
        cmd.current_dir(&self.layout.project_root);

        let status = cmd.status().map_err(|e| {
            ForgeError::NativeBuild(format!(
                "failed to run cargo ndk: {}. Install it with: cargo install cargo-ndk",
                e
            ))
        })?;

        if !status.success() {
            return Err(ForgeError::NativeBuild(format!(
                "cargo ndk exited with {}",
                status
            )));
        }
        Ok(())
    }
}

/// Checks that cargo-ndk is installed and answers `--version`.
pub fn check_cargo_ndk() -> Result<(), ForgeError> {
    let output = Command::new("cargo").arg("ndk").arg("--version").output();
    match output {
        Ok(output) if output.status.success() => Ok(()),
        _ => Err(ForgeError::NativeBuild(
            "cargo-ndk is not installed. Install it with: cargo install cargo-ndk".to_string(),
        )),
    }
}

/// Runs the two packaging prerequisites as independent tasks, joins both,
/// and only then invokes the packaging step.
///
/// The prerequisites have no mutual ordering; packaging is the single
/// synchronization point. If either prerequisite fails, packaging is never
/// invoked and the first failure (asset sync checked first) is returned.
fn join_then_package<A, B, P, T>(
    sync_assets: A,
    native_build: B,
    package: P,
) -> Result<T, ForgeError>
where
    A: FnOnce() -> Result<(), ForgeError> + Send,
    B: FnOnce() -> Result<(), ForgeError> + Send,
    P: FnOnce() -> Result<T, ForgeError>,
{
    let (assets_result, build_result) = thread::scope(|scope| {
        let assets = scope.spawn(sync_assets);
        let build = scope.spawn(native_build);
        (assets.join(), build.join())
    });

    assets_result
        .unwrap_or_else(|_| Err(ForgeError::AssetSync("asset sync task panicked".to_string())))?;
    build_result.unwrap_or_else(|_| {
        Err(ForgeError::NativeBuild("native build task panicked".to_string()))
    })?;

    package()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn layout_keeps_variant_outputs_distinct() {
        let layout = ProjectLayout::with_defaults("/proj");
        let debug = layout.jni_libs_dir(BuildVariant::Debug);
        let release = layout.jni_libs_dir(BuildVariant::Release);
        assert_ne!(debug, release);
        assert_eq!(debug, PathBuf::from("/proj/./app/src/debug/jniLibs"));
        assert_eq!(release, PathBuf::from("/proj/./app/src/release/jniLibs"));
    }

    #[test]
    fn layout_asset_paths() {
        let layout = ProjectLayout {
            project_root: PathBuf::from("/proj"),
            android_dir: PathBuf::from("android"),
            app_module: "app".into(),
            assets_dir: PathBuf::from("assets"),
        };
        assert_eq!(layout.asset_source(), PathBuf::from("/proj/assets"));
        assert_eq!(
            layout.asset_dest(),
            PathBuf::from("/proj/android/app/src/main/assets")
        );
    }

    #[test]
    fn packaging_runs_only_after_both_prerequisites() {
        let assets_done = AtomicBool::new(false);
        let build_done = AtomicBool::new(false);

        let result = join_then_package(
            || {
                assets_done.store(true, Ordering::SeqCst);
                Ok(())
            },
            || {
                build_done.store(true, Ordering::SeqCst);
                Ok(())
            },
            || {
                assert!(assets_done.load(Ordering::SeqCst));
                assert!(build_done.load(Ordering::SeqCst));
                Ok(42)
            },
        );

        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn failed_native_build_blocks_packaging() {
        let packaged = AtomicBool::new(false);

        let result: Result<(), ForgeError> = join_then_package(
            || Ok(()),
            || Err(ForgeError::NativeBuild("exit status: 101".into())),
            || {
                packaged.store(true, Ordering::SeqCst);
                Ok(())
            },
        );

        assert!(matches!(result, Err(ForgeError::NativeBuild(_))));
        assert!(!packaged.load(Ordering::SeqCst));
    }

    #[test]
    fn failed_asset_sync_blocks_packaging() {
        let packaged = AtomicBool::new(false);

        let result: Result<(), ForgeError> = join_then_package(
            || Err(ForgeError::AssetSync("source missing".into())),
            || Ok(()),
            || {
                packaged.store(true, Ordering::SeqCst);
                Ok(())
            },
        );

        assert!(matches!(result, Err(ForgeError::AssetSync(_))));
        assert!(!packaged.load(Ordering::SeqCst));
    }

    #[test]
    fn dry_run_packages_nothing() {
        let layout = ProjectLayout::with_defaults("/nonexistent");
        let pipeline = BuildPipeline::new(layout, 28).dry_run(true);
        let artifact = pipeline.run(BuildVariant::Release, None).unwrap();
        assert_eq!(artifact.variant, BuildVariant::Release);
        assert!(artifact.apk.is_none());
    }
}
