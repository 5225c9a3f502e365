//! Core types for droidforge-sdk.
//!
//! This module defines the fundamental types used throughout the SDK:
//!
//! - [`ForgeError`] - Error types for pipeline operations
//! - [`BuildVariant`] - Build variant selection (debug or release)

use serde::{Deserialize, Serialize};

/// Error types for droidforge-sdk operations.
///
/// This enum covers the failure conditions of the packaging pipeline.
/// An incomplete signing configuration is deliberately *not* represented
/// here: credential resolution returns `Option<SigningIdentity>` and an
/// absent identity falls back to the platform default keystore.
///
/// # Example
///
/// ```ignore
/// use droidforge_sdk::{BuildPipeline, ForgeError};
///
/// match pipeline.run(variant, None) {
///     Ok(artifact) => println!("APK at {:?}", artifact.apk),
///     Err(ForgeError::NativeBuild(msg)) => eprintln!("native build failed: {msg}"),
///     Err(e) => eprintln!("pipeline failed: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// An I/O error occurred.
    ///
    /// Common causes include missing files, permission issues, or
    /// disk space problems during pipeline operations.
    #[error("I/O error: {0}. Check file paths and permissions")]
    Io(#[from] std::io::Error),

    /// A configuration error occurred.
    ///
    /// This indicates invalid or missing configuration, such as a
    /// malformed `droidforge.toml` or an unusable project layout.
    #[error("configuration error: {0}. Check droidforge.toml or CLI flags")]
    Config(String),

    /// Asset synchronization failed.
    ///
    /// The shared asset source tree could not be mirrored into the app
    /// module, e.g. because the source is missing or the destination is
    /// unwritable. Fatal for the variant: packaging never starts.
    #[error("asset sync failed: {0}")]
    AssetSync(String),

    /// The native build tool exited with a nonzero status.
    ///
    /// cargo-ndk's own diagnostics are passed through to the terminal
    /// verbatim; this error carries the exit status. Fatal for the
    /// variant: packaging never starts.
    #[error("native build failed: {0}")]
    NativeBuild(String),

    /// The Gradle packaging step failed or produced no APK.
    #[error("packaging failed: {0}")]
    Packaging(String),

    /// JSON serialization or deserialization failed.
    ///
    /// This can occur when writing build summaries.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build variant selecting architecture coverage and optimization profile.
///
/// Debug builds compile for the primary development ABI only so the
/// edit-build-deploy loop stays fast; release builds cover every supported
/// device ABI. Each variant maps to a fixed cargo profile tag and a fixed
/// Gradle assemble task.
///
/// # Example
///
/// ```
/// use droidforge_sdk::BuildVariant;
///
/// let variant = BuildVariant::Release;
/// assert_eq!(variant.as_str(), "release");
/// assert_eq!(variant.profile_tag(), "android-release");
/// assert_eq!(variant.gradle_task(), "assembleRelease");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Debug build: primary ABI only, dev profile.
    Debug,
    /// Release build: full ABI coverage, optimized profile.
    Release,
}

impl BuildVariant {
    /// Returns the string representation of the variant.
    ///
    /// This name is also the variant's directory segment in the app module
    /// (`src/debug/jniLibs`, `build/outputs/apk/release`, ...), so debug and
    /// release artifacts never collide.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    /// Returns the cargo profile tag passed to the native build tool.
    ///
    /// Fixed 1:1 mapping, independent of every other input.
    pub fn profile_tag(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "android-dev",
            BuildVariant::Release => "android-release",
        }
    }

    /// Returns the Gradle task that packages this variant.
    pub fn gradle_task(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "assembleDebug",
            BuildVariant::Release => "assembleRelease",
        }
    }
}
