//! Build orchestration for Android apps with Rust native libraries.
//!
//! `droidforge-sdk` automates the packaging pipeline of a host Android app
//! whose core is a Rust native library: cross-compile the library for the
//! variant's ABI set with cargo-ndk, mirror shared assets into the app
//! module, then hand off to Gradle for APK assembly and signing.
//!
//! # Pipeline
//!
//! Per build variant:
//!
//! 1. **Asset sync** - Mirror the shared asset tree into `src/main/assets`
//! 2. **Native build** - Run cargo-ndk for the variant's ABI set
//! 3. **Packaging** - Run `./gradlew assemble<Variant>` once both finished
//!
//! Stages 1 and 2 have no mutual ordering and run concurrently; stage 3 is
//! the join point. Debug builds target the primary ABI only; release builds
//! cover the full device ABI set.
//!
//! # Signing
//!
//! The signing identity is resolved once per invocation, from environment
//! variables in CI or from the project config locally, and only when all
//! four credential fields are present. An absent identity is not an error:
//! packaging falls back to the platform's default debug keystore.
//!
//! # Example
//!
//! ```ignore
//! use droidforge_sdk::{
//!     BuildPipeline, BuildVariant, ExecutionContext, ProjectLayout, signing,
//! };
//!
//! let identity = signing::resolve(ExecutionContext::detect(), None);
//! let pipeline = BuildPipeline::new(ProjectLayout::with_defaults("."), 28);
//!
//! for variant in [BuildVariant::Debug, BuildVariant::Release] {
//!     let artifact = pipeline.run(variant, identity.as_ref())?;
//!     println!("Packaged {:?}", artifact.apk);
//! }
//! # Ok::<(), droidforge_sdk::ForgeError>(())
//! ```

// Public modules
pub mod assets;
pub mod gradle;
pub mod ndk;
pub mod pipeline;
pub mod signing;
pub mod types;

// Re-export key types for convenience
pub use ndk::{NativeBuildInvocation, PRIMARY_ABI, abis, invocation};
pub use pipeline::{BuildPipeline, PackagedArtifact, ProjectLayout, check_cargo_ndk};
pub use signing::{ExecutionContext, SigningIdentity, SigningProperties, resolve};
pub use types::{BuildVariant, ForgeError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
