//! Gradle packaging step.
//!
//! Packaging itself (APK assembly, signing mechanics) belongs to the host
//! app's Gradle build; this module only assembles the `./gradlew` invocation
//! for a variant, forwards the resolved signing identity as project
//! properties when one exists, and locates the APK the build produced.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::signing::SigningIdentity;
use crate::types::{BuildVariant, ForgeError};

/// Builds the Gradle argument list for a variant.
///
/// With a signing identity, the four credential fields are forwarded as
/// `-P` project properties under the names the app's build script reads.
/// Without one, no signing properties are passed and Gradle falls back to
/// the default debug keystore.
pub fn assemble_args(variant: BuildVariant, signing: Option<&SigningIdentity>) -> Vec<String> {
    let mut args = vec![variant.gradle_task().to_string()];
    if let Some(identity) = signing {
        args.push(format!("-PkeyStoreFile={}", identity.store_path.display()));
        args.push(format!("-PkeyStorePassword={}", identity.store_password));
        args.push(format!("-PkeyAlias={}", identity.key_alias));
        args.push(format!("-PkeyPassword={}", identity.key_password));
    }
    args
}

/// Runs the Gradle packaging step for a variant and returns the APK path.
///
/// Must only be called after asset sync and the native build have both
/// succeeded for this variant. Gradle's output is inherited so its
/// diagnostics reach the user unmodified; a nonzero exit or a missing APK
/// afterwards is fatal.
pub fn package(
    android_dir: &Path,
    app_module: &str,
    variant: BuildVariant,
    signing: Option<&SigningIdentity>,
) -> Result<PathBuf, ForgeError> {
    let gradlew = android_dir.join("gradlew");
    if !gradlew.exists() {
        return Err(ForgeError::Packaging(format!(
            "Gradle wrapper not found at {}",
            gradlew.display()
        )));
    }

    let mut cmd = Command::new("./gradlew");
    cmd.args(assemble_args(variant, signing))
        .current_dir(android_dir);

    let status = cmd.status().map_err(|e| {
        ForgeError::Packaging(format!("failed to run Gradle wrapper: {}", e))
    })?;

    if !status.success() {
        return Err(ForgeError::Packaging(format!(
            "Gradle {} exited with {}",
            variant.gradle_task(),
            status
        )));
    }

    let apk_path = apk_output_path(android_dir, app_module, variant);
    if !apk_path.exists() {
        return Err(ForgeError::Packaging(format!(
            "APK not found at expected location: {}",
            apk_path.display()
        )));
    }

    Ok(apk_path)
}

/// The Gradle default output location for a variant's APK.
pub fn apk_output_path(android_dir: &Path, app_module: &str, variant: BuildVariant) -> PathBuf {
    android_dir
        .join(app_module)
        .join("build/outputs/apk")
        .join(variant.as_str())
        .join(format!("{}-{}.apk", app_module, variant.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SigningIdentity {
        SigningIdentity {
            store_path: PathBuf::from("/keys/upload.jks"),
            store_password: "store-secret".into(),
            key_alias: "upload".into(),
            key_password: "key-secret".into(),
        }
    }

    #[test]
    fn args_without_identity_are_task_only() {
        assert_eq!(
            assemble_args(BuildVariant::Debug, None),
            vec!["assembleDebug".to_string()]
        );
    }

    #[test]
    fn args_with_identity_forward_all_four_properties() {
        let identity = identity();
        let args = assemble_args(BuildVariant::Release, Some(&identity));
        assert_eq!(
            args,
            vec![
                "assembleRelease".to_string(),
                "-PkeyStoreFile=/keys/upload.jks".to_string(),
                "-PkeyStorePassword=store-secret".to_string(),
                "-PkeyAlias=upload".to_string(),
                "-PkeyPassword=key-secret".to_string(),
            ]
        );
    }

    #[test]
    fn debug_and_release_share_one_identity() {
        // Both variants sign with the same resolved identity; only the task differs.
        let identity = identity();
        let debug = assemble_args(BuildVariant::Debug, Some(&identity));
        let release = assemble_args(BuildVariant::Release, Some(&identity));
        assert_eq!(debug[1..], release[1..]);
        assert_eq!(debug[0], "assembleDebug");
        assert_eq!(release[0], "assembleRelease");
    }

    #[test]
    fn apk_paths_do_not_collide_between_variants() {
        let root = Path::new("/proj");
        let debug = apk_output_path(root, "app", BuildVariant::Debug);
        let release = apk_output_path(root, "app", BuildVariant::Release);
        assert_ne!(debug, release);
        assert_eq!(
            debug,
            PathBuf::from("/proj/app/build/outputs/apk/debug/app-debug.apk")
        );
        assert_eq!(
            release,
            PathBuf::from("/proj/app/build/outputs/apk/release/app-release.apk")
        );
    }

    #[test]
    fn packaging_fails_without_gradle_wrapper() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = package(tmp.path(), "app", BuildVariant::Debug, None).unwrap_err();
        assert!(matches!(err, ForgeError::Packaging(_)));
        assert!(err.to_string().contains("Gradle wrapper not found"));
    }
}
