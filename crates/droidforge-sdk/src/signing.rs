//! Signing credential resolution.
//!
//! A packaged APK is signed with either a custom identity or the platform's
//! default debug keystore. The custom identity comes from one of two
//! mutually exclusive sources depending on where the build runs:
//!
//! - **CI**: the `KEYSTORE_PATH`, `KEYSTORE_PASSWORD`, `KEY_ALIAS` and
//!   `KEY_PASSWORD` environment variables.
//! - **Local**: the `[signing]` table of the project config file.
//!
//! Resolution is all-or-nothing: a [`SigningIdentity`] exists only when all
//! four fields are present and non-empty. A partially configured identity is
//! treated as absent so a build never signs with incomplete credentials.
//! Absence is not an error; packaging falls back to the default keystore.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the build is executing, which decides the credential source.
///
/// Derived once per invocation from the `CI` environment variable and passed
/// down explicitly, so the resolver itself never branches on ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Continuous integration: credentials come from environment variables.
    Ci,
    /// Developer machine: credentials come from the project config file.
    Local,
}

impl ExecutionContext {
    /// Detects the context from the `CI` environment variable.
    ///
    /// `CI=true` (any case) or `CI=1` selects [`ExecutionContext::Ci`];
    /// anything else, including an unset variable, selects
    /// [`ExecutionContext::Local`].
    pub fn detect() -> Self {
        match env::var("CI") {
            Ok(val) if is_truthy(&val) => ExecutionContext::Ci,
            _ => ExecutionContext::Local,
        }
    }

    /// Returns the string representation of the context.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::Ci => "ci",
            ExecutionContext::Local => "local",
        }
    }
}

fn is_truthy(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

/// A complete signing credential bundle.
///
/// Only ever constructed with all four fields populated; see the module
/// docs for the all-or-nothing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    /// Path to the keystore file.
    pub store_path: PathBuf,
    /// Password for the keystore.
    pub store_password: String,
    /// Alias of the signing key inside the keystore.
    pub key_alias: String,
    /// Password for the signing key.
    pub key_password: String,
}

/// The `[signing]` table of the project config file.
///
/// All fields are optional so a config without the table, or with only some
/// of the keys, still parses; completeness is checked at resolution time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningProperties {
    /// Path to the keystore file.
    pub store_file: Option<String>,
    /// Password for the keystore.
    pub store_password: Option<String>,
    /// Alias of the signing key inside the keystore.
    pub key_alias: Option<String>,
    /// Password for the signing key.
    pub key_password: Option<String>,
}

impl SigningProperties {
    /// Converts the table into an identity if all four fields are set and
    /// non-empty.
    pub fn to_identity(&self) -> Option<SigningIdentity> {
        let store_path = non_empty(self.store_file.clone())?;
        let store_password = non_empty(self.store_password.clone())?;
        let key_alias = non_empty(self.key_alias.clone())?;
        let key_password = non_empty(self.key_password.clone())?;
        Some(SigningIdentity {
            store_path: PathBuf::from(store_path),
            store_password,
            key_alias,
            key_password,
        })
    }
}

/// Resolves the signing identity for this build, if any.
///
/// Consults the environment in CI and the config's `[signing]` table
/// locally. Emits a single advisory line either way. Never fails:
/// an incomplete configuration resolves to `None` and the caller packages
/// with the platform's default debug keystore.
pub fn resolve(
    context: ExecutionContext,
    local: Option<&SigningProperties>,
) -> Option<SigningIdentity> {
    let identity = match context {
        ExecutionContext::Ci => from_lookup(|key| env::var(key).ok()),
        ExecutionContext::Local => local.and_then(SigningProperties::to_identity),
    };

    match &identity {
        Some(id) => println!(
            "Using custom signing config with keystore {}",
            id.store_path.display()
        ),
        None => println!(
            "No complete signing config found; packaging will use the default debug keystore"
        ),
    }

    identity
}

/// Builds an identity from an environment-style key lookup.
///
/// Factored out of [`resolve`] so tests can substitute a map for the real
/// process environment.
fn from_lookup<F>(lookup: F) -> Option<SigningIdentity>
where
    F: Fn(&str) -> Option<String>,
{
    let store_path = non_empty(lookup("KEYSTORE_PATH"))?;
    let store_password = non_empty(lookup("KEYSTORE_PASSWORD"))?;
    let key_alias = non_empty(lookup("KEY_ALIAS"))?;
    let key_password = non_empty(lookup("KEY_PASSWORD"))?;
    Some(SigningIdentity {
        store_path: PathBuf::from(store_path),
        store_password,
        key_alias,
        key_password,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|val| !val.is_empty())
}
