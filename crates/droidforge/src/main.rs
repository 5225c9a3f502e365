use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use droidforge_sdk::{
    BuildPipeline, BuildVariant, ExecutionContext, PackagedArtifact, check_cargo_ndk, signing,
};

use config::DroidforgeConfig;

mod config;

/// CLI orchestrator for building Rust native libraries and packaging them
/// into the host Android app.
#[derive(Parser, Debug)]
#[command(name = "droidforge", author, version, about = "Android packaging orchestrator for Rust native libraries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the native library and package the APK for one or both variants.
    Build {
        #[arg(long, value_enum, default_value_t = VariantArg::Debug)]
        variant: VariantArg,
        #[arg(long, help = "Optional path to config file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Optional output path for the JSON build summary")]
        output: Option<PathBuf>,
        #[arg(long, help = "Print the stage commands without executing them")]
        dry_run: bool,
    },
    /// Scaffold a starter droidforge.toml.
    Init {
        #[arg(long, default_value = "droidforge.toml")]
        output: PathBuf,
    },
    /// Check that the external tools the pipeline depends on are available.
    Doctor {
        #[arg(long, help = "Optional path to config file")]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
#[clap(rename_all = "lowercase")]
enum VariantArg {
    Debug,
    Release,
    All,
}

impl VariantArg {
    /// The pipeline variants this selection expands to, debug first.
    fn variants(self) -> Vec<BuildVariant> {
        match self {
            VariantArg::Debug => vec![BuildVariant::Debug],
            VariantArg::Release => vec![BuildVariant::Release],
            VariantArg::All => vec![BuildVariant::Debug, BuildVariant::Release],
        }
    }
}

#[derive(Debug, Serialize)]
struct BuildSummary {
    context: &'static str,
    signing: &'static str,
    artifacts: Vec<PackagedArtifact>,
}

fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            variant,
            config,
            output,
            dry_run,
        } => cmd_build(variant, config.as_deref(), output.as_deref(), dry_run),
        Command::Init { output } => cmd_init(&output),
        Command::Doctor { config } => cmd_doctor(config.as_deref()),
    }
}

fn cmd_build(
    variant: VariantArg,
    config: Option<&Path>,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let (config, project_root) = load_config(config)?;

    // Resolved once per invocation, before any variant runs, and shared by
    // both debug and release packaging.
    let context = ExecutionContext::detect();
    let identity = signing::resolve(context, config.signing.as_ref());
    let signing_source = if identity.is_some() { "custom" } else { "default" };

    let pipeline = BuildPipeline::new(config.layout(&project_root), config.android.min_sdk)
        .verbose(true)
        .dry_run(dry_run);

    let mut artifacts = Vec::new();
    for variant in variant.variants() {
        println!("Building {} variant...", variant.as_str());
        let artifact = pipeline.run(variant, identity.as_ref())?;
        if let Some(apk) = &artifact.apk {
            println!("✓ Packaged {} APK at {:?}", variant.as_str(), apk);
        }
        artifacts.push(artifact);
    }

    let summary = BuildSummary {
        context: context.as_str(),
        signing: signing_source,
        artifacts,
    };
    write_summary(&summary, output)?;

    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    ensure_can_write(output)?;
    write_file(output, DroidforgeConfig::generate_starter_toml().as_bytes())?;
    println!("Wrote starter config to {:?}", output);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>) -> Result<()> {
    let (config, project_root) = load_config(config)?;
    let layout = config.layout(&project_root);

    let mut problems = Vec::new();

    match check_cargo_ndk() {
        Ok(()) => println!("✓ cargo-ndk is installed"),
        Err(err) => problems.push(err.to_string()),
    }

    let gradlew = layout.android_root().join("gradlew");
    if gradlew.exists() {
        println!("✓ Gradle wrapper found at {:?}", gradlew);
    } else {
        problems.push(format!("Gradle wrapper not found at {:?}", gradlew));
    }

    let assets = layout.asset_source();
    if assets.is_dir() {
        println!("✓ Asset source tree found at {:?}", assets);
    } else {
        problems.push(format!("asset source tree not found at {:?}", assets));
    }

    if problems.is_empty() {
        println!("\nEverything the pipeline needs is in place.");
        Ok(())
    } else {
        bail!("doctor found problems:\n  - {}", problems.join("\n  - "));
    }
}

/// Loads the config from the given path, or discovers `droidforge.toml`
/// walking up from the current directory. Without a config file, defaults
/// apply and the current directory is the project root.
fn load_config(path: Option<&Path>) -> Result<(DroidforgeConfig, PathBuf)> {
    if let Some(path) = path {
        let config = DroidforgeConfig::load_from_file(path)?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .map_or_else(std::env::current_dir, Ok)
            .context("resolving project root from config path")?;
        println!("Using config {:?}", path);
        return Ok((config, root));
    }

    let cwd = std::env::current_dir().context("resolving current directory")?;
    match DroidforgeConfig::discover_from(&cwd)? {
        Some((config, config_path)) => {
            println!("Using config {:?}", config_path);
            let root = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            Ok((config, root))
        }
        None => Ok((DroidforgeConfig::default(), cwd)),
    }
}

fn write_summary(summary: &BuildSummary, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    if let Some(path) = output {
        write_file(path, json.as_bytes())?;
        println!("Wrote build summary to {:?}", path);
    } else {
        println!("{json}");
    }
    Ok(())
}

fn load_dotenv() {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(".env.local");
        let _ = dotenvy::from_path(path);
    }
}

fn ensure_can_write(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file: {:?}", path);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory {:?}", parent))?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn variant_selection_expands_debug_first() {
        assert_eq!(VariantArg::Debug.variants(), vec![BuildVariant::Debug]);
        assert_eq!(VariantArg::Release.variants(), vec![BuildVariant::Release]);
        assert_eq!(
            VariantArg::All.variants(),
            vec![BuildVariant::Debug, BuildVariant::Release]
        );
    }

    #[test]
    fn refuses_to_overwrite_existing_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("droidforge.toml");
        fs::write(&path, "[android]\n").unwrap();
        let err = cmd_init(&path).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
    }

    #[test]
    fn init_writes_parseable_starter() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/droidforge.toml");
        cmd_init(&path).unwrap();
        let config = DroidforgeConfig::load_from_file(&path).unwrap();
        assert_eq!(config.android.min_sdk, 28);
    }

    #[test]
    fn summary_serializes_signing_source() {
        let summary = BuildSummary {
            context: "ci",
            signing: "custom",
            artifacts: vec![],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"context\":\"ci\""));
        assert!(json.contains("\"signing\":\"custom\""));
    }
}
