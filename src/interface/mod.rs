pub mod cli;
pub mod config;
pub mod output;

use crate::analysis::type_mapping::TypeMappingTable;
use crate::analysis::PackageAnalyzer;
use crate::error::{Error, Result};
use crate::generators::{FileWriter, JsonRenderer, RenderOptions, Renderer};
use crate::models::Diagnostic;
use crate::module::{GoModResolver, ModuleResolver};
use std::path::{Path, PathBuf};

pub use cli::*;
pub use config::*;
pub use output::*;

/// Outcome of a `generate` run over all configured packages
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    /// Package path and the package-fatal error it hit
    pub failures: Vec<(String, Error)>,
    pub diagnostics: usize,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate every configured package with the on-disk module resolver and JSON output
pub fn generate_from_config(config: &Go2TypeConfig, logger: &Logger) -> GenerationReport {
    let resolver = GoModResolver::new(logger.clone());
    generate_with(config, &resolver, &JsonRenderer::new(), logger)
}

/// Process packages in config order. A package-fatal error is reported and the
/// run moves on to the next package.
pub fn generate_with(
    config: &Go2TypeConfig,
    resolver: &dyn ModuleResolver,
    renderer: &dyn Renderer,
    logger: &Logger,
) -> GenerationReport {
    let options = RenderOptions::from_config(config);
    let mut writer = FileWriter::new();
    let mut report = GenerationReport::default();
    let mut progress = ProgressReporter::new(logger.clone(), config.packages.len());

    for package in &config.packages {
        progress.start_step(&package.path);

        let analyzer = PackageAnalyzer::new(
            resolver,
            TypeMappingTable::new(&package.type_mappings, config.use_date_object),
        )
        .with_logger(logger.clone());

        match generate_package(&analyzer, package, renderer, &options, &mut writer) {
            Ok(diagnostics) => {
                report.diagnostics += diagnostics.len();
                progress.suspend(|| logger.diagnostics(&package.path, &diagnostics));
                progress.complete_step(&format!("wrote {}", package.output_path));
                report.written.push(PathBuf::from(&package.output_path));
            }
            Err(e) => {
                progress.fail_step(&e.to_string());
                report.failures.push((package.path.clone(), e));
            }
        }
    }

    progress.finish(&format!(
        "Generated {} of {} packages ({} warnings)",
        report.written.len(),
        config.packages.len(),
        report.diagnostics
    ));
    report
}

fn generate_package(
    analyzer: &PackageAnalyzer<'_>,
    package: &PackageConfig,
    renderer: &dyn Renderer,
    options: &RenderOptions,
    writer: &mut FileWriter,
) -> Result<Vec<Diagnostic>> {
    let output = analyzer.analyze_dir(Path::new(&package.path))?;

    let rendered = renderer.render(&output, options)?;
    writer.write_output(Path::new(&package.output_path), &rendered)?;
    Ok(output.diagnostics)
}

/// Dispatch a parsed command line; returns the process exit code
pub fn run_cli(cli: Go2TypeCli) -> i32 {
    match cli.command {
        Commands::Version => {
            println!("go2type {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::Generate {
            config_file,
            verbose,
            debug,
        } => {
            let logger = Logger::new(verbose, debug);
            let config = match Go2TypeConfig::from_file(&config_file) {
                Ok(config) => config,
                Err(e) => {
                    logger.error(&format!(
                        "Failed to load {}: {}",
                        config_file.display(),
                        e
                    ));
                    return 1;
                }
            };

            logger.verbose(&format!(
                "Loaded {} with {} packages",
                config_file.display(),
                config.packages.len()
            ));
            let report = generate_from_config(&config, &logger);
            for (path, error) in &report.failures {
                logger.verbose(&format!("{} failed: {}", path, error));
            }
            0
        }
    }
}
