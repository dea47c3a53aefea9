//! Render command implementation for the RBook CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rbook_core::BookConfig;
use rbook_data::{QuerySet, SqliteRecordSource};
use rbook_render::{AssemblyReport, OutputTargets, render_book};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_RENDER_CONFIG, ARG_RENDER_DATABASE, ARG_RENDER_GPX, ARG_RENDER_OUTPUT, CliError,
    DEFAULT_BOOK_CONFIG, DEFAULT_DOCUMENT, ENV_RENDER_DATABASE,
};

/// CLI arguments for the `render` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "render",
    long_about = "Render a rally book from a YAML book configuration. Records \
                 are read from the rally SQLite database, laid out through the \
                 project's Handlebars templates and written as one HTML \
                 document, with an optional GPX file of bonus waypoints.",
    about = "Render the rally book"
)]
#[ortho_config(prefix = "RBOOK")]
pub(crate) struct RenderArgs {
    /// Book configuration file (YAML). Defaults to `rbook.yml`.
    #[arg(long = ARG_RENDER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) config: Option<Utf8PathBuf>,
    /// Output document, overriding the configured rally book file.
    #[arg(long = ARG_RENDER_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// GPX file for bonus waypoints, overriding `generateGPX.outputGPX`.
    #[arg(long = ARG_RENDER_GPX, value_name = "path")]
    #[serde(default)]
    pub(crate) gpx: Option<Utf8PathBuf>,
    /// Rally database, overriding the configured one.
    #[arg(long = ARG_RENDER_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl RenderArgs {
    pub(crate) fn into_config(self) -> Result<RenderConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RenderConfig::from(merged))
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RenderConfig, CliError> {
    let merged = RenderArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(RenderConfig::from(merged))
}

/// Resolved `render` invocation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderConfig {
    /// Book configuration file.
    pub(crate) config: Utf8PathBuf,
    /// Output document override.
    pub(crate) output: Option<Utf8PathBuf>,
    /// GPX file override.
    pub(crate) gpx: Option<Utf8PathBuf>,
    /// Database override.
    pub(crate) database: Option<Utf8PathBuf>,
}

impl From<RenderArgs> for RenderConfig {
    fn from(args: RenderArgs) -> Self {
        Self {
            config: args
                .config
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BOOK_CONFIG)),
            output: args.output,
            gpx: args.gpx,
            database: args.database,
        }
    }
}

/// Files a render reads and writes once the book configuration is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderPlan {
    pub(crate) database: Utf8PathBuf,
    pub(crate) targets: OutputTargets,
}

impl RenderConfig {
    /// Read and validate the book configuration file.
    pub(crate) fn load_book(&self) -> Result<BookConfig, CliError> {
        let text = rbook_fs::read_utf8_to_string(&self.config).map_err(|source| {
            CliError::ReadBookConfig {
                path: self.config.clone(),
                source,
            }
        })?;
        BookConfig::from_yaml(&text).map_err(|source| CliError::ParseBookConfig {
            path: self.config.clone(),
            source: Box::new(source),
        })
    }

    /// Combine command-line overrides with the book configuration.
    pub(crate) fn plan(&self, book: &BookConfig) -> Result<RenderPlan, CliError> {
        let output_folder = Utf8Path::new(&book.output_folder);
        let document = self.output.clone().unwrap_or_else(|| {
            let name = non_empty(&book.rallybook_file).unwrap_or(DEFAULT_DOCUMENT);
            output_folder.join(name)
        });
        let gpx = self.gpx.clone().or_else(|| {
            non_empty(&book.generate_gpx.output_gpx).map(|name| output_folder.join(name))
        });
        let database = self
            .database
            .clone()
            .or_else(|| non_empty(&book.database).map(Utf8PathBuf::from))
            .ok_or(CliError::MissingArgument {
                field: ARG_RENDER_DATABASE,
                env: ENV_RENDER_DATABASE,
            })?;
        Ok(RenderPlan {
            database,
            targets: OutputTargets { document, gpx },
        })
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub(crate) fn run_render(args: RenderArgs) -> Result<AssemblyReport, CliError> {
    let config = args.into_config()?;
    execute_render(&config)
}

/// Render the book described by `config`.
pub(crate) fn execute_render(config: &RenderConfig) -> Result<AssemblyReport, CliError> {
    let book = config.load_book()?;
    let plan = config.plan(&book)?;
    let source = SqliteRecordSource::open(&plan.database, QuerySet::from_config(&book))?;
    let report = render_book(&book, &source, &plan.targets)?;
    info!(
        "rally book written to {} ({} stream(s), {} failed)",
        plan.targets.document,
        report.streams.len(),
        report.failed_streams.len()
    );
    Ok(report)
}
