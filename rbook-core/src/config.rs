//! Book configuration: document metadata, the section outline and stream
//! definitions.
//!
//! The configuration is authored as YAML and read once per run. Keys are
//! camelCase at the top level and lowercase inside stream definitions; the
//! lowercase spelling of every top-level key is accepted as well. When the
//! configuration is handed to a static template it serialises with
//! `PascalCase` names (`Title`, `Description`, `ProjectFolder`, ...).

use std::collections::HashSet;

use config::{Config, File, FileFormat};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paginate::StreamLayout;
use crate::points::PointsPrefixes;

/// Prefix marking a section name as a stream reference.
pub const STREAM_SECTION_PREFIX: &str = "stream.";

/// Errors raised while loading a book configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML could not be parsed or did not match the expected shape.
    #[error("failed to parse book configuration: {0}")]
    Parse(#[from] config::ConfigError),
    /// A stream definition has no identifier.
    #[error("stream definition {index} has no streamid")]
    MissingStreamId {
        /// Zero-based position in the `streams` list.
        index: usize,
    },
    /// Two stream definitions share an identifier.
    #[error("stream '{id}' is defined more than once")]
    DuplicateStream {
        /// The repeated identifier.
        id: String,
    },
}

/// Record kind a stream is drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum StreamKind {
    /// Rows from the bonuses table.
    #[default]
    Bonus,
    /// Rows from the combinations table.
    Combo,
    /// Rows from the entrants table.
    Entrant,
    /// No rows; the stream's template is rendered once like a static section.
    Static,
}

impl From<String> for StreamKind {
    fn from(kind: String) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "" | "bonus" => Self::Bonus,
            "combo" => Self::Combo,
            "entrant" => Self::Entrant,
            "static" => Self::Static,
            other => {
                warn!("unknown stream type '{other}'; treating it as a bonus stream");
                Self::Bonus
            }
        }
    }
}

/// One named stream of records and how it is laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase"))]
pub struct StreamConfig {
    /// Identifier referenced from the section list as `stream.<id>`.
    #[serde(rename(deserialize = "streamid", serialize = "StreamID"))]
    pub id: String,
    /// Record kind.
    #[serde(rename(deserialize = "type"))]
    pub kind: StreamKind,
    /// SQL filter appended as `WHERE ...`. Trusted operator text.
    #[serde(rename(deserialize = "wherestring"))]
    pub where_clause: String,
    /// SQL ordering appended as `ORDER BY ...`. Trusted operator text.
    #[serde(rename(deserialize = "bonusorder"))]
    pub order_clause: String,
    /// Records per line; `0` disables pagination.
    #[serde(rename(deserialize = "maxperline"))]
    pub max_per_line: u32,
    /// Lines per page.
    #[serde(rename(deserialize = "linesperpage"))]
    pub lines_per_page: u32,
    /// Padding units per missing line on the final page.
    #[serde(rename(deserialize = "brperline"))]
    pub br_per_line: u32,
    /// Template name overriding the stream identifier.
    pub template: String,
    /// Wrap the stream in a non-paginated container.
    #[serde(rename(deserialize = "nopagetop"))]
    pub no_page_top: bool,
    /// Emit GPX waypoints for this stream's bonuses.
    #[serde(rename(serialize = "GPX"))]
    pub gpx: bool,
}

impl StreamConfig {
    /// Template name: the override when set, otherwise the stream identifier.
    #[must_use]
    pub fn template_name(&self) -> &str {
        if self.template.is_empty() {
            &self.id
        } else {
            &self.template
        }
    }

    /// Pagination parameters for this stream.
    #[must_use]
    pub const fn layout(&self) -> StreamLayout {
        StreamLayout {
            max_per_line: self.max_per_line,
            lines_per_page: self.lines_per_page,
            br_per_line: self.br_per_line,
        }
    }
}

/// Options for the companion GPX file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct GpxOptions {
    /// Target file; empty disables GPX output unless given on the command line.
    #[serde(
        rename(deserialize = "outputGPX", serialize = "OutputGPX"),
        alias = "outputgpx"
    )]
    pub output_gpx: String,
    /// Waypoint symbol name.
    pub symbol: String,
    /// Link template with `{lat}`, `{lon}` and `{id}` placeholders.
    #[serde(alias = "maplink")]
    pub map_link: String,
    /// Name waypoints by bonus code alone.
    #[serde(alias = "codeonly")]
    pub code_only: bool,
    /// Creator recorded in the GPX header.
    pub generator: String,
}

impl Default for GpxOptions {
    fn default() -> Self {
        Self {
            output_gpx: String::new(),
            symbol: String::new(),
            map_link: String::new(),
            code_only: false,
            generator: String::from("RBook"),
        }
    }
}

/// The whole book configuration.
///
/// # Examples
///
/// ```
/// use rbook_core::{BookConfig, Section};
///
/// let yaml = "title: Summer Rally\nsections: [cover, stream.main]\nstreams:\n  - streamid: main\n    maxperline: 4\n";
/// let config = BookConfig::from_yaml(yaml).expect("valid configuration");
/// assert_eq!(config.title, "Summer Rally");
/// let sections: Vec<Section<'_>> = config.sections().collect();
/// assert_eq!(sections, [Section::Static("cover"), Section::Stream("main")]);
/// assert_eq!(config.stream("main").map(|s| s.max_per_line), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct BookConfig {
    /// Document title.
    pub title: String,
    /// Free-text description available to static templates.
    pub description: String,
    /// Folder holding templates and the project stylesheet.
    #[serde(alias = "projectfolder")]
    pub project_folder: String,
    /// Folder relative output file names are placed in.
    #[serde(alias = "outputfolder")]
    pub output_folder: String,
    /// Default output document name.
    #[serde(alias = "rallybookfile")]
    pub rallybook_file: String,
    /// Image folder handed to record templates.
    #[serde(alias = "imagefolder")]
    pub image_folder: String,
    /// SQLite database path.
    pub database: String,
    /// Ordered document outline.
    pub sections: Vec<String>,
    /// Stream definitions referenced by the outline.
    pub streams: Vec<StreamConfig>,
    /// Use the landscape page stylesheet.
    pub landscape: bool,
    /// Project stylesheet name inside the project folder.
    pub stylesheet: String,
    /// Replacement bonus query.
    #[serde(
        rename(deserialize = "bonusSQL", serialize = "BonusSQL"),
        alias = "bonussql"
    )]
    pub bonus_sql: String,
    /// Replacement combination query.
    #[serde(
        rename(deserialize = "comboSQL", serialize = "ComboSQL"),
        alias = "combosql"
    )]
    pub combo_sql: String,
    /// Replacement entrant query.
    #[serde(
        rename(deserialize = "entrantSQL", serialize = "EntrantSQL"),
        alias = "entrantsql"
    )]
    pub entrant_sql: String,
    /// Prefix for variable points.
    #[serde(alias = "variablepointsprefix")]
    pub variable_points_prefix: String,
    /// Prefix for multiplier points.
    #[serde(alias = "multiplierpointsprefix")]
    pub multiplier_points_prefix: String,
    /// GPX output options.
    #[serde(
        rename(deserialize = "generateGPX", serialize = "GenerateGPX"),
        alias = "generategpx"
    )]
    pub generate_gpx: GpxOptions,
}

impl Default for BookConfig {
    fn default() -> Self {
        let prefixes = PointsPrefixes::default();
        Self {
            title: String::new(),
            description: String::new(),
            project_folder: String::new(),
            output_folder: String::new(),
            rallybook_file: String::new(),
            image_folder: String::new(),
            database: String::new(),
            sections: Vec::new(),
            streams: Vec::new(),
            landscape: false,
            stylesheet: String::from("rbook.css"),
            bonus_sql: String::new(),
            combo_sql: String::new(),
            entrant_sql: String::new(),
            variable_points_prefix: prefixes.variable,
            multiplier_points_prefix: prefixes.multiplier,
            generate_gpx: GpxOptions::default(),
        }
    }
}

impl BookConfig {
    /// Parse and validate a YAML configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed YAML or mistyped values,
    /// and a validation variant when stream identifiers are missing or
    /// repeated.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let parsed: Self = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, stream) in self.streams.iter().enumerate() {
            if stream.id.is_empty() {
                return Err(ConfigError::MissingStreamId { index });
            }
            if !seen.insert(stream.id.as_str()) {
                return Err(ConfigError::DuplicateStream {
                    id: stream.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a stream by identifier.
    #[must_use]
    pub fn stream(&self, id: &str) -> Option<&StreamConfig> {
        self.streams.iter().find(|stream| stream.id == id)
    }

    /// The document outline in order.
    pub fn sections(&self) -> impl Iterator<Item = Section<'_>> {
        self.sections.iter().map(|name| Section::parse(name))
    }

    /// Configured points prefixes.
    #[must_use]
    pub fn points_prefixes(&self) -> PointsPrefixes {
        PointsPrefixes {
            variable: self.variable_points_prefix.clone(),
            multiplier: self.multiplier_points_prefix.clone(),
        }
    }
}

/// One entry of the document outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section<'a> {
    /// A template rendered once with the book configuration as context.
    Static(&'a str),
    /// A reference to a stream by identifier.
    Stream(&'a str),
}

impl<'a> Section<'a> {
    /// Classify a section name.
    ///
    /// A static name keeps only the part before its first `.`, so `cover`
    /// and `cover.html` both name the `cover` template.
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        name.strip_prefix(STREAM_SECTION_PREFIX).map_or_else(
            || Self::Static(name.split_once('.').map_or(name, |(stem, _)| stem)),
            Self::Stream,
        )
    }
}
