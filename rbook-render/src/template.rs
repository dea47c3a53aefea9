//! Handlebars templates loaded from the project folder.
//!
//! A template named `cover` lives at `<projectFolder>/cover.html`. Templates
//! are read and compiled on first use and reused for every later record.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use handlebars::Handlebars;
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// File extension of template files.
pub const TEMPLATE_EXTENSION: &str = "html";

/// Errors raised while loading a template.
#[derive(Debug, Error)]
pub enum TemplateLoadError {
    /// The template file exists but could not be read.
    #[error("failed to read template {path}: {source}")]
    Read {
        /// Template file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The template did not compile.
    #[error("template {path} does not parse: {source}")]
    Parse {
        /// Template file path.
        path: Utf8PathBuf,
        /// Error reported by Handlebars.
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Registry of compiled templates from one project folder.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
    folder: Utf8PathBuf,
}

impl fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("folder", &self.folder)
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

impl TemplateRenderer {
    /// Create a renderer reading templates from `folder`.
    #[must_use]
    pub fn new(folder: &Utf8Path) -> Self {
        Self {
            registry: Handlebars::new(),
            folder: folder.to_owned(),
        }
    }

    /// Path of the file backing the named template.
    #[must_use]
    pub fn path_for(&self, name: &str) -> Utf8PathBuf {
        self.folder.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    /// Compile the named template if it has not been loaded yet.
    ///
    /// Returns `Ok(false)` when no template file exists.
    ///
    /// # Errors
    /// Returns [`TemplateLoadError`] when the file cannot be read or does not
    /// compile.
    pub fn ensure_loaded(&mut self, name: &str) -> Result<bool, TemplateLoadError> {
        if self.registry.has_template(name) {
            return Ok(true);
        }
        let path = self.path_for(name);
        if !rbook_fs::regular_file_exists(&path) {
            return Ok(false);
        }
        let source = rbook_fs::read_utf8_to_string(&path).map_err(|source| {
            TemplateLoadError::Read {
                path: path.clone(),
                source,
            }
        })?;
        self.registry
            .register_template_string(name, source)
            .map_err(|error| TemplateLoadError::Parse {
                path: path.clone(),
                source: Box::new(error),
            })?;
        debug!("loaded template {path}");
        Ok(true)
    }

    /// Render a loaded template against `data`.
    ///
    /// # Errors
    /// Returns the Handlebars error when the template is not loaded or fails
    /// while rendering.
    pub fn render<T: Serialize>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<String, handlebars::RenderError> {
        self.registry.render(name, data)
    }
}
