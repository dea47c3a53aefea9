//! Companion GPX file with one waypoint per located bonus.

use std::io::Write;

use geo::Point;
use gpx::{Gpx, GpxVersion, Link, Waypoint};
use rbook_core::GpxOptions;
use thiserror::Error;

/// Errors raised while writing the GPX document.
#[derive(Debug, Error)]
#[error("failed to write GPX document: {source}")]
pub struct GpxWriteError {
    #[source]
    source: Box<gpx::errors::GpxError>,
}

/// Collects bonus waypoints and writes them as one GPX 1.1 document.
///
/// # Examples
///
/// ```
/// use geo::Point;
/// use rbook_core::GpxOptions;
/// use rbook_render::GpxWaypointWriter;
///
/// let options = GpxOptions { code_only: true, ..GpxOptions::default() };
/// let mut writer = GpxWaypointWriter::new(&options, "Summer Rally");
/// writer.add_waypoint(Point::new(-3.75, 52.1), "B12", "Llyn Brianne", "10");
/// let mut xml = Vec::new();
/// writer.write(&mut xml).expect("GPX written");
/// let text = String::from_utf8(xml).expect("UTF-8 output");
/// assert!(text.contains("<name>B12</name>"));
/// ```
#[derive(Debug, Clone)]
pub struct GpxWaypointWriter {
    options: GpxOptions,
    title: String,
    waypoints: Vec<Waypoint>,
}

impl GpxWaypointWriter {
    /// Start an empty document.
    #[must_use]
    pub fn new(options: &GpxOptions, title: &str) -> Self {
        Self {
            options: options.clone(),
            title: title.to_owned(),
            waypoints: Vec::new(),
        }
    }

    /// Number of waypoints collected so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether no waypoint has been collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Add a waypoint for one bonus.
    ///
    /// `points` is the displayed points value and becomes the waypoint
    /// description.
    pub fn add_waypoint(&mut self, location: Point<f64>, id: &str, description: &str, points: &str) {
        let mut waypoint = Waypoint::new(location);
        waypoint.name = Some(self.waypoint_name(id, description));
        waypoint.comment = non_empty(&self.title);
        waypoint.description = non_empty(points);
        waypoint.symbol = non_empty(&self.options.symbol);
        if !self.options.map_link.is_empty() {
            waypoint.links.push(Link {
                href: self.map_link(location, id),
                text: None,
                type_: None,
            });
        }
        self.waypoints.push(waypoint);
    }

    fn waypoint_name(&self, id: &str, description: &str) -> String {
        if self.options.code_only || description.is_empty() {
            id.to_owned()
        } else {
            format!("{id}-{description}")
        }
    }

    fn map_link(&self, location: Point<f64>, id: &str) -> String {
        self.options
            .map_link
            .replace("{lat}", &location.y().to_string())
            .replace("{lon}", &location.x().to_string())
            .replace("{id}", id)
    }

    /// Write the collected waypoints as a GPX document.
    ///
    /// # Errors
    /// Returns [`GpxWriteError`] when serialisation or the writer fails.
    pub fn write<W: Write>(self, writer: W) -> Result<(), GpxWriteError> {
        let creator = if self.options.generator.is_empty() {
            GpxOptions::default().generator
        } else {
            self.options.generator
        };
        let document = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some(creator),
            waypoints: self.waypoints,
            ..Gpx::default()
        };
        gpx::write(&document, writer).map_err(|source| GpxWriteError {
            source: Box::new(source),
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}
