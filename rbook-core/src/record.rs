//! Record rows as read from the rally database and the decorated records
//! handed to templates.
//!
//! Rows carry raw column values. Records add the derived fields templates
//! rely on (alerts, display points, coordinates, the owning stream) and
//! serialise with the column-style names templates use, such as `BonusID`,
//! `BriefDesc` and `NewLine`.

use std::collections::HashMap;

use geo::Point;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::combo::{ComboError, expand_score_table, split_list};
use crate::coords::{CoordinateError, parse_coordinates};
use crate::flags::Alerts;
use crate::points::{Points, PointsPrefixes};

/// The nine numeric category tags carried by bonuses and combinations.
///
/// Serialises as `Cat1` to `Cat9` so it can be flattened into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Categories(pub [i64; 9]);

impl Serialize for Categories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (number, value) in (1_u8..).zip(self.0.iter()) {
            map.serialize_entry(&format!("Cat{number}"), value)?;
        }
        map.end()
    }
}

/// Per-stream values every decorated record carries.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    /// Identifier of the stream being rendered.
    pub stream_id: &'a str,
    /// Image folder from the book configuration.
    pub image_folder: &'a str,
    /// Points prefixes from the book configuration.
    pub prefixes: &'a PointsPrefixes,
}

/// A bonus row in query column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusRow {
    /// Bonus code.
    pub id: String,
    /// Short description.
    pub description: String,
    /// Raw points value.
    pub points: i64,
    /// Alert flag string.
    pub flags: String,
    /// Notes printed with the bonus.
    pub notes: String,
    /// Category tags.
    pub categories: Categories,
    /// Image file name.
    pub image: String,
    /// Long description.
    pub waffle: String,
    /// Free-text coordinates.
    pub coords: String,
    /// Riddle question.
    pub question: String,
    /// Riddle answer.
    pub answer: String,
    /// Points mode code.
    pub ask_points: i64,
}

impl Default for BonusRow {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            points: Points::default().value(),
            flags: String::new(),
            notes: String::new(),
            categories: Categories::default(),
            image: String::new(),
            waffle: String::new(),
            coords: String::new(),
            question: String::new(),
            answer: String::new(),
            ask_points: 0,
        }
    }
}

/// A bonus ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BonusRecord {
    /// Bonus code.
    #[serde(rename = "BonusID")]
    pub id: String,
    /// Short description.
    #[serde(rename = "BriefDesc")]
    pub description: String,
    /// Points with their mode prefix applied.
    pub points: String,
    /// Raw points value.
    pub points_value: i64,
    /// Alert flag string as stored.
    pub flags: String,
    /// Decoded alerts, serialised as `AlertA` to `AlertT`.
    #[serde(flatten)]
    pub alerts: Alerts,
    /// Notes printed with the bonus.
    pub notes: String,
    /// Long description.
    pub waffle: String,
    /// Free-text coordinates.
    pub coords: String,
    /// Image file name.
    pub image: String,
    /// Category tags, serialised as `Cat1` to `Cat9`.
    #[serde(flatten)]
    pub categories: Categories,
    /// Riddle question.
    pub question: String,
    /// Riddle answer.
    pub answer: String,
    /// Notes are present.
    pub has_notes: bool,
    /// A long description is present.
    pub has_waffle: bool,
    /// The rider writes in the points value.
    pub ask_points: bool,
    /// Parsed latitude, when the coordinates parse.
    pub lat: Option<f64>,
    /// Parsed longitude, when the coordinates parse.
    pub lon: Option<f64>,
    /// Identifier of the owning stream.
    #[serde(rename = "StreamID")]
    pub stream_id: String,
    /// Image folder from the book configuration.
    pub image_folder: String,
    /// The record starts a new line of the page grid.
    pub new_line: bool,
    /// Why non-empty coordinates could not be parsed.
    #[serde(skip)]
    pub coordinate_error: Option<CoordinateError>,
}

impl BonusRecord {
    /// Decorate a row with alerts, display points and parsed coordinates.
    ///
    /// A coordinate parse failure does not reject the record; it is kept in
    /// [`BonusRecord::coordinate_error`] for the caller to report.
    #[must_use]
    pub fn new(row: BonusRow, context: &RecordContext<'_>) -> Self {
        let points = Points::from_code(row.points, row.ask_points);
        let (location, coordinate_error) = if row.coords.trim().is_empty() {
            (None, None)
        } else {
            match parse_coordinates(&row.coords) {
                Ok(point) => (Some(point), None),
                Err(error) => (None, Some(error)),
            }
        };

        Self {
            alerts: Alerts::decode(&row.flags),
            points: points.display(context.prefixes),
            points_value: points.value(),
            ask_points: points.asks_points(),
            has_notes: !row.notes.is_empty(),
            has_waffle: !row.waffle.is_empty(),
            lat: location.map(|point| point.y()),
            lon: location.map(|point| point.x()),
            id: row.id,
            description: row.description,
            flags: row.flags,
            notes: row.notes,
            waffle: row.waffle,
            coords: row.coords,
            image: row.image,
            categories: row.categories,
            question: row.question,
            answer: row.answer,
            stream_id: context.stream_id.to_owned(),
            image_folder: context.image_folder.to_owned(),
            new_line: false,
            coordinate_error,
        }
    }

    /// The parsed location as a `(lon, lat)` point.
    #[must_use]
    pub fn location(&self) -> Option<Point<f64>> {
        self.lat.zip(self.lon).map(|(lat, lon)| Point::new(lon, lat))
    }
}

/// A combination row in query column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboRow {
    /// Combination code.
    pub id: String,
    /// Short description.
    pub description: String,
    /// Scoring method code.
    pub score_method: i64,
    /// Minimum constituent bonuses needed; `0` for a literal table.
    pub minimum_ticks: i64,
    /// Points list or literal `ticks=points` table.
    pub score_points: String,
    /// Comma-separated constituent bonus codes.
    pub bonus_list: String,
    /// Category tags.
    pub categories: Categories,
    /// The combination must be claimed.
    pub compulsory: bool,
}

/// A constituent bonus of a combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboBonus {
    /// Bonus code.
    #[serde(rename = "BonusID")]
    pub id: String,
    /// Bonus description; empty when the code is unknown.
    #[serde(rename = "BriefDesc")]
    pub description: String,
}

/// A combination ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComboRecord {
    /// Combination code.
    #[serde(rename = "ComboID")]
    pub id: String,
    /// Short description.
    #[serde(rename = "BriefDesc")]
    pub description: String,
    /// Scoring method code.
    pub score_method: i64,
    /// Minimum constituent bonuses needed.
    pub minimum_ticks: i64,
    /// Expanded `ticks=points` table, or the literal points list.
    pub score_points: String,
    /// Constituent bonus codes as stored.
    pub bonus_list: String,
    /// Constituent bonuses with their descriptions.
    pub bonuses: Vec<ComboBonus>,
    /// Category tags, serialised as `Cat1` to `Cat9`.
    #[serde(flatten)]
    pub categories: Categories,
    /// The combination must be claimed.
    pub compulsory: bool,
    /// Identifier of the owning stream.
    #[serde(rename = "StreamID")]
    pub stream_id: String,
    /// The record starts a new line of the page grid.
    pub new_line: bool,
}

impl ComboRecord {
    /// Expand the score table and resolve constituent bonus titles.
    ///
    /// # Errors
    /// Returns [`ComboError`] when the score table cannot be expanded.
    pub fn new(
        row: ComboRow,
        context: &RecordContext<'_>,
        titles: &HashMap<String, String>,
    ) -> Result<Self, ComboError> {
        let score_points = expand_score_table(&row.bonus_list, &row.score_points, row.minimum_ticks)?;
        let bonuses = split_list(&row.bonus_list)
            .map(|id| ComboBonus {
                id: id.to_owned(),
                description: titles.get(id).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            id: row.id,
            description: row.description,
            score_method: row.score_method,
            minimum_ticks: row.minimum_ticks,
            score_points,
            bonus_list: row.bonus_list,
            bonuses,
            categories: row.categories,
            compulsory: row.compulsory,
            stream_id: context.stream_id.to_owned(),
            new_line: false,
        })
    }
}

/// An entrant row in query column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrantRow {
    /// Entrant number.
    pub id: i64,
    /// Rider name.
    pub rider_name: String,
    /// Pillion name.
    pub pillion_name: String,
    /// Motorcycle description.
    pub bike: String,
    /// Registration mark.
    pub bike_reg: String,
    /// Odometer units flag; non-zero means kilometres.
    pub odo_kms: i64,
    /// Cohort number.
    pub cohort: i64,
}

/// An entrant ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntrantRecord {
    /// Entrant number.
    #[serde(rename = "EntrantID")]
    pub id: i64,
    /// Rider name.
    pub rider_name: String,
    /// Pillion name.
    pub pillion_name: String,
    /// Motorcycle description.
    pub bike: String,
    /// Registration mark.
    pub bike_reg: String,
    /// The odometer reads kilometres.
    pub odo_kms: bool,
    /// Cohort number.
    pub cohort: i64,
    /// Identifier of the owning stream.
    #[serde(rename = "StreamID")]
    pub stream_id: String,
    /// Image folder from the book configuration.
    pub image_folder: String,
    /// The record starts a new line of the page grid.
    pub new_line: bool,
}

impl EntrantRecord {
    /// Decorate an entrant row.
    #[must_use]
    pub fn new(row: EntrantRow, context: &RecordContext<'_>) -> Self {
        Self {
            id: row.id,
            rider_name: row.rider_name,
            pillion_name: row.pillion_name,
            bike: row.bike,
            bike_reg: row.bike_reg,
            odo_kms: row.odo_kms != 0,
            cohort: row.cohort,
            stream_id: context.stream_id.to_owned(),
            image_folder: context.image_folder.to_owned(),
            new_line: false,
        }
    }
}
