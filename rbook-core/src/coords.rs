//! Parsing of free-text bonus coordinates into WGS84 points.
//!
//! Rallymasters type coordinates in whatever style their source used, so the
//! parser accepts signed decimal degrees as well as degree/minute/second text
//! with hemisphere letters before or after each component. Degree, minute and
//! second glyphs are normalised to whitespace before tokenising.

use std::fmt;

use geo::Point;
use thiserror::Error;

const SEPARATOR_GLYPHS: [char; 6] = ['°', 'º', '\'', '′', '"', '″'];

/// The axis a coordinate component describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// North/south position, `-90..=90`.
    Latitude,
    /// East/west position, `-180..=180`.
    Longitude,
}

impl Axis {
    const fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }

    const fn accepts(self, hemisphere: char) -> bool {
        match self {
            Self::Latitude => matches!(hemisphere, 'N' | 'S'),
            Self::Longitude => matches!(hemisphere, 'E' | 'W'),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latitude => f.write_str("latitude"),
            Self::Longitude => f.write_str("longitude"),
        }
    }
}

/// Reasons a coordinate string could not be turned into a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Nothing but whitespace and separators was supplied.
    #[error("coordinate text is empty")]
    Empty,
    /// A character outside the accepted alphabet was found.
    #[error("unexpected {token:?} in coordinate text")]
    UnexpectedToken {
        /// The offending text.
        token: String,
    },
    /// A numeric token could not be parsed.
    #[error("{token:?} is not a number")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
    /// The text did not split into a latitude and a longitude.
    #[error("expected a latitude and a longitude, found {found} component(s)")]
    ComponentCount {
        /// Number of components found.
        found: usize,
    },
    /// Bare numbers could not be split evenly between the two axes.
    #[error("cannot split {count} bare numbers into latitude and longitude")]
    AmbiguousNumbers {
        /// Number of bare numeric tokens.
        count: usize,
    },
    /// A component held no number or more than degrees, minutes and seconds.
    #[error("a coordinate component needs 1 to 3 numbers, found {found}")]
    ComponentShape {
        /// Number of numeric tokens in the component.
        found: usize,
    },
    /// A hemisphere letter appeared somewhere other than the start or end of a component.
    #[error("hemisphere {hemisphere} is misplaced")]
    MisplacedHemisphere {
        /// The hemisphere letter.
        hemisphere: char,
    },
    /// A hemisphere letter that belongs to the other axis.
    #[error("hemisphere {hemisphere} does not apply to {axis}")]
    WrongHemisphere {
        /// Axis being resolved.
        axis: Axis,
        /// The hemisphere letter.
        hemisphere: char,
    },
    /// Both a minus sign and a hemisphere letter were given.
    #[error("{axis} has both a sign and a hemisphere")]
    ConflictingSign {
        /// Axis being resolved.
        axis: Axis,
    },
    /// Minutes or seconds outside `0..60`.
    #[error("{axis} {part} value {value} must be at least 0 and below 60")]
    SubdivisionOutOfRange {
        /// Axis being resolved.
        axis: Axis,
        /// `"minutes"` or `"seconds"`.
        part: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The resolved value falls outside the axis range.
    #[error("{axis} {value} is out of range")]
    OutOfRange {
        /// Axis being resolved.
        axis: Axis,
        /// The resolved decimal degrees.
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(String),
    Hemisphere(char),
    Separator,
}

#[derive(Debug, Default)]
struct Component {
    hemisphere: Option<char>,
    numbers: Vec<String>,
}

/// Parse coordinate text into a point with `x = longitude`, `y = latitude`.
///
/// # Examples
///
/// ```
/// use rbook_core::parse_coordinates;
///
/// let point = parse_coordinates("45°30'N 0°30'W").expect("valid coordinates");
/// assert_eq!(point.y(), 45.5);
/// assert_eq!(point.x(), -0.5);
/// ```
///
/// # Errors
/// Returns [`CoordinateError`] describing the first problem found.
pub fn parse_coordinates(text: &str) -> Result<Point<f64>, CoordinateError> {
    let normalised: String = text
        .chars()
        .map(|ch| if SEPARATOR_GLYPHS.contains(&ch) { ' ' } else { ch })
        .collect();
    let tokens = tokenise(&normalised)?;
    if tokens.iter().all(|token| *token == Token::Separator) {
        return Err(CoordinateError::Empty);
    }
    let groups = group_tokens(tokens)?;
    let components = groups
        .into_iter()
        .map(Component::from_tokens)
        .collect::<Result<Vec<_>, _>>()?;
    let [first, second]: [Component; 2] = components
        .try_into()
        .map_err(|rest: Vec<Component>| CoordinateError::ComponentCount { found: rest.len() })?;

    let (latitude, longitude) = if matches!(first.hemisphere, Some('E' | 'W')) {
        (second, first)
    } else {
        (first, second)
    };
    let lat = latitude.resolve(Axis::Latitude)?;
    let lon = longitude.resolve(Axis::Longitude)?;
    Ok(Point::new(lon, lat))
}

fn tokenise(text: &str) -> Result<Vec<Token>, CoordinateError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {}
            ',' | ';' => tokens.push(Token::Separator),
            'N' | 'n' | 'S' | 's' | 'E' | 'e' | 'W' | 'w' => {
                tokens.push(Token::Hemisphere(ch.to_ascii_uppercase()));
            }
            '0'..='9' | '.' | '-' | '+' => {
                let mut number = String::from(ch);
                while let Some(next) = chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
                    number.push(next);
                }
                tokens.push(Token::Number(number));
            }
            other => {
                return Err(CoordinateError::UnexpectedToken {
                    token: other.to_string(),
                });
            }
        }
    }
    Ok(tokens)
}

fn group_tokens(tokens: Vec<Token>) -> Result<Vec<Vec<Token>>, CoordinateError> {
    if tokens.contains(&Token::Separator) {
        return Ok(tokens
            .split(|token| *token == Token::Separator)
            .map(<[Token]>::to_vec)
            .collect());
    }

    let is_hemisphere = |token: &Token| matches!(token, Token::Hemisphere(_));
    if tokens.first().is_some_and(is_hemisphere) {
        // Prefix style: each hemisphere letter opens a component.
        let mut groups: Vec<Vec<Token>> = Vec::new();
        for token in tokens {
            if is_hemisphere(&token) {
                groups.push(vec![token]);
            } else if let Some(group) = groups.last_mut() {
                group.push(token);
            }
        }
        return Ok(groups);
    }

    if tokens.iter().any(is_hemisphere) {
        // Suffix style: each hemisphere letter closes a component.
        let mut groups = Vec::new();
        let mut current = Vec::new();
        for token in tokens {
            let closes = is_hemisphere(&token);
            current.push(token);
            if closes {
                groups.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }
        return Ok(groups);
    }

    let split_at = match tokens.len() {
        2 => 1,
        4 => 2,
        6 => 3,
        count => return Err(CoordinateError::AmbiguousNumbers { count }),
    };
    let (first, second) = tokens.split_at(split_at);
    Ok(vec![first.to_vec(), second.to_vec()])
}

impl Component {
    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CoordinateError> {
        let last = tokens.len().saturating_sub(1);
        let mut component = Self::default();
        for (position, token) in tokens.into_iter().enumerate() {
            match token {
                Token::Number(number) => component.numbers.push(number),
                Token::Hemisphere(hemisphere) => {
                    let at_edge = position == 0 || position == last;
                    if !at_edge || component.hemisphere.is_some() {
                        return Err(CoordinateError::MisplacedHemisphere { hemisphere });
                    }
                    component.hemisphere = Some(hemisphere);
                }
                Token::Separator => {}
            }
        }
        if component.numbers.is_empty() || component.numbers.len() > 3 {
            return Err(CoordinateError::ComponentShape {
                found: component.numbers.len(),
            });
        }
        Ok(component)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "degrees, minutes and seconds combine into decimal degrees"
    )]
    fn resolve(&self, axis: Axis) -> Result<f64, CoordinateError> {
        if let Some(hemisphere) = self.hemisphere
            && !axis.accepts(hemisphere)
        {
            return Err(CoordinateError::WrongHemisphere { axis, hemisphere });
        }

        let mut numbers = self.numbers.iter();
        let Some(degrees_text) = numbers.next() else {
            return Err(CoordinateError::ComponentShape { found: 0 });
        };
        let negative = degrees_text.starts_with('-');
        if negative && self.hemisphere.is_some() {
            return Err(CoordinateError::ConflictingSign { axis });
        }

        let mut magnitude = parse_number(degrees_text)?.abs();
        for (text, (part, divisor)) in numbers.zip([("minutes", 60.0), ("seconds", 3600.0)]) {
            let value = parse_number(text)?;
            if !(0.0..60.0).contains(&value) {
                return Err(CoordinateError::SubdivisionOutOfRange { axis, part, value });
            }
            magnitude += value / divisor;
        }

        let southern_or_western = matches!(self.hemisphere, Some('S' | 'W'));
        let value = if negative || southern_or_western {
            -magnitude
        } else {
            magnitude
        };
        if !value.is_finite() || value.abs() > axis.limit() {
            return Err(CoordinateError::OutOfRange { axis, value });
        }
        Ok(value)
    }
}

fn parse_number(text: &str) -> Result<f64, CoordinateError> {
    text.parse::<f64>()
        .map_err(|_| CoordinateError::InvalidNumber {
            token: text.to_owned(),
        })
}
