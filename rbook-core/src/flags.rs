//! Decoding of the one-character alert codes stored against each bonus.

use serde::Serialize;

/// Named alerts carried by a bonus flag string.
///
/// Templates see each alert under its `AlertX` name, where `X` is the flag
/// character that sets it.
///
/// # Examples
///
/// ```
/// use rbook_core::Alerts;
///
/// let alerts = Alerts::decode("FT");
/// assert!(alerts.face_in_photo);
/// assert!(alerts.receipt);
/// assert_eq!(alerts, Alerts::decode("TFF"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Alerts {
    /// `A`: read the notes before claiming.
    #[serde(rename = "AlertA")]
    pub alert: bool,
    /// `B`: the bike must appear in the photo.
    #[serde(rename = "AlertB")]
    pub bike_in_photo: bool,
    /// `D`: only claimable in daylight.
    #[serde(rename = "AlertD")]
    pub daylight_only: bool,
    /// `F`: the rider's face must appear in the photo.
    #[serde(rename = "AlertF")]
    pub face_in_photo: bool,
    /// `N`: only claimable at night.
    #[serde(rename = "AlertN")]
    pub night_only: bool,
    /// `R`: access is restricted (opening hours, private land).
    #[serde(rename = "AlertR")]
    pub restricted_access: bool,
    /// `T`: a ticket or receipt is required.
    #[serde(rename = "AlertT")]
    pub receipt: bool,
}

type AlertSlot = fn(&mut Alerts) -> &mut bool;

const ALERT_CODES: [(char, AlertSlot); 7] = [
    ('A', |alerts| &mut alerts.alert),
    ('B', |alerts| &mut alerts.bike_in_photo),
    ('D', |alerts| &mut alerts.daylight_only),
    ('F', |alerts| &mut alerts.face_in_photo),
    ('N', |alerts| &mut alerts.night_only),
    ('R', |alerts| &mut alerts.restricted_access),
    ('T', |alerts| &mut alerts.receipt),
];

impl Alerts {
    /// Decode a flag string. Unknown characters are ignored.
    #[must_use]
    pub fn decode(flags: &str) -> Self {
        let mut alerts = Self::default();
        for code in flags.chars() {
            if let Some((_, slot)) = ALERT_CODES.iter().find(|(known, _)| *known == code) {
                *slot(&mut alerts) = true;
            }
        }
        alerts
    }
}
