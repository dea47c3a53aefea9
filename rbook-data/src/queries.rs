//! Query texts for the three record kinds.

use rbook_core::BookConfig;

/// Default bonus query. Column order is the bonus row contract.
pub const BONUS_SQL: &str = "SELECT BonusID,BriefDesc,Points,IfNull(Flags,''),IfNull(Notes,''),\
Cat1,Cat2,Cat3,Cat4,Cat5,Cat6,Cat7,Cat8,Cat9,IfNull(Image,''),IfNull(Waffle,''),IfNull(Coords,''),\
IfNull(Question,''),IfNull(Answer,''),AskPoints FROM bonuses";

/// Default combination query. Column order is the combination row contract.
pub const COMBO_SQL: &str = "SELECT ComboID,BriefDesc,ScoreMethod,MinimumTicks,ScorePoints,\
IfNull(Bonuses,''),Cat1,Cat2,Cat3,Cat4,Cat5,Cat6,Cat7,Cat8,Cat9,Compulsory FROM combinations";

/// Default entrant query. Column order is the entrant row contract.
pub const ENTRANT_SQL: &str = "SELECT EntrantID,IfNull(RiderName,''),IfNull(PillionName,''),\
IfNull(Bike,''),IfNull(BikeReg,''),OdoKms,Cohort FROM entrants";

/// Base query text for each record kind.
///
/// Replacement queries must keep the column order and nullability of the
/// defaults; stream clauses are appended to them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    /// Bonus query.
    pub bonus: String,
    /// Combination query.
    pub combo: String,
    /// Entrant query.
    pub entrant: String,
}

impl Default for QuerySet {
    fn default() -> Self {
        Self {
            bonus: BONUS_SQL.to_owned(),
            combo: COMBO_SQL.to_owned(),
            entrant: ENTRANT_SQL.to_owned(),
        }
    }
}

impl QuerySet {
    /// Take replacement queries from the configuration, falling back to the
    /// defaults where none is given.
    #[must_use]
    pub fn from_config(config: &BookConfig) -> Self {
        let pick = |custom: &str, default: &str| {
            let trimmed = custom.trim();
            if trimmed.is_empty() {
                default.to_owned()
            } else {
                trimmed.to_owned()
            }
        };
        Self {
            bonus: pick(&config.bonus_sql, BONUS_SQL),
            combo: pick(&config.combo_sql, COMBO_SQL),
            entrant: pick(&config.entrant_sql, ENTRANT_SQL),
        }
    }
}
