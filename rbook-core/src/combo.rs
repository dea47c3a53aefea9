//! Expansion of compact combination score tables.
//!
//! A combination lists its constituent bonuses and either a literal points
//! table or, when a minimum tick count is set, one points value per achievable
//! tick count starting at that minimum.

use thiserror::Error;

/// Errors raised while expanding a combination score table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboError {
    /// The points list has fewer entries than the tick range needs.
    #[error(
        "score table needs {needed} value(s) for ticks {minimum}..={bonuses} but only {found} supplied"
    )]
    ShortScoreTable {
        /// Minimum tick count.
        minimum: u32,
        /// Number of constituent bonuses.
        bonuses: usize,
        /// Values required.
        needed: usize,
        /// Values supplied.
        found: usize,
    },
    /// The minimum tick count exceeds the number of constituent bonuses.
    #[error("minimum of {minimum} ticks exceeds the {bonuses} bonus(es) in the combination")]
    MinimumExceedsBonuses {
        /// Minimum tick count.
        minimum: u32,
        /// Number of constituent bonuses.
        bonuses: usize,
    },
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Expand a combination's score specification into a `ticks=points` table.
///
/// With `minimum_ticks < 1` the specification is already a literal table and
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use rbook_core::expand_score_table;
///
/// let table = expand_score_table("A1,A2,A3,A4", "10,25,50", 2).expect("valid table");
/// assert_eq!(table, "2=10,3=25,4=50");
/// assert_eq!(expand_score_table("A1,A2", "40", 0).as_deref(), Ok("40"));
/// ```
///
/// # Errors
/// Returns [`ComboError`] when the points list is too short for the tick
/// range or the minimum exceeds the number of bonuses. Surplus points values
/// are ignored.
pub fn expand_score_table(
    bonus_list: &str,
    points_spec: &str,
    minimum_ticks: i64,
) -> Result<String, ComboError> {
    let Ok(minimum) = u32::try_from(minimum_ticks) else {
        return Ok(points_spec.to_owned());
    };
    if minimum == 0 {
        return Ok(points_spec.to_owned());
    }

    let bonuses = split_list(bonus_list).count();
    let points: Vec<&str> = split_list(points_spec).collect();
    let first_tick = usize::try_from(minimum).unwrap_or(usize::MAX);
    if first_tick > bonuses {
        return Err(ComboError::MinimumExceedsBonuses { minimum, bonuses });
    }

    let needed = bonuses - first_tick + 1;
    if points.len() < needed {
        return Err(ComboError::ShortScoreTable {
            minimum,
            bonuses,
            needed,
            found: points.len(),
        });
    }

    let entries: Vec<String> = (first_tick..=bonuses)
        .zip(points)
        .map(|(ticks, value)| format!("{ticks}={value}"))
        .collect();
    Ok(entries.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A,B,C,D", "10,20,30", 2, "2=10,3=20,4=30")]
    #[case("A,B,C", "5", 3, "3=5")]
    #[case("A, B ,C,", " 1 , 2 , 3 ", 1, "1=1,2=2,3=3")]
    #[case("A,B,C", "7,8,9,10", 2, "2=7,3=8")]
    fn expands_compact_tables(
        #[case] bonuses: &str,
        #[case] points: &str,
        #[case] minimum: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(
            expand_score_table(bonuses, points, minimum).as_deref(),
            Ok(expected)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn literal_tables_pass_through(#[case] minimum: i64) {
        assert_eq!(
            expand_score_table("A,B", "2=10,3=20", minimum).as_deref(),
            Ok("2=10,3=20")
        );
    }

    #[rstest]
    fn short_tables_are_rejected() {
        assert_eq!(
            expand_score_table("A,B,C,D", "10,20", 2),
            Err(ComboError::ShortScoreTable {
                minimum: 2,
                bonuses: 4,
                needed: 3,
                found: 2,
            })
        );
    }

    #[rstest]
    fn minimum_above_bonus_count_is_rejected() {
        assert_eq!(
            expand_score_table("A,B", "10", 3),
            Err(ComboError::MinimumExceedsBonuses {
                minimum: 3,
                bonuses: 2
            })
        );
    }

    #[rstest]
    #[case(1, 6)]
    #[case(3, 6)]
    #[case(6, 6)]
    fn table_covers_every_tick_from_minimum(#[case] minimum: usize, #[case] length: usize) {
        let bonuses: Vec<String> = (1..=length).map(|n| format!("B{n}")).collect();
        let points: Vec<String> = (0..=length - minimum).map(|n| (n * 10).to_string()).collect();
        let table = expand_score_table(
            &bonuses.join(","),
            &points.join(","),
            i64::try_from(minimum).expect("small minimum"),
        )
        .expect("valid table");

        let entries: Vec<&str> = table.split(',').collect();
        assert_eq!(entries.len(), length - minimum + 1);
        for (offset, entry) in entries.iter().enumerate() {
            assert_eq!(*entry, format!("{}={}", minimum + offset, offset * 10));
        }
    }
}
