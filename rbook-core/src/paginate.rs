//! Fixed-grid pagination for record streams.
//!
//! Records are laid out `max_per_line` to a line and `lines_per_page` lines to
//! a page. The paginator only counts: it tells the caller when a record starts
//! a new line, when the page container must be split before that record, and
//! how much padding closes the final page.

/// Layout parameters taken from a stream's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamLayout {
    /// Records per line; `0` disables pagination.
    pub max_per_line: u32,
    /// Lines per page; only meaningful when `max_per_line > 0`.
    pub lines_per_page: u32,
    /// Padding units emitted for each missing line on the final page.
    pub br_per_line: u32,
}

/// Layout decisions for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutEvent {
    /// The record starts a new line.
    pub new_line: bool,
    /// The current page must be closed and a new one opened before the record.
    pub page_break: bool,
}

/// Per-stream pagination state.
///
/// # Examples
///
/// ```
/// use rbook_core::{Paginator, StreamLayout};
///
/// let layout = StreamLayout { max_per_line: 4, lines_per_page: 3, br_per_line: 2 };
/// let mut paginator = Paginator::new(layout);
/// let breaks = (0..10).filter(|_| paginator.observe().page_break).count();
/// assert_eq!(breaks, 0);
/// assert_eq!(paginator.finish(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Paginator {
    layout: StreamLayout,
    records: u64,
    // Starts one below zero so the first record's new line does not count as
    // a completed line.
    lines: i64,
}

impl Paginator {
    /// Start a stream with the given layout.
    #[must_use]
    pub const fn new(layout: StreamLayout) -> Self {
        Self {
            layout,
            records: 0,
            lines: -1,
        }
    }

    /// Account for the next record and report its layout event.
    pub fn observe(&mut self) -> LayoutEvent {
        let index = self.records;
        self.records += 1;

        let per_line = u64::from(self.layout.max_per_line);
        if per_line == 0 || !index.is_multiple_of(per_line) {
            return LayoutEvent::default();
        }

        self.lines += 1;
        let page_break = self.layout.lines_per_page > 0
            && self.lines == i64::from(self.layout.lines_per_page);
        if page_break {
            self.lines = 0;
        }
        LayoutEvent {
            new_line: true,
            page_break,
        }
    }

    /// Close the stream and return the number of padding units for the last page.
    #[must_use]
    pub fn finish(self) -> usize {
        if self.layout.max_per_line == 0 {
            return 0;
        }
        let used = self.lines + 1;
        let missing = (i64::from(self.layout.lines_per_page) - used).max(0);
        let units = missing.saturating_mul(i64::from(self.layout.br_per_line));
        usize::try_from(units).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn run(layout: StreamLayout, records: u64) -> (Vec<LayoutEvent>, usize) {
        let mut paginator = Paginator::new(layout);
        let events = (0..records).map(|_| paginator.observe()).collect();
        (events, paginator.finish())
    }

    const fn layout(max_per_line: u32, lines_per_page: u32, br_per_line: u32) -> StreamLayout {
        StreamLayout {
            max_per_line,
            lines_per_page,
            br_per_line,
        }
    }

    #[rstest]
    fn ten_records_fill_one_page_without_breaks() {
        let (events, padding) = run(layout(4, 3, 2), 10);
        let new_lines: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.new_line)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(new_lines, vec![0, 4, 8]);
        assert!(events.iter().all(|event| !event.page_break));
        assert_eq!(padding, 0);
    }

    #[rstest]
    #[case(5, 2)]
    #[case(12, 0)]
    #[case(13, 4)]
    #[case(24, 0)]
    #[case(25, 4)]
    fn padding_fills_the_last_page(#[case] records: u64, #[case] expected: usize) {
        let (_, padding) = run(layout(4, 3, 2), records);
        assert_eq!(padding, expected);
    }

    #[rstest]
    fn oversized_layouts_saturate_instead_of_overflowing() {
        let (_, padding) = run(layout(1, u32::MAX, u32::MAX), 0);
        assert_eq!(padding, usize::try_from(i64::MAX).unwrap_or(usize::MAX));
    }

    #[rstest]
    fn break_precedes_the_first_record_of_the_next_page() {
        let (events, _) = run(layout(2, 2, 1), 9);
        let breaks: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.page_break)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(breaks, vec![4, 8]);
    }

    #[rstest]
    fn disabled_layout_emits_nothing() {
        let (events, padding) = run(layout(0, 3, 2), 7);
        assert!(events.iter().all(|event| *event == LayoutEvent::default()));
        assert_eq!(padding, 0);
    }

    #[rstest]
    fn zero_lines_per_page_never_breaks_or_pads() {
        let (events, padding) = run(layout(3, 0, 2), 20);
        assert!(events.iter().all(|event| !event.page_break));
        assert_eq!(events.iter().filter(|event| event.new_line).count(), 7);
        assert_eq!(padding, 0);
    }

    #[rstest]
    fn empty_stream_pads_a_whole_page() {
        let (events, padding) = run(layout(4, 3, 2), 0);
        assert!(events.is_empty());
        assert_eq!(padding, 6);
    }

    proptest! {
        #[test]
        fn new_line_marks_every_mth_record(m in 1_u32..10, p in 0_u32..6, n in 0_u64..200) {
            let (events, _) = run(layout(m, p, 1), n);
            for (index, event) in (0_u64..).zip(events.iter()) {
                prop_assert_eq!(event.new_line, index.is_multiple_of(u64::from(m)));
            }
        }

        #[test]
        fn page_breaks_follow_every_pth_line(
            m in 1_u32..10,
            p in 1_u32..6,
            n in 1_u64..200,
        ) {
            let (events, _) = run(layout(m, p, 1), n);
            let lines = n.div_ceil(u64::from(m));
            let expected = (lines - 1).checked_div(u64::from(p)).unwrap_or(0);
            let breaks = events.iter().filter(|event| event.page_break).count();
            prop_assert_eq!(u64::try_from(breaks).unwrap_or(u64::MAX), expected);
        }

        #[test]
        fn full_pages_need_no_padding(m in 1_u32..10, p in 1_u32..6, pages in 1_u64..5, br in 0_u32..4) {
            let records = u64::from(m) * u64::from(p) * pages;
            let (_, padding) = run(layout(m, p, br), records);
            prop_assert_eq!(padding, 0);
        }

        #[test]
        fn padding_counts_missing_lines(m in 1_u32..10, p in 1_u32..6, n in 1_u64..200, br in 0_u32..4) {
            let (_, padding) = run(layout(m, p, br), n);
            let lines = n.div_ceil(u64::from(m));
            let remainder = lines.checked_rem(u64::from(p)).unwrap_or(0);
            let used = if remainder == 0 { u64::from(p) } else { remainder };
            let expected = (u64::from(p) - used) * u64::from(br);
            prop_assert_eq!(u64::try_from(padding).unwrap_or(u64::MAX), expected);
        }
    }
}
