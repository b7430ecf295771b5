//! Client-side narrowing and ordering of position lists.

pub mod collate;
pub mod facets;
pub mod predicate;
pub mod sort;
pub mod types;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::Position;

pub use facets::{paginate, FilterOptions, Page};
pub use predicate::includes;
pub use sort::sort_positions;
pub use types::{DeadlineFilter, FilterState, Selection, SortKey};

/// Filter then sort, as the list view does on every state change
pub fn apply(positions: &[Position], state: &FilterState, now: DateTime<Utc>) -> Vec<Position> {
    let mut visible: Vec<Position> = positions
        .iter()
        .filter(|p| includes(p, state, now))
        .cloned()
        .collect();
    sort_positions(&mut visible, state.sort);

    debug!(
        "{} of {} positions match the current filters",
        visible.len(),
        positions.len()
    );
    visible
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use testing::{at, position};

    #[test]
    fn filters_then_sorts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let positions = vec![
            position("1", "Tesztelő", "Acme", "Budapest").with_deadline(&at(now, 3)),
            position("2", "Adatmérnök", "Acme", "Budapest").with_deadline(&at(now, 6)),
            position("3", "Backend", "Acme", "Budapest").with_deadline(&at(now, 60)),
            position("4", "Frontend", "Other", "Budapest").with_deadline(&at(now, 2)),
        ];
        let state = FilterState {
            company: Selection::Only("acme".into()),
            deadline: DeadlineFilter::Within7Days,
            sort: SortKey::TitleAsc,
            ..FilterState::default()
        };

        let titles: Vec<String> = apply(&positions, &state, now)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Adatmérnök", "Tesztelő"]);
    }
}
