use chrono::{DateTime, Duration, Utc};

use super::types::{DeadlineFilter, FilterState, Selection};
use crate::dates;
use crate::models::Position;

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn selection_matches(selection: &Selection, value: &str) -> bool {
    match selection {
        Selection::All => true,
        Selection::Only(wanted) => normalize(wanted) == normalize(value),
    }
}

fn matches_search(position: &Position, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        position.title.as_str(),
        position.company_name(),
        position.location.city.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn matches_tag_category(position: &Position, selection: &Selection) -> bool {
    match selection {
        Selection::All => true,
        Selection::Only(category) => {
            let category = normalize(category);
            position
                .tags
                .iter()
                .any(|t| normalize(&t.category) == category)
        }
    }
}

fn matches_selected_tags(position: &Position, state: &FilterState) -> bool {
    state.selected_tags.iter().all(|wanted| {
        let wanted = normalize(wanted);
        position.tags.iter().any(|t| normalize(&t.name) == wanted)
    })
}

fn matches_deadline(position: &Position, filter: DeadlineFilter, now: DateTime<Utc>) -> bool {
    let deadline = dates::parse_opt(position.deadline.as_deref());
    match filter {
        DeadlineFilter::All => true,
        DeadlineFilter::NoDeadline => deadline.is_none(),
        window => {
            let Some(days) = window.days() else {
                return true;
            };
            deadline.is_some_and(|d| d >= now && d <= now + Duration::days(days))
        }
    }
}

/// Whether `position` survives every filter in `state`
pub fn includes(position: &Position, state: &FilterState, now: DateTime<Utc>) -> bool {
    let needle = state.search.to_lowercase();

    matches_search(position, &needle)
        && selection_matches(&state.city, &position.location.city)
        && selection_matches(&state.company, position.company_name())
        && matches_tag_category(position, &state.tag_category)
        && matches_selected_tags(position, state)
        && matches_deadline(position, state.deadline, now)
        && !(state.active_only && dates::is_expired(position.deadline.as_deref(), now))
}
