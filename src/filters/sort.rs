use std::cmp::Ordering;

use super::collate;
use super::types::SortKey;
use crate::dates;
use crate::models::Position;

/// Creation time in millis, falling back to `updatedAt`, then to 0
fn recency(position: &Position) -> i64 {
    dates::parse_opt(position.created_at.as_deref())
        .or_else(|| dates::parse_opt(position.updated_at.as_deref()))
        .map(|d| d.timestamp_millis())
        .unwrap_or(0)
}

fn by_deadline(a: &Position, b: &Position, descending: bool) -> Ordering {
    let da = dates::parse_opt(a.deadline.as_deref());
    let db = dates::parse_opt(b.deadline.as_deref());
    match (da, db) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        // no deadline goes last either way
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order positions in place. Equal elements keep their input order.
pub fn sort_positions(positions: &mut [Position], key: SortKey) {
    match key {
        SortKey::Newest => positions.sort_by_key(|p| std::cmp::Reverse(recency(p))),
        SortKey::DeadlineAsc => positions.sort_by(|a, b| by_deadline(a, b, false)),
        SortKey::DeadlineDesc => positions.sort_by(|a, b| by_deadline(a, b, true)),
        SortKey::TitleAsc => positions.sort_by_cached_key(|p| collate::key(&p.title)),
    }
}
