//! Filter-match engine.
//!
//! Reduces a raw slot set (the union of every per-filter query) to a
//! deduplicated candidate list, tagging each candidate with the filters
//! it satisfies. The decision engine consumes the tags to pick which
//! filter an auto-booking is credited to.

use std::collections::HashSet;

use crate::domain::models::{Filter, Slot};

/// One deduplicated candidate slot with the filters that matched it.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The slot itself.
    pub slot: Slot,
    /// Filters satisfied by this slot, in their stored creation order.
    /// Empty when the account has no filters at all (the no-filter
    /// fallback treats every bookable slot as a candidate).
    pub filters: Vec<Filter>,
}

/// Whether one slot satisfies one filter.
///
/// Club and activity must be equal; trainer, weekday, and time window
/// constrain only when the filter sets them. Capacity is not checked
/// here: zero-capacity slots are excluded before matching, independent
/// of any filter.
pub fn matches_slot(filter: &Filter, slot: &Slot) -> bool {
    if slot.club_id != filter.club_id || slot.activity_id != filter.activity_id {
        return false;
    }
    if let Some(wanted) = filter.trainer.as_deref() {
        let trainer_matches = slot
            .trainer
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == wanted.to_lowercase());
        if !trainer_matches {
            return false;
        }
    }
    filter.weekday_allowed(slot.weekday()) && filter.time_allowed(slot.start_time())
}

/// Reduce raw slots to candidates.
///
/// Slots with no remaining capacity are dropped unconditionally. Each
/// distinct slot id appears at most once, keeping the first-seen copy
/// and first-seen position. With a non-empty filter list, only slots
/// matching at least one filter survive; with an empty list every
/// bookable slot is a candidate.
pub fn collect_candidates(slots: &[Slot], filters: &[Filter]) -> Vec<Candidate> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut candidates = Vec::new();

    for slot in slots {
        if slot.available_spots <= 0 {
            continue;
        }
        if seen.contains(&slot.id) {
            continue;
        }
        let matching: Vec<Filter> = filters
            .iter()
            .filter(|filter| matches_slot(filter, slot))
            .cloned()
            .collect();
        if !filters.is_empty() && matching.is_empty() {
            continue;
        }
        seen.insert(slot.id);
        candidates.push(Candidate {
            slot: slot.clone(),
            filters: matching,
        });
    }

    candidates
}
