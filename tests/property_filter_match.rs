use chrono::{NaiveDate, Utc};
use classwatch::domain::models::{Filter, Slot};
use classwatch::services::collect_candidates;
use proptest::prelude::*;
use std::collections::HashSet;

fn slot(id: i64, club_id: i64, activity_id: &str, hour: u32, spots: i64) -> Slot {
    Slot {
        id,
        name: format!("Class {id}"),
        club_id,
        club_name: "Zdrofit Lazurowa".to_string(),
        activity_id: activity_id.to_string(),
        trainer: None,
        start: NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        duration_minutes: 55,
        available_spots: spots,
    }
}

fn filter(club_id: i64, activity_id: &str) -> Filter {
    Filter {
        id: 1,
        account_id: 10,
        club_id,
        club_name: "Zdrofit Lazurowa".to_string(),
        activity_id: activity_id.to_string(),
        activity_name: "Zdrowy Kręgosłup".to_string(),
        trainer: None,
        zone_id: None,
        zone_name: None,
        time_from: None,
        time_to: None,
        weekdays: None,
        auto_booking: false,
        created_at: Utc::now(),
    }
}

/// (id, hour, spots) tuples drawn from ranges small enough to force
/// duplicate ids and zero-capacity slots into most runs.
fn raw_slots() -> impl Strategy<Value = Vec<(i64, u32, i64)>> {
    prop::collection::vec((1i64..8, 6u32..22, 0i64..4), 0..30)
}

proptest! {
    /// Property: Candidate slot ids are unique
    ///
    /// However many copies of a slot the per-filter queries return,
    /// each distinct id surfaces at most once.
    #[test]
    fn prop_candidates_unique_by_slot_id(raw in raw_slots()) {
        let slots: Vec<Slot> = raw
            .iter()
            .map(|&(id, hour, spots)| slot(id, 75, "63", hour, spots))
            .collect();

        let candidates = collect_candidates(&slots, &[]);

        let mut seen = HashSet::new();
        for candidate in &candidates {
            prop_assert!(seen.insert(candidate.slot.id),
                "slot id {} appeared twice", candidate.slot.id);
        }
    }

    /// Property: Zero-capacity slots never surface
    ///
    /// And nothing bookable is lost: the candidate id set equals the
    /// distinct ids of input slots with remaining capacity.
    #[test]
    fn prop_only_and_all_bookable_ids_survive(raw in raw_slots()) {
        let slots: Vec<Slot> = raw
            .iter()
            .map(|&(id, hour, spots)| slot(id, 75, "63", hour, spots))
            .collect();

        let candidates = collect_candidates(&slots, &[]);

        for candidate in &candidates {
            prop_assert!(candidate.slot.available_spots > 0);
        }

        let expected: HashSet<i64> = slots
            .iter()
            .filter(|s| s.available_spots > 0)
            .map(|s| s.id)
            .collect();
        let got: HashSet<i64> = candidates.iter().map(|c| c.slot.id).collect();
        prop_assert_eq!(got, expected);
    }

    /// Property: The candidate id set is input-order independent
    ///
    /// Reversing the raw slot list may change which duplicate copy is
    /// kept, but never which ids survive.
    #[test]
    fn prop_candidate_ids_ignore_input_order(raw in raw_slots()) {
        let slots: Vec<Slot> = raw
            .iter()
            .map(|&(id, hour, spots)| slot(id, 75, "63", hour, spots))
            .collect();
        let mut reversed = slots.clone();
        reversed.reverse();

        let forward: HashSet<i64> = collect_candidates(&slots, &[])
            .iter()
            .map(|c| c.slot.id)
            .collect();
        let backward: HashSet<i64> = collect_candidates(&reversed, &[])
            .iter()
            .map(|c| c.slot.id)
            .collect();

        prop_assert_eq!(forward, backward);
    }

    /// Property: With filters present, every candidate matched one
    ///
    /// Slots from the wrong club or activity never leak through, and
    /// each surviving candidate carries the filter that matched it.
    #[test]
    fn prop_candidates_satisfy_some_filter(raw in raw_slots(), placement in prop::collection::vec(0usize..4, 0..30)) {
        let clubs = [(75i64, "63"), (75, "20"), (7, "63"), (7, "20")];
        let slots: Vec<Slot> = raw
            .iter()
            .zip(placement.iter().chain(std::iter::repeat(&0)))
            .map(|(&(id, hour, spots), &p)| {
                let (club_id, activity_id) = clubs[p % clubs.len()];
                slot(id, club_id, activity_id, hour, spots)
            })
            .collect();
        let filters = [filter(75, "63")];

        let candidates = collect_candidates(&slots, &filters);

        for candidate in &candidates {
            prop_assert_eq!(candidate.slot.club_id, 75);
            prop_assert_eq!(&candidate.slot.activity_id, "63");
            prop_assert_eq!(candidate.filters.len(), 1);
        }
    }

    /// Property: Candidates keep first-seen order
    ///
    /// The position of each candidate follows the first occurrence of
    /// its id in the raw list.
    #[test]
    fn prop_candidates_keep_first_seen_order(raw in raw_slots()) {
        let slots: Vec<Slot> = raw
            .iter()
            .map(|&(id, hour, spots)| slot(id, 75, "63", hour, spots))
            .collect();

        let candidates = collect_candidates(&slots, &[]);

        let mut last_first_occurrence = None;
        for candidate in &candidates {
            let first_occurrence = slots
                .iter()
                .position(|s| s.id == candidate.slot.id && s.available_spots > 0)
                .unwrap();
            if let Some(prev) = last_first_occurrence {
                prop_assert!(first_occurrence > prev,
                    "candidate order diverged from first-seen order");
            }
            last_first_occurrence = Some(first_occurrence);
        }
    }
}
