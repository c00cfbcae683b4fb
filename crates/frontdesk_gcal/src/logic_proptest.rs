#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use crate::logic::normalize_availability;
    use crate::provider::CalendarSlot;

    const SENTINEL: &str = "available";

    // (start offset in minutes, length in minutes, open?)
    fn slots_strategy() -> impl Strategy<Value = Vec<(i64, i64, bool)>> {
        prop::collection::vec((0..1440i64, 0..240i64, any::<bool>()), 0..40)
    }

    fn build(raw: &[(i64, i64, bool)]) -> Vec<CalendarSlot> {
        let midnight = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        raw.iter()
            .enumerate()
            .map(|(i, (offset, length, open))| CalendarSlot {
                id: format!("evt{}", i),
                summary: if *open { SENTINEL.to_string() } else { "Consultation: X".to_string() },
                description: None,
                start: midnight + Duration::minutes(*offset),
                end: midnight + Duration::minutes(offset + length),
                etag: None,
                private_properties: HashMap::new(),
                meet_link: None,
                raw: None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_result_is_sorted_and_disjoint(raw in slots_strategy()) {
            let open = normalize_availability(build(&raw), SENTINEL);
            for pair in open.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
                prop_assert!(pair[0].end <= pair[1].start, "{} overlaps {}", pair[0].id, pair[1].id);
            }
        }

        #[test]
        fn test_only_open_nonempty_slots_survive(raw in slots_strategy()) {
            let open = normalize_availability(build(&raw), SENTINEL);
            for slot in &open {
                prop_assert_eq!(slot.summary.as_str(), SENTINEL);
                prop_assert!(slot.start < slot.end);
            }
        }

        #[test]
        fn test_disjoint_input_is_kept_whole(count in 0..20usize, gap in 0..30i64) {
            // Back-to-back hour slots with an optional gap never collide.
            let raw: Vec<(i64, i64, bool)> = (0..count as i64)
                .map(|i| (i * (60 + gap), 60, true))
                .collect();
            let open = normalize_availability(build(&raw), SENTINEL);
            prop_assert_eq!(open.len(), count);
        }
    }
}
