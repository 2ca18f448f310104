//! Pod sequencing: deterministic ordering plus circular windowing of a
//! resolved pod list.

use crate::config::{PodCount, PodOrder};
use crate::pod::PodRef;
use rand::seq::SliceRandom;

/// Sort `pods` by `order`, then take the circular window described by
/// `start_index` and `count`.
pub fn sequence(
    mut pods: Vec<PodRef>,
    order: PodOrder,
    start_index: usize,
    count: PodCount,
) -> Vec<PodRef> {
    sort_pods(&mut pods, order);
    window(&pods, start_index, count)
}

/// Sort in place. All comparisons use a stable sort, so pods with equal keys
/// keep their target-concatenation order and windowing is reproducible for a
/// fixed cluster state. `Random` shuffles and is intentionally not
/// reproducible.
pub fn sort_pods(pods: &mut [PodRef], order: PodOrder) {
    match order {
        PodOrder::NameAscending => pods.sort_by(|a, b| a.name.cmp(&b.name)),
        PodOrder::NameDescending => pods.sort_by(|a, b| b.name.cmp(&a.name)),
        // Missing timestamps sort first (None < Some).
        PodOrder::CreationTime => pods.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        PodOrder::Random => pods.shuffle(&mut rand::thread_rng()),
    }
}

/// Circular window: starting at `start_index % len`, take `count` pods,
/// wrapping past the end as many times as needed. A count larger than the
/// list length repeats pods — that is intended. Empty input yields empty
/// output for any parameters.
pub fn window(pods: &[PodRef], start_index: usize, count: PodCount) -> Vec<PodRef> {
    if pods.is_empty() {
        return Vec::new();
    }
    let take = match count {
        PodCount::All => pods.len(),
        PodCount::Count(n) => n,
    };
    let mut out = Vec::with_capacity(take);
    let mut index = start_index % pods.len();
    for _ in 0..take {
        out.push(pods[index].clone());
        index = (index + 1) % pods.len();
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pod(name: &str, target: &str) -> PodRef {
        PodRef {
            name: name.into(),
            namespace: "zerotesting".into(),
            address: Some("10.0.0.1".into()),
            created_at: None,
            target: target.into(),
        }
    }

    fn names(pods: &[PodRef]) -> Vec<&str> {
        pods.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn sort_name_ascending() {
        let mut pods = vec![pod("b", "t"), pod("c", "t"), pod("a", "t")];
        sort_pods(&mut pods, PodOrder::NameAscending);
        assert_eq!(names(&pods), ["a", "b", "c"]);
    }

    #[test]
    fn sort_name_descending() {
        let mut pods = vec![pod("b", "t"), pod("c", "t"), pod("a", "t")];
        sort_pods(&mut pods, PodOrder::NameDescending);
        assert_eq!(names(&pods), ["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_on_equal_names() {
        // The same pod matched by two targets keeps its concatenation order.
        let mut pods = vec![pod("a", "first"), pod("b", "first"), pod("a", "second")];
        sort_pods(&mut pods, PodOrder::NameAscending);
        assert_eq!(names(&pods), ["a", "a", "b"]);
        assert_eq!(pods[0].target, "first");
        assert_eq!(pods[1].target, "second");
    }

    #[test]
    fn sorting_sorted_list_is_idempotent() {
        let mut pods = vec![pod("a", "t"), pod("b", "t"), pod("c", "t")];
        let before = pods.clone();
        sort_pods(&mut pods, PodOrder::NameAscending);
        assert_eq!(pods, before);
    }

    #[test]
    fn sort_by_creation_time_missing_first() {
        let mut old = pod("old", "t");
        old.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut new = pod("new", "t");
        new.created_at = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        let pending = pod("pending", "t");

        let mut pods = vec![new.clone(), pending.clone(), old.clone()];
        sort_pods(&mut pods, PodOrder::CreationTime);
        assert_eq!(names(&pods), ["pending", "old", "new"]);
    }

    #[test]
    fn window_wraps_around() {
        let pods = vec![pod("A", "t"), pod("B", "t"), pod("C", "t")];
        let out = window(&pods, 2, PodCount::Count(4));
        assert_eq!(names(&out), ["C", "A", "B", "C"]);
    }

    #[test]
    fn window_empty_input_never_errors() {
        assert!(window(&[], 0, PodCount::All).is_empty());
        assert!(window(&[], 7, PodCount::Count(100)).is_empty());
    }

    #[test]
    fn window_start_index_normalized_by_modulo() {
        let pods = vec![pod("A", "t"), pod("B", "t"), pod("C", "t")];
        let out = window(&pods, 7, PodCount::Count(2));
        assert_eq!(names(&out), ["B", "C"]);
    }

    #[test]
    fn window_all_takes_exact_length_without_wrap() {
        let pods = vec![pod("A", "t"), pod("B", "t"), pod("C", "t")];
        let out = window(&pods, 1, PodCount::All);
        assert_eq!(names(&out), ["B", "C", "A"]);
    }

    #[test]
    fn window_count_zero_yields_empty() {
        let pods = vec![pod("A", "t")];
        assert!(window(&pods, 0, PodCount::Count(0)).is_empty());
    }

    #[test]
    fn window_count_exceeding_length_repeats_pods() {
        let pods = vec![pod("A", "t"), pod("B", "t")];
        let out = window(&pods, 0, PodCount::Count(5));
        assert_eq!(names(&out), ["A", "B", "A", "B", "A"]);
    }

    #[test]
    fn sequence_sorts_then_windows() {
        let pods = vec![pod("c", "t"), pod("a", "t"), pod("b", "t")];
        let out = sequence(pods, PodOrder::NameAscending, 2, PodCount::Count(4));
        assert_eq!(names(&out), ["c", "a", "b", "c"]);
    }

    #[test]
    fn random_order_preserves_membership() {
        let pods = vec![pod("a", "t"), pod("b", "t"), pod("c", "t")];
        let out = sequence(pods, PodOrder::Random, 0, PodCount::All);
        let mut got = names(&out);
        got.sort();
        assert_eq!(got, ["a", "b", "c"]);
    }
}
