//! Property tests for destination ownership conflicts.

use proptest::prelude::*;

use vendo::{detect_conflicts, MappingOwner, PathMapping};

fn owner(source: &str, from: &str, to: &str) -> MappingOwner {
    MappingOwner {
        source: source.to_string(),
        mapping: PathMapping::new(from, to),
    }
}

fn dest_string() -> impl Strategy<Value = String> {
    // Small alphabet to force collisions and ancestor pairs.
    let segment = prop_oneof![
        Just("lib".to_string()),
        Just("lib1".to_string()),
        Just("lib2".to_string()),
        Just("sub".to_string()),
        Just("a.rs".to_string()),
    ];
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: n owners of one destination yield exactly n*(n-1)/2
    /// conflict records.
    #[test]
    fn property_shared_destination_fan_out(n in 2..8usize) {
        let owners: Vec<MappingOwner> = (0..n)
            .map(|i| owner(&format!("src{}", i), &format!("f{}.rs", i), "shared/dest.rs"))
            .collect();
        prop_assert_eq!(detect_conflicts(&owners).len(), n * (n - 1) / 2);
    }

    /// PROPERTY: a pair is reported once, never as both (A,B) and (B,A).
    #[test]
    fn property_conflicts_are_symmetric_and_deduplicated(
        dests in proptest::collection::vec(dest_string(), 0..6),
    ) {
        let owners: Vec<MappingOwner> = dests
            .iter()
            .enumerate()
            .map(|(i, dest)| owner(&format!("s{}", i), &format!("f{}", i), dest))
            .collect();
        let conflicts = detect_conflicts(&owners);

        let mut seen = std::collections::HashSet::new();
        for c in &conflicts {
            let mut pair = [
                (c.first.source.clone(), c.first.from.clone()),
                (c.second.source.clone(), c.second.from.clone()),
            ];
            pair.sort();
            prop_assert!(
                seen.insert(pair),
                "pair reported twice for path {}",
                c.path
            );
        }
    }

    /// PROPERTY: detection is deterministic - two runs over the same
    /// snapshot produce identical reports.
    #[test]
    fn property_detection_is_deterministic(
        dests in proptest::collection::vec(dest_string(), 0..8),
    ) {
        let owners: Vec<MappingOwner> = dests
            .iter()
            .enumerate()
            .map(|(i, dest)| owner(&format!("s{}", i), &format!("f{}", i), dest))
            .collect();
        prop_assert_eq!(detect_conflicts(&owners), detect_conflicts(&owners));
    }

    /// PROPERTY: sibling destinations that merely share a string prefix
    /// (`lib1`, `lib2`) never conflict.
    #[test]
    fn property_string_prefix_is_not_ancestry(
        suffix_a in 1..9u32,
        suffix_b in 1..9u32,
    ) {
        prop_assume!(suffix_a != suffix_b);
        let owners = [
            owner("a", "x", &format!("lib{}", suffix_a)),
            owner("b", "y", &format!("lib{}", suffix_b)),
        ];
        prop_assert!(detect_conflicts(&owners).is_empty());
    }
}
