//! Property tests for content extraction and hash equivalence.

use proptest::prelude::*;

use vendo::{extract, normalize_line_endings, parse_path_position, ContentHash, PositionSpec};

fn l1_eof() -> PositionSpec {
    let (_, spec) = parse_path_position("f:L1-EOF").unwrap();
    spec.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `L1-EOF` over any content is byte-identical to the whole
    /// CRLF-normalized content - whole-file and full-range extraction are
    /// hash-equivalent.
    #[test]
    fn property_l1_eof_equals_whole_file(
        content in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let whole = extract(&content, None).unwrap();
        let ranged = extract(&content, Some(&l1_eof())).unwrap();
        prop_assert_eq!(&whole, &ranged);
        prop_assert_eq!(
            ContentHash::from_bytes(&whole),
            ContentHash::from_bytes(&ranged)
        );
    }

    /// PROPERTY: normalization is idempotent.
    #[test]
    fn property_normalization_idempotent(
        content in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let once = normalize_line_endings(&content).into_owned();
        let twice = normalize_line_endings(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: CRLF and LF renditions of the same lines extract to the
    /// same bytes for any in-range line selection.
    #[test]
    fn property_line_endings_do_not_affect_extraction(
        lines in proptest::collection::vec("[a-z ]{0,20}", 1..12),
        start in 1..12u32,
        span in 0..12u32,
    ) {
        prop_assume!((start as usize) <= lines.len());
        let lf = lines.join("\n");
        let crlf = lines.join("\r\n");

        let raw = format!("f:L{}-L{}", start, start + span);
        let (_, spec) = parse_path_position(&raw).unwrap();

        let from_lf = extract(lf.as_bytes(), spec.as_ref()).unwrap();
        let from_crlf = extract(crlf.as_bytes(), spec.as_ref()).unwrap();
        prop_assert_eq!(from_lf, from_crlf);
    }

    /// PROPERTY: extraction output is always a slice of the normalized
    /// content (never fabricates bytes).
    #[test]
    fn property_extracted_bytes_are_a_substring(
        content in proptest::collection::vec(any::<u8>(), 0..256),
        start in 1..8u32,
    ) {
        let normalized = normalize_line_endings(&content).into_owned();
        let raw = format!("f:L{}-EOF", start);
        let (_, spec) = parse_path_position(&raw).unwrap();
        if let Ok(bytes) = extract(&content, spec.as_ref()) {
            let found = normalized
                .windows(bytes.len().max(1))
                .any(|w| w == &bytes[..])
                || bytes.is_empty();
            prop_assert!(found);
        }
    }
}
