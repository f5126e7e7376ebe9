//! Property tests for position specifier parsing and formatting.

use proptest::prelude::*;

use vendo::{format_path_position, parse_path_position, strip_position, PositionSpec};

fn relative_path_string() -> impl Strategy<Value = String> {
    // Trigger-free path generator: segments never contain ':', so the
    // `:L<digit>` trigger cannot occur inside the path part.
    let segment = proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

fn position_spec() -> impl Strategy<Value = PositionSpec> {
    let line = 1..10_000u32;
    let col = 1..4_000u32;
    prop_oneof![
        line.clone().prop_map(PositionSpec::Line),
        (line.clone(), 0..500u32).prop_map(|(n, span)| PositionSpec::LineRange(n, n + span)),
        line.clone().prop_map(PositionSpec::LineToEof),
        (line, 0..500u32, col.clone(), col).prop_map(|(n, span, c, d)| {
            // Same-line ranges must keep end column >= start column.
            let (start_col, end_col) = if span == 0 && d < c { (d, c) } else { (c, d) };
            PositionSpec::ColumnRange {
                start_line: n,
                start_col,
                end_line: n + span,
                end_col,
            }
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: formatting any spec and re-parsing yields the same
    /// path and a structurally equal spec.
    #[test]
    fn property_format_parse_round_trips(
        path in relative_path_string(),
        spec in position_spec(),
    ) {
        let raw = format_path_position(&path, Some(&spec));
        let parsed = parse_path_position(&raw).unwrap();
        prop_assert_eq!(parsed, (path, Some(spec)));
    }

    /// PROPERTY: trigger-free paths pass through untouched.
    #[test]
    fn property_plain_paths_have_no_position(
        path in relative_path_string(),
    ) {
        prop_assert_eq!(
            parse_path_position(&path).unwrap(),
            (path.clone(), None)
        );
        prop_assert_eq!(strip_position(&path).unwrap(), path);
    }

    /// PROPERTY: `parse_path_position` never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(
        s in ".{0,128}"
    ) {
        let _ = parse_path_position(&s);
    }

    /// PROPERTY: the canonical rendering of a parsed suffix re-parses to
    /// itself (canonical form is a fixed point).
    #[test]
    fn property_canonical_form_is_fixed_point(
        spec in position_spec(),
    ) {
        let rendered = spec.to_string();
        let (_, reparsed) = parse_path_position(&format!("f:{}", rendered)).unwrap();
        prop_assert_eq!(reparsed, Some(spec));
    }
}
