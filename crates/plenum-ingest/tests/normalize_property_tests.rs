use plenum_ingest::normalize::{CDU_CSU, CANONICAL_GROUPS};
use plenum_ingest::{normalize_group, UNAFFILIATED};
use proptest::prelude::*;

fn filler() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ./-]{0,12}").unwrap()
}

/// "cdu" or "csu" with every letter in a random case.
fn union_keyword() -> impl Strategy<Value = String> {
    (prop_oneof![Just("cdu"), Just("csu")], prop::collection::vec(any::<bool>(), 3)).prop_map(
        |(word, upper)| {
            word.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn union_keyword_in_any_case_wins(
        prefix in filler(),
        keyword in union_keyword(),
        suffix in filler(),
    ) {
        let raw = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(normalize_group(Some(raw.as_str())), CDU_CSU);
    }

    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,30}") {
        let once = normalize_group(Some(raw.as_str()));
        prop_assert_eq!(normalize_group(Some(once.as_str())), once.clone());
    }

    #[test]
    fn output_is_canonical_or_trimmed_input(raw in filler()) {
        let out = normalize_group(Some(raw.as_str()));
        let known = CANONICAL_GROUPS.contains(&out.as_str()) || out == UNAFFILIATED;
        prop_assert!(known || out == raw.trim(), "unexpected output {:?} for {:?}", out, raw);
    }
}
