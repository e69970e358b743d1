//! Parliamentary group (faction) name normalization.
//!
//! Source documents spell factions inconsistently (`CDU/CSU`, `CDU`, `Union`,
//! `BÜNDNIS 90/DIE GRÜNEN`, `B90/Grüne`, ...). [`normalize_group`] maps them to
//! a fixed set of canonical names with an ordered keyword table. The first
//! matching rule wins, so a name containing keywords of several groups resolves
//! to the earliest rule.

pub use plenum_graph::UNAFFILIATED;

pub const CDU_CSU: &str = "CDU/CSU";
pub const SPD: &str = "SPD";
pub const GRUENE: &str = "BÜNDNIS 90/DIE GRÜNEN";
pub const AFD: &str = "AfD";
pub const FDP: &str = "FDP";
pub const LINKE: &str = "DIE LINKE";
pub const BSW: &str = "BSW";

/// Canonical names, in rule order.
pub const CANONICAL_GROUPS: [&str; 7] = [CDU_CSU, SPD, GRUENE, AFD, FDP, LINKE, BSW];

/// Raw names meaning "no faction" (compared case-insensitively).
const UNAFFILIATED_ALIASES: [&str; 3] = ["Fraktionslos", "Fractionless", "Ohne Fraktion"];

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct GroupRule {
    pub canonical: &'static str,
    /// Matched against the upper-cased name.
    pub keywords: &'static [&'static str],
    /// Matched case-sensitively against the trimmed name.
    pub phrases: &'static [&'static str],
}

impl GroupRule {
    fn matches(&self, name: &str, upper: &str) -> bool {
        self.keywords.iter().any(|k| upper.contains(k))
            || self.phrases.iter().any(|p| name.contains(p))
    }
}

/// Classification table. Order is significant.
pub const GROUP_RULES: &[GroupRule] = &[
    GroupRule {
        canonical: CDU_CSU,
        keywords: &["CDU", "CSU"],
        phrases: &["Christlich", "Union"],
    },
    GroupRule {
        canonical: SPD,
        keywords: &["SPD"],
        phrases: &["Sozialdemokrat"],
    },
    GroupRule {
        canonical: GRUENE,
        keywords: &["GRÜN", "GRUEN", "BÜNDNIS", "BUENDNIS", "B90"],
        phrases: &["Grüne", "GREEN"],
    },
    GroupRule {
        canonical: AFD,
        keywords: &["AFD", "ALTERNATIVE"],
        phrases: &["Alternative für Deutschland"],
    },
    GroupRule {
        canonical: FDP,
        keywords: &["FDP"],
        phrases: &["Freie Demokrat", "Liberale"],
    },
    GroupRule {
        canonical: LINKE,
        keywords: &["LINKE"],
        phrases: &["DIE LINKE", "Linkspartei"],
    },
    GroupRule {
        canonical: BSW,
        keywords: &["BSW"],
        phrases: &["Bündnis Sahra Wagenknecht", "Wagenknecht"],
    },
];

/// Map a raw faction name to its canonical form.
///
/// Missing, blank and "no faction" names become [`UNAFFILIATED`]; names no rule
/// recognises are returned trimmed but otherwise unchanged.
pub fn normalize_group(raw: Option<&str>) -> String {
    let name = match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return UNAFFILIATED.to_string(),
    };

    let lower = name.to_lowercase();
    if UNAFFILIATED_ALIASES
        .iter()
        .any(|alias| alias.to_lowercase() == lower)
    {
        return UNAFFILIATED.to_string();
    }

    let upper = name.to_uppercase();
    GROUP_RULES
        .iter()
        .find(|rule| rule.matches(name, &upper))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaffiliated_variants() {
        assert_eq!(normalize_group(None), UNAFFILIATED);
        assert_eq!(normalize_group(Some("")), UNAFFILIATED);
        assert_eq!(normalize_group(Some("   ")), UNAFFILIATED);
        assert_eq!(normalize_group(Some("fraktionslos")), UNAFFILIATED);
        assert_eq!(normalize_group(Some(" FRACTIONLESS ")), UNAFFILIATED);
        assert_eq!(normalize_group(Some("ohne fraktion")), UNAFFILIATED);
    }

    #[test]
    fn common_spellings() {
        let cases = [
            ("CDU/CSU", CDU_CSU),
            ("cdu", CDU_CSU),
            ("Christlich Demokratische Union", CDU_CSU),
            ("SPD", SPD),
            ("Sozialdemokratische Partei", SPD),
            ("BÜNDNIS 90/DIE GRÜNEN", GRUENE),
            ("B90/Grüne", GRUENE),
            ("Buendnis 90 / Die Gruenen", GRUENE),
            ("AfD", AFD),
            ("Alternative für Deutschland", AFD),
            ("FDP", FDP),
            ("Freie Demokraten", FDP),
            ("DIE LINKE", LINKE),
            ("Die Linke.", LINKE),
            ("Linkspartei.PDS", LINKE),
            ("BSW", BSW),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_group(Some(raw)), expected, "raw = {raw:?}");
        }
    }

    #[test]
    fn rule_order_breaks_ties() {
        // "Bündnis" is a green keyword and the green rule is checked before BSW.
        assert_eq!(normalize_group(Some("Bündnis Sahra Wagenknecht")), GRUENE);
        assert_eq!(normalize_group(Some("Wagenknecht-Gruppe")), BSW);
        // "Union" fires before anything else.
        assert_eq!(normalize_group(Some("Union der Grünen")), CDU_CSU);
    }

    #[test]
    fn unknown_names_pass_through_trimmed() {
        assert_eq!(normalize_group(Some("  SSW  ")), "SSW");
        assert_eq!(normalize_group(Some("Piraten")), "Piraten");
    }

    #[test]
    fn canonical_names_are_fixed_points() {
        for name in CANONICAL_GROUPS.iter().chain(std::iter::once(&UNAFFILIATED)) {
            assert_eq!(normalize_group(Some(*name)), *name);
        }
    }
}
