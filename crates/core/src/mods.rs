//! Modifier registry: bitwise encoding, classification and mod-set parsing.
//!
//! The registry is a static, immutable table. Two lookups are exposed:
//! the bitmask-to-code mapping used by the game's API, and the policy
//! classification that drives the recalculation skip decision.

/// Policy class of a single modifier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModClass {
    /// Alters the pp value but not the difficulty attributes (HD, NF, SO).
    SameDifficulty,
    /// Alters neither difficulty attributes nor pp (SD, PF).
    SamePp,
    /// Unranked / non-scoring modifiers (RL, AP, AT).
    Ignored,
    /// May alter any difficulty attribute (EZ, HT, DT, NC, HR, FL).
    Standard,
}

/// All known two-letter modifier codes.
pub const KNOWN_MODS: [&str; 14] = [
    "EZ", "HD", "HT", "DT", "NC", "HR", "FL", "NF", "SD", "PF", "RL", "SO", "AP", "AT",
];

/// Bitmask encoding used by the game's API.
///
/// AT legitimately appears under two distinct bit values; that is a quirk
/// of the upstream encoding, not an error in this table.
const BITWISE_MODS: [(u32, &str); 15] = [
    (0, ""),
    (1, "NF"),
    (2, "EZ"),
    (8, "HD"),
    (16, "HR"),
    (32, "SD"),
    (64, "DT"),
    (128, "RL"),
    (256, "HT"),
    (512, "NC"),
    (1024, "FL"),
    (2048, "AT"),
    (4096, "SO"),
    (8192, "AT"),
    (16384, "PF"),
];

/// Display order used when rendering a bitmask as a mod string.
const MOD_ORDER: [&str; 14] = [
    "EZ", "HD", "HT", "DT", "NC", "HR", "FL", "NF", "SD", "PF", "RL", "SO", "AP", "AT",
];

/// Returns the canonical code for a single bit value, or `Some("")` for 0.
///
/// `None` means the bit is not part of the encoding at all.
pub fn code_for_bit(bit: u32) -> Option<&'static str> {
    BITWISE_MODS
        .iter()
        .find(|&&(value, _)| value == bit)
        .map(|&(_, code)| code)
}

/// Classifies a known modifier code. Unknown codes return `None` and are
/// never treated as standard.
pub fn classify(code: &str) -> Option<ModClass> {
    match code {
        "HD" | "NF" | "SO" => Some(ModClass::SameDifficulty),
        "SD" | "PF" => Some(ModClass::SamePp),
        "RL" | "AP" | "AT" => Some(ModClass::Ignored),
        "EZ" | "HT" | "DT" | "NC" | "HR" | "FL" => Some(ModClass::Standard),
        _ => None,
    }
}

/// An ordered set of modifier codes parsed from a title fragment.
///
/// Duplicates are tolerated and the empty set represents nomod. Codes are
/// kept in the order they appeared; unknown codes are preserved so the
/// caller can detect them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModSet {
    codes: Vec<String>,
}

impl ModSet {
    /// Parses a `+`-prefixed fragment such as `+HDDT` or `+HD,DT`.
    ///
    /// Commas are stripped and the remaining uppercase run is split into
    /// two-letter codes. A trailing odd letter is dropped.
    pub fn parse(fragment: &str) -> Self {
        let run: String = fragment
            .trim_start_matches('+')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let codes = run
            .as_bytes()
            .chunks_exact(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect();

        Self { codes }
    }

    /// Decodes a bitmask into an ordered set.
    ///
    /// NC always comes paired with DT in the encoding, and PF with SD, so
    /// the implied half of each pair is removed from the rendered set.
    pub fn from_bits(mask: u32) -> Self {
        let mut present: Vec<&str> = Vec::new();
        for &(bit, code) in BITWISE_MODS.iter().skip(1) {
            if mask & bit == bit && !present.contains(&code) {
                present.push(code);
            }
        }
        let mut ordered: Vec<&str> = MOD_ORDER
            .iter()
            .copied()
            .filter(|code| present.contains(code))
            .collect();
        if ordered.contains(&"NC") {
            ordered.retain(|code| *code != "DT");
        }
        if ordered.contains(&"PF") {
            ordered.retain(|code| *code != "SD");
        }

        Self {
            codes: ordered.into_iter().map(String::from).collect(),
        }
    }

    /// The empty set, i.e. nomod.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Whether every code in the set is a known modifier.
    pub fn all_known(&self) -> bool {
        self.codes.iter().all(|c| classify(c).is_some())
    }

    /// Whether this set requires a difficulty recomputation.
    ///
    /// False for the empty set, for a set made solely of same-difficulty,
    /// same-pp and ignored codes, and for any set containing an unknown
    /// code (an unrecognized code renders the whole fragment untrustworthy).
    pub fn requires_recalc(&self) -> bool {
        if self.codes.is_empty() || !self.all_known() {
            return false;
        }
        self.codes
            .iter()
            .any(|c| classify(c) == Some(ModClass::Standard))
    }

    /// The `+HDDT` label used in comments, empty for nomod.
    pub fn label(&self) -> String {
        if self.codes.is_empty() {
            String::new()
        } else {
            format!("+{}", self.codes.join(""))
        }
    }
}

impl std::fmt::Display for ModSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.codes.is_empty() {
            write!(f, "NoMod")
        } else {
            write!(f, "{}", self.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_total_over_known_mods() {
        for code in KNOWN_MODS {
            assert!(classify(code).is_some(), "{} is unclassified", code);
        }
    }

    #[test]
    fn test_unknown_codes_are_never_standard() {
        for code in ["XX", "V2", "hd", ""] {
            assert_eq!(classify(code), None);
        }
    }

    #[test]
    fn test_skip_set_matches_policy() {
        let skip = ["HD", "SD", "PF", "RL", "AP", "AT", "SO", "NF"];
        for code in KNOWN_MODS {
            let class = classify(code).unwrap();
            if skip.contains(&code) {
                assert_ne!(class, ModClass::Standard, "{} should not recalc", code);
            } else {
                assert_eq!(class, ModClass::Standard, "{} should recalc", code);
            }
        }
    }

    #[test]
    fn test_code_for_bit() {
        assert_eq!(code_for_bit(0), Some(""));
        assert_eq!(code_for_bit(1), Some("NF"));
        assert_eq!(code_for_bit(64), Some("DT"));
        assert_eq!(code_for_bit(16384), Some("PF"));
        assert_eq!(code_for_bit(3), None);
    }

    #[test]
    fn test_at_bit_alias_is_preserved() {
        assert_eq!(code_for_bit(2048), Some("AT"));
        assert_eq!(code_for_bit(8192), Some("AT"));
    }

    #[test]
    fn test_parse_plain_pairs() {
        let mods = ModSet::parse("+HDDT");
        assert_eq!(mods.codes(), ["HD", "DT"]);
    }

    #[test]
    fn test_parse_comma_separated() {
        let mods = ModSet::parse("+HD,DT,HR");
        assert_eq!(mods.codes(), ["HD", "DT", "HR"]);
    }

    #[test]
    fn test_parse_empty_fragment_is_nomod() {
        assert!(ModSet::parse("").is_empty());
        assert!(ModSet::parse("+").is_empty());
    }

    #[test]
    fn test_parse_drops_trailing_odd_letter() {
        let mods = ModSet::parse("+HDX");
        assert_eq!(mods.codes(), ["HD"]);
    }

    #[test]
    fn test_parse_keeps_duplicates_without_crashing() {
        let mods = ModSet::parse("+HDHD");
        assert_eq!(mods.codes(), ["HD", "HD"]);
        assert!(!mods.requires_recalc());
    }

    #[test]
    fn test_requires_recalc_standard_mod() {
        assert!(ModSet::parse("+HDDT").requires_recalc());
        assert!(ModSet::parse("+HR").requires_recalc());
    }

    #[test]
    fn test_requires_recalc_skip_only_mods() {
        for fragment in ["+HD", "+SDPF", "+RLAP", "+NFSO", "+HDNFSDPFRLAPATSO"] {
            assert!(!ModSet::parse(fragment).requires_recalc(), "{}", fragment);
        }
    }

    #[test]
    fn test_requires_recalc_unknown_code_forces_nomod() {
        assert!(!ModSet::parse("+DTXX").requires_recalc());
    }

    #[test]
    fn test_from_bits_orders_and_collapses_nc_pf() {
        // DT | NC -> NC only, SD | PF -> PF only.
        let mods = ModSet::from_bits(64 | 512 | 32 | 16384 | 8);
        assert_eq!(mods.codes(), ["HD", "NC", "PF"]);
    }

    #[test]
    fn test_from_bits_zero_is_nomod() {
        let mods = ModSet::from_bits(0);
        assert!(mods.is_empty());
        assert_eq!(mods.to_string(), "NoMod");
    }

    #[test]
    fn test_label() {
        assert_eq!(ModSet::parse("+HDDT").label(), "+HDDT");
        assert_eq!(ModSet::empty().label(), "");
    }
}
