//! Birth/survival rule strings and lattice topology.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lattice topology a simulation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lattice {
    /// 8-neighbor Moore neighborhood.
    Square,
    /// 6-neighbor hex grid with odd-row offset.
    Hex,
}

impl Lattice {
    /// Size of the neighborhood for this lattice (8 for square, 6 for hex).
    #[inline]
    pub fn neighborhood_size(self) -> u32 {
        match self {
            Lattice::Square => 8,
            Lattice::Hex => 6,
        }
    }
}

/// A birth/survival rule: the digit-sets that decide cell birth and survival.
///
/// Internally each set is a bitmask over neighbor counts `0..=8`, so the
/// representation is shared by both lattices; `Lattice::neighborhood_size`
/// just bounds which bits can ever be set meaningfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rule {
    birth: u16,
    survival: u16,
}

/// Error parsing a rule string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rule string: {0:?}")]
pub struct RuleError(pub String);

impl Rule {
    /// Parse a `B<digits>/S<digits>` string, case-insensitive, trimmed.
    ///
    /// Digits may repeat; they collapse into a set. Empty digit lists (`B/S`)
    /// are syntactically valid.
    pub fn parse(input: &str) -> Result<Rule, RuleError> {
        let trimmed = input.trim();
        let upper = trimmed.to_ascii_uppercase();

        let rest = upper
            .strip_prefix('B')
            .ok_or_else(|| RuleError(input.to_string()))?;
        let (birth_digits, rest) = rest
            .split_once('/')
            .ok_or_else(|| RuleError(input.to_string()))?;
        let survival_digits = rest
            .strip_prefix('S')
            .ok_or_else(|| RuleError(input.to_string()))?;

        let birth = parse_digit_set(birth_digits).ok_or_else(|| RuleError(input.to_string()))?;
        let survival =
            parse_digit_set(survival_digits).ok_or_else(|| RuleError(input.to_string()))?;

        Ok(Rule { birth, survival })
    }

    /// The conventional default for a lattice: `B3/S23` for square,
    /// `B2/S34` for hex.
    pub fn default_for(lattice: Lattice) -> Rule {
        match lattice {
            Lattice::Square => Rule::parse("B3/S23").expect("built-in rule is valid"),
            Lattice::Hex => Rule::parse("B2/S34").expect("built-in rule is valid"),
        }
    }

    /// Whether a dead cell with `n` live neighbors is born.
    #[inline]
    pub fn births(&self, n: u32) -> bool {
        n < 16 && (self.birth & (1 << n)) != 0
    }

    /// Whether a live cell with `n` live neighbors survives.
    #[inline]
    pub fn survives(&self, n: u32) -> bool {
        n < 16 && (self.survival & (1 << n)) != 0
    }
}

fn parse_digit_set(digits: &str) -> Option<u16> {
    let mut set: u16 = 0;
    for ch in digits.chars() {
        let d = ch.to_digit(10)?;
        if d > 8 {
            return None;
        }
        set |= 1 << d;
    }
    Some(set)
}

fn digits_string(mut set: u16) -> String {
    let mut out = String::new();
    let mut d = 0u32;
    while set != 0 {
        if set & 1 != 0 {
            out.push(char::from_digit(d, 10).expect("d <= 8"));
        }
        set >>= 1;
        d += 1;
    }
    out
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            digits_string(self.birth),
            digits_string(self.survival)
        )
    }
}

impl TryFrom<String> for Rule {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rule::parse(&value)
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonicalizes_and_sorts() {
        let rule = Rule::parse("b36/S23 ").unwrap();
        assert_eq!(rule.to_string(), "B36/S23");
    }

    #[test]
    fn parse_idempotent_roundtrip() {
        let rule = Rule::parse("B3/S23").unwrap();
        let again = Rule::parse(&rule.to_string()).unwrap();
        assert_eq!(rule, again);
        assert_eq!(rule.to_string(), again.to_string());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Rule::parse("garbage").is_err());
        assert!(Rule::parse("B3S23").is_err());
        assert!(Rule::parse("B3/S9a").is_err());
    }

    #[test]
    fn empty_digit_sets_are_valid() {
        let rule = Rule::parse("B/S").unwrap();
        assert_eq!(rule.to_string(), "B/S");
        assert!(!rule.births(3));
        assert!(!rule.survives(2));
    }

    #[test]
    fn duplicate_digits_collapse() {
        let rule = Rule::parse("B333/S22233").unwrap();
        assert_eq!(rule.to_string(), "B3/S23");
    }

    #[test]
    fn defaults_differ_by_lattice() {
        assert_eq!(Rule::default_for(Lattice::Square).to_string(), "B3/S23");
        assert_eq!(Rule::default_for(Lattice::Hex).to_string(), "B2/S34");
    }
}
