use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

//
// ─── CORRECT YEAR ──────────────────────────────────────────────────────────────
//

/// The dating of an artifact: either a single year or an inclusive range.
///
/// Serializes the way artifact data files write it: a bare integer for
/// `Exact`, a two-element array `[lower, upper]` for `Range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectYear {
    Exact(i32),
    Range { lower: i32, upper: i32 },
}

/// Result of comparing a year guess against a `CorrectYear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCheck {
    /// Distance in years to the exact year, or to the nearest range bound.
    pub diff: u32,
    pub correct: bool,
}

impl CorrectYear {
    /// Compare a guess against this year.
    ///
    /// A range counts every guess between its bounds (inclusive) as correct
    /// with a distance of zero. Outside it, the distance is measured to the
    /// closer bound.
    #[must_use]
    pub fn evaluate(&self, guess: i32) -> YearCheck {
        match *self {
            CorrectYear::Exact(year) => {
                let diff = guess.abs_diff(year);
                YearCheck {
                    diff,
                    correct: diff == 0,
                }
            }
            CorrectYear::Range { lower, upper } => {
                if (lower..=upper).contains(&guess) {
                    YearCheck {
                        diff: 0,
                        correct: true,
                    }
                } else {
                    YearCheck {
                        diff: guess.abs_diff(lower).min(guess.abs_diff(upper)),
                        correct: false,
                    }
                }
            }
        }
    }
}

impl fmt::Display for CorrectYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectYear::Exact(year) => write!(f, "{year}"),
            CorrectYear::Range { lower, upper } => write!(f, "{lower} to {upper}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Exact(i32),
    Range([i32; 2]),
}

impl Serialize for CorrectYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match *self {
            CorrectYear::Exact(year) => YearRepr::Exact(year),
            CorrectYear::Range { lower, upper } => YearRepr::Range([lower, upper]),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CorrectYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match YearRepr::deserialize(deserializer)? {
            YearRepr::Exact(year) => CorrectYear::Exact(year),
            YearRepr::Range([lower, upper]) => CorrectYear::Range { lower, upper },
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_year_distance_is_absolute() {
        let year = CorrectYear::Exact(1200);
        assert_eq!(
            year.evaluate(1150),
            YearCheck {
                diff: 50,
                correct: false
            }
        );
        assert_eq!(year.evaluate(1205).diff, 5);
        assert!(year.evaluate(1200).correct);
    }

    #[test]
    fn exact_year_zero_diff_iff_correct() {
        let year = CorrectYear::Exact(-350);
        for guess in -400..-300 {
            let check = year.evaluate(guess);
            assert_eq!(check.diff == 0, check.correct, "guess {guess}");
        }
    }

    #[test]
    fn range_contains_bounds_inclusively() {
        let year = CorrectYear::Range {
            lower: 1800,
            upper: 1850,
        };
        for guess in 1800..=1850 {
            let check = year.evaluate(guess);
            assert!(check.correct);
            assert_eq!(check.diff, 0);
        }
    }

    #[test]
    fn range_distance_uses_nearest_bound() {
        let year = CorrectYear::Range {
            lower: 1800,
            upper: 1850,
        };
        assert_eq!(year.evaluate(1790).diff, 10);
        assert_eq!(year.evaluate(1862).diff, 12);
        assert!(!year.evaluate(1799).correct);
    }

    #[test]
    fn serde_accepts_integer_or_pair() {
        let exact: CorrectYear = serde_json::from_str("1200").unwrap();
        assert_eq!(exact, CorrectYear::Exact(1200));

        let range: CorrectYear = serde_json::from_str("[1800, 1850]").unwrap();
        assert_eq!(
            range,
            CorrectYear::Range {
                lower: 1800,
                upper: 1850
            }
        );
        assert_eq!(serde_json::to_string(&range).unwrap(), "[1800,1850]");

        assert!(serde_json::from_str::<CorrectYear>("[1800]").is_err());
        assert!(serde_json::from_str::<CorrectYear>("\"1800\"").is_err());
    }

    #[test]
    fn display_formats_range_with_dash() {
        let range = CorrectYear::Range {
            lower: 1800,
            upper: 1850,
        };
        assert_eq!(range.to_string(), "1800 to 1850");
        let bce = CorrectYear::Range {
            lower: -600,
            upper: -550,
        };
        assert_eq!(bce.to_string(), "-600 to -550");
        assert_eq!(CorrectYear::Exact(-44).to_string(), "-44");
    }
}
