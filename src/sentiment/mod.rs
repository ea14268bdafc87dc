pub mod lexicon;
pub mod standard;

use std::sync::LazyLock;

use regex::Regex;

pub use lexicon::{LexiconError, VaderLexicon};
pub use standard::StandardVaderScorer;

/// Scores a text span with a single polarity in [-1, 1].
/// Shared read-only across enrichment workers.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Normalization constant of the compound score.
const ALPHA: f64 = 15.0;
/// Emphasis added to an ALL-CAPS sentiment word in mixed-case text.
const CAPS_INCR: f64 = 0.733;
/// Valence multiplier for a negated sentiment word.
const NEGATION_SCALAR: f64 = -0.74;
/// Decay of booster and negation effects by distance (1, 2, 3 tokens back).
const WINDOW_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*").unwrap());

/// Map a raw valence sum onto (-1, 1).
pub fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn is_shouted(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !token.chars().any(|c| c.is_lowercase())
}

/// Scorer over a user-supplied lexicon following VADER's rules: boosters,
/// negation, capitalization emphasis and the "but" shift, summed into a
/// compound score.
#[derive(Debug, Clone)]
pub struct VaderScorer {
    lexicon: VaderLexicon,
}

impl VaderScorer {
    pub fn with_lexicon(lexicon: VaderLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &VaderLexicon {
        &self.lexicon
    }

    /// Per-token valences after every rule except the "but" shift.
    fn token_valences(&self, tokens: &[&str], lowered: &[String]) -> Vec<f64> {
        let shouted: Vec<bool> = tokens.iter().map(|t| is_shouted(t)).collect();
        // Emphasis only means something when the text is not shouted throughout
        let mixed_case = shouted.iter().any(|s| *s) && shouted.iter().any(|s| !*s);

        let mut valences = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            if self.lexicon.booster(word).is_some() {
                valences.push(0.0);
                continue;
            }
            let Some(base) = self.lexicon.valence(word) else {
                valences.push(0.0);
                continue;
            };

            let mut valence = base;
            if mixed_case && shouted[i] {
                valence += CAPS_INCR.copysign(base);
            }

            for (distance, decay) in WINDOW_DECAY.iter().enumerate().map(|(d, k)| (d + 1, *k)) {
                if i < distance {
                    break;
                }
                let prev = &lowered[i - distance];
                if let Some(boost) = self.lexicon.booster(prev) {
                    let mut scalar = boost;
                    if base < 0.0 {
                        scalar = -scalar;
                    }
                    if mixed_case && shouted[i - distance] {
                        scalar += CAPS_INCR.copysign(scalar);
                    }
                    valence += scalar * decay;
                }
                if self.lexicon.is_negation(prev) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences.push(valence);
        }
        valences
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mut valences = self.token_valences(&tokens, &lowered);

        // Contrast: sentiment after "but" dominates sentiment before it
        if let Some(pivot) = lowered.iter().position(|w| w == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        normalize(valences.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "\
love\t3.2
good\t1.9
great\t3.1
fun\t2.3
bad\t-2.5
worst\t-3.1
crash\t-1.7
terrible\t-2.1
kill\t-3.7
murder\t-3.7
death\t-2.9
war\t-2.9
";

    fn score(text: &str) -> f64 {
        let lexicon = VaderLexicon::from_reader(LEXICON.as_bytes()).unwrap();
        VaderScorer::with_lexicon(lexicon).score(text)
    }

    #[test]
    fn test_empty_and_neutral_text_score_zero() {
        assert_eq!(score(""), 0.0);
        assert_eq!(score("   "), 0.0);
        assert_eq!(score("tractor unboxing 2020"), 0.0);
    }

    #[test]
    fn test_polarity_direction() {
        assert!(score("love this song") > 0.0);
        assert!(score("worst crash ever") < 0.0);
    }

    #[test]
    fn test_normalize_matches_vader_formula() {
        let s: f64 = 3.2;
        let expected = s / (s * s + 15.0).sqrt();
        assert!((normalize(s) - expected).abs() < 1e-12);
        assert!((score("love") - expected).abs() < 1e-12);
        assert_eq!(normalize(0.0), 0.0);
        assert!(normalize(1e9) <= 1.0);
        assert!(normalize(-1e9) >= -1.0);
    }

    #[test]
    fn test_booster_and_dampener() {
        assert!(score("very good") > score("good"));
        assert!(score("slightly good") < score("good"));
        assert!(score("very bad") < score("bad"));
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert!(score("not good") < 0.0);
        assert!(score("isn't bad") > 0.0);
    }

    #[test]
    fn test_caps_emphasis_in_mixed_case() {
        assert!(score("this is GREAT") > score("this is great"));
        // All-caps text gets no emphasis
        assert!((score("THIS IS GREAT") - score("this is great")).abs() < 1e-12);
    }

    #[test]
    fn test_but_shifts_weight() {
        // "good" before "but" is halved, "bad" after is amplified
        assert!(score("good but bad") < 0.0);
        assert!(score("bad but good") > 0.0);
    }

    #[test]
    fn test_score_always_in_range() {
        let texts = [
            "love love love love love love love love love love",
            "kill kill kill murder murder death death war",
            "not not not very extremely GREAT but terrible",
            "cat dog fun",
        ];
        for t in texts {
            let s = score(t);
            assert!((-1.0..=1.0).contains(&s), "{t}: {s}");
        }
    }
}
