//! Custom valence lexicons for [`crate::sentiment::VaderScorer`].
//!
//! Valences come from a file in `vader_lexicon.txt` format, on VADER's -4..4
//! scale. Booster and negation words are built in.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed lexicon line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Lexicon has no entries")]
    Empty,
}

/// Booster increment applied to a sentiment word following an intensifier.
pub const BOOST_INCR: f64 = 0.293;
/// Booster decrement applied to a sentiment word following a dampener.
pub const BOOST_DECR: f64 = -0.293;

const BUILTIN_BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCR),
    ("amazingly", BOOST_INCR),
    ("completely", BOOST_INCR),
    ("deeply", BOOST_INCR),
    ("enormously", BOOST_INCR),
    ("entirely", BOOST_INCR),
    ("especially", BOOST_INCR),
    ("exceptionally", BOOST_INCR),
    ("extremely", BOOST_INCR),
    ("fully", BOOST_INCR),
    ("greatly", BOOST_INCR),
    ("highly", BOOST_INCR),
    ("hugely", BOOST_INCR),
    ("incredibly", BOOST_INCR),
    ("intensely", BOOST_INCR),
    ("more", BOOST_INCR),
    ("most", BOOST_INCR),
    ("particularly", BOOST_INCR),
    ("quite", BOOST_INCR),
    ("really", BOOST_INCR),
    ("remarkably", BOOST_INCR),
    ("so", BOOST_INCR),
    ("thoroughly", BOOST_INCR),
    ("totally", BOOST_INCR),
    ("tremendously", BOOST_INCR),
    ("unbelievably", BOOST_INCR),
    ("utterly", BOOST_INCR),
    ("very", BOOST_INCR),
    ("almost", BOOST_DECR),
    ("barely", BOOST_DECR),
    ("hardly", BOOST_DECR),
    ("kinda", BOOST_DECR),
    ("less", BOOST_DECR),
    ("little", BOOST_DECR),
    ("marginally", BOOST_DECR),
    ("occasionally", BOOST_DECR),
    ("partly", BOOST_DECR),
    ("scarcely", BOOST_DECR),
    ("slightly", BOOST_DECR),
    ("somewhat", BOOST_DECR),
];

const BUILTIN_NEGATIONS: &[&str] = &[
    "aint", "ain't", "arent", "aren't", "cannot", "cant", "can't", "couldnt", "couldn't",
    "didnt", "didn't", "doesnt", "doesn't", "dont", "don't", "hadnt", "hadn't", "hasnt",
    "hasn't", "havent", "haven't", "isnt", "isn't", "neither", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "rarely", "seldom", "shouldnt", "shouldn't",
    "wasnt", "wasn't", "werent", "weren't", "without", "wont", "won't", "wouldnt",
    "wouldn't",
];

/// Token valences plus the booster and negation word lists.
#[derive(Debug, Clone)]
pub struct VaderLexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl VaderLexicon {
    fn with_valences(valences: HashMap<String, f64>) -> Self {
        Self {
            valences,
            boosters: BUILTIN_BOOSTERS
                .iter()
                .map(|(w, v)| (w.to_string(), *v))
                .collect(),
            negations: BUILTIN_NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Load valences from a `vader_lexicon.txt` file.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let file = std::fs::File::open(path)?;
        let lexicon = Self::from_reader(file)?;
        log::info!(
            "Loaded {} lexicon entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Parse tab-separated `token<TAB>mean[<TAB>...]` lines. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let mut valences = HashMap::new();

        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.trim().is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split('\t');
            let token = fields.next().unwrap_or("").trim();
            let mean = fields.next().ok_or_else(|| LexiconError::Malformed {
                line: i + 1,
                reason: "expected token<TAB>mean".to_string(),
            })?;
            let mean: f64 = mean.trim().parse().map_err(|_| LexiconError::Malformed {
                line: i + 1,
                reason: format!("invalid valence `{}`", mean.trim()),
            })?;
            if token.is_empty() {
                return Err(LexiconError::Malformed {
                    line: i + 1,
                    reason: "empty token".to_string(),
                });
            }
            valences.insert(token.to_lowercase(), mean);
        }

        if valences.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(Self::with_valences(valences))
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.ends_with("n't")
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_builtin_modifiers() {
        let lex = VaderLexicon::from_reader("Love\t3.2\nhate\t-2.7\n".as_bytes()).unwrap();
        assert_eq!(lex.valence("love"), Some(3.2));
        assert_eq!(lex.valence("hate"), Some(-2.7));
        assert_eq!(lex.valence("tractor"), None);
        assert_eq!(lex.booster("very"), Some(BOOST_INCR));
        assert_eq!(lex.booster("slightly"), Some(BOOST_DECR));
        assert!(lex.is_negation("not"));
        assert!(lex.is_negation("shouldn't"));
        assert!(!lex.is_negation("love"));
    }

    #[test]
    fn test_boosters_are_not_negations() {
        for (word, _) in BUILTIN_BOOSTERS {
            assert!(!BUILTIN_NEGATIONS.contains(word), "{word} is also a negation");
        }
    }

    #[test]
    fn test_from_reader_parses_vader_format() {
        let text = "# comment\n\
                    $:\t-1.5\t0.80623\t[-1, -1, -1, -1, -3, -1, -3, -1, -2, -1]\n\
                    \n\
                    Splendid\t2.8\t0.6\t[3, 3, 2]\n";
        let lex = VaderLexicon::from_reader(text.as_bytes()).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.valence("splendid"), Some(2.8));
        assert_eq!(lex.valence("$:"), Some(-1.5));
        // Boosters survive a custom valence table
        assert!(lex.booster("very").is_some());
    }

    #[test]
    fn test_from_reader_rejects_bad_lines() {
        let err = VaderLexicon::from_reader("good\tnot-a-number\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::Malformed { line: 1, .. }));

        let err = VaderLexicon::from_reader("lonely-token\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::Malformed { line: 1, .. }));

        let err = VaderLexicon::from_reader("# only comments\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::Empty));
    }
}
