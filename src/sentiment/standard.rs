use vader_sentiment::SentimentIntensityAnalyzer;

use super::SentimentScorer;

/// Compound score from the reference VADER implementation and its full
/// `vader_lexicon.txt` (about 7,500 entries, emoji included).
pub struct StandardVaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl StandardVaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for StandardVaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for StandardVaderScorer {
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_tag_words_are_scored() {
        let scorer = StandardVaderScorer::new();
        for word in ["comedy", "party", "beauty", "fun"] {
            assert!(scorer.score(word) > 0.0, "{word} scored neutral");
        }
        assert!(scorer.score("comedy party beauty") > scorer.score("comedy"));
    }

    #[test]
    fn test_polarity_direction_and_range() {
        let scorer = StandardVaderScorer::new();
        assert!(scorer.score("hate war") < 0.0);
        assert!(scorer.score("not good") < 0.0);
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("1080p 2020"), 0.0);
        for text in ["love love love love love love", "kill murder death war hate"] {
            assert!((-1.0..=1.0).contains(&scorer.score(text)));
        }
    }
}
