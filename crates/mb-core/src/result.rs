//! Mood result — the derived outcome of a finished spin

use serde::{Deserialize, Serialize};

use crate::catalog::Selections;
use crate::commentary;
use crate::language::Language;

/// Lowest compatibility score
pub const MIN_SCORE: u8 = 80;
/// Highest compatibility score
pub const MAX_SCORE: u8 = 99;
/// Number of distinct scores
pub const SCORE_SPAN: usize = (MAX_SCORE - MIN_SCORE) as usize + 1;

/// Outcome of one finished spin. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodResult {
    pub selections: Selections,
    /// Compatibility score in `MIN_SCORE..=MAX_SCORE`
    pub score: u8,
    pub commentary: String,
    /// Language the commentary was resolved in
    pub language: Language,
}

impl MoodResult {
    /// Derive a result. `score_offset` is taken modulo the score span.
    pub fn derive(selections: Selections, score_offset: usize, language: Language) -> Self {
        let score = MIN_SCORE + (score_offset % SCORE_SPAN) as u8;
        let commentary = commentary::resolve(selections.ids(), language).to_string();
        Self {
            selections,
            score,
            commentary,
            language,
        }
    }

    /// Localized names in reel order
    pub fn display_names(&self) -> [&str; 4] {
        self.selections.display_names(self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_score_bounds() {
        let catalog = Catalog::builtin().unwrap();
        let selections = catalog.select([0, 0, 0, 0]).unwrap();
        for offset in 0..100 {
            let result = MoodResult::derive(selections.clone(), offset, Language::En);
            assert!((MIN_SCORE..=MAX_SCORE).contains(&result.score));
        }
        assert_eq!(MoodResult::derive(selections.clone(), 0, Language::En).score, 80);
        assert_eq!(MoodResult::derive(selections, 19, Language::En).score, 99);
    }

    #[test]
    fn test_commentary_lookup() {
        let catalog = Catalog::builtin().unwrap();
        let selections = catalog.select([3, 0, 3, 2]).unwrap();
        let result = MoodResult::derive(selections, 5, Language::Kr);
        assert_eq!(
            result.commentary,
            commentary::resolve(["tea_4", "act_1", "perf_4", "flow_3"], Language::Kr)
        );
        assert_eq!(result.display_names()[0], "페퍼민트");
    }
}
