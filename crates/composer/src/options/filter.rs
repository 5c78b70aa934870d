//! Option filtering, ranking and truncation.

use std::fmt;

use crate::config::OptionsConfig;

use super::option::{DropdownOption, MaxVisible};
use super::score::match_score;

type FilterPredicate<'a, T> = Box<dyn Fn(&DropdownOption<T>, &str) -> bool + Send + Sync + 'a>;

/// Filtered options, ranked and truncated.
#[derive(Debug)]
pub struct FilterOutcome<'o, T> {
    pub visible: Vec<&'o DropdownOption<T>>,
    /// Matches before truncation.
    pub total_matches: usize,
    pub truncated: bool,
}

/// Filter settings for a dropdown.
///
/// Without a predicate, options are matched by substring or subsequence
/// on their label and ranked by [`match_score`]. A custom predicate
/// replaces both: matching options keep their input order.
pub struct OptionFilter<'a, T> {
    predicate: Option<FilterPredicate<'a, T>>,
    max_visible: MaxVisible,
}

impl<T> Default for OptionFilter<'_, T> {
    fn default() -> Self {
        Self {
            predicate: None,
            max_visible: MaxVisible::Unlimited,
        }
    }
}

impl<T> fmt::Debug for OptionFilter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionFilter")
            .field("custom_predicate", &self.predicate.is_some())
            .field("max_visible", &self.max_visible)
            .finish()
    }
}

impl<'a, T> OptionFilter<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &OptionsConfig) -> Self {
        Self::new().with_max_visible(config.max_visible_items)
    }

    pub fn with_max_visible(mut self, max_visible: MaxVisible) -> Self {
        self.max_visible = max_visible;
        self
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&DropdownOption<T>, &str) -> bool + Send + Sync + 'a,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn filter<'o>(
        &self,
        options: &'o [DropdownOption<T>],
        search: &str,
    ) -> FilterOutcome<'o, T> {
        let matches = if search.trim().is_empty() {
            options.iter().collect::<Vec<_>>()
        } else if let Some(predicate) = &self.predicate {
            options
                .iter()
                .filter(|option| predicate(*option, search))
                .collect()
        } else {
            rank_by_score(options, search)
        };

        let total_matches = matches.len();
        let mut visible = matches;
        self.max_visible.apply(&mut visible);
        let truncated = visible.len() < total_matches;

        tracing::trace!(
            options = options.len(),
            total_matches,
            visible = visible.len(),
            "filtered dropdown options"
        );
        FilterOutcome {
            visible,
            total_matches,
            truncated,
        }
    }
}

fn rank_by_score<'o, T>(options: &'o [DropdownOption<T>], search: &str) -> Vec<&'o DropdownOption<T>> {
    let mut scored = options
        .iter()
        .filter_map(|option| match_score(&option.label, search).map(|score| (score, option)))
        .collect::<Vec<_>>();
    // Stable: equal scores keep input order.
    scored.sort_by_key(|(score, _)| *score);
    scored.into_iter().map(|(_, option)| option).collect()
}

/// Filters with the built-in matcher and ranking.
pub fn filter_options<'o, T>(
    options: &'o [DropdownOption<T>],
    search: &str,
    max_visible: MaxVisible,
) -> FilterOutcome<'o, T> {
    OptionFilter::new()
        .with_max_visible(max_visible)
        .filter(options, search)
}
