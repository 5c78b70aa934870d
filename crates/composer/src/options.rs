//! Fuzzy filtering and ranking of dropdown options.
//!
//! This module provides:
//! - Option and visibility-limit types
//! - Substring and subsequence match scoring
//! - Filtering with ranking, custom predicates and truncation
//! - Selection that rejects disabled options

mod filter;
mod option;
mod score;
mod selection;

// Re-export public types
pub use filter::{filter_options, FilterOutcome, OptionFilter};
pub use option::{DropdownOption, MaxVisible};
pub use score::{fuzzy_matches, match_score, EXACT_MATCH_SCORE, SUBSEQUENCE_BASE_SCORE};
pub use selection::{resolve_selection, select_option, Selection};
