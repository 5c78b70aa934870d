//! Selecting from filtered options.

use crate::error::{ComposerError, Result};

use super::option::DropdownOption;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'o, T> {
    /// A listed option was picked.
    Option(&'o T),
    /// Nothing was focused; the trimmed search text is used as-is.
    FreeText(String),
}

/// Picks the option at `index` of the visible list.
pub fn select_option<'o, T>(visible: &[&'o DropdownOption<T>], index: usize) -> Result<&'o T> {
    let option: &'o DropdownOption<T> = *visible.get(index).ok_or(ComposerError::OptionOutOfRange {
        index,
        len: visible.len(),
    })?;
    if option.disabled {
        return Err(ComposerError::OptionDisabled(index));
    }
    Ok(&option.value)
}

/// Resolves an Enter press: the focused option if any, otherwise the
/// search text when it is not blank.
pub fn resolve_selection<'o, T>(
    visible: &[&'o DropdownOption<T>],
    focused: Option<usize>,
    search: &str,
) -> Result<Selection<'o, T>> {
    if let Some(index) = focused {
        return select_option(visible, index).map(Selection::Option);
    }
    let trimmed = search.trim();
    if trimmed.is_empty() {
        return Err(ComposerError::EmptySelection);
    }
    Ok(Selection::FreeText(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{filter_options, MaxVisible};

    fn fixtures() -> Vec<DropdownOption<&'static str>> {
        vec![
            DropdownOption::new("square", "Square 1:1"),
            DropdownOption::new("wide", "Wide 16:9").disabled(),
            DropdownOption::new("tall", "Tall 9:16"),
        ]
    }

    #[test]
    fn selects_enabled_option() {
        let options = fixtures();
        let outcome = filter_options(&options, "", MaxVisible::Unlimited);
        assert_eq!(select_option(&outcome.visible, 2).expect("selectable"), &"tall");
    }

    #[test]
    fn rejects_disabled_option() {
        let options = fixtures();
        let outcome = filter_options(&options, "", MaxVisible::Unlimited);
        let err = select_option(&outcome.visible, 1).expect_err("disabled");
        assert!(matches!(err, ComposerError::OptionDisabled(1)));
    }

    #[test]
    fn rejects_out_of_range() {
        let options = fixtures();
        let outcome = filter_options(&options, "tall", MaxVisible::Unlimited);
        let err = select_option(&outcome.visible, 1).expect_err("out of range");
        assert!(matches!(err, ComposerError::OptionOutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn focused_option_wins_over_search_text() {
        let options = fixtures();
        let outcome = filter_options(&options, "wide", MaxVisible::Unlimited);
        let err = resolve_selection(&outcome.visible, Some(0), "wide").expect_err("disabled");
        assert!(matches!(err, ComposerError::OptionDisabled(0)));

        let outcome = filter_options(&options, "sq", MaxVisible::Unlimited);
        assert_eq!(
            resolve_selection(&outcome.visible, Some(0), "sq").expect("selected"),
            Selection::Option(&"square")
        );
    }

    #[test]
    fn unfocused_uses_trimmed_search_text() {
        let options = fixtures();
        let outcome = filter_options(&options, "  4:5  ", MaxVisible::Unlimited);
        assert_eq!(
            resolve_selection(&outcome.visible, None, "  4:5  ").expect("free text"),
            Selection::FreeText("4:5".to_string())
        );
    }

    #[test]
    fn blank_unfocused_selection_is_empty() {
        let options = fixtures();
        let outcome = filter_options(&options, "", MaxVisible::Unlimited);
        let err = resolve_selection(&outcome.visible, None, " ").expect_err("empty");
        assert!(matches!(err, ComposerError::EmptySelection));
    }
}
