// Membrane count entry
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please enter a valid number.")]
    NotANumber,
    #[error("Please enter a number greater than 0.")]
    NonPositive,
    #[error("Please enter a number no greater than {max}.")]
    TooMany { max: usize },
}

/// Holds the pending count text until it is submitted.
///
/// Any positive count is accepted unless `max_units` caps it.
#[derive(Debug, Clone)]
pub struct UnitCountSelector {
    pending: String,
    max_units: Option<usize>,
}

impl UnitCountSelector {
    pub fn new(max_units: Option<usize>) -> Self {
        Self {
            pending: String::new(),
            max_units,
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Replaces the pending text with the field's new contents.
    ///
    /// Only empty or all-digit text is kept; anything else leaves the
    /// previous pending text in place.
    pub fn input(&mut self, raw: &str) -> Result<(), SelectionError> {
        if raw.chars().all(|c| c.is_ascii_digit()) {
            self.pending = raw.to_string();
            Ok(())
        } else {
            Err(SelectionError::NotANumber)
        }
    }

    /// Parses the pending text into the unit count and clears it on success.
    pub fn submit(&mut self) -> Result<NonZeroUsize, SelectionError> {
        let count = parse_count(&self.pending, self.max_units)?;
        self.pending.clear();
        Ok(count)
    }

    /// Field contents and submit in one step
    pub fn select_count(&mut self, raw: &str) -> Result<NonZeroUsize, SelectionError> {
        self.input(raw)?;
        self.submit()
    }
}

fn parse_count(pending: &str, max_units: Option<usize>) -> Result<NonZeroUsize, SelectionError> {
    let digits = pending.trim_start_matches('0');
    if digits.is_empty() {
        return Err(SelectionError::NonPositive);
    }

    let max = max_units.unwrap_or(usize::MAX);
    let too_many = SelectionError::TooMany { max };
    let count: usize = digits.parse().map_err(|_| too_many.clone())?;
    if count > max {
        return Err(too_many);
    }

    NonZeroUsize::new(count).ok_or(SelectionError::NonPositive)
}
