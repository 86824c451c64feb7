//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Report,
    Help,
}

/// The selection dimension a key cycles.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FilterField {
    Year,
    Month,
    Day,
    Owner,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Year => "Year",
            FilterField::Month => "Month",
            FilterField::Day => "Day",
            FilterField::Owner => "Owner",
        }
    }
}

/// Step to the next (or previous) choice, wrapping at either end.
/// An unknown current value restarts from the first choice.
pub fn cycle<T: PartialEq + Clone>(choices: &[T], current: &T, forward: bool) -> Option<T> {
    if choices.is_empty() {
        return None;
    }
    let next = match choices.iter().position(|c| c == current) {
        Some(i) if forward => (i + 1) % choices.len(),
        Some(i) => (i + choices.len() - 1) % choices.len(),
        None => 0,
    };
    Some(choices[next].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let choices = [1, 2, 3];
        assert_eq!(cycle(&choices, &1, true), Some(2));
        assert_eq!(cycle(&choices, &3, true), Some(1));
        assert_eq!(cycle(&choices, &1, false), Some(3));
        assert_eq!(cycle(&choices, &9, true), Some(1));
        assert_eq!(cycle::<i32>(&[], &1, true), None);
    }
}
