//! Key bindings.

use crossterm::event::KeyCode;

use super::Action;
use crate::domain::StepDefinition;
use crate::wizard::Phase;

pub(crate) fn home_action(code: KeyCode) -> Action {
    match code {
        KeyCode::Enter | KeyCode::Char('s') => Action::Start,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

pub(crate) fn wizard_action(phase: Phase, step: Option<&StepDefinition>, code: KeyCode) -> Action {
    match phase {
        Phase::Answering(_) => match code {
            KeyCode::Enter => Action::Next,
            KeyCode::Esc => Action::Back,
            KeyCode::Backspace => Action::Erase,
            KeyCode::Tab if step.is_some_and(|s| !s.options().is_empty()) => Action::CycleOption,
            KeyCode::Char(c) if accepts_char(step, c) => Action::Type(c),
            _ => Action::None,
        },
        Phase::Review => match code {
            KeyCode::Enter | KeyCode::Char('s') => Action::Submit,
            KeyCode::Esc | KeyCode::Char('b') => Action::Back,
            _ => Action::None,
        },
        Phase::Result => match code {
            KeyCode::Enter | KeyCode::Char('h') => Action::Home,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        },
    }
}

/// Numeric steps only take characters that can appear in a number.
fn accepts_char(step: Option<&StepDefinition>, c: char) -> bool {
    match step {
        Some(s) if s.is_numeric() => c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'),
        Some(_) => !c.is_control(),
        None => false,
    }
}

/// The option after the one currently typed (first option if none matches).
pub(crate) fn next_option(options: &[&'static str], current: &str) -> Option<&'static str> {
    if options.is_empty() {
        return None;
    }
    let current = current.trim();
    let next = options
        .iter()
        .position(|o| o.eq_ignore_ascii_case(current))
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    Some(options[next])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;

    #[test]
    fn numeric_steps_filter_letters() {
        let step = Field::LoanAmount.step();
        let phase = Phase::Answering(4);
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Char('7')), Action::Type('7'));
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Char('-')), Action::Type('-'));
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Char('x')), Action::None);
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Tab), Action::None);
    }

    #[test]
    fn choice_steps_take_text_and_tab() {
        let step = Field::Education.step();
        let phase = Phase::Answering(1);
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Char(' ')), Action::Type(' '));
        assert_eq!(wizard_action(phase, Some(step), KeyCode::Tab), Action::CycleOption);
    }

    #[test]
    fn review_and_result_bindings() {
        assert_eq!(wizard_action(Phase::Review, None, KeyCode::Enter), Action::Submit);
        assert_eq!(wizard_action(Phase::Review, None, KeyCode::Esc), Action::Back);
        assert_eq!(wizard_action(Phase::Result, None, KeyCode::Enter), Action::Home);
        assert_eq!(home_action(KeyCode::Enter), Action::Start);
        assert_eq!(home_action(KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn next_option_wraps() {
        let opts = ["yes", "no"];
        assert_eq!(next_option(&opts, ""), Some("yes"));
        assert_eq!(next_option(&opts, "YES"), Some("no"));
        assert_eq!(next_option(&opts, "no"), Some("yes"));
        assert_eq!(next_option(&[], "no"), None);
    }
}
