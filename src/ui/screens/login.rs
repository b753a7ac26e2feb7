//! Email/password sign-in, plus the federated shortcut.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ui::screens::form::{Form, TextField};
use crate::ui::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginScreen {
    pub form: Form,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self {
            form: Form::new(vec![TextField::new("Email"), TextField::masked("Password")]),
            submitting: false,
            error: None,
        }
    }
}

impl LoginScreen {
    pub fn credentials(&self) -> Option<(String, String)> {
        let email = self.form.value("Email").trim();
        let password = self.form.value("Password");
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some((email.to_string(), password.to_string()))
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &LoginScreen) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3)])
        .split(area);

    let title = if screen.submitting {
        "Sign in  (signing in…)".to_string()
    } else if let Some(error) = &screen.error {
        format!("Sign in  — {error}")
    } else {
        "Sign in  (Enter: submit)".to_string()
    };
    screen.form.render(frame, rows[0], &title);

    let hints = vec![
        Line::from(Span::styled("Ctrl-F: continue with federated sign-in", theme::dim())),
        Line::from(Span::styled("F8: create an account instead", theme::dim())),
    ];
    frame.render_widget(Paragraph::new(hints), rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_fields() {
        let mut screen = LoginScreen::default();
        assert!(screen.credentials().is_none());
        screen.form.fields[0].value = "a@x.com".to_string();
        assert!(screen.credentials().is_none());
        screen.form.fields[1].value = "hunter2".to_string();
        assert_eq!(
            screen.credentials(),
            Some(("a@x.com".to_string(), "hunter2".to_string()))
        );
    }
}
