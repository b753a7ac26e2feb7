//! Account creation.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::ui::screens::form::{Form, TextField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterScreen {
    pub form: Form,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self {
            form: Form::new(vec![TextField::new("Email"), TextField::masked("Password")]),
            submitting: false,
            error: None,
        }
    }
}

impl RegisterScreen {
    /// Client-side validation; `Err` is the inline message.
    pub fn credentials(&self) -> Result<(String, String), String> {
        let email = self.form.value("Email").trim();
        let password = self.form.value("Password");
        if !email.contains('@') {
            return Err("Enter a valid email address.".to_string());
        }
        if password.len() < 6 {
            return Err("Password must be at least 6 characters.".to_string());
        }
        Ok((email.to_string(), password.to_string()))
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &RegisterScreen) {
    let title = if screen.submitting {
        "Create account  (registering…)".to_string()
    } else if let Some(error) = &screen.error {
        format!("Create account  — {error}")
    } else {
        "Create account  (Enter: submit)".to_string()
    };
    screen.form.render(frame, area, &title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_email_and_password_length() {
        let mut screen = RegisterScreen::default();
        screen.form.fields[0].value = "not-an-email".to_string();
        screen.form.fields[1].value = "secret1".to_string();
        assert!(screen.credentials().is_err());

        screen.form.fields[0].value = "a@x.com".to_string();
        screen.form.fields[1].value = "short".to_string();
        assert!(screen.credentials().is_err());

        screen.form.fields[1].value = "secret1".to_string();
        assert!(screen.credentials().is_ok());
    }
}
