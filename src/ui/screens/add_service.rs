//! New-listing form for providers.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::api::models::NewService;
use crate::session::SessionState;
use crate::ui::screens::form::{Form, TextField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddServiceScreen {
    pub form: Form,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for AddServiceScreen {
    fn default() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Service name"),
                TextField::new("Category"),
                TextField::new("Price"),
                TextField::new("Description"),
                TextField::new("Image URL"),
            ]),
            submitting: false,
            error: None,
        }
    }
}

impl AddServiceScreen {
    /// Validates the form and builds the POST body, stamped with the
    /// signed-in provider. An `Err` is the message to surface inline.
    pub fn build_submission(&self, session: &SessionState) -> Result<NewService, String> {
        let user = session
            .user
            .as_ref()
            .ok_or_else(|| "You must be signed in to add a service.".to_string())?;

        for label in ["Service name", "Category", "Price", "Description", "Image URL"] {
            if self.form.value(label).trim().is_empty() {
                return Err(format!("{label} is required."));
            }
        }
        let price: f64 = self
            .form
            .value("Price")
            .trim()
            .parse()
            .map_err(|_| "Price must be a number.".to_string())?;
        if price <= 0.0 {
            return Err("Price must be positive.".to_string());
        }

        Ok(NewService {
            service_name: self.form.value("Service name").trim().to_string(),
            category: self.form.value("Category").trim().to_string(),
            price,
            description: self.form.value("Description").trim().to_string(),
            image_url: self.form.value("Image URL").trim().to_string(),
            long_description: None,
            estimated_duration: None,
            customer_benefits: None,
            what_included: Vec::new(),
            provider_name: user.label(),
            email: user.email.clone(),
        })
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &AddServiceScreen) {
    let title = if screen.submitting {
        "Add a service  (saving…)".to_string()
    } else if let Some(error) = &screen.error {
        format!("Add a service  — {error}")
    } else {
        "Add a service  (Ctrl-S: save)".to_string()
    };
    screen.form.render(frame, area, &title);
}
