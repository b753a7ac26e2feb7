//! Provider's own listings: edit and delete.

use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::api::models::{Service, ServiceUpdate};
use crate::api::{ApiClient, FetchError};
use crate::ui::screens::form::{Form, TextField};
use crate::ui::screens::load::LoadState;
use crate::ui::theme;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MyServicesScreen {
    pub services: LoadState<Vec<Service>>,
    pub selected: usize,
    /// Edit form for the service id it was opened on.
    pub editing: Option<(String, Form)>,
}

impl MyServicesScreen {
    pub fn selected_service(&self) -> Option<&Service> {
        self.services
            .ready()
            .and_then(|list| list.get(self.selected))
    }

    pub fn open_editor(&mut self) {
        let Some(service) = self.selected_service() else {
            return;
        };
        let form = Form::new(vec![
            TextField::with_value("Service name", &service.service_name),
            TextField::with_value("Category", &service.category),
            TextField::with_value("Price", service.price.to_string()),
            TextField::with_value("Description", &service.description),
            TextField::with_value(
                "Image URL",
                service.image_url.clone().unwrap_or_default(),
            ),
        ]);
        self.editing = Some((service.id.clone(), form));
    }

    /// Builds the PATCH body from the edit form. `None` when the price
    /// doesn't parse.
    pub fn editor_update(&self, acting_email: &str) -> Option<(String, ServiceUpdate)> {
        let (id, form) = self.editing.as_ref()?;
        let price: f64 = form.value("Price").trim().parse().ok()?;
        Some((
            id.clone(),
            ServiceUpdate {
                service_name: Some(form.value("Service name").to_string()),
                category: Some(form.value("Category").to_string()),
                price: Some(price),
                description: Some(form.value("Description").to_string()),
                image_url: Some(form.value("Image URL").to_string()),
                email: acting_email.to_string(),
            },
        ))
    }

    pub fn remove_service(&mut self, id: &str) {
        if let Some(list) = self.services.ready_mut() {
            list.retain(|s| s.id != id);
            if self.selected >= list.len() {
                self.selected = list.len().saturating_sub(1);
            }
        }
    }
}

pub async fn load(api: Arc<ApiClient>, email: String) -> Result<Vec<Service>, FetchError> {
    api.provider_services(&email).await
}

pub fn render(frame: &mut Frame, area: Rect, screen: &MyServicesScreen) {
    let (table_area, editor_area) = if screen.editing.is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(7)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    match &screen.services {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(theme::dim()), table_area);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error: {message}")).style(theme::error()),
                table_area,
            );
        }
        LoadState::Ready(list) if list.is_empty() => {
            frame.render_widget(
                Paragraph::new("No services found.").style(theme::dim()),
                table_area,
            );
        }
        LoadState::Ready(list) => {
            let rows: Vec<Row> = list
                .iter()
                .map(|s| {
                    Row::new(vec![
                        s.service_name.clone(),
                        s.category.clone(),
                        format!("৳{}", s.price),
                        format!("{} reviews", s.reviews.len()),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(40),
                    Constraint::Percentage(25),
                    Constraint::Length(10),
                    Constraint::Length(12),
                ],
            )
            .header(Row::new(vec!["Service", "Category", "Price", "Reviews"]).style(theme::accent()))
            .row_highlight_style(theme::selected_row())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("My services  (e: edit  d: delete)"),
            );
            let mut state = TableState::default();
            state.select(Some(screen.selected));
            frame.render_stateful_widget(table, table_area, &mut state);
        }
    }

    if let (Some((_, form)), Some(area)) = (&screen.editing, editor_area) {
        form.render(frame, area, "Edit service  (Ctrl-S: save  Esc: cancel)");
    }
}
