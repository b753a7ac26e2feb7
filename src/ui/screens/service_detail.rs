//! Single service detail with booking.

use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::models::Service;
use crate::api::{ApiClient, FetchError};
use crate::session::SessionState;
use crate::ui::screens::load::LoadState;
use crate::ui::theme;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailScreen {
    pub service_id: String,
    pub service: LoadState<Service>,
    /// None until the duplicate-booking check answers.
    pub already_booked: Option<bool>,
    pub booking_in_flight: bool,
}

impl DetailScreen {
    pub fn new(service_id: String) -> Self {
        Self {
            service_id,
            service: LoadState::Loading,
            already_booked: None,
            booking_in_flight: false,
        }
    }

    /// Whether the signed-in user owns this service.
    pub fn owned_by(&self, session: &SessionState) -> bool {
        match (self.service.ready(), session.email()) {
            (Some(service), Some(email)) => service.email == email,
            _ => false,
        }
    }
}

pub async fn load(api: Arc<ApiClient>, id: String) -> Result<Service, FetchError> {
    api.get_service(&id).await
}

pub fn render(frame: &mut Frame, area: Rect, screen: &DetailScreen, session: &SessionState) {
    match &screen.service {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(theme::dim()), area);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error: {message}")).style(theme::error()),
                area,
            );
        }
        LoadState::Ready(service) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);

            let mut lines = vec![
                Line::from(Span::styled(service.service_name.clone(), theme::accent())),
                Line::from(format!(
                    "{}  ·  {}",
                    service.category,
                    service.estimated_duration.as_deref().unwrap_or("duration unknown")
                )),
                Line::default(),
                Line::from(service.description.clone()),
            ];
            if let Some(long) = &service.long_description {
                lines.push(Line::default());
                lines.push(Line::from(long.clone()));
            }
            if !service.what_included.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled("What's included", theme::accent())));
                for item in &service.what_included {
                    lines.push(Line::from(format!("  ✓ {item}")));
                }
            }
            if let Some(benefits) = &service.customer_benefits {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(benefits.clone(), theme::dim())));
            }
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Overview")),
                cols[0],
            );

            let rating = service
                .average_rating()
                .map(|r| format!("{r:.1}/5 ({} reviews)", service.reviews.len()))
                .unwrap_or_else(|| "no reviews yet".to_string());
            let booking_hint = if screen.owned_by(session) {
                Span::styled("This is your service", theme::dim())
            } else if screen.already_booked == Some(true) {
                Span::styled("Already booked", theme::success())
            } else if screen.booking_in_flight {
                Span::styled("Booking…", theme::dim())
            } else {
                Span::styled("b: book now", theme::focused())
            };
            let card = vec![
                Line::from(format!(
                    "Provider: {}",
                    service.provider_name.as_deref().unwrap_or("unknown")
                )),
                Line::from(format!("Price: ৳{} / service", service.price)),
                Line::from(format!("Rating: {rating}")),
                Line::default(),
                Line::from(booking_hint),
            ];
            frame.render_widget(
                Paragraph::new(card)
                    .block(Block::default().borders(Borders::ALL).title("Booking")),
                cols[1],
            );
        }
    }
}
