//! The customer's bookings: cancel and review.

use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::api::{ApiClient, FetchError};
use crate::api::models::Booking;
use crate::ui::screens::load::LoadState;
use crate::ui::theme;

/// A booking enriched with the booked service's mean review rating.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub booking: Booking,
    pub avg_rating: Option<f64>,
}

/// Inline review entry for the selected booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub service_id: String,
    pub rating: String,
    pub comment: String,
    /// 0 = rating, 1 = comment.
    pub focused: usize,
}

impl ReviewDraft {
    pub fn new(service_id: String) -> Self {
        Self {
            service_id,
            rating: String::new(),
            comment: String::new(),
            focused: 0,
        }
    }

    /// Rating must be an integer 1..=5.
    pub fn parsed_rating(&self) -> Option<u8> {
        self.rating.parse::<u8>().ok().filter(|r| (1..=5).contains(r))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingsScreen {
    pub rows: LoadState<Vec<BookingRow>>,
    pub selected: usize,
    pub review: Option<ReviewDraft>,
}

impl BookingsScreen {
    pub fn selected_row(&self) -> Option<&BookingRow> {
        self.rows.ready().and_then(|rows| rows.get(self.selected))
    }

    pub fn remove_booking(&mut self, id: &str) {
        if let Some(rows) = self.rows.ready_mut() {
            rows.retain(|r| r.booking.id != id);
            if self.selected >= rows.len() {
                self.selected = rows.len().saturating_sub(1);
            }
        }
    }

    /// Mirrors the freshly submitted rating onto the row without refetching.
    pub fn apply_review(&mut self, service_id: &str, rating: u8) {
        if let Some(rows) = self.rows.ready_mut() {
            for row in rows.iter_mut() {
                if row.booking.service_id == service_id {
                    row.avg_rating = Some(f64::from(rating));
                }
            }
        }
    }
}

/// Loads bookings, then enriches each row with the service's average
/// rating. A failed enrichment degrades that row to "no rating" instead of
/// failing the screen.
pub async fn load(api: Arc<ApiClient>, email: String) -> Result<Vec<BookingRow>, FetchError> {
    let bookings = api.bookings(&email).await?;
    let mut rows = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let avg_rating = match api.get_service(&booking.service_id).await {
            Ok(service) => service.average_rating(),
            Err(err) => {
                tracing::debug!(
                    service_id = %booking.service_id,
                    error = %err,
                    "rating enrichment failed"
                );
                None
            }
        };
        rows.push(BookingRow {
            booking,
            avg_rating,
        });
    }
    Ok(rows)
}

pub fn render(frame: &mut Frame, area: Rect, screen: &BookingsScreen) {
    let (table_area, review_area) = if screen.review.is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(5)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    match &screen.rows {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(theme::dim()), table_area);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error: {message}")).style(theme::error()),
                table_area,
            );
        }
        LoadState::Ready(rows) if rows.is_empty() => {
            frame.render_widget(
                Paragraph::new("No bookings found.").style(theme::dim()),
                table_area,
            );
        }
        LoadState::Ready(rows) => {
            let table_rows: Vec<Row> = rows
                .iter()
                .map(|r| {
                    Row::new(vec![
                        r.booking.service_name.clone(),
                        r.booking.provider_name.clone().unwrap_or_default(),
                        format!("৳{}", r.booking.price),
                        r.booking.booking_date.clone().unwrap_or_default(),
                        r.avg_rating
                            .map(|a| format!("★ {a:.1}"))
                            .unwrap_or_else(|| "no rating".to_string()),
                    ])
                })
                .collect();
            let table = Table::new(
                table_rows,
                [
                    Constraint::Percentage(30),
                    Constraint::Percentage(25),
                    Constraint::Length(10),
                    Constraint::Length(12),
                    Constraint::Length(10),
                ],
            )
            .header(
                Row::new(vec!["Service", "Provider", "Price", "Date", "Rating"])
                    .style(theme::accent()),
            )
            .row_highlight_style(theme::selected_row())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("My bookings  (c: cancel  r: review)"),
            );
            let mut state = TableState::default();
            state.select(Some(screen.selected));
            frame.render_stateful_widget(table, table_area, &mut state);
        }
    }

    if let (Some(draft), Some(area)) = (&screen.review, review_area) {
        let style = |idx| {
            if draft.focused == idx {
                theme::focused()
            } else {
                Style::default()
            }
        };
        let lines = vec![
            Line::from(vec![
                Span::raw("Rating (1-5): "),
                Span::styled(format!("[{}]", draft.rating), style(0)),
            ]),
            Line::from(vec![
                Span::raw("Comment:      "),
                Span::styled(draft.comment.clone(), style(1)),
            ]),
            Line::from(Span::styled("Enter: submit  Esc: cancel", theme::dim())),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Submit your rating"),
            ),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str, service_id: &str) -> Booking {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "serviceId": service_id,
            "serviceName": "svc",
            "price": 100,
            "userEmail": "a@x.com",
        }))
        .unwrap()
    }

    #[test]
    fn review_rating_validation() {
        let mut draft = ReviewDraft::new("s1".to_string());
        assert_eq!(draft.parsed_rating(), None);
        draft.rating = "5".to_string();
        assert_eq!(draft.parsed_rating(), Some(5));
        draft.rating = "6".to_string();
        assert_eq!(draft.parsed_rating(), None);
        draft.rating = "0".to_string();
        assert_eq!(draft.parsed_rating(), None);
    }

    #[test]
    fn cancel_removes_only_that_row() {
        let mut screen = BookingsScreen {
            rows: LoadState::Ready(vec![
                BookingRow {
                    booking: booking("b1", "s1"),
                    avg_rating: None,
                },
                BookingRow {
                    booking: booking("b2", "s2"),
                    avg_rating: None,
                },
            ]),
            selected: 1,
            review: None,
        };
        screen.remove_booking("b2");
        let rows = screen.rows.ready().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking.id, "b1");
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn submitted_review_updates_rating_locally() {
        let mut screen = BookingsScreen {
            rows: LoadState::Ready(vec![BookingRow {
                booking: booking("b1", "s1"),
                avg_rating: None,
            }]),
            selected: 0,
            review: None,
        };
        screen.apply_review("s1", 4);
        assert_eq!(screen.rows.ready().unwrap()[0].avg_rating, Some(4.0));
    }
}
