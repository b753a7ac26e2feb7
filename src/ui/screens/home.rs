//! Landing screen: featured services plus customer testimonials.
//!
//! Both collections load concurrently; if either read exhausts its retries
//! the whole screen shows the error, never a partial render.

use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::models::{Service, ServiceFilter, Testimonial};
use crate::api::{ApiClient, FetchError};
use crate::ui::screens::load::LoadState;
use crate::ui::theme;

#[derive(Debug, Clone, PartialEq)]
pub struct HomeData {
    pub services: Vec<Service>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeScreen {
    pub data: LoadState<HomeData>,
}

pub async fn load(api: Arc<ApiClient>) -> Result<HomeData, FetchError> {
    let (services, testimonials) = tokio::try_join!(
        api.list_services(ServiceFilter::default()),
        api.testimonials()
    )?;
    Ok(HomeData {
        services,
        testimonials,
    })
}

pub fn render(frame: &mut Frame, area: Rect, screen: &HomeScreen) {
    match &screen.data {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(theme::dim()), area);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error: {message}")).style(theme::error()),
                area,
            );
        }
        LoadState::Ready(data) => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);

            let items: Vec<ListItem> = data
                .services
                .iter()
                .take(6)
                .map(|s| {
                    ListItem::new(Line::from(vec![
                        Span::styled(s.service_name.clone(), theme::accent()),
                        Span::raw(format!("  ৳{}  {}", s.price, s.category)),
                    ]))
                })
                .collect();
            frame.render_widget(
                List::new(items).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Featured services"),
                ),
                halves[0],
            );

            let quotes: Vec<Line> = data
                .testimonials
                .iter()
                .flat_map(|t: &Testimonial| {
                    vec![
                        Line::from(Span::styled(format!("“{}”", t.message), theme::dim())),
                        Line::from(Span::raw(format!(
                            "  — {}{}",
                            t.name,
                            t.rating.map(|r| format!(" ({r}/5)")).unwrap_or_default()
                        ))),
                    ]
                })
                .collect();
            frame.render_widget(
                Paragraph::new(quotes)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Testimonials")),
                halves[1],
            );
        }
    }
}
