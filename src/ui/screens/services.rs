//! Services listing with a min/max price filter.

use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::api::models::{Service, ServiceFilter};
use crate::api::{ApiClient, FetchError};
use crate::session::SessionState;
use crate::ui::mvi::{Intent, Reducer, UiState};
use crate::ui::screens::load::LoadState;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServicesFocus {
    #[default]
    List,
    MinPrice,
    MaxPrice,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicesState {
    pub list: LoadState<Vec<Service>>,
    pub selected: usize,
    pub min_price: String,
    pub max_price: String,
    pub focus: ServicesFocus,
}

impl UiState for ServicesState {}

impl ServicesState {
    /// Filter as currently typed; non-numeric input is ignored the way an
    /// empty field is.
    pub fn filter(&self) -> ServiceFilter {
        ServiceFilter {
            min_price: self.min_price.parse().ok(),
            max_price: self.max_price.parse().ok(),
        }
    }

    pub fn selected_service(&self) -> Option<&Service> {
        self.list.ready().and_then(|list| list.get(self.selected))
    }
}

#[derive(Debug)]
pub enum ServicesIntent {
    Loaded(Result<Vec<Service>, FetchError>),
    /// A reload was kicked off; the list goes back to Loading.
    Reloading,
    SelectNext,
    SelectPrev,
    FocusFilter,
    FocusList,
    SwitchFilterField,
    FilterChar(char),
    FilterBackspace,
    ResetFilter,
}

impl Intent for ServicesIntent {}

pub struct ServicesReducer;

impl Reducer for ServicesReducer {
    type State = ServicesState;
    type Intent = ServicesIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ServicesIntent::Loaded(result) => {
                state.list = LoadState::from_result(result);
                state.selected = 0;
                state
            }
            ServicesIntent::Reloading => {
                state.list = LoadState::Loading;
                state.selected = 0;
                state
            }
            ServicesIntent::SelectNext => {
                let len = state.list.ready().map_or(0, Vec::len);
                if len > 0 {
                    state.selected = (state.selected + 1).min(len - 1);
                }
                state
            }
            ServicesIntent::SelectPrev => {
                state.selected = state.selected.saturating_sub(1);
                state
            }
            ServicesIntent::FocusFilter => {
                state.focus = ServicesFocus::MinPrice;
                state
            }
            ServicesIntent::FocusList => {
                state.focus = ServicesFocus::List;
                state
            }
            ServicesIntent::SwitchFilterField => {
                state.focus = match state.focus {
                    ServicesFocus::MinPrice => ServicesFocus::MaxPrice,
                    _ => ServicesFocus::MinPrice,
                };
                state
            }
            ServicesIntent::FilterChar(c) => {
                if c.is_ascii_digit() || c == '.' {
                    match state.focus {
                        ServicesFocus::MinPrice => state.min_price.push(c),
                        ServicesFocus::MaxPrice => state.max_price.push(c),
                        ServicesFocus::List => {}
                    }
                }
                state
            }
            ServicesIntent::FilterBackspace => {
                match state.focus {
                    ServicesFocus::MinPrice => {
                        state.min_price.pop();
                    }
                    ServicesFocus::MaxPrice => {
                        state.max_price.pop();
                    }
                    ServicesFocus::List => {}
                }
                state
            }
            ServicesIntent::ResetFilter => {
                state.min_price.clear();
                state.max_price.clear();
                state.focus = ServicesFocus::List;
                state
            }
        }
    }
}

pub async fn load(api: Arc<ApiClient>, filter: ServiceFilter) -> Result<Vec<Service>, FetchError> {
    api.list_services(filter).await
}

pub fn render(frame: &mut Frame, area: Rect, state: &ServicesState, session: &SessionState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let filter_style = |focus| {
        if state.focus == focus {
            theme::focused()
        } else {
            theme::dim()
        }
    };
    let filter_line = Line::from(vec![
        Span::raw("Filter  min ৳ "),
        Span::styled(
            format!("[{:<6}]", state.min_price),
            filter_style(ServicesFocus::MinPrice),
        ),
        Span::raw("  max ৳ "),
        Span::styled(
            format!("[{:<6}]", state.max_price),
            filter_style(ServicesFocus::MaxPrice),
        ),
        Span::styled("   f: filter  r: reset", theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(filter_line), rows[0]);

    match &state.list {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading…").style(theme::dim()), rows[1]);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error: {message}")).style(theme::error()),
                rows[1],
            );
        }
        LoadState::Ready(services) if services.is_empty() => {
            frame.render_widget(
                Paragraph::new("No services available.").style(theme::dim()),
                rows[1],
            );
        }
        LoadState::Ready(services) => {
            let items: Vec<ListItem> = services
                .iter()
                .map(|s| {
                    let own = session.email() == Some(s.email.as_str());
                    let tag = if own { "  [your service]" } else { "" };
                    ListItem::new(Line::from(vec![
                        Span::styled(s.service_name.clone(), theme::accent()),
                        Span::raw(format!("  ৳{}  {}", s.price, s.category)),
                        Span::styled(tag, theme::dim()),
                    ]))
                })
                .collect();
            let mut list_state = ListState::default();
            list_state.select(Some(state.selected));
            frame.render_stateful_widget(
                List::new(items)
                    .highlight_style(theme::selected_row())
                    .block(Block::default().borders(Borders::ALL).title("Our services")),
                rows[1],
                &mut list_state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str) -> Service {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "serviceName": format!("svc-{id}"),
            "category": "Plumbing",
            "price": 100,
            "description": "d",
            "email": "pro@x.com",
        }))
        .unwrap()
    }

    #[test]
    fn selection_clamps_to_list() {
        let mut state = ServicesReducer::reduce(
            ServicesState::default(),
            ServicesIntent::Loaded(Ok(vec![service("a"), service("b")])),
        );
        state = ServicesReducer::reduce(state, ServicesIntent::SelectNext);
        state = ServicesReducer::reduce(state, ServicesIntent::SelectNext);
        assert_eq!(state.selected, 1);
        state = ServicesReducer::reduce(state, ServicesIntent::SelectPrev);
        state = ServicesReducer::reduce(state, ServicesIntent::SelectPrev);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn filter_accepts_digits_only() {
        let mut state = ServicesReducer::reduce(ServicesState::default(), ServicesIntent::FocusFilter);
        for c in ['1', '5', 'x', '0'] {
            state = ServicesReducer::reduce(state, ServicesIntent::FilterChar(c));
        }
        assert_eq!(state.min_price, "150");
        assert_eq!(state.filter().min_price, Some(150.0));
        assert_eq!(state.filter().max_price, None);
    }

    #[test]
    fn reset_clears_both_bounds_and_refocuses_list() {
        let mut state = ServicesReducer::reduce(ServicesState::default(), ServicesIntent::FocusFilter);
        state = ServicesReducer::reduce(state, ServicesIntent::FilterChar('9'));
        state = ServicesReducer::reduce(state, ServicesIntent::SwitchFilterField);
        state = ServicesReducer::reduce(state, ServicesIntent::FilterChar('5'));
        state = ServicesReducer::reduce(state, ServicesIntent::ResetFilter);
        assert_eq!(state.min_price, "");
        assert_eq!(state.max_price, "");
        assert_eq!(state.focus, ServicesFocus::List);
    }

    #[test]
    fn failed_load_becomes_inline_error() {
        let state = ServicesReducer::reduce(
            ServicesState::default(),
            ServicesIntent::Loaded(Err(crate::api::FetchError::ExhaustedRetries {
                attempts: 4,
                last: crate::api::ApiError::Status {
                    status: 503,
                    message: "down".to_string(),
                },
            })),
        );
        assert!(matches!(state.list, LoadState::Failed(_)));
    }
}
