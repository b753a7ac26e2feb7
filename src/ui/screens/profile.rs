//! Signed-in user's profile: merged identity view plus an edit form.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::api::models::ProfileUpdate;
use crate::session::{NormalizedUser, SessionState};
use crate::ui::screens::form::{Form, TextField};
use crate::ui::theme;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileScreen {
    pub form: Form,
    pub saving: bool,
    pub error: Option<String>,
}

impl ProfileScreen {
    /// Prefills the edit form from the current user.
    pub fn for_user(user: &NormalizedUser) -> Self {
        Self {
            form: Form::new(vec![
                TextField::with_value("Display name", user.display_name.clone().unwrap_or_default()),
                TextField::with_value("Avatar URL", user.avatar_url.clone().unwrap_or_default()),
            ]),
            saving: false,
            error: None,
        }
    }

    pub fn submission(&self) -> ProfileUpdate {
        let name = self.form.value("Display name").trim();
        let avatar = self.form.value("Avatar URL").trim();
        ProfileUpdate {
            name: (!name.is_empty()).then(|| name.to_string()),
            photo_url: (!avatar.is_empty()).then(|| avatar.to_string()),
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &ProfileScreen, session: &SessionState) {
    let Some(user) = &session.user else {
        frame.render_widget(Paragraph::new("Not signed in.").style(theme::dim()), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(user.label(), theme::accent()),
            Span::styled(format!("  <{}>", user.email), theme::dim()),
        ]),
        Line::from(format!(
            "Last login: {}",
            user.last_login_at.as_deref().unwrap_or("unknown")
        )),
    ];
    if let Some(avatar) = &user.avatar_url {
        lines.push(Line::from(format!("Avatar: {avatar}")));
    }
    for (key, value) in &user.extra {
        lines.push(Line::from(Span::styled(
            format!("{key}: {value}"),
            theme::dim(),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Profile")),
        rows[0],
    );

    let title = if screen.saving {
        "Edit profile  (saving…)".to_string()
    } else if let Some(error) = &screen.error {
        format!("Edit profile  — {error}")
    } else {
        "Edit profile  (Ctrl-S: save)".to_string()
    };
    screen.form.render(frame, rows[1], &title);
}
