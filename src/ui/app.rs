//! Application loop: routing, gating, key handling and rendering.

use std::io::Stdout;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::api::models::{NewBooking, Review, ServiceFilter};
use crate::api::ApiClient;
use crate::session::{SessionState, SessionStore};
use crate::ui::events::{ActionOutcome, AppEvent, EventHandler, LoadedData};
use crate::ui::gate::{self, GateDecision, Route};
use crate::ui::mvi::Reducer;
use crate::ui::screens::add_service::{self, AddServiceScreen};
use crate::ui::screens::home::{self, HomeScreen};
use crate::ui::screens::load::LoadState;
use crate::ui::screens::login::{self, LoginScreen};
use crate::ui::screens::my_bookings::{self, BookingsScreen, ReviewDraft};
use crate::ui::screens::my_services::{self, MyServicesScreen};
use crate::ui::screens::profile::{self, ProfileScreen};
use crate::ui::screens::register::{self, RegisterScreen};
use crate::ui::screens::service_detail::{self, DetailScreen};
use crate::ui::screens::services::{self, ServicesFocus, ServicesIntent, ServicesReducer, ServicesState};
use crate::ui::theme;

/// The screen currently mounted for the active route.
pub enum Screen {
    Home(HomeScreen),
    Services(ServicesState),
    ServiceDetail(DetailScreen),
    Login(LoginScreen),
    Register(RegisterScreen),
    Profile(ProfileScreen),
    MyServices(MyServicesScreen),
    AddService(AddServiceScreen),
    MyBookings(BookingsScreen),
    /// Protected route requested while the session is still resolving.
    Pending,
    NotFound(String),
}

/// Mutation armed behind a yes/no dialog.
enum PendingAction {
    CancelBooking { id: String },
    DeleteService { id: String },
}

enum Dialog {
    Error(String),
    Info(String),
    Confirm {
        message: String,
        action: PendingAction,
    },
}

pub struct App {
    store: Arc<SessionStore>,
    api: Arc<ApiClient>,
    session: SessionState,
    route: Route,
    /// Where to return after a gate-forced login.
    return_to: Option<Route>,
    screen: Screen,
    dialog: Option<Dialog>,
    /// The Ctrl-G "go to path" prompt buffer, when open.
    goto: Option<String>,
    should_quit: bool,
    tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(
        store: Arc<SessionStore>,
        api: Arc<ApiClient>,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let session = store.snapshot();
        let mut app = Self {
            store,
            api,
            session,
            route: Route::Home,
            return_to: None,
            screen: Screen::Pending,
            dialog: None,
            goto: None,
            should_quit: false,
            tx,
        };
        app.navigate(Route::Home);
        app
    }

    pub async fn run(
        mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        mut events: EventHandler,
    ) -> std::io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            match events.next().await {
                Some(event) => self.on_event(event),
                None => break,
            }
        }
        Ok(())
    }

    fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize | AppEvent::Tick => {}
            AppEvent::Session(state) => self.on_session_changed(state),
            AppEvent::Loaded(data) => self.on_loaded(data),
            AppEvent::Action(outcome) => self.on_action(outcome),
        }
    }

    // --- navigation ---

    fn navigate(&mut self, route: Route) {
        match gate::decide(&route, &self.session) {
            GateDecision::Allow => {
                self.route = route.clone();
                self.screen = self.build_screen(route);
            }
            GateDecision::Wait => {
                self.route = route;
                self.screen = Screen::Pending;
            }
            GateDecision::Redirect { to, return_to } => {
                tracing::debug!(wanted = %return_to.path(), "redirecting to login");
                self.return_to = Some(return_to);
                self.route = to;
                self.screen = Screen::Login(LoginScreen::default());
            }
        }
    }

    /// Mounts the screen for an allowed route and kicks off its loads.
    fn build_screen(&self, route: Route) -> Screen {
        match route {
            Route::Home => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = home::load(api).await;
                    let _ = tx.send(AppEvent::Loaded(LoadedData::Home(result))).await;
                });
                Screen::Home(HomeScreen::default())
            }
            Route::Services => {
                self.spawn_services_load(ServiceFilter::default());
                Screen::Services(ServicesState::default())
            }
            Route::ServiceDetail(id) => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                let service_id = id.clone();
                tokio::spawn(async move {
                    let result = service_detail::load(api, service_id.clone()).await;
                    let _ = tx
                        .send(AppEvent::Loaded(LoadedData::ServiceDetail {
                            service_id,
                            result: Box::new(result),
                        }))
                        .await;
                });
                if let Some(email) = self.session.email().map(String::from) {
                    let api = Arc::clone(&self.api);
                    let tx = self.tx.clone();
                    let service_id = id.clone();
                    tokio::spawn(async move {
                        match api.check_booking(&email, &service_id).await {
                            Ok(booked) => {
                                let _ = tx
                                    .send(AppEvent::Loaded(LoadedData::BookingCheck {
                                        service_id,
                                        booked,
                                    }))
                                    .await;
                            }
                            Err(err) => {
                                tracing::debug!(error = %err, "booking check failed");
                            }
                        }
                    });
                }
                Screen::ServiceDetail(DetailScreen::new(id))
            }
            Route::Login => Screen::Login(LoginScreen::default()),
            Route::Register => Screen::Register(RegisterScreen::default()),
            Route::Profile => match &self.session.user {
                Some(user) => Screen::Profile(ProfileScreen::for_user(user)),
                None => Screen::Pending,
            },
            Route::MyServices => {
                self.spawn_my_services_load();
                Screen::MyServices(MyServicesScreen::default())
            }
            Route::AddService => Screen::AddService(AddServiceScreen::default()),
            Route::MyBookings => {
                if let Some(email) = self.session.email().map(String::from) {
                    let api = Arc::clone(&self.api);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = my_bookings::load(api, email).await;
                        let _ = tx.send(AppEvent::Loaded(LoadedData::Bookings(result))).await;
                    });
                }
                Screen::MyBookings(BookingsScreen::default())
            }
            Route::NotFound(path) => Screen::NotFound(path),
        }
    }

    fn spawn_services_load(&self, filter: ServiceFilter) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = services::load(api, filter).await;
            let _ = tx.send(AppEvent::Loaded(LoadedData::Services(result))).await;
        });
    }

    fn spawn_my_services_load(&self) {
        let Some(email) = self.session.email().map(String::from) else {
            return;
        };
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = my_services::load(api, email).await;
            let _ = tx
                .send(AppEvent::Loaded(LoadedData::MyServices(result)))
                .await;
        });
    }

    // --- session changes ---

    fn on_session_changed(&mut self, state: SessionState) {
        self.session = state;

        // Post-login return: once authenticated on an auth screen, go back
        // to wherever the gate interrupted, or home.
        if self.session.is_authenticated()
            && matches!(self.route, Route::Login | Route::Register)
        {
            let target = self.return_to.take().unwrap_or(Route::Home);
            self.navigate(target);
            return;
        }

        // Re-gate the current route on every session change.
        match gate::decide(&self.route, &self.session) {
            GateDecision::Redirect { to, return_to } => {
                self.return_to = Some(return_to);
                self.route = to;
                self.screen = Screen::Login(LoginScreen::default());
            }
            GateDecision::Allow => {
                if matches!(self.screen, Screen::Pending) {
                    self.screen = self.build_screen(self.route.clone());
                }
            }
            // Mid-mutation loading with the user retained; keep whatever
            // is already on screen.
            GateDecision::Wait => {}
        }
    }

    // --- async results ---

    fn on_loaded(&mut self, data: LoadedData) {
        match (data, &mut self.screen) {
            (LoadedData::Home(result), Screen::Home(screen)) => {
                screen.data = LoadState::from_result(result);
            }
            (LoadedData::Services(result), Screen::Services(state)) => {
                let taken = std::mem::take(state);
                *state = ServicesReducer::reduce(taken, ServicesIntent::Loaded(result));
            }
            (LoadedData::ServiceDetail { service_id, result }, Screen::ServiceDetail(screen))
                if screen.service_id == service_id =>
            {
                screen.service = LoadState::from_result(*result);
            }
            (LoadedData::BookingCheck { service_id, booked }, Screen::ServiceDetail(screen))
                if screen.service_id == service_id =>
            {
                screen.already_booked = Some(booked);
            }
            (LoadedData::Bookings(result), Screen::MyBookings(screen)) => {
                screen.rows = LoadState::from_result(result);
            }
            (LoadedData::MyServices(result), Screen::MyServices(screen)) => {
                screen.services = LoadState::from_result(result);
            }
            // Result for a screen the user already left.
            _ => {}
        }
    }

    fn on_action(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::SignIn(result) => {
                if let Screen::Login(screen) = &mut self.screen {
                    screen.submitting = false;
                    if let Err(err) = result {
                        screen.error = Some(err.to_string());
                    }
                }
            }
            ActionOutcome::Register(result) => {
                if let Screen::Register(screen) = &mut self.screen {
                    screen.submitting = false;
                    if let Err(err) = result {
                        screen.error = Some(err.to_string());
                    }
                }
            }
            ActionOutcome::LogOut(result) => {
                if let Err(err) = result {
                    self.dialog = Some(Dialog::Error(format!("Sign-out failed: {err}")));
                }
            }
            ActionOutcome::ProfileSaved(result) => {
                if let Screen::Profile(screen) = &mut self.screen {
                    screen.saving = false;
                    match result {
                        Ok(()) => {
                            screen.error = None;
                            self.dialog = Some(Dialog::Info("Profile updated.".to_string()));
                        }
                        Err(err) => screen.error = Some(err.to_string()),
                    }
                }
            }
            ActionOutcome::Booked { service_id, result } => {
                if let Screen::ServiceDetail(screen) = &mut self.screen {
                    if screen.service_id == service_id {
                        screen.booking_in_flight = false;
                        match result {
                            Ok(()) => {
                                screen.already_booked = Some(true);
                                self.dialog =
                                    Some(Dialog::Info("Booking confirmed.".to_string()));
                            }
                            Err(err) => {
                                self.dialog =
                                    Some(Dialog::Error(format!("Booking failed: {err}")));
                            }
                        }
                    }
                }
            }
            ActionOutcome::BookingCancelled { id, result } => {
                if let Screen::MyBookings(screen) = &mut self.screen {
                    match result {
                        Ok(()) => {
                            screen.remove_booking(&id);
                            self.dialog = Some(Dialog::Info("Booking cancelled.".to_string()));
                        }
                        // The list stays as-is; nothing was deleted.
                        Err(err) => {
                            self.dialog =
                                Some(Dialog::Error(format!("Cancellation failed: {err}")));
                        }
                    }
                }
            }
            ActionOutcome::ReviewSubmitted {
                service_id,
                rating,
                result,
            } => {
                if let Screen::MyBookings(screen) = &mut self.screen {
                    match result {
                        Ok(()) => {
                            screen.apply_review(&service_id, rating);
                            screen.review = None;
                            self.dialog = Some(Dialog::Info("Review submitted.".to_string()));
                        }
                        Err(err) => {
                            self.dialog = Some(Dialog::Error(format!("Review failed: {err}")));
                        }
                    }
                }
            }
            ActionOutcome::ServiceDeleted { id, result } => {
                if let Screen::MyServices(screen) = &mut self.screen {
                    match result {
                        Ok(()) => {
                            screen.remove_service(&id);
                            self.dialog = Some(Dialog::Info("Service deleted.".to_string()));
                        }
                        // The listing is left untouched on a rejected delete.
                        Err(err) => {
                            self.dialog = Some(Dialog::Error(format!("Delete failed: {err}")));
                        }
                    }
                }
            }
            ActionOutcome::ServiceSaved(result) => match &mut self.screen {
                Screen::AddService(screen) => {
                    screen.submitting = false;
                    match result {
                        Ok(()) => {
                            self.dialog = Some(Dialog::Info("Service added.".to_string()));
                            self.navigate(Route::MyServices);
                        }
                        Err(err) => screen.error = Some(err.to_string()),
                    }
                }
                Screen::MyServices(screen) => match result {
                    Ok(()) => {
                        screen.editing = None;
                        screen.services = LoadState::Loading;
                        self.dialog = Some(Dialog::Info("Service updated.".to_string()));
                        self.spawn_my_services_load();
                    }
                    Err(err) => {
                        self.dialog = Some(Dialog::Error(format!("Update failed: {err}")));
                    }
                },
                _ => {}
            },
        }
    }

    // --- keys ---

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.dialog.is_some() {
            self.on_dialog_key(key);
            return;
        }

        if self.goto.is_some() {
            self.on_goto_key(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
            self.goto = Some(String::new());
            return;
        }

        match key.code {
            KeyCode::F(1) => return self.navigate(Route::Home),
            KeyCode::F(2) => return self.navigate(Route::Services),
            KeyCode::F(3) => return self.navigate(Route::MyBookings),
            KeyCode::F(4) => return self.navigate(Route::MyServices),
            KeyCode::F(5) => return self.navigate(Route::AddService),
            KeyCode::F(6) => return self.navigate(Route::Profile),
            KeyCode::F(8) => return self.navigate(Route::Register),
            KeyCode::F(9) => return self.log_out(),
            _ => {}
        }

        match &mut self.screen {
            Screen::Services(_) => self.on_services_key(key),
            Screen::ServiceDetail(_) => self.on_detail_key(key),
            Screen::MyBookings(_) => self.on_bookings_key(key),
            Screen::MyServices(_) => self.on_my_services_key(key),
            Screen::AddService(_) => self.on_add_service_key(key),
            Screen::Profile(_) => self.on_profile_key(key),
            Screen::Login(_) => self.on_login_key(key),
            Screen::Register(_) => self.on_register_key(key),
            Screen::Home(_) | Screen::Pending | Screen::NotFound(_) => {}
        }
    }

    fn on_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = &self.dialog else { return };
        match dialog {
            Dialog::Error(_) | Dialog::Info(_) => {
                self.dialog = None;
            }
            Dialog::Confirm { .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if let Some(Dialog::Confirm { action, .. }) = self.dialog.take() {
                        self.execute(action);
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.dialog = None;
                }
                _ => {}
            },
        }
    }

    fn on_goto_key(&mut self, key: KeyEvent) {
        let Some(buffer) = &mut self.goto else { return };
        match key.code {
            KeyCode::Esc => {
                self.goto = None;
            }
            KeyCode::Enter => {
                let path = self.goto.take().unwrap_or_default();
                self.navigate(Route::parse(&path));
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(c);
            }
            _ => {}
        }
    }

    fn on_services_key(&mut self, key: KeyEvent) {
        let (focus, selected_id, filter) = {
            let Screen::Services(state) = &self.screen else {
                return;
            };
            (
                state.focus,
                state.selected_service().map(|s| s.id.clone()),
                state.filter(),
            )
        };

        let intent = match (focus, key.code) {
            (ServicesFocus::List, KeyCode::Down | KeyCode::Char('j')) => {
                Some(ServicesIntent::SelectNext)
            }
            (ServicesFocus::List, KeyCode::Up | KeyCode::Char('k')) => {
                Some(ServicesIntent::SelectPrev)
            }
            (ServicesFocus::List, KeyCode::Char('f')) => Some(ServicesIntent::FocusFilter),
            (ServicesFocus::List, KeyCode::Char('r')) => {
                self.spawn_services_load(ServiceFilter::default());
                self.apply_services_intent(ServicesIntent::ResetFilter);
                self.apply_services_intent(ServicesIntent::Reloading);
                return;
            }
            (ServicesFocus::List, KeyCode::Enter) => {
                if let Some(id) = selected_id {
                    self.navigate(Route::ServiceDetail(id));
                }
                return;
            }
            (_, KeyCode::Tab) => Some(ServicesIntent::SwitchFilterField),
            (_, KeyCode::Enter | KeyCode::Esc) => {
                // Apply the filter and hand focus back to the list.
                self.spawn_services_load(filter);
                self.apply_services_intent(ServicesIntent::Reloading);
                self.apply_services_intent(ServicesIntent::FocusList);
                return;
            }
            (_, KeyCode::Char(c)) => Some(ServicesIntent::FilterChar(c)),
            (_, KeyCode::Backspace) => Some(ServicesIntent::FilterBackspace),
            _ => None,
        };
        if let Some(intent) = intent {
            self.apply_services_intent(intent);
        }
    }

    fn apply_services_intent(&mut self, intent: ServicesIntent) {
        if let Screen::Services(state) = &mut self.screen {
            let taken = std::mem::take(state);
            *state = ServicesReducer::reduce(taken, intent);
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        let Screen::ServiceDetail(screen) = &mut self.screen else {
            return;
        };
        if key.code != KeyCode::Char('b') {
            return;
        }
        if screen.owned_by(&self.session)
            || screen.already_booked == Some(true)
            || screen.booking_in_flight
        {
            return;
        }
        let (Some(service), Some(user)) = (screen.service.ready(), &self.session.user) else {
            return;
        };
        let booking = NewBooking {
            service_id: service.id.clone(),
            service_name: service.service_name.clone(),
            provider_name: service.provider_name.clone(),
            price: service.price,
            user_email: user.email.clone(),
            booking_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        };
        screen.booking_in_flight = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let service_id = booking.service_id.clone();
        tokio::spawn(async move {
            let result = api.create_booking(&booking).await;
            let _ = tx
                .send(AppEvent::Action(ActionOutcome::Booked { service_id, result }))
                .await;
        });
    }

    fn on_bookings_key(&mut self, key: KeyEvent) {
        let Screen::MyBookings(screen) = &mut self.screen else {
            return;
        };

        if let Some(draft) = &mut screen.review {
            match key.code {
                KeyCode::Esc => screen.review = None,
                KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                    draft.focused = 1 - draft.focused;
                }
                KeyCode::Backspace => {
                    if draft.focused == 0 {
                        draft.rating.pop();
                    } else {
                        draft.comment.pop();
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if draft.focused == 0 {
                        if c.is_ascii_digit() && draft.rating.is_empty() {
                            draft.rating.push(c);
                        }
                    } else {
                        draft.comment.push(c);
                    }
                }
                KeyCode::Enter => {
                    let Some(rating) = draft.parsed_rating() else {
                        self.dialog = Some(Dialog::Error(
                            "Rating must be between 1 and 5.".to_string(),
                        ));
                        return;
                    };
                    let Some(email) = self.session.email().map(String::from) else {
                        return;
                    };
                    let review = Review {
                        user_email: email,
                        rating,
                        comment: draft.comment.clone(),
                        created_at: chrono::Utc::now().to_rfc3339(),
                    };
                    let service_id = draft.service_id.clone();
                    let api = Arc::clone(&self.api);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = api.add_review(&service_id, &review).await;
                        let _ = tx
                            .send(AppEvent::Action(ActionOutcome::ReviewSubmitted {
                                service_id,
                                rating,
                                result,
                            }))
                            .await;
                    });
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let len = screen.rows.ready().map_or(0, Vec::len);
                if len > 0 {
                    screen.selected = (screen.selected + 1).min(len - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                screen.selected = screen.selected.saturating_sub(1);
            }
            KeyCode::Char('c') => {
                if let Some(row) = screen.selected_row() {
                    self.dialog = Some(Dialog::Confirm {
                        message: format!("Cancel booking for \"{}\"?", row.booking.service_name),
                        action: PendingAction::CancelBooking {
                            id: row.booking.id.clone(),
                        },
                    });
                }
            }
            KeyCode::Char('r') => {
                if let Some(row) = screen.selected_row() {
                    screen.review = Some(ReviewDraft::new(row.booking.service_id.clone()));
                }
            }
            _ => {}
        }
    }

    fn on_my_services_key(&mut self, key: KeyEvent) {
        let Screen::MyServices(screen) = &mut self.screen else {
            return;
        };

        if screen.editing.is_some() {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
                let Some(email) = self.session.email().map(String::from) else {
                    return;
                };
                let Some((id, update)) = screen.editor_update(&email) else {
                    self.dialog = Some(Dialog::Error("Price must be a number.".to_string()));
                    return;
                };
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.update_service(&id, &update).await;
                    let _ = tx
                        .send(AppEvent::Action(ActionOutcome::ServiceSaved(result)))
                        .await;
                });
                return;
            }
            if key.code == KeyCode::Esc {
                screen.editing = None;
                return;
            }
            if let Some((_, form)) = &mut screen.editing {
                form.handle_key(&key);
            }
            return;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let len = screen.services.ready().map_or(0, Vec::len);
                if len > 0 {
                    screen.selected = (screen.selected + 1).min(len - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                screen.selected = screen.selected.saturating_sub(1);
            }
            KeyCode::Char('e') => screen.open_editor(),
            KeyCode::Char('d') => {
                if let Some(service) = screen.selected_service() {
                    self.dialog = Some(Dialog::Confirm {
                        message: format!("Delete \"{}\"?", service.service_name),
                        action: PendingAction::DeleteService {
                            id: service.id.clone(),
                        },
                    });
                }
            }
            _ => {}
        }
    }

    fn on_add_service_key(&mut self, key: KeyEvent) {
        let Screen::AddService(screen) = &mut self.screen else {
            return;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            if screen.submitting {
                return;
            }
            match screen.build_submission(&self.session) {
                Ok(body) => {
                    screen.submitting = true;
                    screen.error = None;
                    let api = Arc::clone(&self.api);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = api.create_service(&body).await;
                        let _ = tx
                            .send(AppEvent::Action(ActionOutcome::ServiceSaved(result)))
                            .await;
                    });
                }
                Err(message) => screen.error = Some(message),
            }
            return;
        }
        screen.form.handle_key(&key);
    }

    fn on_profile_key(&mut self, key: KeyEvent) {
        let Screen::Profile(screen) = &mut self.screen else {
            return;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            if screen.saving {
                return;
            }
            screen.saving = true;
            screen.error = None;
            let update = screen.submission();
            let store = Arc::clone(&self.store);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = store.update_profile(update).await;
                let _ = tx
                    .send(AppEvent::Action(ActionOutcome::ProfileSaved(result)))
                    .await;
            });
            return;
        }
        screen.form.handle_key(&key);
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        let Screen::Login(screen) = &mut self.screen else {
            return;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('f') {
            if screen.submitting {
                return;
            }
            screen.submitting = true;
            screen.error = None;
            let store = Arc::clone(&self.store);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = store.sign_in_federated().await;
                let _ = tx.send(AppEvent::Action(ActionOutcome::SignIn(result))).await;
            });
            return;
        }
        if key.code == KeyCode::Enter {
            if screen.submitting {
                return;
            }
            let Some((email, password)) = screen.credentials() else {
                screen.error = Some("Email and password are required.".to_string());
                return;
            };
            screen.submitting = true;
            screen.error = None;
            let store = Arc::clone(&self.store);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = store.sign_in(&email, &password).await;
                let _ = tx.send(AppEvent::Action(ActionOutcome::SignIn(result))).await;
            });
            return;
        }
        screen.form.handle_key(&key);
    }

    fn on_register_key(&mut self, key: KeyEvent) {
        let Screen::Register(screen) = &mut self.screen else {
            return;
        };
        if key.code == KeyCode::Enter {
            if screen.submitting {
                return;
            }
            match screen.credentials() {
                Ok((email, password)) => {
                    screen.submitting = true;
                    screen.error = None;
                    let store = Arc::clone(&self.store);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = store.register(&email, &password).await;
                        let _ = tx
                            .send(AppEvent::Action(ActionOutcome::Register(result)))
                            .await;
                    });
                }
                Err(message) => screen.error = Some(message),
            }
            return;
        }
        screen.form.handle_key(&key);
    }

    fn log_out(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store.log_out().await;
            let _ = tx.send(AppEvent::Action(ActionOutcome::LogOut(result))).await;
        });
    }

    fn execute(&mut self, action: PendingAction) {
        match action {
            PendingAction::CancelBooking { id } => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.cancel_booking(&id).await;
                    let _ = tx
                        .send(AppEvent::Action(ActionOutcome::BookingCancelled {
                            id,
                            result,
                        }))
                        .await;
                });
            }
            PendingAction::DeleteService { id } => {
                let Some(email) = self.session.email().map(String::from) else {
                    return;
                };
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_service(&id, &email).await;
                    let _ = tx
                        .send(AppEvent::Action(ActionOutcome::ServiceDeleted {
                            id,
                            result,
                        }))
                        .await;
                });
            }
        }
    }

    // --- rendering ---

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, rows[0]);
        self.render_body(frame, rows[1]);
        self.render_footer(frame, rows[2]);

        if let Some(buffer) = &self.goto {
            let area = centered_rect(50, 3, frame.area());
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(format!("{buffer}_"))
                    .block(Block::default().borders(Borders::ALL).title("Go to path")),
                area,
            );
        }

        if let Some(dialog) = &self.dialog {
            let (title, message, style) = match dialog {
                Dialog::Error(message) => ("Error", message.clone(), theme::error()),
                Dialog::Info(message) => ("Info", message.clone(), theme::success()),
                Dialog::Confirm { message, .. } => {
                    ("Confirm  (y/n)", message.clone(), theme::accent())
                }
            };
            let area = centered_rect(50, 5, frame.area());
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(message)
                    .wrap(Wrap { trim: true })
                    .style(style)
                    .block(Block::default().borders(Borders::ALL).title(title)),
                area,
            );
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let who = match (&self.session.user, self.session.loading) {
            (Some(user), _) => user.label(),
            (None, true) => "…".to_string(),
            (None, false) => "guest".to_string(),
        };
        let line = Line::from(vec![
            Span::styled("HomeHero", theme::accent()),
            Span::raw(format!("  {}", self.route.path())),
            Span::styled(format!("   {who}"), theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        match &self.screen {
            Screen::Home(screen) => home::render(frame, area, screen),
            Screen::Services(state) => services::render(frame, area, state, &self.session),
            Screen::ServiceDetail(screen) => {
                service_detail::render(frame, area, screen, &self.session)
            }
            Screen::Login(screen) => login::render(frame, area, screen),
            Screen::Register(screen) => register::render(frame, area, screen),
            Screen::Profile(screen) => profile::render(frame, area, screen, &self.session),
            Screen::MyServices(screen) => my_services::render(frame, area, screen),
            Screen::AddService(screen) => add_service::render(frame, area, screen),
            Screen::MyBookings(screen) => my_bookings::render(frame, area, screen),
            Screen::Pending => {
                frame.render_widget(
                    Paragraph::new("Checking your session…").style(theme::dim()),
                    area,
                );
            }
            Screen::NotFound(path) => {
                frame.render_widget(
                    Paragraph::new(format!("No such page: {path}")).style(theme::error()),
                    area,
                );
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.session.is_authenticated() {
            "F1 home  F2 services  F3 bookings  F4 my services  F5 add  F6 profile  F9 sign out  ^G go  ^C quit"
        } else {
            "F1 home  F2 services  F8 register  ^G go  ^C quit"
        };
        frame.render_widget(Paragraph::new(hints).style(theme::dim()), area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
