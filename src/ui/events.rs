//! App event bus: terminal input, session changes, async load and action
//! results all funnel into one channel the app loop drains.

use std::thread;
use std::time::Duration;

use crossterm::event::{Event as TermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::api::models::Service;
use crate::api::{ApiError, FetchError};
use crate::auth::AuthError;
use crate::session::SessionState;
use crate::ui::screens::home::HomeData;
use crate::ui::screens::my_bookings::BookingRow;

/// Completed screen loads. Each variant carries the route's data so results
/// arriving after the user navigated away can be dropped.
pub enum LoadedData {
    Home(Result<HomeData, FetchError>),
    Services(Result<Vec<Service>, FetchError>),
    ServiceDetail {
        service_id: String,
        result: Box<Result<Service, FetchError>>,
    },
    BookingCheck {
        service_id: String,
        booked: bool,
    },
    Bookings(Result<Vec<BookingRow>, FetchError>),
    MyServices(Result<Vec<Service>, FetchError>),
}

/// Completed mutations.
pub enum ActionOutcome {
    SignIn(Result<(), AuthError>),
    Register(Result<(), AuthError>),
    LogOut(Result<(), AuthError>),
    ProfileSaved(Result<(), AuthError>),
    Booked {
        service_id: String,
        result: Result<(), ApiError>,
    },
    BookingCancelled {
        id: String,
        result: Result<(), ApiError>,
    },
    ReviewSubmitted {
        service_id: String,
        rating: u8,
        result: Result<(), ApiError>,
    },
    ServiceDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    ServiceSaved(Result<(), ApiError>),
}

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    Session(SessionState),
    Loaded(LoadedData),
    Action(ActionOutcome),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    /// Spawns a blocking reader thread for terminal input. The thread exits
    /// once the receiving side is dropped.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let event_tx = tx.clone();

        thread::spawn(move || loop {
            match crossterm::event::poll(tick_rate) {
                Ok(true) => {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(err) => {
                            tracing::error!(error = %err, "terminal read failed");
                            break;
                        }
                    };
                    let app_event = match event {
                        TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Some(AppEvent::Key(key))
                        }
                        TermEvent::Resize(_, _) => Some(AppEvent::Resize),
                        _ => None,
                    };
                    if let Some(app_event) = app_event {
                        if event_tx.blocking_send(app_event).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {
                    if event_tx.blocking_send(AppEvent::Tick).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "terminal poll failed");
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }
}
