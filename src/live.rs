use crate::attendance::DayClock;
use crate::identity::stored_nickname;
use crate::models::DayDocument;
use crate::presentation::{build_board_at, is_close_to_kickoff};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chrono::{Local, NaiveDateTime};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::time::Duration;
use tokio::{sync::broadcast::error::RecvError, time};
use tower_sessions::Session;
use tracing::{debug, error, info, warn};

pub async fn live(
    State(state): State<AppState>,
    session: Session,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| watch_today(socket, state, session))
}

/// Local-time state a subscriber re-checks every tick: the day being
/// watched and whether the kickoff window was open last time.
#[derive(Debug, Clone)]
struct LiveClock {
    day: DayClock,
    near_kickoff: bool,
}

impl LiveClock {
    fn new(now: NaiveDateTime) -> Self {
        Self {
            day: DayClock::new(now.date()),
            near_kickoff: is_close_to_kickoff(now.time()),
        }
    }

    fn current(&self) -> &str {
        self.day.current()
    }

    /// True when the board must be re-sent: the date rolled over or the
    /// kickoff window opened or closed.
    fn tick(&mut self, now: NaiveDateTime) -> bool {
        let window = is_close_to_kickoff(now.time());
        let window_flipped = window != self.near_kickoff;
        self.near_kickoff = window;
        match self.day.tick(now.date()) {
            Some(date_key) => {
                info!(%date_key, "date rolled over, following new day");
                true
            }
            None => window_flipped,
        }
    }
}

/// Pushes today's board on connect and whenever today's document changes.
/// A one-second tick follows the local date across midnight and re-sends
/// the board when the kickoff window opens or closes.
async fn watch_today(socket: WebSocket, state: AppState, session: Session) {
    let (mut sender, mut receiver) = socket.split();
    let mut changes = state.events.subscribe();
    let mut ticker = time::interval(Duration::from_secs(1));
    let mut clock = LiveClock::new(Local::now().naive_local());

    if !send_board(&mut sender, &state, &session, clock.current(), None).await {
        return;
    }

    loop {
        // Outer None: nothing to send. Inner None: re-read the store.
        let push: Option<Option<DayDocument>> = tokio::select! {
            change = changes.recv() => match change {
                Ok(change) if change.date_key == clock.current() => Some(Some(change.document)),
                Ok(_) => None,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live board fell behind, resending");
                    Some(None)
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => clock.tick(Local::now().naive_local()).then_some(None),
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => None,
            },
        };

        let Some(document) = push else {
            continue;
        };
        if !send_board(&mut sender, &state, &session, clock.current(), document).await {
            break;
        }
    }

    debug!("live board closed");
}

/// Sends the board for `date_key`, built from `document` when the change
/// carried one and from the store otherwise. Returns false once the socket
/// can no longer be written to.
async fn send_board(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
    session: &Session,
    date_key: &str,
    document: Option<DayDocument>,
) -> bool {
    let nickname = match stored_nickname(session).await {
        Ok(nickname) => nickname,
        Err(err) => {
            warn!("could not read session nickname: {err}");
            None
        }
    };

    let document = match document {
        Some(document) => Some(document),
        None => state.data.lock().await.attendance.get(date_key).cloned(),
    };
    let board = build_board_at(
        state.variant,
        date_key,
        document.as_ref(),
        nickname.as_deref(),
        Local::now().naive_local(),
        state.weather,
    );

    let payload = match serde_json::to_string(&board) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to encode board: {err}");
            return true;
        }
    };

    sender.send(Message::Text(payload.into())).await.is_ok()
}
