//! In-process stand-in for the Adif station portal.
//!
//! Serves station pages that set a session cookie and embed a `p_p_auth`
//! token, and a board query endpoint that only answers when the token and
//! the cookie belong to the same session.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, NaiveDateTime};

/// A board query as the portal received it.
#[derive(Debug, Clone)]
pub struct SeenQuery {
    pub page: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub referer: Option<String>,
    pub origin: Option<String>,
    pub user_agent: Option<String>,
}

pub struct StubPortal {
    /// Number of upcoming page loads that will come back without a token.
    pub token_failures: AtomicUsize,
    /// Status every station page load answers with, when not 200.
    pub page_status: Mutex<Option<StatusCode>>,
    /// Status and body of board query responses.
    pub board: Mutex<(StatusCode, String)>,
    /// How long board queries take to answer.
    pub board_delay: Mutex<Duration>,
    pub pages_served: AtomicUsize,
    /// Request headers of every station page load.
    pub page_headers: Mutex<Vec<HeaderMap>>,
    pub queries: Mutex<Vec<SeenQuery>>,
    /// Session cookie -> token issued with it.
    issued: Mutex<HashMap<String, String>>,
}

impl StubPortal {
    pub fn new(board_body: &str) -> Arc<Self> {
        Arc::new(Self {
            token_failures: AtomicUsize::new(0),
            page_status: Mutex::new(None),
            board: Mutex::new((StatusCode::OK, board_body.to_string())),
            board_delay: Mutex::new(Duration::ZERO),
            pages_served: AtomicUsize::new(0),
            page_headers: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            issued: Mutex::new(HashMap::new()),
        })
    }

    pub fn failing_tokens(self: Arc<Self>, count: usize) -> Arc<Self> {
        self.token_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn set_board(&self, status: StatusCode, body: &str) {
        *self.board.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_page_status(&self, status: StatusCode) {
        *self.page_status.lock().unwrap() = Some(status);
    }

    pub fn set_board_delay(&self, delay: Duration) {
        *self.board_delay.lock().unwrap() = delay;
    }

    pub fn page_headers(&self) -> Vec<HeaderMap> {
        self.page_headers.lock().unwrap().clone()
    }

    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<SeenQuery> {
        self.queries.lock().unwrap().clone()
    }
}

/// Start the stub on an ephemeral port.
pub async fn spawn_portal(stub: Arc<StubPortal>) -> SocketAddr {
    let app = Router::new()
        .route("/w/:page", get(station_page).post(board_query))
        .with_state(stub);
    serve(app).await
}

/// Serve a router on an ephemeral port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn station_page(
    State(stub): State<Arc<StubPortal>>,
    Path(page): Path<String>,
    headers: HeaderMap,
) -> Response {
    let n = stub.pages_served.fetch_add(1, Ordering::SeqCst);
    stub.page_headers.lock().unwrap().push(headers);

    let page_status = *stub.page_status.lock().unwrap();
    if let Some(status) = page_status {
        return (status, "Servicio no disponible").into_response();
    }

    let failing = stub
        .token_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok();
    if failing {
        return Html("<html><body>Mantenimiento</body></html>").into_response();
    }

    let session = format!("stub{n}");
    let token = format!("Tok{n}");
    stub.issued
        .lock()
        .unwrap()
        .insert(session.clone(), token.clone());

    let body = format!(
        r#"<html><body>
        <a href="/w/{page}?p_p_id=servicios_estacion_ServiciosEstacionPortlet&amp;p_p_lifecycle=1&amp;p_p_auth={token}&amp;p_p_state=normal">Horarios</a>
        </body></html>"#
    );
    (
        [(header::SET_COOKIE, format!("JSESSIONID={session}; Path=/"))],
        Html(body),
    )
        .into_response()
}

async fn board_query(
    State(stub): State<Arc<StubPortal>>,
    Path(page): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    stub.queries.lock().unwrap().push(SeenQuery {
        page,
        query: query.clone(),
        form,
        referer: header_value(header::REFERER),
        origin: header_value(header::ORIGIN),
        user_agent: header_value(header::USER_AGENT),
    });

    let session = header_value(header::COOKIE).and_then(|cookies| {
        cookies
            .split("; ")
            .find_map(|c| c.strip_prefix("JSESSIONID=").map(str::to_string))
    });
    let issued = stub.issued.lock().unwrap().clone();
    let token_matches = session
        .and_then(|s| issued.get(&s).cloned())
        .is_some_and(|token| query.get("p_p_auth") == Some(&token));
    if !token_matches {
        return (StatusCode::FORBIDDEN, "token does not match session").into_response();
    }

    let delay = *stub.board_delay.lock().unwrap();
    tokio::time::sleep(delay).await;

    let (status, body) = stub.board.lock().unwrap().clone();
    (status, body).into_response()
}

/// A board mixing relative and clock times, in the portal's order.
pub const MIXED_BOARD: &str = r#"{"horarios": [
    {"hora": "10:30", "estacion": "Orduña", "via": "1", "tren": "16034"},
    {"hora": "5 min", "estacion": "Bilbao-Abando", "via": "2", "tren": "16021"},
    {"hora": "09:15", "estacion": "Bilbao-Abando", "via": "2", "tren": "16101"}
]}"#;

pub const EMPTY_BOARD: &str = r#"{"horarios": []}"#;

/// 2024-01-01 10:00, the "now" the board above is ordered against.
pub fn ten_am() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}
