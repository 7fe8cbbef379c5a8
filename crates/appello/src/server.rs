//! HTTP routes and handlers for the attendance front end.
//!
//! Every protected handler runs the login gate first: the session
//! cookie must name a live session or the request redirects to
//! `/login` before anything else happens.

use axum::extract::{Form, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Datelike, Local};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};
use crate::config::Credentials;
use crate::html::{self, DashboardView, ReportView};
use crate::report::{month_name, ReportSummary};
use crate::session::{LoadedRoster, ReportHandoff, SessionStore, Severity, StatusRegion};
use crate::slots;
use crate::types::{AttendanceRecord, AttendanceStatus, NewStudent, StudentRef};

const SESSION_COOKIE: &str = "appello_session";

/// Application state shared across requests
pub struct AppState {
    pub credentials: Credentials,
    pub backend: BackendClient,
    pub sessions: SessionStore,
}

/// Start the web server
pub async fn serve(port: u16, backend_url: &str) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        credentials: Credentials::from_env(),
        backend: BackendClient::new(backend_url)?,
        sessions: SessionStore::default(),
    });

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, backend = %backend_url, "Server running");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/login", get(login_page).post(login_submit))
        .route("/students", post(register_student))
        .route("/attendance", get(load_batch).post(mark_attendance))
        .route("/analysis", post(run_analysis))
        .route("/analysis/report", get(report_page))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Page guard: resolve the session cookie to a live session token,
/// or redirect to the login page. Fails closed.
fn authorize(state: &AppState, cookies: &Cookies) -> Result<Uuid, Redirect> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .filter(|token| state.sessions.contains(*token))
        .ok_or_else(|| {
            warn!("Unauthorized access attempt, redirecting to login");
            Redirect::to("/login")
        })
}

fn session_cookie(token: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

async fn login_page() -> Html<String> {
    Html(html::render_login(None).into_string())
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Html<String> {
    if state.credentials.matches(&form.username, &form.password) {
        let token = state.sessions.create("teacher");
        cookies.add(session_cookie(token));
        info!(username = %form.username, "Operator logged in");
        return Html(html::render_login_success().into_string());
    }

    // Failed login: revoke any stale session the browser still holds
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Ok(stale) = Uuid::parse_str(cookie.value()) {
            state.sessions.revoke(stale);
        }
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    cookies.remove(removal);

    warn!(username = %form.username, "Login rejected");
    Html(html::render_login(Some("Invalid username or password.")).into_string())
}

async fn dashboard(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, Redirect> {
    let token = authorize(&state, &cookies)?;

    let today = Local::now().date_naive();
    let view = DashboardView {
        role: state.sessions.role(token).unwrap_or_default(),
        slots: slots::batch_labels(),
        register_status: state.sessions.status(token, StatusRegion::Register),
        mark_status: state.sessions.status(token, StatusRegion::Mark),
        analysis_error: state.sessions.analysis_error(token),
        roster: state.sessions.roster(token),
        current_month: today.month(),
        current_year: today.year(),
    };

    Ok(Html(html::render_dashboard(&view).into_string()))
}

#[derive(Debug, Deserialize)]
struct RegisterForm {
    student_name: String,
    course: String,
    batch_name: String,
}

async fn register_student(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, Redirect> {
    let token = authorize(&state, &cookies)?;

    let student = NewStudent {
        student_name: form.student_name,
        course: form.course,
        batch_name: form.batch_name,
    };

    match state.backend.create_student(&student).await {
        Ok(created) => {
            state.sessions.set_status(
                token,
                StatusRegion::Register,
                &format!("Student {} added successfully!", created.id),
                Severity::Success,
            );
            Ok(Redirect::to("/"))
        }
        Err(BackendError::Unauthorized) => {
            state.sessions.set_status(
                token,
                StatusRegion::Register,
                "Authentication failed. Please log in again.",
                Severity::Error,
            );
            Ok(Redirect::to("/login"))
        }
        Err(BackendError::Status(status)) => {
            warn!(%status, "Student registration failed");
            state.sessions.set_status(
                token,
                StatusRegion::Register,
                "Failed to add student. Check server logs.",
                Severity::Error,
            );
            Ok(Redirect::to("/"))
        }
        Err(BackendError::Transport(error)) => {
            warn!(error = %error, "Student registration failed");
            state.sessions.set_status(
                token,
                StatusRegion::Register,
                "An error occurred connecting to the backend.",
                Severity::Error,
            );
            Ok(Redirect::to("/"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoadQuery {
    #[serde(default)]
    batch: String,
}

async fn load_batch(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoadQuery>,
) -> Result<Redirect, Redirect> {
    let token = authorize(&state, &cookies)?;

    if query.batch.is_empty() {
        state.sessions.set_status(
            token,
            StatusRegion::Mark,
            "Please select a batch time.",
            Severity::Error,
        );
        return Ok(Redirect::to("/"));
    }

    match state.backend.batch_roster(&query.batch).await {
        Ok(students) => {
            if students.is_empty() {
                state.sessions.set_status(
                    token,
                    StatusRegion::Mark,
                    "No students found for this batch.",
                    Severity::Error,
                );
            }
            state.sessions.set_roster(
                token,
                LoadedRoster {
                    batch: query.batch,
                    students,
                },
            );
            Ok(Redirect::to("/"))
        }
        Err(BackendError::Unauthorized) => {
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Authentication failed. Please log in again.",
                Severity::Error,
            );
            Ok(Redirect::to("/login"))
        }
        Err(error) => {
            warn!(batch = %query.batch, error = %error, "Roster load failed");
            state.sessions.clear_roster(token);
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Error loading students from server.",
                Severity::Error,
            );
            Ok(Redirect::to("/"))
        }
    }
}

async fn mark_attendance(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, Redirect> {
    let token = authorize(&state, &cookies)?;

    let Some(roster) = state.sessions.roster(token).filter(|r| !r.students.is_empty()) else {
        state.sessions.set_status(
            token,
            StatusRegion::Mark,
            "Load a batch before marking attendance.",
            Severity::Error,
        );
        return Ok(Redirect::to("/"));
    };

    // All selector reads happen here, before the network call, so the
    // submitted set is exactly the cached roster.
    let date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let records: Vec<AttendanceRecord> = roster
        .students
        .iter()
        .map(|student| AttendanceRecord {
            student: StudentRef { id: student.id },
            batch_name: student.batch_name.clone(),
            attendance_date: date.clone(),
            status: form
                .get(&format!("status-{}", student.id))
                .map(|value| AttendanceStatus::from_form_value(value))
                .unwrap_or(AttendanceStatus::Present),
        })
        .collect();

    match state.backend.mark_attendance(&records).await {
        Ok(()) => {
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Attendance marked successfully!",
                Severity::Success,
            );
            Ok(Redirect::to("/"))
        }
        Err(BackendError::Unauthorized) => {
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Authentication failed. Please log in again.",
                Severity::Error,
            );
            Ok(Redirect::to("/login"))
        }
        Err(BackendError::Status(status)) => {
            warn!(%status, "Attendance submission failed");
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Failed to mark attendance. Check server logs.",
                Severity::Error,
            );
            Ok(Redirect::to("/"))
        }
        Err(BackendError::Transport(error)) => {
            warn!(error = %error, "Attendance submission failed");
            state.sessions.set_status(
                token,
                StatusRegion::Mark,
                "Error marking attendance.",
                Severity::Error,
            );
            Ok(Redirect::to("/"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisForm {
    #[serde(default)]
    student_id: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    month: String,
}

async fn run_analysis(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<AnalysisForm>,
) -> Result<Redirect, Redirect> {
    let token = authorize(&state, &cookies)?;

    let student_id = form.student_id.trim().to_string();
    if student_id.is_empty() || form.year.trim().is_empty() || form.month.trim().is_empty() {
        state.sessions.set_analysis_error(
            token,
            "Please enter a Student ID, select a month, and a year.",
        );
        return Ok(Redirect::to("/"));
    }

    let (Ok(year), Ok(month)) = (form.year.trim().parse::<i32>(), form.month.trim().parse::<u32>())
    else {
        state
            .sessions
            .set_analysis_error(token, "Invalid month or year.");
        return Ok(Redirect::to("/"));
    };

    match state.backend.monthly_analysis(&student_id, year, month).await {
        Ok(records) => {
            state.sessions.stash_report(
                token,
                ReportHandoff {
                    records,
                    student_id,
                    month,
                    year,
                },
            );
            Ok(Redirect::to("/analysis/report"))
        }
        // Inside the analysis flow a 401 only surfaces an inline error;
        // redirecting out of the form context is too aggressive.
        Err(BackendError::Unauthorized) => {
            state
                .sessions
                .set_analysis_error(token, "Authentication required. Please log in again.");
            Ok(Redirect::to("/"))
        }
        Err(error) => {
            warn!(student_id = %student_id, error = %error, "Analysis query failed");
            state
                .sessions
                .set_analysis_error(token, "Error loading report data. Check server connection.");
            Ok(Redirect::to("/"))
        }
    }
}

async fn report_page(
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, Redirect> {
    let token = authorize(&state, &cookies)?;

    // One-shot consumption: the stash is cleared by this read whether
    // or not it held anything.
    let Some(handoff) = state.sessions.take_report(token) else {
        return Ok(Html(html::render_report_missing().into_string()));
    };

    let summary = ReportSummary::from_records(&handoff.records);
    let view = ReportView {
        student_id: handoff.student_id,
        month_name: month_name(handoff.month).unwrap_or("Unknown").to_string(),
        year: handoff.year,
        records: handoff.records,
        summary,
    };

    Ok(Html(html::render_report(&view).into_string()))
}
