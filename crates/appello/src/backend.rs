//! REST client for the attendance backend.
//!
//! All four operations share one `reqwest` client with a cookie jar
//! (the backend's session cookie rides along on every call) and a
//! fixed request timeout, so a hung backend fails the flow instead of
//! hanging it forever.

use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use tracing::debug;

use crate::types::{AnalysisPage, AnalysisRecord, AttendanceRecord, NewStudent, Student};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure taxonomy for backend calls. 401 is split out because it
/// drives different UI behavior than other failures; response bodies
/// of failed calls are discarded.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("authentication failed (401)")]
    Unauthorized,

    #[error("backend returned status {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
            status if status.is_success() => Ok(response),
            status => Err(BackendError::Status(status)),
        }
    }

    /// Register a student; the created record comes back with its id.
    pub async fn create_student(&self, student: &NewStudent) -> Result<Student, BackendError> {
        let response = self
            .client
            .post(format!("{}/students", self.base_url))
            .json(student)
            .send()
            .await?;

        let created = Self::check(response)?.json::<Student>().await?;
        debug!(id = created.id, "Student created");
        Ok(created)
    }

    /// Fetch the roster for one batch label. Spaces and colons in the
    /// label are percent-encoded during URL parsing.
    pub async fn batch_roster(&self, batch: &str) -> Result<Vec<Student>, BackendError> {
        let response = self
            .client
            .get(format!("{}/students/batch/{}", self.base_url, batch))
            .send()
            .await?;

        let roster = Self::check(response)?.json::<Vec<Student>>().await?;
        debug!(batch = %batch, count = roster.len(), "Roster loaded");
        Ok(roster)
    }

    /// Submit the full day's records in one request. Success needs no
    /// response body.
    pub async fn mark_attendance(&self, records: &[AttendanceRecord]) -> Result<(), BackendError> {
        let response = self
            .client
            .post(format!("{}/attendance/mark", self.base_url))
            .json(records)
            .send()
            .await?;

        Self::check(response)?;
        debug!(count = records.len(), "Attendance marked");
        Ok(())
    }

    /// Query one student's records for a month, unwrapping the
    /// paginated envelope.
    pub async fn monthly_analysis(
        &self,
        student_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<AnalysisRecord>, BackendError> {
        let response = self
            .client
            .get(format!("{}/attendance/analysis", self.base_url))
            .query(&[
                ("studentId", student_id.to_string()),
                ("year", year.to_string()),
                ("month", month.to_string()),
            ])
            .send()
            .await?;

        let page = Self::check(response)?.json::<AnalysisPage>().await?;
        debug!(
            student_id = %student_id,
            count = page.content.len(),
            "Analysis loaded"
        );
        Ok(page.content)
    }
}
