use serde::{Deserialize, Serialize};

/// A student as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,

    /// Full name as entered at registration
    pub student_name: String,

    #[serde(default)]
    pub course: String,

    /// Hourly batch label, e.g. "6:00 am - 7:00 am"
    pub batch_name: String,
}

/// Payload for registering a new student. The backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub student_name: String,
    pub course: String,
    pub batch_name: String,
}

/// Attendance status for one student on one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Parse a selector value. The selector offers exactly two options,
    /// so anything other than "Absent" counts as present.
    pub fn from_form_value(value: &str) -> Self {
        if value == "Absent" {
            Self::Absent
        } else {
            Self::Present
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }
}

/// Reference to a student inside an attendance record, matching the
/// backend's nested `{"student": {"id": ...}}` shape.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct StudentRef {
    pub id: i64,
}

/// One attendance record, submitted as part of a batch array.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student: StudentRef,
    pub batch_name: String,

    /// Calendar date in YYYY-MM-DD format, no time component
    pub attendance_date: String,

    pub status: AttendanceStatus,
}

/// One record of a student's monthly analysis. The status stays a free
/// string here: the report colors "Present" green and anything else red.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub attendance_date: String,
    pub status: String,
}

/// Paginated envelope returned by the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPage {
    pub content: Vec<AnalysisRecord>,
}
