use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::report::{ReportSummary, MONTH_NAMES};
use crate::session::{LoadedRoster, Severity, StatusMessage};
use crate::types::AnalysisRecord;

/// Everything the dashboard needs to render one request.
pub struct DashboardView {
    pub role: String,
    pub slots: Vec<String>,
    pub register_status: Option<StatusMessage>,
    pub mark_status: Option<StatusMessage>,
    pub analysis_error: Option<String>,
    pub roster: Option<LoadedRoster>,
    pub current_month: u32,
    pub current_year: i32,
}

/// Everything the report page needs once the handoff was consumed.
pub struct ReportView {
    pub student_id: String,
    pub month_name: String,
    pub year: i32,
    pub records: Vec<AnalysisRecord>,
    pub summary: ReportSummary,
}

fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    (body)
                }
            }
        }
    }
}

fn status_line(status: &Option<StatusMessage>) -> Markup {
    html! {
        @if let Some(message) = status {
            p class=(match message.severity {
                Severity::Success => "status status-success",
                Severity::Error => "status status-error",
            }) { (message.text) }
        }
    }
}

pub fn render_login(error: Option<&str>) -> Markup {
    page(
        "Appello - Login",
        html! {
            h1 { "Appello" }
            section.card {
                h2 { "Operator Login" }
                form method="post" action="/login" {
                    input type="text" name="username" placeholder="Username" required;
                    input type="password" name="password" placeholder="Password" required;
                    button type="submit" { "Log In" }
                }
                @if let Some(message) = error {
                    p.status.status-error { (message) }
                }
            }
        },
    )
}

/// Success page shown for one second before the dashboard loads.
pub fn render_login_success() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content="1;url=/";
                title { "Appello - Login" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    h1 { "Appello" }
                    p.status.status-success { "Login successful! Redirecting..." }
                }
            }
        }
    }
}

fn batch_selector(name: &str, placeholder: &str, slots: &[String]) -> Markup {
    html! {
        select name=(name) required {
            option value="" disabled selected { (placeholder) }
            @for slot in slots {
                option value=(slot) { (slot) }
            }
        }
    }
}

pub fn render_dashboard(view: &DashboardView) -> Markup {
    page(
        "Appello",
        html! {
            header.top {
                h1 { "Appello" }
                p.signed-in { "Signed in as " (view.role) }
            }

            section.card {
                h2 { "Register Student" }
                form method="post" action="/students" {
                    input type="text" name="student_name" placeholder="Student name" required;
                    input type="text" name="course" placeholder="Course" required;
                    (batch_selector("batch_name", "Select Batch Time", &view.slots))
                    button type="submit" { "Add Student" }
                }
                (status_line(&view.register_status))
            }

            section.card {
                h2 { "Mark Attendance" }
                form method="get" action="/attendance" {
                    (batch_selector("batch", "Select Batch Time to Load", &view.slots))
                    button type="submit" { "Load Students" }
                }
                @if let Some(roster) = &view.roster {
                    p.batch-label { "Batch: " span { (roster.batch) } }
                    form method="post" action="/attendance" {
                        table {
                            thead {
                                tr { th { "ID" } th { "Name" } th { "Status" } }
                            }
                            tbody {
                                @if roster.students.is_empty() {
                                    tr { td colspan="3" { "No students found for this batch." } }
                                } @else {
                                    @for student in &roster.students {
                                        tr {
                                            td { (student.id) }
                                            td { (student.student_name) }
                                            td {
                                                select name={ "status-" (student.id) } required {
                                                    option value="Present" { "Present" }
                                                    option value="Absent" { "Absent" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        @if !roster.students.is_empty() {
                            button type="submit" { "Submit Attendance" }
                        }
                    }
                }
                (status_line(&view.mark_status))
            }

            section.card {
                h2 { "Monthly Analysis" }
                form method="post" action="/analysis" {
                    input type="text" name="student_id" placeholder="Student ID";
                    select name="month" {
                        @for (index, name) in MONTH_NAMES.iter().enumerate() {
                            @let month = index as u32 + 1;
                            option value=(month) selected[month == view.current_month] { (name) }
                        }
                    }
                    select name="year" {
                        @for year in ((view.current_year - 5)..=view.current_year).rev() {
                            option value=(year) selected[year == view.current_year] { (year) }
                        }
                    }
                    button type="submit" { "View Report" }
                }
                @if let Some(message) = &view.analysis_error {
                    p.status.status-error { (message) }
                }
            }
        },
    )
}

fn chart_canvas(present: &str, absent: &str) -> Markup {
    html! {
        div.chart-box {
            canvas #"attendance-rate-chart" data-present=(present) data-absent=(absent) {}
        }
        script src="https://cdn.jsdelivr.net/npm/chart.js" {}
        script { (PreEscaped(CHART_JS)) }
    }
}

pub fn render_report(view: &ReportView) -> Markup {
    page(
        "Appello - Monthly Report",
        html! {
            h1 { "Monthly Report" }
            p #"report-header" {
                "Monthly Attendance Report for Student ID: "
                (view.student_id)
                " (" (view.month_name) " " (view.year) ")"
            }
            section.card {
                table {
                    thead {
                        tr { th { "Date" } th { "Status" } }
                    }
                    tbody {
                        @if view.records.is_empty() {
                            tr { td colspan="2" { "No attendance records found for this period." } }
                        } @else {
                            @for record in &view.records {
                                tr {
                                    td { (record.attendance_date) }
                                    td class=(status_class(&record.status)) { (record.status) }
                                }
                            }
                        }
                    }
                }
            }
            (chart_canvas(&view.summary.present_label(), &view.summary.absent_label()))
            p { a href="/" { "Back to dashboard" } }
        },
    )
}

/// Error state for a report load with no prior handoff.
pub fn render_report_missing() -> Markup {
    page(
        "Appello - Monthly Report",
        html! {
            h1 { "Monthly Report" }
            p #"report-header" { "Error: Report data not found." }
            section.card {
                table {
                    tbody {
                        tr { td colspan="2" { "Please go back and generate the report again." } }
                    }
                }
            }
            (chart_canvas("0.0", "0.0"))
            p { a href="/" { "Back to dashboard" } }
        },
    )
}

fn status_class(status: &str) -> &'static str {
    if status == "Present" {
        "status-present"
    } else {
        "status-absent"
    }
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    background: #101418;
    color: #e8e8e8;
    min-height: 100vh;
    line-height: 1.5;
}

.container {
    max-width: 860px;
    margin: 0 auto;
    padding: 40px 24px 60px;
}

header.top {
    display: flex;
    align-items: baseline;
    justify-content: space-between;
    margin-bottom: 24px;
}

h1 {
    font-weight: 800;
    letter-spacing: -0.02em;
    margin-bottom: 16px;
}

.signed-in {
    color: #8a939c;
    font-size: 0.85em;
}

.card {
    background: rgba(255, 255, 255, 0.04);
    border: 1px solid rgba(255, 255, 255, 0.1);
    border-radius: 8px;
    padding: 24px;
    margin-bottom: 24px;
}

.card h2 {
    font-size: 1.1em;
    margin-bottom: 16px;
    text-transform: uppercase;
    letter-spacing: 0.08em;
    color: #aeb8c2;
}

form {
    display: flex;
    flex-wrap: wrap;
    gap: 10px;
    margin-bottom: 12px;
}

input, select {
    background: #1a2027;
    color: #e8e8e8;
    border: 1px solid rgba(255, 255, 255, 0.15);
    border-radius: 6px;
    padding: 8px 12px;
}

button {
    background: #10c9c9;
    color: #06282a;
    border: none;
    border-radius: 6px;
    padding: 8px 18px;
    font-weight: 700;
    cursor: pointer;
}

button:hover {
    filter: brightness(1.1);
}

table {
    width: 100%;
    border-collapse: collapse;
    margin: 8px 0;
}

th, td {
    text-align: left;
    padding: 8px 10px;
    border-bottom: 1px solid rgba(255, 255, 255, 0.08);
}

.batch-label {
    color: #8a939c;
    margin: 10px 0 4px;
}

.batch-label span {
    color: #10c9c9;
    font-weight: 700;
}

.status {
    margin-top: 8px;
    font-size: 0.9em;
}

.status-success {
    color: #28a745;
}

.status-error {
    color: #dc3545;
}

.status-present {
    color: #28a745;
    font-weight: 700;
}

.status-absent {
    color: #dc3545;
    font-weight: 700;
}

.chart-box {
    max-width: 380px;
    margin: 0 auto 16px;
}

a {
    color: #10c9c9;
}
"#;

/// Doughnut renderer. Destroys any previous chart bound to the canvas
/// before creating a new one, so at most one instance is ever live.
const CHART_JS: &str = r#"
let attendanceChart;

function renderAttendanceChart(present, absent) {
    const canvas = document.getElementById('attendance-rate-chart');
    const ctx = canvas.getContext('2d');

    if (attendanceChart) {
        attendanceChart.destroy();
    }

    attendanceChart = new Chart(ctx, {
        type: 'doughnut',
        data: {
            labels: ['Present (%)', 'Absent (%)'],
            datasets: [{
                data: [present, absent],
                backgroundColor: ['#10c9c9', '#ff6384'],
                hoverOffset: 10
            }]
        },
        options: {
            responsive: true,
            plugins: {
                legend: {
                    labels: { color: 'rgba(255, 255, 255, 0.8)' }
                },
                title: {
                    display: true,
                    text: 'Monthly Attendance Summary',
                    color: '#fff'
                }
            }
        }
    });
}

const chartCanvas = document.getElementById('attendance-rate-chart');
renderAttendanceChart(chartCanvas.dataset.present, chartCanvas.dataset.absent);
"#;
