//! Configuration loading from environment variables.

/// Stock operator account, matching the backend's seeded teacher role.
pub const DEFAULT_USERNAME: &str = "teacher";
pub const DEFAULT_PASSWORD: &str = "password123";

/// Single base URL for every backend call (the flows no longer diverge
/// on ports).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8081/api";

/// Operator credentials the login gate checks submissions against.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Load credentials from `APPELLO_USER` / `APPELLO_PASSWORD`,
    /// either from the environment or a `.env` file, falling back to
    /// the stock teacher account.
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self {
            username: std::env::var("APPELLO_USER")
                .unwrap_or_else(|_| DEFAULT_USERNAME.to_string()),
            password: std::env::var("APPELLO_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string()),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Resolve the backend base URL: CLI flag, then `APPELLO_BACKEND_URL`,
/// then the compiled-in default.
pub fn backend_url(flag: Option<String>) -> String {
    let _ = dotenvy::dotenv();

    flag.or_else(|| std::env::var("APPELLO_BACKEND_URL").ok())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}
