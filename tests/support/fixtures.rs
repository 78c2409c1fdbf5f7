//! Test fixtures and constants.

/// Standard test secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
    ("JWT_SECRET", "super-secret-jwt-token"),
    ("redis:url", "redis://localhost:6379"),
    ("app:s3:bucket", "my-app-bucket"),
];

/// Names that must be rejected before anything is written.
pub const INVALID_NAMES: &[&str] = &["", "has space", "trailing:", ":leading", "a::b", "dash-name"];
