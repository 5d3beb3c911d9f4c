//! Core data structures exchanged with the FraudGuard API
//!
//! Field names follow the API's snake_case JSON. Optional fields default so
//! that older backend versions still decode.

pub mod roles;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use roles::{has_role, is_active, is_admin, is_moderator, is_user};

// ============================================================================
// Users and authentication
// ============================================================================

/// Role assigned to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

fn default_role() -> UserRole {
    UserRole::User
}

fn default_active() -> bool {
    true
}

/// Account as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric or string id, kept as the API's textual form
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accept both `"id": 1` and `"id": "1"`
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Generic `{"message": "..."}` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Content analysis
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
    pub is_scam: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysisResponse {
    pub check_id: i64,
    pub success: bool,
    pub prediction: Prediction,
    /// Seconds spent by the model
    pub processing_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysisResponse {
    pub check_ids: Vec<i64>,
    pub success: bool,
    pub predictions: Vec<Prediction>,
    pub processing_time: f64,
}

/// Stored analysis shown in history tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryCheck {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub danger_score: f64,
    pub danger_level: String,
    pub status: String,
    #[serde(default)]
    pub processing_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// One page of analyses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub checks: Vec<HistoryCheck>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Analysis counters by danger level
///
/// Moderators receive these from the API. A user's own figures are
/// aggregated locally from their history with [`StatsResponse::from_checks`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsResponse {
    pub total_analyses: u64,
    pub safe_count: u64,
    pub suspicious_count: u64,
    pub dangerous_count: u64,
    pub average_risk_score: f64,
    pub average_processing_time_ms: f64,
}

impl StatsResponse {
    /// Count checks per danger level and average their score and duration.
    ///
    /// Averages are rounded to whole numbers; an empty slice gives zeroes.
    pub fn from_checks(checks: &[HistoryCheck]) -> Self {
        let mut stats = Self {
            total_analyses: checks.len() as u64,
            ..Self::default()
        };

        for check in checks {
            let level = check.danger_level.as_str();
            if level.eq_ignore_ascii_case("safe") {
                stats.safe_count += 1;
            } else if level.eq_ignore_ascii_case("suspicious") {
                stats.suspicious_count += 1;
            } else if level.eq_ignore_ascii_case("dangerous") {
                stats.dangerous_count += 1;
            }
        }

        if !checks.is_empty() {
            let count = checks.len() as f64;
            let score: f64 = checks.iter().map(|c| c.danger_score).sum();
            let time: u64 = checks.iter().map(|c| c.processing_time_ms).sum();
            stats.average_risk_score = (score / count).round();
            stats.average_processing_time_ms = (time as f64 / count).round();
        }

        stats
    }
}

/// Service-wide counters for moderators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStatsResponse {
    #[serde(flatten)]
    pub stats: StatsResponse,
    #[serde(default)]
    pub total_users: Option<u64>,
    #[serde(default)]
    pub active_users: Option<u64>,
}

// ============================================================================
// Administration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Page selector shared by every listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_accepts_number_and_string() {
        let numeric: User =
            serde_json::from_str(r#"{"id": 7, "username": "ann", "role": "admin"}"#).unwrap();
        assert_eq!(numeric.id, "7");
        assert_eq!(numeric.role, UserRole::Admin);
        assert!(numeric.is_active);

        let text: User = serde_json::from_str(
            r#"{"id": "1", "username": "testuser", "email": "test@test.com", "is_active": false}"#,
        )
        .unwrap();
        assert_eq!(text.id, "1");
        assert_eq!(text.role, UserRole::User);
        assert!(!text.is_active);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Moderator".parse::<UserRole>().unwrap(), UserRole::Moderator);
        assert!("root".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_update_profile_skips_unset_fields() {
        let request = UpdateProfileRequest {
            username: Some("new".to_string()),
            email: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"username": "new"})
        );
        assert!(UpdateProfileRequest::default().is_empty());
    }

    #[test]
    fn test_global_stats_flatten() {
        let stats: GlobalStatsResponse = serde_json::from_str(
            r#"{"total_analyses": 10, "safe_count": 6, "suspicious_count": 3,
                "dangerous_count": 1, "average_risk_score": 21.5, "total_users": 4}"#,
        )
        .unwrap();
        assert_eq!(stats.stats.total_analyses, 10);
        assert_eq!(stats.total_users, Some(4));
        assert_eq!(stats.active_users, None);
    }

    fn check(level: &str, score: f64, time_ms: u64) -> HistoryCheck {
        HistoryCheck {
            id: 1,
            title: String::new(),
            content: "text".to_string(),
            danger_score: score,
            danger_level: level.to_string(),
            status: "completed".to_string(),
            processing_time_ms: time_ms,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stats_from_checks() {
        let checks = vec![
            check("safe", 10.0, 100),
            check("safe", 15.0, 120),
            check("suspicious", 55.0, 300),
            check("Dangerous", 91.0, 250),
            check("unknown", 0.0, 30),
        ];

        let stats = StatsResponse::from_checks(&checks);

        assert_eq!(stats.total_analyses, 5);
        assert_eq!(stats.safe_count, 2);
        assert_eq!(stats.suspicious_count, 1);
        assert_eq!(stats.dangerous_count, 1);
        // 171 / 5 = 34.2
        assert_eq!(stats.average_risk_score, 34.0);
        // 800 / 5 = 160
        assert_eq!(stats.average_processing_time_ms, 160.0);
    }

    #[test]
    fn test_stats_from_no_checks() {
        assert_eq!(StatsResponse::from_checks(&[]), StatsResponse::default());
    }

    #[test]
    fn test_history_decoding() {
        let history: HistoryResponse = serde_json::from_str(
            r#"{"checks": [{"id": 1, "title": "t", "content": "c", "danger_score": 12.0,
                "danger_level": "safe", "status": "completed", "processing_time_ms": 40,
                "created_at": "2024-05-01T10:00:00Z"}], "total": 1, "page": 1, "limit": 20}"#,
        )
        .unwrap();
        assert_eq!(history.checks.len(), 1);
        assert_eq!(history.checks[0].danger_level, "safe");
    }

    #[test]
    fn test_default_pagination() {
        assert_eq!(Pagination::default(), Pagination::new(1, 20));
    }
}
