use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::client::AdminClient;
use crate::api::de;
use crate::api::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    LoginAttempt,
    PasswordChange,
    MfaEnabled,
    SuspiciousActivity,
    IpBlocked,
    #[serde(other)]
    Other,
}

impl SecurityEventType {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::LoginAttempt => "🔑",
            Self::PasswordChange => "🔒",
            Self::MfaEnabled => "📱",
            Self::SuspiciousActivity => "⚠️",
            Self::IpBlocked => "🚫",
            Self::Other => "•",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityEvent {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: SecurityEventType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityStats {
    pub security_score: u32,
    #[serde(rename = "failedLogins24h")]
    pub failed_logins_24h: u32,
    pub blocked_ips: u32,
    pub active_sessions: u32,
}

impl SecurityStats {
    pub fn score_label(&self) -> &'static str {
        match self.security_score {
            80.. => "Good - System is well protected",
            60..=79 => "Fair - Some improvements recommended",
            _ => "Needs attention - Review security settings",
        }
    }
}

/// Policy settings. Fields the server omits keep these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecuritySettings {
    pub mfa_required: bool,
    pub session_timeout: u32,
    pub max_login_attempts: u32,
    pub password_min_length: u32,
    pub password_require_special: bool,
    pub password_require_numbers: bool,
    pub password_expiry: u32,
    pub ip_whitelist_enabled: bool,
    pub rate_limiting: bool,
    pub brute_force_protection: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            mfa_required: false,
            session_timeout: 30,
            max_login_attempts: 5,
            password_min_length: 12,
            password_require_special: true,
            password_require_numbers: true,
            password_expiry: 90,
            ip_whitelist_enabled: false,
            rate_limiting: true,
            brute_force_protection: true,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingError {
    #[error("Expected key=value, got '{0}'")]
    Malformed(String),
    #[error("Unknown security setting '{0}'")]
    UnknownKey(String),
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

impl SecuritySettings {
    /// Applies a `key=value` assignment. Keys use the wire (camelCase) or snake_case names.
    pub fn assign(&mut self, assignment: &str) -> Result<(), SettingError> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| SettingError::Malformed(assignment.to_string()))?;

        let invalid = || SettingError::InvalidValue { key: key.to_string(), value: value.to_string() };
        let flag = || value.parse::<bool>().map_err(|_| invalid());
        let number = || value.parse::<u32>().map_err(|_| invalid());

        match key.replace('_', "").to_lowercase().as_str() {
            "mfarequired" => self.mfa_required = flag()?,
            "sessiontimeout" => self.session_timeout = number()?,
            "maxloginattempts" => self.max_login_attempts = number()?,
            "passwordminlength" => self.password_min_length = number()?,
            "passwordrequirespecial" => self.password_require_special = flag()?,
            "passwordrequirenumbers" => self.password_require_numbers = flag()?,
            "passwordexpiry" => self.password_expiry = number()?,
            "ipwhitelistenabled" => self.ip_whitelist_enabled = flag()?,
            "ratelimiting" => self.rate_limiting = flag()?,
            "bruteforceprotection" => self.brute_force_protection = flag()?,
            _ => return Err(SettingError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityOverview {
    pub events: Vec<SecurityEvent>,
    pub stats: SecurityStats,
    pub settings: SecuritySettings,
}

impl SecurityOverview {
    pub fn high_severity_count(&self) -> usize {
        self.events.iter().filter(|e| e.severity >= Severity::High).count()
    }
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default, deserialize_with = "de::null_as_default")]
    events: Vec<SecurityEvent>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default, deserialize_with = "de::null_as_default")]
    stats: SecurityStats,
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    #[serde(default)]
    settings: Option<SecuritySettings>,
}

impl AdminClient {
    async fn security_resource<T: DeserializeOwned>(&self, resource: &str) -> Result<Option<T>, ApiError> {
        let url = self.admin_endpoint(&format!("/admin/system/security/{}", resource));
        let request = self.authorized(self.http().get(&url))?;
        match self.send_json(request, "Failed to load security data").await {
            Ok(body) => Ok(Some(body)),
            Err(ApiError::Status { status, message }) => {
                tracing::warn!("Security {} unavailable ({}): {}", resource, status, message);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Loads events, stats and settings concurrently. A section the server
    /// answers with an error status keeps its defaults; auth and network
    /// failures fail the whole overview.
    pub async fn security_overview(&self) -> Result<SecurityOverview, ApiError> {
        tracing::info!("Fetching security overview");
        let (events, stats, settings) = tokio::join!(
            self.security_resource::<EventsResponse>("events"),
            self.security_resource::<StatsResponse>("stats"),
            self.security_resource::<SettingsResponse>("settings"),
        );

        Ok(SecurityOverview {
            events: events?.map(|r| r.events).unwrap_or_default(),
            stats: stats?.map(|r| r.stats).unwrap_or_default(),
            settings: settings?.and_then(|r| r.settings).unwrap_or_default(),
        })
    }

    pub async fn save_security_settings(&self, settings: &SecuritySettings) -> Result<(), ApiError> {
        let url = self.admin_endpoint("/admin/system/security/settings");
        tracing::info!("Saving security settings");
        tracing::debug!("PUT {} with payload: {:?}", url, settings);

        let request = self.authorized(self.http().put(&url))?.json(settings);
        self.send_empty(request, "Failed to save security settings").await
    }
}
