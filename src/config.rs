use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::inquiry_service::DepartureSchedule;
use crate::services::session_service::SessionSettings;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const WHATSAPP_NUMBER: &str = "9779847228505";
const AUDIT_LOG_PATH: &str = "data/tour_bookings.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub whatsapp_number: String,
    pub max_travelers: u32,
    pub audit_log_path: PathBuf,
    pub mongodb_uri: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub submit_delay: Duration,
    pub reset_delay: Duration,
    pub departure_interval_days: u32,
    pub departure_horizon_days: u32,
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            whatsapp_number: WHATSAPP_NUMBER.to_string(),
            max_travelers: 10,
            audit_log_path: PathBuf::from(AUDIT_LOG_PATH),
            mongodb_uri: None,
            catalog_path: None,
            submit_delay: Duration::from_millis(2000),
            reset_delay: Duration::from_millis(5000),
            departure_interval_days: 7,
            departure_horizon_days: 180,
            session_idle_timeout: Duration::from_secs(1800),
            max_sessions: 1000,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AppConfig {
    /// Read settings from the environment, keeping defaults for anything
    /// missing or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env_opt("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            whatsapp_number: env_opt("WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number),
            max_travelers: env_or("MAX_TRAVELERS", defaults.max_travelers).max(1),
            audit_log_path: env_opt("AUDIT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.audit_log_path),
            mongodb_uri: env_opt("MONGODB_URI"),
            catalog_path: env_opt("CATALOG_PATH").map(PathBuf::from),
            submit_delay: Duration::from_millis(env_or(
                "SUBMIT_DELAY_MS",
                defaults.submit_delay.as_millis() as u64,
            )),
            reset_delay: Duration::from_millis(env_or(
                "RESET_DELAY_MS",
                defaults.reset_delay.as_millis() as u64,
            )),
            departure_interval_days: env_or(
                "DEPARTURE_INTERVAL_DAYS",
                defaults.departure_interval_days,
            ),
            departure_horizon_days: env_or(
                "DEPARTURE_HORIZON_DAYS",
                defaults.departure_horizon_days,
            ),
            session_idle_timeout: Duration::from_secs(env_or(
                "SESSION_IDLE_SECS",
                defaults.session_idle_timeout.as_secs(),
            )),
            max_sessions: env_or("MAX_SESSIONS", defaults.max_sessions).max(1),
        }
    }

    pub fn departure_schedule(&self) -> DepartureSchedule {
        DepartureSchedule {
            interval_days: self.departure_interval_days,
            horizon_days: self.departure_horizon_days,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            max_travelers: self.max_travelers,
            submit_delay: self.submit_delay,
            reset_delay: self.reset_delay,
            schedule: self.departure_schedule(),
            idle_timeout: self.session_idle_timeout,
            max_sessions: self.max_sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_overrides_and_fallbacks() {
        std::env::set_var("PORT", "9090");
        std::env::set_var("MAX_TRAVELERS", "not-a-number");
        std::env::set_var("SUBMIT_DELAY_MS", "0");
        std::env::set_var("SESSION_IDLE_SECS", "90");
        std::env::remove_var("MONGODB_URI");

        let config = AppConfig::from_env();
        assert_eq!(config.port, 9090);
        assert_eq!(config.max_travelers, 10);
        assert_eq!(config.submit_delay, Duration::ZERO);
        assert!(config.mongodb_uri.is_none());
        assert_eq!(config.session_settings().idle_timeout, Duration::from_secs(90));
        assert_eq!(config.session_settings().max_sessions, 1000);

        std::env::remove_var("PORT");
        std::env::remove_var("MAX_TRAVELERS");
        std::env::remove_var("SUBMIT_DELAY_MS");
        std::env::remove_var("SESSION_IDLE_SECS");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        std::env::remove_var("WHATSAPP_NUMBER");
        let config = AppConfig::from_env();
        assert_eq!(config.whatsapp_number, "9779847228505");
        assert_eq!(config.session_settings().schedule.interval_days, 7);
    }
}
