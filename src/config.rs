use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Epicase";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port for the case registry server.
pub const DEFAULT_PORT: u16 = 3000;

/// Default base URL of the central case registry, used by the field client.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Reverse-geocoding endpoint (nominatim-compatible).
pub const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Place-search endpoint (photon-compatible).
pub const DEFAULT_PLACE_SEARCH_URL: &str = "https://photon.komoot.io/api/";

/// Mail-relay endpoint for referral notifications.
pub const DEFAULT_MAIL_RELAY_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Get the application data directory
/// ~/Epicase/ on all platforms (user-visible, field devices are shared)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Epicase")
}

/// Path of the field client's local record store.
pub fn field_store_path() -> PathBuf {
    app_data_dir().join("field_store.sqlite")
}

/// Path of the central registry database (server side).
pub fn registry_db_path() -> PathBuf {
    match std::env::var("EPICASE_DB") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("registry.sqlite"),
    }
}

/// Server listen port, overridable with EPICASE_PORT.
pub fn server_port() -> u16 {
    std::env::var("EPICASE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Registry base URL for the field client, overridable with EPICASE_API_BASE.
pub fn api_base() -> String {
    std::env::var("EPICASE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}
