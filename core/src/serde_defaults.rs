//! Common serde default value functions
//!
//! Used by the configuration structs so a partial TOML document still loads.

use crate::map::{DEFAULT_LAT_SPAN, DEFAULT_LON_SPAN, DEFAULT_NORTH, DEFAULT_WEST};

pub fn default_resume_delay_ms() -> u64 {
    1000
}

pub fn default_facing_mode() -> String {
    "environment".to_string()
}

pub fn default_device_id_key() -> String {
    "venue_user_id".to_string()
}

pub fn default_remembered_email_key() -> String {
    "remembered_email".to_string()
}

pub fn default_auth_session_key() -> String {
    "passport_auth_session".to_string()
}

pub fn default_callback_path() -> String {
    "/auth/callback".to_string()
}

pub fn default_west() -> f64 {
    DEFAULT_WEST
}

pub fn default_north() -> f64 {
    DEFAULT_NORTH
}

pub fn default_lon_span() -> f64 {
    DEFAULT_LON_SPAN
}

pub fn default_lat_span() -> f64 {
    DEFAULT_LAT_SPAN
}
