// Status client: reads the current status for the menu header and writes
// new statuses, turning template expiration policies into timestamps.

use crate::api::{Profile, ProfileApi, ProfileUpdate};
use crate::error::AppError;
use crate::expiration::{compute_expiration, describe_expiration};
use chrono::{DateTime, Local, TimeZone};
use crossterm::style::Stylize;

pub struct StatusClient<A> {
    api: A,
}

impl<A: ProfileApi> StatusClient<A> {
    pub fn new(api: A) -> Self {
        StatusClient { api }
    }

    /// Fetch the caller's profile.
    pub fn current(&self) -> Result<Profile, AppError> {
        self.api.get_profile()
    }

    /// Header lines describing the current status. Never fails: a fetch
    /// error is logged and rendered as an error line instead, so the menu
    /// can always be drawn.
    pub fn current_status_line(&self) -> String {
        match self.current() {
            Ok(profile) => describe_profile(&profile, &Local),
            Err(err) => {
                log::info!("could not fetch current status: {err}");
                "Could not fetch the current status".red().to_string()
            }
        }
    }

    /// Set the status now.
    pub fn set_status(
        &self,
        text: &str,
        emoji: &str,
        duration_minutes: Option<f64>,
        until_time: Option<&str>,
    ) -> Result<(), AppError> {
        self.set_status_at(&Local::now(), text, emoji, duration_minutes, until_time)
    }

    /// Set the status as if the current time were `now`.
    pub fn set_status_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        text: &str,
        emoji: &str,
        duration_minutes: Option<f64>,
        until_time: Option<&str>,
    ) -> Result<(), AppError> {
        let expiration = compute_expiration(now, duration_minutes, until_time);
        let update = ProfileUpdate {
            status_text: text.to_string(),
            status_emoji: emoji.to_string(),
            status_expiration: expiration.unwrap_or(0),
        };
        self.api.set_profile(&update)
    }
}

/// Two header lines: who is logged in, and what their status is.
pub fn describe_profile<Tz: TimeZone>(profile: &Profile, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let text = if profile.status_text.is_empty() {
        "No status set"
    } else {
        profile.status_text.as_str()
    };
    let mut status = format!("Current status: {} {}", text, profile.status_emoji);
    if let Some(until) = describe_expiration(profile.status_expiration, tz) {
        status.push_str(&format!(" (until {until})"));
    }
    format!(
        "{}\n{}",
        format!("Logged in as: {}", profile.user_name()).blue(),
        status.trim_end().to_string().green()
    )
}
