use serde_json::Value as JsonValue;

use crate::aws::LogEntry;
use lumberjack_range::config::AwsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    RetroGreen,
}

#[derive(Default)]
pub struct LogsViewState {
    pub profile: String,
    pub region: String,
    pub log_group: String,
    pub filter_text: String,
    pub available_groups: Vec<String>,
    pub selected_group_index: Option<usize>,
    pub show_local_time: bool,
    pub entries: Vec<LogEntry>,
    /// The page on screen is the oldest one within the window.
    pub all_past_logs_loaded: bool,
}

impl LogsViewState {
    pub fn from_config(aws: &AwsConfig) -> Self {
        Self {
            profile: aws.profile.clone(),
            region: aws.region.clone(),
            log_group: aws.log_group.clone(),
            ..Default::default()
        }
    }

    /// The filter box goes to CloudWatch as-is. The page it returns is shown
    /// unfiltered, so `_limit`/`_offset` line up with what is on screen.
    pub fn filter_pattern(&self) -> Option<String> {
        non_empty(&self.filter_text)
    }
}

pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn try_pretty_json(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bytes = trimmed.as_bytes();
    let first = bytes[0] as char;
    let last = bytes[bytes.len() - 1] as char;
    if !((first == '{' && last == '}') || (first == '[' && last == ']')) {
        return None;
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(v) => serde_json::to_string_pretty(&v).ok(),
        Err(_) => None,
    }
}
