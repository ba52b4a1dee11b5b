use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::types::FilteredLogEvent;
use aws_sdk_cloudwatchlogs::{Client as CloudWatchLogsClient, Error as CloudWatchLogsError};

use thiserror::Error;

/// A single log entry returned from CloudWatch Logs.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp_millis: i64,
    pub message: String,
    pub log_stream_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum AwsLogError {
    #[error("CloudWatch Logs request failed for log group {log_group:?}: {source}")]
    CloudWatch {
        log_group: String,
        #[source]
        source: CloudWatchLogsError,
    },

    #[error("failed to list CloudWatch log groups in region {region:?}: {message}")]
    ListLogGroups {
        region: Option<String>,
        message: String,
    },
}

/// One page of a time window, newest entries first.
#[derive(Debug, Clone)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    /// Nothing older than this page exists within the window.
    pub all_past_loaded: bool,
}

/// Parameters for fetching one page of a `[start, end)` window.
pub struct FetchLogsParams<'a> {
    pub profile: Option<&'a str>,
    pub region: Option<&'a str>,
    pub log_group: &'a str,
    pub filter_pattern: Option<&'a str>,
    /// Unix seconds.
    pub start_timestamp: Option<i64>,
    /// Unix seconds; `None` means up to now.
    pub end_timestamp: Option<i64>,
    pub limit: usize,
    /// Entries to skip, counted from the newest.
    pub offset: usize,
    /// Stop paging CloudWatch after this many events.
    pub max_events: usize,
}

async fn mk_client(profile: Option<&str>, region: Option<&str>) -> CloudWatchLogsClient {
    let mut loader = aws_config::from_env();

    if let Some(p) = profile {
        loader = loader.profile_name(p.to_string());
    }

    if let Some(r) = region {
        let region = aws_config::Region::new(r.to_string());
        loader = loader.region(region);
    } else {
        return CloudWatchLogsClient::new(
            &aws_config::load_defaults(BehaviorVersion::latest()).await,
        );
    }

    let config = loader.load().await;
    CloudWatchLogsClient::new(&config)
}

/// Fetch one page of log events from a time window using FilterLogEvents.
///
/// CloudWatch returns events oldest first, so the whole window (up to
/// `max_events`) is pulled before the page is cut from the newest end.
pub async fn fetch_log_page(params: FetchLogsParams<'_>) -> Result<LogPage, AwsLogError> {
    let client: CloudWatchLogsClient = mk_client(params.profile, params.region).await;

    let mut events: Vec<LogEntry> = Vec::new();
    let mut next_token: Option<String> = None;
    let mut truncated = false;

    loop {
        let mut req = client
            .filter_log_events()
            .log_group_name(params.log_group)
            .set_next_token(next_token.take());

        if let Some(start) = params.start_timestamp {
            req = req.start_time(start.saturating_mul(1000));
        }
        if let Some(end) = params.end_timestamp {
            // CloudWatch's end time is inclusive.
            req = req.end_time(end.saturating_mul(1000) - 1);
        }
        if let Some(pattern) = params.filter_pattern {
            let pattern = pattern.trim();
            if !pattern.is_empty() {
                req = req.filter_pattern(pattern);
            }
        }

        let resp = req.send().await.map_err(|e| AwsLogError::CloudWatch {
            log_group: params.log_group.to_string(),
            source: e.into(),
        })?;

        events.extend(resp.events.unwrap_or_default().into_iter().map(filtered_to_entry));

        if events.len() >= params.max_events {
            log::warn!(
                "stopped paging {} after {} events",
                params.log_group,
                events.len()
            );
            truncated = true;
            break;
        }

        match resp.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    log::debug!(
        "fetched {} events from {} (offset {}, limit {})",
        events.len(),
        params.log_group,
        params.offset,
        params.limit
    );

    Ok(paginate(events, params.offset, params.limit, truncated))
}

/// Sort newest first and cut `[offset, offset + limit)`.
fn paginate(mut events: Vec<LogEntry>, offset: usize, limit: usize, truncated: bool) -> LogPage {
    events.sort_by(|a, b| b.timestamp_millis.cmp(&a.timestamp_millis));
    let total = events.len();
    let entries: Vec<LogEntry> = events.into_iter().skip(offset).take(limit).collect();
    LogPage {
        entries,
        all_past_loaded: !truncated && offset.saturating_add(limit) >= total,
    }
}

fn filtered_to_entry(event: FilteredLogEvent) -> LogEntry {
    LogEntry {
        timestamp_millis: event.timestamp.unwrap_or_default(),
        message: event.message.unwrap_or_default(),
        log_stream_name: event.log_stream_name,
    }
}

pub async fn list_log_groups(
    profile: Option<&str>,
    region: Option<&str>,
    limit: i32,
) -> Result<Vec<String>, AwsLogError> {
    let client: CloudWatchLogsClient = mk_client(profile, region).await;

    let mut req = client.describe_log_groups();
    if limit > 0 {
        // Cap at 50 to satisfy CloudWatch constraints.
        let capped = std::cmp::min(limit, 50);
        req = req.limit(capped);
    }

    let resp = req.send().await.map_err(|e| {
        log::error!("DescribeLogGroups raw error: {e:?}");
        AwsLogError::ListLogGroups {
            region: region.map(str::to_string),
            message: e.to_string(),
        }
    })?;

    let groups = resp
        .log_groups
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| g.log_group_name.map(|name| name.trim().to_string()))
        .collect();

    Ok(groups)
}
