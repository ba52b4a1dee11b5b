//! The externally owned query state (the URL query string of a log view)
//! and the stores that hold it.
//!
//! The toolbar never holds on to a store; it is handed one whenever it needs
//! to read or navigate, so tests can use [`MemoryQueryStore`] directly.

use serde_json::{Map, Value};

use crate::error::ToolbarError;

pub const START_TIMESTAMP_PARAM: &str = "start_timestamp";
pub const END_TIMESTAMP_PARAM: &str = "end_timestamp";
pub const LIMIT_PARAM: &str = "_limit";
pub const OFFSET_PARAM: &str = "_offset";

/// Number of log entries requested per page.
pub const LOG_FILE_COUNT_INTERVAL: u32 = 20;

/// Snapshot of the query parameters.
///
/// Values are JSON primitives. Two snapshots are equal when their contents
/// are, regardless of where they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState(Map<String, Value>);

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL query string (with or without the leading `?`). Every value
    /// is kept as a string, exactly as a browser would report it.
    pub fn parse_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let map = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();
        Self(map)
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    serializer.append_pair(key, s);
                }
                other => {
                    serializer.append_pair(key, &other.to_string());
                }
            }
        }
        serializer.finish()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read an integer parameter, accepting both JSON numbers and numeric
    /// strings.
    pub fn integer(&self, key: &str) -> ParamValue {
        match self.0.get(key) {
            None | Some(Value::Null) => ParamValue::Absent,
            Some(value) => match as_integer(value) {
                Some(n) => ParamValue::Valid(n),
                None => ParamValue::Malformed(value.to_string()),
            },
        }
    }

    /// A timestamp parameter. `0` counts as absent, like an empty value.
    pub fn timestamp(&self, key: &str) -> ParamValue {
        match self.integer(key) {
            ParamValue::Valid(0) => ParamValue::Absent,
            other => other,
        }
    }

    pub fn start_timestamp(&self) -> ParamValue {
        self.timestamp(START_TIMESTAMP_PARAM)
    }

    pub fn end_timestamp(&self) -> ParamValue {
        self.timestamp(END_TIMESTAMP_PARAM)
    }

    pub fn offset(&self) -> Option<i64> {
        self.integer(OFFSET_PARAM).valid()
    }

    pub fn limit(&self) -> Option<i64> {
        self.integer(LIMIT_PARAM).valid()
    }

    /// Merge `patch` into `self`. A `null` in the patch removes the key.
    pub fn merge(&mut self, patch: &QueryState) {
        for (key, value) in &patch.0 {
            if value.is_null() {
                self.0.remove(key);
            } else {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }
}

impl FromIterator<(String, Value)> for QueryState {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// Result of reading a numeric query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Absent,
    Valid(i64),
    /// Present but not a number; carries the raw value for logging.
    Malformed(String),
}

impl ParamValue {
    pub fn valid(&self) -> Option<i64> {
        match self {
            ParamValue::Valid(n) => Some(*n),
            _ => None,
        }
    }
}

/// The full tuple the toolbar writes on every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationQuery {
    pub start_timestamp: i64,
    /// `None` means open-ended up to now.
    pub end_timestamp: Option<i64>,
    pub limit: u32,
    pub offset: u32,
}

impl NavigationQuery {
    /// All four keys, with an open end written as an explicit `null` so it
    /// clears any previous `end_timestamp`.
    pub fn to_patch(&self) -> QueryState {
        let mut patch = QueryState::new();
        patch.set(START_TIMESTAMP_PARAM, self.start_timestamp);
        patch.set(
            END_TIMESTAMP_PARAM,
            self.end_timestamp.map_or(Value::Null, Value::from),
        );
        patch.set(LIMIT_PARAM, self.limit);
        patch.set(OFFSET_PARAM, self.offset);
        patch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Record the previous state so it can be returned to with "back".
    pub push_history: bool,
    /// Drop every key not present in the patch instead of merging.
    pub replace_params: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            push_history: true,
            replace_params: false,
        }
    }
}

/// Shared, externally addressable query state.
pub trait QueryStore {
    /// Current snapshot. May be a fresh allocation on every call, compare
    /// with `==`.
    fn read(&self) -> QueryState;

    /// Apply `patch` atomically and navigate.
    fn navigate(&mut self, patch: &QueryState, options: NavigateOptions)
    -> Result<(), ToolbarError>;
}

/// In-process query store with browser-like history.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueryStore {
    current: QueryState,
    back: Vec<QueryState>,
    forward: Vec<QueryState>,
    navigations: usize,
}

impl MemoryQueryStore {
    pub fn new(initial: QueryState) -> Self {
        Self {
            current: initial,
            ..Default::default()
        }
    }

    pub fn from_query_string(query: &str) -> Self {
        Self::new(QueryState::parse_query_string(query))
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Returns `false` if there is no history to go back to.
    pub fn back(&mut self) -> bool {
        match self.back.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.current, previous);
                self.forward.push(current);
                true
            }
            None => false,
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.forward.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.current, next);
                self.back.push(current);
                true
            }
            None => false,
        }
    }

    /// Number of `navigate` calls so far.
    pub fn navigation_count(&self) -> usize {
        self.navigations
    }
}

impl QueryStore for MemoryQueryStore {
    fn read(&self) -> QueryState {
        self.current.clone()
    }

    fn navigate(
        &mut self,
        patch: &QueryState,
        options: NavigateOptions,
    ) -> Result<(), ToolbarError> {
        if let Some((key, _)) = patch
            .iter()
            .find(|(_, value)| matches!(value, Value::Array(_) | Value::Object(_)))
        {
            return Err(ToolbarError::Store(format!(
                "{key} is not a primitive and cannot be carried in a query string"
            )));
        }

        let mut next = if options.replace_params {
            QueryState::new()
        } else {
            self.current.clone()
        };
        next.merge(patch);

        let previous = std::mem::replace(&mut self.current, next);
        if options.push_history {
            self.back.push(previous);
            self.forward.clear();
        }
        self.navigations += 1;

        log::debug!("navigated to ?{}", self.current.to_query_string());
        Ok(())
    }
}
