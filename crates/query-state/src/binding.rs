//! Binding between a typed value and one URL query parameter.
//!
//! Reads are never throttled: [`QueryState::value`] always returns the latest
//! value, including one whose URL write is still waiting. Writes go through a
//! single pending slot per parameter. A `set` inside the throttle window
//! replaces whatever was pending, so only the most recent value reaches the
//! URL.

use std::time::Instant;

use tracing::debug;

use crate::error::QueryStateError;
use crate::location::UrlContext;
use crate::options::QueryStateOptions;
use crate::parser::{Parser, WithDefault};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingWrite {
    Set(String),
    Remove,
}

type Subscriber<V> = Box<dyn FnMut(&V)>;

pub struct QueryState<P: Parser> {
    key: String,
    parser: WithDefault<P>,
    options: QueryStateOptions,
    value: P::Value,
    pending: Option<PendingWrite>,
    last_write: Option<Instant>,
    /// URL value left by this binding's last write. `None` after a removal.
    last_written: Option<String>,
    subscribers: Vec<Subscriber<P::Value>>,
}

impl<P: Parser> QueryState<P> {
    pub fn new(key: impl Into<String>, parser: WithDefault<P>) -> Result<Self, QueryStateError> {
        let key = key.into();
        if key.is_empty() {
            return Err(QueryStateError::EmptyKey);
        }
        let value = parser.default_value().clone();
        Ok(Self {
            key,
            parser,
            options: QueryStateOptions::default(),
            value,
            pending: None,
            last_write: None,
            last_written: None,
            subscribers: Vec::new(),
        })
    }

    pub fn with_options(mut self, options: QueryStateOptions) -> Self {
        self.options = options.normalized();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> &QueryStateOptions {
        &self.options
    }

    pub fn value(&self) -> &P::Value {
        &self.value
    }

    /// Whether a throttled write is waiting for its window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending write may be flushed, if there is one.
    pub fn next_flush_at(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_write.map(|last| last + self.options.throttle())
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&P::Value) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Re-read the parameter after the URL changed.
    ///
    /// While a write is pending, the URL still holds this binding's previous
    /// write unless something else replaced it. Only such a replacement
    /// supersedes the pending write; changes to other parameters leave it and
    /// the current value alone. Subscribers are notified only if the decoded
    /// value changed. Returns whether it did.
    pub fn sync(&mut self, context: &UrlContext) -> bool {
        let raw = context.params().get(&self.key);
        if self.pending.is_some() {
            if raw == self.last_written.as_deref() {
                return false;
            }
            self.pending = None;
            debug!(key = %self.key, "navigation superseded pending write");
        }
        let next = self.parser.parse_server_side(raw);
        if next == self.value {
            return false;
        }
        self.value = next;
        self.notify();
        true
    }

    /// Replace the value and schedule its URL write.
    pub fn set(&mut self, value: P::Value, context: &mut UrlContext, now: Instant) {
        let serialized = self.parser.serialize(&value);
        self.value = value;
        self.notify();
        self.schedule(PendingWrite::Set(serialized), context, now);
    }

    /// Reset to the default and schedule removal of the parameter.
    pub fn clear(&mut self, context: &mut UrlContext, now: Instant) {
        self.value = self.parser.default_value().clone();
        self.notify();
        self.schedule(PendingWrite::Remove, context, now);
    }

    /// Write the pending value if its throttle window has elapsed.
    ///
    /// Returns whether a write happened.
    pub fn flush(&mut self, context: &mut UrlContext, now: Instant) -> bool {
        if self.pending.is_none() || !self.window_elapsed(now) {
            return false;
        }
        match self.pending.take() {
            Some(write) => {
                self.write(write, context, now);
                true
            }
            None => false,
        }
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        self.last_write
            .map_or(true, |last| now.saturating_duration_since(last) >= self.options.throttle())
    }

    fn schedule(&mut self, write: PendingWrite, context: &mut UrlContext, now: Instant) {
        if self.window_elapsed(now) {
            self.pending = None;
            self.write(write, context, now);
        } else if self.pending.replace(write).is_some() {
            debug!(key = %self.key, "superseded pending write");
        }
    }

    fn write(&mut self, write: PendingWrite, context: &mut UrlContext, now: Instant) {
        let value = match write {
            PendingWrite::Set(serialized) => Some(serialized),
            PendingWrite::Remove => None,
        };
        context.write(&self.key, value.as_deref(), self.options.history);
        self.last_written = value;
        self.last_write = Some(now);
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.value);
        }
    }
}

impl<P: Parser> std::fmt::Debug for QueryState<P>
where
    P::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryState")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("options", &self.options)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::HistoryMode;
    use crate::parsers::{IntegerParser, StringParser};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn threshold() -> QueryState<IntegerParser> {
        QueryState::new("threshold", IntegerParser.with_default(1))
            .unwrap()
            .with_options(QueryStateOptions::default().with_throttle_ms(1000))
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = QueryState::new("", IntegerParser.with_default(1));
        assert!(matches!(result, Err(QueryStateError::EmptyKey)));
    }

    #[test]
    fn test_default_before_sync() {
        let state = threshold();
        assert_eq!(*state.value(), 1);
        assert!(!state.is_pending());
    }

    #[test]
    fn test_first_set_writes_immediately() {
        let mut context = UrlContext::new("/create");
        let mut state = threshold();
        state.set(2, &mut context, Instant::now());
        assert_eq!(context.params().get("threshold"), Some("2"));
        assert!(!state.is_pending());
    }

    #[test]
    fn test_throttle_keeps_latest() {
        let mut context = UrlContext::new("/create");
        let mut state = threshold();
        let start = Instant::now();

        state.set(2, &mut context, start);
        state.set(3, &mut context, start + Duration::from_millis(100));
        state.set(4, &mut context, start + Duration::from_millis(200));

        // Reads see the latest value right away.
        assert_eq!(*state.value(), 4);
        assert_eq!(context.params().get("threshold"), Some("2"));
        assert_eq!(state.next_flush_at(), Some(start + Duration::from_millis(1000)));

        assert!(!state.flush(&mut context, start + Duration::from_millis(999)));
        assert!(state.flush(&mut context, start + Duration::from_millis(1000)));
        assert_eq!(context.params().get("threshold"), Some("4"));
        assert!(!state.flush(&mut context, start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_clear_removes_param() {
        let mut context = UrlContext::from_href("/create?threshold=3");
        let mut state = threshold();
        assert!(state.sync(&context));
        assert_eq!(*state.value(), 3);

        state.clear(&mut context, Instant::now());
        assert_eq!(*state.value(), 1);
        assert!(!context.params().contains("threshold"));
    }

    #[test]
    fn test_sync_notifies_on_change_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = threshold();
        let sink = Rc::clone(&seen);
        state.subscribe(move |value| sink.borrow_mut().push(*value));

        let mut context = UrlContext::from_href("/create?threshold=2");
        assert!(state.sync(&context));
        assert!(!state.sync(&context));
        context.navigate("/create");
        assert!(state.sync(&context));

        assert_eq!(*seen.borrow(), vec![2, 1]);
    }

    #[test]
    fn test_navigation_drops_pending_write() {
        let mut context = UrlContext::new("/create");
        let mut state = threshold();
        let start = Instant::now();
        state.set(2, &mut context, start);
        state.set(5, &mut context, start + Duration::from_millis(10));
        assert!(state.is_pending());

        context.navigate("/create?threshold=7");
        state.sync(&context);
        assert!(!state.is_pending());
        assert_eq!(*state.value(), 7);
        assert!(!state.flush(&mut context, start + Duration::from_secs(10)));
        assert_eq!(context.params().get("threshold"), Some("7"));
    }

    #[test]
    fn test_sibling_write_keeps_pending_write() {
        let mut context = UrlContext::new("/create");
        let mut state = threshold();
        let mut address = QueryState::new("address", StringParser.with_default(String::new()))
            .unwrap();
        let start = Instant::now();
        state.set(2, &mut context, start);
        state.set(5, &mut context, start + Duration::from_millis(10));

        address.set("0xabc".to_string(), &mut context, start + Duration::from_millis(20));
        assert!(!state.sync(&context));
        assert!(state.is_pending());
        assert_eq!(*state.value(), 5);

        assert!(state.flush(&mut context, start + Duration::from_millis(1000)));
        assert_eq!(context.params().get("threshold"), Some("5"));
        assert_eq!(context.params().get("address"), Some("0xabc"));
    }

    #[test]
    fn test_pending_clear_survives_sibling_write() {
        let mut context = UrlContext::from_href("/create?threshold=3");
        let mut state = threshold();
        state.sync(&context);
        let start = Instant::now();
        state.set(4, &mut context, start);
        state.clear(&mut context, start + Duration::from_millis(10));

        context.write("address", Some("0xabc"), HistoryMode::Replace);
        assert!(!state.sync(&context));
        assert_eq!(*state.value(), 1);
        assert!(state.flush(&mut context, start + Duration::from_millis(1000)));
        assert!(!context.params().contains("threshold"));
    }

    #[test]
    fn test_push_history() {
        let mut context = UrlContext::new("/create");
        let mut state = QueryState::new("threshold", IntegerParser.with_default(1))
            .unwrap()
            .with_options(QueryStateOptions::default().with_history(HistoryMode::Push));
        let start = Instant::now();
        state.set(2, &mut context, start);
        state.set(3, &mut context, start + Duration::from_millis(60));
        assert_eq!(context.history_len(), 3);
    }
}
