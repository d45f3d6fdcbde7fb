use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::sync::{Mutex, PoisonError};

pub const RECORD_KEY_PREFIX: &str = "data";

#[derive(Debug, Default)]
struct LastIssued {
    millis: i64,
    seq: u64,
}

/// Issues `data-<ISO8601>` keys that never repeat within one process.
///
/// Keys issued in the same millisecond (or after the wall clock stepped
/// backwards) keep the last issued millisecond and gain a zero-padded
/// `-<n>` suffix, so issued keys also sort in issue order.
#[derive(Debug)]
pub struct KeyGenerator {
    prefix: String,
    last: Mutex<Option<LastIssued>>,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::with_prefix(RECORD_KEY_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last: Mutex::new(None),
        }
    }

    pub fn next_key(&self) -> String {
        self.next_key_at(Utc::now())
    }

    pub fn next_key_at(&self, now: DateTime<Utc>) -> String {
        let now_millis = now.timestamp_millis();

        let (millis, seq) = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let issued = match last.take() {
                Some(prev) if now_millis <= prev.millis => LastIssued {
                    millis: prev.millis,
                    seq: prev.seq + 1,
                },
                _ => LastIssued {
                    millis: now_millis,
                    seq: 0,
                },
            };
            let pair = (issued.millis, issued.seq);
            *last = Some(issued);
            pair
        };

        let timestamp = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        if seq == 0 {
            format!("{}-{}", self.prefix, timestamp)
        } else {
            format!("{}-{}-{:06}", self.prefix, timestamp, seq)
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
