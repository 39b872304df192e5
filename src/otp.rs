use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Codes are valid for five minutes from issue.
const OTP_TTL_MINUTES: i64 = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    /// Wrong code for an email that has a live entry. The entry is kept so
    /// the user can retry.
    Mismatch,
    /// No entry, or the entry's five minutes are up.
    MissingOrExpired,
}

struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Process-local store of pending login codes, keyed by email.
///
/// Expired entries are swept lazily on each issue/verify call; nothing
/// survives a restart and nothing is shared across instances, which is fine
/// for a single-instance deployment only.
#[derive(Clone, Default)]
pub struct OtpStore {
    inner: Arc<Mutex<HashMap<String, OtpEntry>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `code` for `email`, replacing any previous code.
    pub fn issue(&self, email: &str, code: String) {
        self.issue_at(email, code, Utc::now());
    }

    /// Check `code` against the stored entry; a valid match consumes it.
    pub fn verify(&self, email: &str, code: &str) -> OtpCheck {
        self.verify_at(email, code, Utc::now())
    }

    fn issue_at(&self, email: &str, code: String, now: DateTime<Utc>) {
        let mut entries = self.inner.lock().expect("otp store lock poisoned");
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            email.to_string(),
            OtpEntry {
                code,
                expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
            },
        );
    }

    fn verify_at(&self, email: &str, code: &str, now: DateTime<Utc>) -> OtpCheck {
        let mut entries = self.inner.lock().expect("otp store lock poisoned");
        entries.retain(|_, entry| entry.expires_at > now);

        match entries.get(email) {
            None => OtpCheck::MissingOrExpired,
            Some(entry) if entry.code != code => OtpCheck::Mismatch,
            Some(_) => {
                entries.remove(email);
                OtpCheck::Valid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn valid_code_is_consumed() {
        let store = OtpStore::new();
        store.issue_at("rider@example.com", "123456".into(), at(0));

        assert_eq!(store.verify_at("rider@example.com", "123456", at(1)), OtpCheck::Valid);
        // Consumed: a second attempt finds nothing.
        assert_eq!(
            store.verify_at("rider@example.com", "123456", at(1)),
            OtpCheck::MissingOrExpired
        );
    }

    #[test]
    fn wrong_code_keeps_the_entry() {
        let store = OtpStore::new();
        store.issue_at("rider@example.com", "123456".into(), at(0));

        assert_eq!(store.verify_at("rider@example.com", "654321", at(1)), OtpCheck::Mismatch);
        assert_eq!(store.verify_at("rider@example.com", "123456", at(2)), OtpCheck::Valid);
    }

    #[test]
    fn correct_code_past_expiry_is_rejected() {
        let store = OtpStore::new();
        store.issue_at("rider@example.com", "123456".into(), at(0));

        assert_eq!(
            store.verify_at("rider@example.com", "123456", at(6)),
            OtpCheck::MissingOrExpired
        );
    }

    #[test]
    fn reissue_replaces_previous_code() {
        let store = OtpStore::new();
        store.issue_at("rider@example.com", "111111".into(), at(0));
        store.issue_at("rider@example.com", "222222".into(), at(1));

        assert_eq!(store.verify_at("rider@example.com", "111111", at(2)), OtpCheck::Mismatch);
        assert_eq!(store.verify_at("rider@example.com", "222222", at(2)), OtpCheck::Valid);
    }

    #[test]
    fn unknown_email_is_missing() {
        let store = OtpStore::new();
        assert_eq!(
            store.verify_at("nobody@example.com", "123456", at(0)),
            OtpCheck::MissingOrExpired
        );
    }
}
