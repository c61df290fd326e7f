//! # OTP Flows
//!
//! The OTP service end to end over the shared store, with a manual clock.
//!
//! ## Properties Tested
//!
//! 1. **Cooldown**: re-issue within 60s is rejected with seconds remaining
//! 2. **Single use**: a verified code cannot be used again
//! 3. **Lockout**: three misses, then the record is gone
//! 4. **Expiry**: valid at exactly 5 minutes, expired 1ms later
//! 5. **Mailbox**: the delivered code digests to the stored hash
//! 6. **Shared store**: a code issued in one context verifies in another

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rc_01_otp_verification::{OtpError, OtpRecord, OtpVerificationApi, VerificationState};
    use shared_crypto::sha256_hex;
    use shared_types::{KeyValueStore, StoreKey};

    use crate::fixtures::{wrong_code, OtpHarness, T0};

    const EMAIL: &str = "donor@example.com";

    fn stored_record(h: &OtpHarness, email: &str) -> Option<OtpRecord> {
        let raw = h.store.get(StoreKey::OtpRecords).unwrap()?;
        let mut map: std::collections::BTreeMap<String, OtpRecord> =
            serde_json::from_str(&raw).unwrap();
        map.remove(email)
    }

    #[tokio::test]
    async fn test_resend_cooldown() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        h.next_code().await;

        let err = h.service.issue_code(EMAIL).await.unwrap_err();
        assert!(matches!(err, OtpError::CooldownActive { remaining_secs: 60 }));
        assert_eq!(err.to_string(), "Resend cooldown active.");

        h.advance(Duration::from_millis(59_001));
        assert!(matches!(
            h.service.issue_code(EMAIL).await,
            Err(OtpError::CooldownActive { remaining_secs: 1 })
        ));

        h.advance(Duration::from_millis(999));
        h.service.issue_code(EMAIL).await.unwrap();
        h.next_code().await;
    }

    #[tokio::test]
    async fn test_resend_invalidates_previous_code() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        let first = h.next_code().await;

        h.advance(Duration::from_secs(61));
        h.service.issue_code(EMAIL).await.unwrap();
        let second = h.next_code().await;

        if first != second {
            assert!(matches!(
                h.service.verify_code(EMAIL, &first).await,
                Err(OtpError::InvalidCode { .. })
            ));
        }
        h.service.verify_code(EMAIL, &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        let code = h.next_code().await;

        h.service.verify_code(EMAIL, &code).await.unwrap();
        let err = h.service.verify_code(EMAIL, &code).await.unwrap_err();
        assert!(matches!(err, OtpError::SessionExpired));
        assert_eq!(err.to_string(), "Session expired. Request new code.");
        assert!(stored_record(&h, EMAIL).is_none());
    }

    #[tokio::test]
    async fn test_three_strikes_lockout() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        let code = h.next_code().await;
        let wrong = wrong_code(&code);

        for remaining in [2, 1, 0] {
            let err = h.service.verify_code(EMAIL, &wrong).await.unwrap_err();
            assert!(matches!(
                err,
                OtpError::InvalidCode { remaining_attempts } if remaining_attempts == remaining
            ));
        }
        assert_eq!(stored_record(&h, EMAIL).unwrap().attempts, 3);

        // Even the right code is refused once the budget is spent.
        let err = h.service.verify_code(EMAIL, &code).await.unwrap_err();
        assert!(matches!(err, OtpError::TooManyAttempts));
        assert_eq!(err.to_string(), "Too many attempts. Safety block active.");

        assert!(matches!(
            h.service.verify_code(EMAIL, &code).await,
            Err(OtpError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_invalid_code_message() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        let code = h.next_code().await;

        let err = h.service.verify_code(EMAIL, &wrong_code(&code)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid code. 2 tries left.");
        assert_eq!(
            h.service.state(EMAIL).await.unwrap(),
            VerificationState::Pending {
                attempts: 1,
                expires_at: T0 + 300_000,
            }
        );
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let mut h = OtpHarness::new();
        h.service.issue_code(EMAIL).await.unwrap();
        let code = h.next_code().await;

        h.advance(Duration::from_secs(300));
        h.service.verify_code(EMAIL, &code).await.unwrap();

        h.advance(Duration::from_secs(60));
        h.service.issue_code(EMAIL).await.unwrap();
        let code = h.next_code().await;
        h.advance(Duration::from_millis(300_001));

        assert_eq!(h.service.state(EMAIL).await.unwrap(), VerificationState::Expired);
        let err = h.service.verify_code(EMAIL, &code).await.unwrap_err();
        assert!(matches!(err, OtpError::CodeExpired));
        assert_eq!(err.to_string(), "OTP has expired.");
        assert_eq!(h.service.state(EMAIL).await.unwrap(), VerificationState::None);
    }

    #[tokio::test]
    async fn test_mailbox_code_matches_stored_digest() {
        let mut h = OtpHarness::new();
        let receipt = h.service.issue_code(EMAIL).await.unwrap();
        let mail = h.next_mail().await;

        assert_eq!(mail.email, EMAIL);
        assert_eq!(mail.code.len(), 6);
        assert!(mail.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(mail.issued_at.timestamp_millis(), T0 as i64);

        let record = stored_record(&h, EMAIL).unwrap();
        assert_eq!(record.hash, sha256_hex(&mail.code).into_string());
        assert_eq!(record.expires, receipt.expires_at);
        assert_eq!(record.cooldown, T0 + 60_000);

        let raw = h.store.get(StoreKey::OtpRecords).unwrap().unwrap();
        assert!(!raw.contains(&mail.code));
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[EMAIL]["attempts"], 0);
    }

    #[tokio::test]
    async fn test_code_verifies_from_another_context() {
        let mut issuer = OtpHarness::new();
        let verifier =
            OtpHarness::over_store(Arc::clone(&issuer.store), Arc::clone(&issuer.clock));

        issuer.service.issue_code(EMAIL).await.unwrap();
        let code = issuer.next_code().await;

        verifier.service.verify_code(EMAIL, &code).await.unwrap();
        assert!(matches!(
            issuer.service.verify_code(EMAIL, &code).await,
            Err(OtpError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_emails_are_independent() {
        let mut h = OtpHarness::new();
        h.service.issue_code("a@example.com").await.unwrap();
        let code_a = h.next_code().await;
        h.service.issue_code("b@example.com").await.unwrap();
        h.next_code().await;

        h.service.verify_code("a@example.com", &code_a).await.unwrap();
        assert!(matches!(
            h.service.state("b@example.com").await.unwrap(),
            VerificationState::Pending { attempts: 0, .. }
        ));
    }
}
