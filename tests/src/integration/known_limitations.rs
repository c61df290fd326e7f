//! # Known Limitations
//!
//! Behaviour that is documented rather than hardened. These tests pin it so a
//! change is noticed.
//!
//! OTP records are read-modify-written over a store shared by every context,
//! with no lock between the read and the write. Two contexts verifying the
//! same email at once can both read the same `attempts` and one increment is
//! lost (last writer wins).

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rc_01_otp_verification::{KvOtpRecordStore, OtpRecord, OtpRecordStore};
    use shared_types::InMemoryKeyValueStore;

    use crate::fixtures::T0;

    const EMAIL: &str = "donor@example.com";

    #[test]
    fn test_interleaved_attempt_writes_lose_an_increment() {
        let shared = Arc::new(InMemoryKeyValueStore::new());
        let tab_a = KvOtpRecordStore::new(Arc::clone(&shared));
        let tab_b = KvOtpRecordStore::new(Arc::clone(&shared));

        tab_a
            .save(EMAIL, &OtpRecord::new(EMAIL.into(), "ab".repeat(32), T0 + 300_000, T0 + 60_000))
            .unwrap();

        // Both contexts read before either writes.
        let mut seen_by_a = tab_a.load(EMAIL).unwrap().unwrap();
        let mut seen_by_b = tab_b.load(EMAIL).unwrap().unwrap();

        seen_by_a.attempts += 1;
        tab_a.save(EMAIL, &seen_by_a).unwrap();
        seen_by_b.attempts += 1;
        tab_b.save(EMAIL, &seen_by_b).unwrap();

        let after = tab_a.load(EMAIL).unwrap().unwrap();
        assert_eq!(after.attempts, 1, "two misses recorded as one");
    }

    #[test]
    fn test_sequential_writes_count_every_attempt() {
        let shared = Arc::new(InMemoryKeyValueStore::new());
        let tab_a = KvOtpRecordStore::new(Arc::clone(&shared));
        let tab_b = KvOtpRecordStore::new(Arc::clone(&shared));

        tab_a
            .save(EMAIL, &OtpRecord::new(EMAIL.into(), "ab".repeat(32), T0 + 300_000, T0 + 60_000))
            .unwrap();

        let mut record = tab_a.load(EMAIL).unwrap().unwrap();
        record.attempts += 1;
        tab_a.save(EMAIL, &record).unwrap();

        let mut record = tab_b.load(EMAIL).unwrap().unwrap();
        record.attempts += 1;
        tab_b.save(EMAIL, &record).unwrap();

        assert_eq!(tab_a.load(EMAIL).unwrap().unwrap().attempts, 2);
    }
}
