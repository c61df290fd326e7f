//! # Relay Flows
//!
//! Several contexts on one hub.
//!
//! ## Properties Tested
//!
//! 1. **Fan-out**: every other context receives each event once, in order
//! 2. **No echo**: the publishing context never sees its own event
//! 3. **Unsubscribe**: no deliveries after it returns; others unaffected
//! 4. **GLOBAL_SOS**: payload survives the trip intact
//! 5. **Bursts**: a slow context receives a burst in full
//! 6. **No transport**: connecting fails fast

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;
    use shared_relay::{
        BroadcastMessagePayload, EventKind, MessageUrgency, NetworkRelay, RelayError, RelayEvent,
        RelayFilter, RelayHub, DEFAULT_CHANNEL_NAME,
    };
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    use crate::fixtures::sos_event;

    fn message(text: &str) -> RelayEvent {
        RelayEvent::BroadcastMessage(BroadcastMessagePayload {
            from: "Control Room".into(),
            message: text.into(),
            urgency: MessageUrgency::Normal,
        })
    }

    fn collector(
        relay: &NetworkRelay,
    ) -> (shared_relay::ListenerHandle, mpsc::UnboundedReceiver<RelayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = relay.subscribe(move |event| {
            let _ = tx.send(event);
        });
        (handle, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<RelayEvent>) -> RelayEvent {
        timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("no event within 200ms")
            .expect("listener closed")
    }

    #[tokio::test]
    async fn test_fan_out_to_every_other_context() {
        let hub = RelayHub::new();
        let a = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap();
        let b = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap();
        let c = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap();

        let (_ha, mut rx_a) = collector(&a);
        let (_hb, mut rx_b) = collector(&b);
        let (_hc, mut rx_c) = collector(&c);

        for text in ["one", "two", "three"] {
            a.publish(message(text));
        }

        for rx in [&mut rx_b, &mut rx_c] {
            for text in ["one", "two", "three"] {
                assert_eq!(next(rx).await, message(text));
            }
        }
        sleep(Duration::from_millis(20)).await;
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_two_listeners_in_one_context_both_fire() {
        let hub = RelayHub::new();
        let a = NetworkRelay::connect(&hub, "relay").unwrap();
        let b = NetworkRelay::connect(&hub, "relay").unwrap();

        let (_first, mut rx1) = collector(&b);
        let (_second, mut rx2) = collector(&b);
        assert_eq!(b.listener_count(), 2);

        a.publish(message("both"));
        assert_eq!(next(&mut rx1).await, message("both"));
        assert_eq!(next(&mut rx2).await, message("both"));
    }

    #[tokio::test]
    async fn test_unsubscribe_is_isolated() {
        let hub = RelayHub::new();
        let a = NetworkRelay::connect(&hub, "relay").unwrap();
        let b = NetworkRelay::connect(&hub, "relay").unwrap();
        let c = NetworkRelay::connect(&hub, "relay").unwrap();

        let b_hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&b_hits);
        let b_handle = b.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (_hc, mut rx_c) = collector(&c);

        a.publish(message("before"));
        assert_eq!(next(&mut rx_c).await, message("before"));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);

        b_handle.unsubscribe();
        assert_eq!(b.listener_count(), 0);

        a.publish(message("after"));
        assert_eq!(next(&mut rx_c).await, message("after"));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_global_sos_payload_intact() {
        let hub = RelayHub::new();
        let hospital = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap();
        let bank = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap();
        let (_h, mut rx) = collector(&bank);

        hospital.publish(sos_event("X"));
        let received = next(&mut rx).await;
        assert_eq!(received, sos_event("X"));

        match &received {
            RelayEvent::GlobalSos(sos) => {
                assert_eq!(sos.hospital_name, "X");
                assert_eq!(sos.request.patient_name, "CRITICAL CASE");
                assert_eq!(sos.request.units_needed, 3);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let wire = serde_json::to_value(&received).unwrap();
        assert_eq!(wire["type"], "GLOBAL_SOS");
        assert_eq!(wire["payload"]["request"]["urgency"], "Critical");
    }

    #[tokio::test]
    async fn test_filtered_stream_sees_only_sos() {
        let hub = RelayHub::new();
        let hospital = NetworkRelay::connect(&hub, "relay").unwrap();
        let bank = NetworkRelay::connect(&hub, "relay").unwrap();
        let stream = bank.stream(RelayFilter::kinds(vec![EventKind::GlobalSos]));

        hospital.publish(message("noise"));
        hospital.publish(sos_event("General Hospital"));

        let events: Vec<RelayEvent> = timeout(Duration::from_millis(200), stream.take(1).collect())
            .await
            .expect("no SOS within 200ms");
        assert_eq!(events, vec![sos_event("General Hospital")]);
    }

    #[tokio::test]
    async fn test_fire_and_forget_without_listeners() {
        let hub = RelayHub::new();
        let a = NetworkRelay::connect(&hub, "relay").unwrap();
        a.publish(message("into the void"));

        // A later subscriber gets no replay.
        let b = NetworkRelay::connect(&hub, "relay").unwrap();
        let mut sub = b.subscription(RelayFilter::all());
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_burst_reaches_slow_context_in_full() {
        let hub = RelayHub::new();
        let hospital = NetworkRelay::connect(&hub, "relay").unwrap();
        let bank = NetworkRelay::connect(&hub, "relay").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = bank.subscribe(move |event| {
            std::thread::sleep(Duration::from_micros(50));
            let _ = tx.send(event);
        });

        for i in 0..300 {
            hospital.publish(message(&i.to_string()));
        }

        for i in 0..300 {
            assert_eq!(next(&mut rx).await, message(&i.to_string()));
        }
    }

    #[tokio::test]
    async fn test_missing_transport_fails_fast() {
        let hub = RelayHub::unavailable();
        let err = NetworkRelay::connect(&hub, DEFAULT_CHANNEL_NAME).unwrap_err();
        assert!(matches!(err, RelayError::TransportUnavailable { .. }));
    }
}
