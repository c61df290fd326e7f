//! # SOS Flows
//!
//! Hospital SOS and stock alerts through a running core.
//!
//! ## Properties Tested
//!
//! 1. **SOS reach**: a one-tap SOS lands in a bank context and the console feed
//! 2. **Role check**: only hospitals broadcast
//! 3. **Matching**: the broadcast request ranks compatible donors and banks
//! 4. **Stock alerts**: a stock update that runs low alerts the network

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rc_01_otp_verification::TracingMailbox;
    use rc_02_registry::RegistryApi;
    use rc_03_matching::{banks_with_stock, can_donate, rank_donors};
    use rc_runtime::handlers::{NotificationKind, RequestDraft};
    use rc_runtime::{RedConnectRuntime, RuntimeConfig, ServiceContainer};
    use shared_relay::{EventKind, RelayEvent, RelayFilter};
    use shared_types::{BloodType, Coordinates, Inventory, Urgency, UserRole};
    use tokio::time::{sleep, timeout};

    use crate::fixtures::hospital_user;

    async fn started() -> RedConnectRuntime {
        let container =
            ServiceContainer::new(RuntimeConfig::default(), Arc::new(TracingMailbox)).unwrap();
        let runtime = RedConnectRuntime::new(container).unwrap();
        runtime.start().await.unwrap();
        runtime
    }

    async fn wait_for<F: Fn() -> bool>(condition: F) {
        for _ in 0..50 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met in time");
    }

    #[tokio::test]
    async fn test_sos_reaches_bank_and_console() {
        let runtime = started().await;
        let bank_tab = runtime.container().connect_relay().unwrap();
        let mut sos = bank_tab.subscription(RelayFilter::kinds(vec![EventKind::GlobalSos]));

        let hospital = hospital_user();
        let request = runtime
            .raise_sos(&hospital, Some(Coordinates::new(28.61, 77.21)))
            .unwrap();
        assert_eq!(request.urgency, Urgency::Critical);
        assert_eq!(request.blood_type, BloodType::ONegative);

        let received = timeout(Duration::from_millis(200), sos.recv())
            .await
            .expect("no SOS within 200ms")
            .expect("relay closed");
        match received {
            RelayEvent::GlobalSos(payload) => {
                assert_eq!(payload.hospital_name, "General Hospital");
                assert_eq!(payload.request, request);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let feed = Arc::clone(&runtime.container().notifications);
        wait_for(|| feed.requests().iter().any(|r| r.id == request.id)).await;
        let texts: Vec<_> = feed.notifications().into_iter().map(|n| (n.text, n.kind)).collect();
        assert!(texts.contains(&(
            "URGENT SOS: General Hospital needs O- immediately!".to_string(),
            NotificationKind::Alert
        )));
        assert!(texts.contains(&(
            "SOS Broadcasted to Network. Awaiting Blood Bank response...".to_string(),
            NotificationKind::Success
        )));
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_only_hospitals_broadcast() {
        let runtime = started().await;
        let bank_tab = runtime.container().connect_relay().unwrap();
        let mut sos = bank_tab.subscription(RelayFilter::kinds(vec![EventKind::GlobalSos]));

        let mut donor = hospital_user();
        donor.role = UserRole::Donor;
        assert!(runtime.raise_sos(&donor, None).is_err());
        assert!(runtime
            .submit_request(
                &donor,
                RequestDraft {
                    patient_name: "Ward 4".into(),
                    blood_type: BloodType::APositive,
                    units_needed: 1,
                    urgency: None,
                    is_platelet_request: false,
                },
                None,
            )
            .is_err());

        sleep(Duration::from_millis(20)).await;
        assert!(matches!(sos.try_recv(), Ok(None)));
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_sos_request_matches_donors_and_banks() {
        let runtime = started().await;
        let request = runtime.raise_sos(&hospital_user(), None).unwrap();
        let registry = Arc::clone(&runtime.container().registry);

        let donors = registry.donors().unwrap();
        let ranked = rank_donors(&request, &donors, 3);
        assert!(!ranked.is_empty());
        for rec in &ranked {
            let donor = donors.iter().find(|d| d.id == rec.donor_id).unwrap();
            assert!(can_donate(donor.blood_type, BloodType::ONegative));
        }
        assert_eq!(ranked[0].donor_id, "d1");

        // Seed stock holds 2 units of O- at one bank, fewer than requested.
        let banks = registry.blood_banks().unwrap();
        let origin = Coordinates::new(28.6139, 77.2090);
        assert!(banks_with_stock(&banks, BloodType::ONegative, request.units_needed, origin).is_empty());
        let partial = banks_with_stock(&banks, BloodType::ONegative, 1, origin);
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].bank_id, "b1");
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_low_stock_update_alerts_console() {
        let runtime = started().await;
        let feed = Arc::clone(&runtime.container().notifications);
        wait_for(|| !feed.is_empty()).await;
        feed.clear();

        let inventory = Inventory::default()
            .with_units(BloodType::APositive, 0)
            .with_units(BloodType::ANegative, 20)
            .with_units(BloodType::BPositive, 20)
            .with_units(BloodType::BNegative, 20)
            .with_units(BloodType::AbPositive, 20)
            .with_units(BloodType::AbNegative, 20)
            .with_units(BloodType::OPositive, 20)
            .with_units(BloodType::ONegative, 20);
        let alerts = runtime
            .inventory_monitor()
            .update_stock("b1", inventory)
            .unwrap()
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].status, "Out");

        wait_for(|| {
            feed.notifications()
                .iter()
                .any(|n| n.text == "City Central Blood Center reports A+ stock Out.")
        })
        .await;

        assert!(runtime
            .inventory_monitor()
            .update_stock("no-such-bank", Inventory::default())
            .unwrap()
            .is_none());
        runtime.shutdown().await;
    }
}
