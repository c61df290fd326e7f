//! # Onboarding Flows
//!
//! Sign-in and registration through a full service container.
//!
//! ## Properties Tested
//!
//! 1. **Two-step sign-in**: credentials, then code, then session
//! 2. **Registration**: a confirmed donor can sign in afterwards
//! 3. **Cooldown**: surfaced unchanged through the flow
//! 4. **Persistence**: file-backed records survive a restart

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rc_01_otp_verification::{ChannelMailbox, MailMessage, OtpError};
    use rc_02_registry::RegistryApi;
    use rc_runtime::errors::OnboardingError;
    use rc_runtime::flows::{DonorRegistration, InstitutionRegistration, OnboardingFlow};
    use rc_runtime::{RuntimeConfig, ServiceContainer, StorageBackend};
    use shared_types::{BloodType, InstitutionKind, Location, UserRole};
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;

    fn container(config: RuntimeConfig) -> (ServiceContainer, UnboundedReceiver<MailMessage>) {
        let (mailbox, inbox) = ChannelMailbox::new();
        let container = ServiceContainer::new(config, Arc::new(mailbox)).unwrap();
        (container, inbox)
    }

    fn flow(container: &ServiceContainer) -> OnboardingFlow {
        OnboardingFlow::new(
            Arc::clone(&container.otp) as _,
            Arc::clone(&container.registry) as _,
        )
    }

    async fn next_code(inbox: &mut UnboundedReceiver<MailMessage>) -> String {
        timeout(Duration::from_millis(200), inbox.recv())
            .await
            .expect("no mail within 200ms")
            .expect("mailbox closed")
            .code
    }

    fn registration(email: &str) -> DonorRegistration {
        DonorRegistration {
            name: "New Donor".into(),
            email: email.into(),
            password: "s3cret".into(),
            blood_type: BloodType::BNegative,
            phone: "+1 555 0100".into(),
            age: None,
            permanent_address: None,
            medical_history: None,
            id_number: None,
            id_verified: false,
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn test_hospital_sign_in() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        flow.begin_login("hospital@test.com", "admin123", UserRole::Hospital)
            .await
            .unwrap();
        let code = next_code(&mut inbox).await;

        let user = flow
            .finish_login("hospital@test.com", "admin123", UserRole::Hospital, &code)
            .await
            .unwrap();
        assert_eq!(user.id, "h-default");
        assert_eq!(user.name, "General Hospital");
        assert_eq!(user.role, UserRole::Hospital);
    }

    #[tokio::test]
    async fn test_seed_donor_sign_in() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        flow.begin_login("d1@test.com", "donor123", UserRole::Donor)
            .await
            .unwrap();
        let code = next_code(&mut inbox).await;
        let user = flow
            .finish_login("d1@test.com", "donor123", UserRole::Donor, &code)
            .await
            .unwrap();
        assert_eq!(user.id, "d1");
    }

    #[tokio::test]
    async fn test_bad_credentials_send_no_code() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        let err = flow
            .begin_login("hospital@test.com", "wrong", UserRole::Hospital)
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::InvalidCredentials { .. }));

        // Right key, wrong role.
        let err = flow
            .begin_login("hospital@test.com", "admin123", UserRole::BloodBank)
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::InvalidCredentials { .. }));
        assert!(inbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_donor_registration_then_sign_in() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);
        let form = registration("new.donor@example.com");

        flow.begin_donor_registration(&form).await.unwrap();
        let code = next_code(&mut inbox).await;
        let donor = flow
            .complete_donor_registration(form.clone(), &code)
            .await
            .unwrap();
        assert!(donor.id.starts_with("d-"));
        assert_eq!(donor.blood_type, BloodType::BNegative);
        assert!(container
            .registry
            .donors()
            .unwrap()
            .iter()
            .any(|d| d.id == donor.id));

        // A second registration for the same address is refused up front.
        let err = flow.begin_donor_registration(&form).await.unwrap_err();
        assert!(matches!(err, OnboardingError::EmailTaken));

        // The confirmation code was consumed, so sign-in starts a fresh one.
        flow.begin_login("new.donor@example.com", "s3cret", UserRole::Donor)
            .await
            .unwrap();
        let code = next_code(&mut inbox).await;
        let user = flow
            .finish_login("new.donor@example.com", "s3cret", UserRole::Donor, &code)
            .await
            .unwrap();
        assert_eq!(user.id, donor.id);
    }

    #[tokio::test]
    async fn test_cooldown_surfaces_through_flow() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        flow.begin_login("d2@test.com", "donor123", UserRole::Donor)
            .await
            .unwrap();
        next_code(&mut inbox).await;

        let err = flow.resend_code("d2@test.com").await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::Otp(OtpError::CooldownActive { remaining_secs }) if remaining_secs > 55
        ));
        assert_eq!(err.to_string(), "Resend cooldown active.");
    }

    #[tokio::test]
    async fn test_wrong_code_reports_remaining_tries() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        flow.begin_login("d3@test.com", "donor123", UserRole::Donor)
            .await
            .unwrap();
        let code = next_code(&mut inbox).await;
        let wrong = crate::fixtures::wrong_code(&code);

        let err = flow
            .finish_login("d3@test.com", "donor123", UserRole::Donor, &wrong)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid code. 2 tries left.");

        flow.finish_login("d3@test.com", "donor123", UserRole::Donor, &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_institution_registration_signs_in() {
        let (container, mut inbox) = container(RuntimeConfig::default());
        let flow = flow(&container);

        let id = flow
            .register_institution(
                InstitutionRegistration {
                    institution_name: "Northside Blood Bank".into(),
                    email: "north@example.com".into(),
                    access_key: "north-key".into(),
                    phone: "555-0199".into(),
                    location: Location {
                        lat: 28.70,
                        lng: 77.10,
                        address: "North Campus".into(),
                    },
                },
                InstitutionKind::BloodBank,
            )
            .unwrap();
        assert!(id.starts_with("b-"));

        flow.begin_login("north@example.com", "north-key", UserRole::BloodBank)
            .await
            .unwrap();
        let code = next_code(&mut inbox).await;
        let user = flow
            .finish_login("north@example.com", "north-key", UserRole::BloodBank, &code)
            .await
            .unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = TempDir::new().unwrap();
        let config = RuntimeConfig {
            storage: StorageBackend::File(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        };

        let (first, mut inbox) = container(config.clone());
        let flow_one = flow(&first);
        let form = registration("kept@example.com");
        flow_one.begin_donor_registration(&form).await.unwrap();
        let code = next_code(&mut inbox).await;
        let donor = flow_one
            .complete_donor_registration(form, &code)
            .await
            .unwrap();

        flow_one
            .begin_login("kept@example.com", "s3cret", UserRole::Donor)
            .await
            .unwrap();
        let login_code = next_code(&mut inbox).await;
        first.registry.delete_donor("d5").unwrap();
        drop(flow_one);
        drop(first);

        let (second, _inbox) = container(config);
        let donors = second.registry.donors().unwrap();
        assert!(donors.iter().any(|d| d.id == donor.id));
        assert!(
            !donors.iter().any(|d| d.id == "d5"),
            "seed must not come back for an existing collection"
        );

        // The code issued before the restart is still pending after it.
        let user = flow(&second)
            .finish_login("kept@example.com", "s3cret", UserRole::Donor, &login_code)
            .await
            .unwrap();
        assert_eq!(user.id, donor.id);
    }
}
