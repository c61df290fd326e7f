//! # Onboarding Flow
//!
//! Ties OTP verification to the registry.
//!
//! ## Sign-in
//!
//! ```text
//! begin_login:  authenticate(email, key, role) ──ok──→ issue_code(email)
//! finish_login: verify_code(email, code) ──ok──→ authenticate again → session
//! ```
//!
//! Credentials are checked again after the code is accepted.
//!
//! ## Registration
//!
//! Donors confirm their email with a code before the record is saved.
//! Institutions are saved directly and confirm at their first sign-in.

use std::sync::Arc;

use chrono::Utc;
use rc_01_otp_verification::{IssueReceipt, OtpVerificationApi};
use rc_02_registry::RegistryApi;
use shared_types::{
    AuthenticatedUser, BankSource, BloodBank, BloodType, Donor, Hospital, InstitutionKind,
    Inventory, Location, UserRole,
};
use tracing::info;

use crate::errors::OnboardingError;

const DEFAULT_DONOR_AGE: u32 = 25;
const DEFAULT_DONOR_DISTANCE_KM: f64 = 1.5;

/// Details collected by the donor registration form.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub blood_type: BloodType,
    pub phone: String,
    pub age: Option<u32>,
    pub permanent_address: Option<String>,
    pub medical_history: Option<String>,
    pub id_number: Option<String>,
    pub id_verified: bool,
    pub profile_picture: Option<String>,
}

/// Details collected by the institution registration form.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionRegistration {
    pub institution_name: String,
    pub email: String,
    pub access_key: String,
    pub phone: String,
    pub location: Location,
}

pub struct OnboardingFlow {
    otp: Arc<dyn OtpVerificationApi>,
    registry: Arc<dyn RegistryApi>,
}

impl OnboardingFlow {
    pub fn new(otp: Arc<dyn OtpVerificationApi>, registry: Arc<dyn RegistryApi>) -> Self {
        Self { otp, registry }
    }

    /// Check credentials, then send a sign-in code.
    ///
    /// # Errors
    /// `InvalidCredentials` on a bad email/key/role combination, or any
    /// `OtpError` from issuing (cooldown included).
    pub async fn begin_login(
        &self,
        email: &str,
        key: &str,
        role: UserRole,
    ) -> Result<IssueReceipt, OnboardingError> {
        if self.registry.authenticate(email, key, role)?.is_none() {
            return Err(OnboardingError::InvalidCredentials { role });
        }
        Ok(self.otp.issue_code(email).await?)
    }

    /// Send a fresh code for a pending sign-in or registration.
    ///
    /// # Errors
    /// `OtpError::CooldownActive` inside the resend window.
    pub async fn resend_code(&self, email: &str) -> Result<IssueReceipt, OnboardingError> {
        Ok(self.otp.issue_code(email).await?)
    }

    /// Verify the code and open the session.
    ///
    /// # Errors
    /// Any `OtpError` from verification, or `InvalidCredentials` if the
    /// account no longer matches.
    pub async fn finish_login(
        &self,
        email: &str,
        key: &str,
        role: UserRole,
        code: &str,
    ) -> Result<AuthenticatedUser, OnboardingError> {
        self.otp.verify_code(email, code).await?;
        let user = self
            .registry
            .authenticate(email, key, role)?
            .ok_or(OnboardingError::InvalidCredentials { role })?;
        info!(user_id = %user.id, role = %role, "Session opened");
        Ok(user)
    }

    /// Send the email confirmation code for a new donor.
    ///
    /// # Errors
    /// `MissingField` for blank required fields, `EmailTaken`, or any
    /// `OtpError` from issuing.
    pub async fn begin_donor_registration(
        &self,
        form: &DonorRegistration,
    ) -> Result<IssueReceipt, OnboardingError> {
        validate_donor(form)?;
        self.ensure_email_free(&form.email, UserRole::Donor)?;
        Ok(self.otp.issue_code(&form.email).await?)
    }

    /// Verify the code and save the donor.
    ///
    /// # Errors
    /// Any `OtpError` from verification, `EmailTaken`, or a registry
    /// failure.
    pub async fn complete_donor_registration(
        &self,
        form: DonorRegistration,
        code: &str,
    ) -> Result<Donor, OnboardingError> {
        validate_donor(&form)?;
        self.otp.verify_code(&form.email, code).await?;
        self.ensure_email_free(&form.email, UserRole::Donor)?;

        let donor = donor_from_form(form, Utc::now().timestamp_millis());
        self.registry.save_donor(donor.clone())?;
        info!(donor_id = %donor.id, blood_type = %donor.blood_type, "Donor registered");
        Ok(donor)
    }

    /// Save a new blood bank or hospital.
    ///
    /// # Errors
    /// `MissingField`, `EmailTaken`, or a registry failure.
    pub fn register_institution(
        &self,
        form: InstitutionRegistration,
        kind: InstitutionKind,
    ) -> Result<String, OnboardingError> {
        require(&form.institution_name, "institutionName")?;
        require(&form.email, "email")?;
        require(&form.access_key, "accessKey")?;
        self.ensure_email_free(&form.email, kind.into())?;

        let now = Utc::now();
        let id = match kind {
            InstitutionKind::BloodBank => {
                let id = format!("b-{}", now.timestamp_millis());
                self.registry.save_blood_bank(BloodBank {
                    id: id.clone(),
                    name: form.institution_name.clone(),
                    institution_name: Some(form.institution_name),
                    inventory: Inventory::default(),
                    platelets_count: 0,
                    location: form.location,
                    source: BankSource::Local,
                    last_sync: now.to_rfc3339(),
                    phone: form.phone,
                    email: Some(form.email),
                    access_key: Some(form.access_key),
                })?;
                id
            }
            InstitutionKind::Hospital => {
                let id = format!("h-{}", now.timestamp_millis());
                self.registry.save_hospital(Hospital {
                    id: id.clone(),
                    email: form.email,
                    access_key: form.access_key,
                    institution_name: form.institution_name,
                    location: form.location,
                })?;
                id
            }
        };
        info!(institution_id = %id, kind = ?kind, "Institution registered");
        Ok(id)
    }

    fn ensure_email_free(&self, email: &str, role: UserRole) -> Result<(), OnboardingError> {
        let wanted = email.trim().to_lowercase();
        let same = |candidate: Option<&str>| {
            candidate.is_some_and(|e| e.trim().to_lowercase() == wanted)
        };
        let taken = match role {
            UserRole::Donor => self
                .registry
                .donors()?
                .iter()
                .any(|d| same(d.email.as_deref())),
            UserRole::BloodBank => self
                .registry
                .blood_banks()?
                .iter()
                .any(|b| same(b.email.as_deref())),
            UserRole::Hospital => self
                .registry
                .hospitals()?
                .iter()
                .any(|h| same(Some(h.email.as_str()))),
        };
        if taken {
            return Err(OnboardingError::EmailTaken);
        }
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), OnboardingError> {
    if value.trim().is_empty() {
        return Err(OnboardingError::MissingField { field });
    }
    Ok(())
}

fn validate_donor(form: &DonorRegistration) -> Result<(), OnboardingError> {
    require(&form.name, "name")?;
    require(&form.email, "email")?;
    require(&form.password, "password")
}

fn donor_from_form(form: DonorRegistration, now_ms: i64) -> Donor {
    let mut donor = Donor::new(format!("d-{now_ms}"), form.name, form.blood_type);
    donor.age = form.age.unwrap_or(DEFAULT_DONOR_AGE);
    donor.last_donation = "N/A".to_string();
    donor.distance = DEFAULT_DONOR_DISTANCE_KM;
    donor.phone = form.phone;
    donor.permanent_address = form.permanent_address;
    donor.medical_history = form.medical_history;
    donor.id_number = form.id_number;
    donor.id_verified = Some(form.id_verified);
    donor.profile_picture = form.profile_picture;
    donor.units_donated_year = Some(0);
    donor.donation_count = Some(0);
    donor.email = Some(form.email.trim().to_string());
    donor.password = Some(form.password);
    donor
}
