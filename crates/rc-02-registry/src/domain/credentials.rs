//! Credential matching.

use shared_crypto::constant_time_eq;
use shared_types::{AuthenticatedUser, BloodBank, Donor, Hospital, UserRole};

const AVATAR_BASE: &str = "https://i.pravatar.cc/150?u=";

/// Placeholder avatar for an account without a picture.
#[must_use]
pub fn default_avatar(id: &str) -> String {
    format!("{AVATAR_BASE}{id}")
}

/// Emails compare trimmed and case-insensitively.
fn email_matches(stored: &str, presented: &str) -> bool {
    stored.trim().eq_ignore_ascii_case(presented.trim())
}

fn secret_matches(stored: Option<&str>, presented: &str) -> bool {
    stored.is_some_and(|stored| constant_time_eq(stored.as_bytes(), presented.as_bytes()))
}

/// A donor signs in with either their password or their access key.
#[must_use]
pub fn donor_matches(donor: &Donor, email: &str, key: &str) -> bool {
    if !donor.email.as_deref().is_some_and(|stored| email_matches(stored, email)) {
        return false;
    }
    // Evaluate both so timing does not reveal which secret matched.
    let password = secret_matches(donor.password.as_deref(), key);
    let access_key = secret_matches(donor.access_key.as_deref(), key);
    password | access_key
}

#[must_use]
pub fn bank_matches(bank: &BloodBank, email: &str, key: &str) -> bool {
    bank.email
        .as_deref()
        .is_some_and(|stored| email_matches(stored, email))
        && secret_matches(bank.access_key.as_deref(), key)
}

#[must_use]
pub fn hospital_matches(hospital: &Hospital, email: &str, key: &str) -> bool {
    email_matches(&hospital.email, email) && secret_matches(Some(&hospital.access_key), key)
}

#[must_use]
pub fn donor_session(donor: &Donor) -> AuthenticatedUser {
    AuthenticatedUser {
        id: donor.id.clone(),
        name: donor.name.clone(),
        email: donor.email.clone().unwrap_or_default(),
        role: UserRole::Donor,
        avatar: Some(
            donor
                .profile_picture
                .clone()
                .unwrap_or_else(|| default_avatar(&donor.id)),
        ),
    }
}

#[must_use]
pub fn bank_session(bank: &BloodBank) -> AuthenticatedUser {
    AuthenticatedUser {
        id: bank.id.clone(),
        name: bank.display_name().to_string(),
        email: bank.email.clone().unwrap_or_default(),
        role: UserRole::BloodBank,
        avatar: Some(default_avatar(&bank.id)),
    }
}

#[must_use]
pub fn hospital_session(hospital: &Hospital) -> AuthenticatedUser {
    AuthenticatedUser {
        id: hospital.id.clone(),
        name: hospital.institution_name.clone(),
        email: hospital.email.clone(),
        role: UserRole::Hospital,
        avatar: Some(default_avatar(&hospital.id)),
    }
}
