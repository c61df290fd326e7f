//! User flows spanning more than one service.

pub mod onboarding;

pub use onboarding::{DonorRegistration, InstitutionRegistration, OnboardingFlow};
