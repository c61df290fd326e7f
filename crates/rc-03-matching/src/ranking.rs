//! Deterministic donor ranking.
//!
//! Stands in for the hosted matcher: same output shape, fixed rules.
//!
//! | Factor | Points |
//! |--------|--------|
//! | Base | 60 |
//! | Proximity | up to 20, minus 2 per km |
//! | Exact type match | 10 |
//! | O- donor on a critical request | 5 |
//! | Verified identity | 5 |

use serde::{Deserialize, Serialize};
use shared_types::{BloodType, Donor, EmergencyRequest, Urgency};
use tracing::debug;

use crate::compatibility::can_donate;

const BASE_SCORE: f64 = 60.0;
const PROXIMITY_MAX: f64 = 20.0;
const PROXIMITY_PER_KM: f64 = 2.0;
const EXACT_MATCH_BONUS: f64 = 10.0;
const UNIVERSAL_DONOR_BONUS: f64 = 5.0;
const VERIFIED_BONUS: f64 = 5.0;

/// One ranked donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecommendation {
    pub donor_id: String,
    pub reason: String,
    /// 0 to 100, higher is better.
    pub priority_score: u32,
}

/// Rank available, compatible donors for `request`, best first.
///
/// Ties go to the nearer donor, then the lower id.
#[must_use]
pub fn rank_donors(
    request: &EmergencyRequest,
    donors: &[Donor],
    limit: usize,
) -> Vec<MatchRecommendation> {
    let mut scored: Vec<(f64, &Donor, Vec<String>)> = donors
        .iter()
        .filter(|donor| donor.is_available && can_donate(donor.blood_type, request.blood_type))
        .map(|donor| {
            let (score, reasons) = score(request, donor);
            (score, donor, reasons)
        })
        .collect();

    scored.sort_by(|(score_a, a, _), (score_b, b, _)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| a.distance.total_cmp(&b.distance))
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!(
        request_id = %request.id,
        candidates = scored.len(),
        limit,
        "Donors ranked"
    );

    scored
        .into_iter()
        .take(limit)
        .map(|(score, donor, reasons)| MatchRecommendation {
            donor_id: donor.id.clone(),
            reason: reasons.join(", "),
            priority_score: score.round().clamp(0.0, 100.0) as u32,
        })
        .collect()
}

fn score(request: &EmergencyRequest, donor: &Donor) -> (f64, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    if donor.blood_type == request.blood_type {
        score += EXACT_MATCH_BONUS;
        reasons.push(format!("{} exact match", donor.blood_type));
    } else {
        reasons.push(format!(
            "{} compatible with {}",
            donor.blood_type, request.blood_type
        ));
    }

    let distance = donor.distance.max(0.0);
    score += (PROXIMITY_MAX - distance * PROXIMITY_PER_KM).max(0.0);
    reasons.push(format!("{distance:.1} km away"));

    if donor.blood_type == BloodType::ONegative && request.urgency == Urgency::Critical {
        score += UNIVERSAL_DONOR_BONUS;
        reasons.push("universal donor for critical case".to_string());
    }

    if donor.is_id_verified() {
        score += VERIFIED_BONUS;
        reasons.push("ID verified".to_string());
    }

    (score, reasons)
}
