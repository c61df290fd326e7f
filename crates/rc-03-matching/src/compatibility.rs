//! ABO/Rh red cell compatibility.
//!
//! | Recipient | Accepts from |
//! |-----------|--------------|
//! | A+  | A+ A- O+ O- |
//! | A-  | A- O- |
//! | B+  | B+ B- O+ O- |
//! | B-  | B- O- |
//! | AB+ | every type |
//! | AB- | A- B- AB- O- |
//! | O+  | O+ O- |
//! | O-  | O- |

use shared_types::BloodType;
use shared_types::BloodType::{
    ANegative, APositive, AbNegative, AbPositive, BNegative, BPositive, ONegative, OPositive,
};

/// Donor types a recipient can receive.
#[must_use]
pub fn compatible_donors(recipient: BloodType) -> &'static [BloodType] {
    match recipient {
        APositive => &[APositive, ANegative, OPositive, ONegative],
        ANegative => &[ANegative, ONegative],
        BPositive => &[BPositive, BNegative, OPositive, ONegative],
        BNegative => &[BNegative, ONegative],
        AbPositive => &BloodType::ALL,
        AbNegative => &[ANegative, BNegative, AbNegative, ONegative],
        OPositive => &[OPositive, ONegative],
        ONegative => &[ONegative],
    }
}

#[must_use]
pub fn can_donate(donor: BloodType, recipient: BloodType) -> bool {
    compatible_donors(recipient).contains(&donor)
}

/// Recipient types a donor can give to.
#[must_use]
pub fn compatible_recipients(donor: BloodType) -> Vec<BloodType> {
    BloodType::ALL
        .into_iter()
        .filter(|recipient| can_donate(donor, *recipient))
        .collect()
}
