//! First-run demo records.
//!
//! Written only for collections that have never been stored, so an operator
//! who deletes every donor does not get the demo set back.

use shared_types::{
    BankSource, BloodBank, BloodType, Donor, Hospital, Inventory, Location,
};

/// Access key given to every seeded donor.
pub const SEED_DONOR_KEY: &str = "donor123";

/// Access key given to every seeded institution.
pub const SEED_INSTITUTION_KEY: &str = "admin123";

struct DonorSeed {
    id: &'static str,
    name: &'static str,
    age: u32,
    blood_type: BloodType,
    last_donation: &'static str,
    distance: f64,
    phone: &'static str,
    id_verified: bool,
    units_donated_year: u32,
    donation_count: u32,
}

const DONORS: &[DonorSeed] = &[
    DonorSeed {
        id: "d1",
        name: "Ravi Menon",
        age: 28,
        blood_type: BloodType::ONegative,
        last_donation: "2024-09-15",
        distance: 1.2,
        phone: "+91 90000 10001",
        id_verified: true,
        units_donated_year: 4,
        donation_count: 12,
    },
    DonorSeed {
        id: "d2",
        name: "Meera Iyer",
        age: 34,
        blood_type: BloodType::APositive,
        last_donation: "2024-10-10",
        distance: 3.5,
        phone: "+91 90000 10002",
        id_verified: true,
        units_donated_year: 3,
        donation_count: 8,
    },
    DonorSeed {
        id: "d3",
        name: "Karan Bedi",
        age: 22,
        blood_type: BloodType::BPositive,
        last_donation: "2024-08-22",
        distance: 0.8,
        phone: "+91 90000 10003",
        id_verified: false,
        units_donated_year: 5,
        donation_count: 15,
    },
    DonorSeed {
        id: "d4",
        name: "Anita Joshi",
        age: 41,
        blood_type: BloodType::OPositive,
        last_donation: "2024-10-05",
        distance: 5.2,
        phone: "+91 90000 10004",
        id_verified: true,
        units_donated_year: 2,
        donation_count: 5,
    },
    DonorSeed {
        id: "d5",
        name: "Farhan Ali",
        age: 55,
        blood_type: BloodType::AbNegative,
        last_donation: "2024-07-28",
        distance: 2.1,
        phone: "+91 90000 10005",
        id_verified: false,
        units_donated_year: 1,
        donation_count: 22,
    },
];

/// Demo donors. Each signs in as `<id>@test.com` with [`SEED_DONOR_KEY`].
#[must_use]
pub fn donors() -> Vec<Donor> {
    DONORS
        .iter()
        .map(|seed| {
            let mut donor = Donor::new(seed.id, seed.name, seed.blood_type);
            donor.age = seed.age;
            donor.last_donation = seed.last_donation.to_string();
            donor.distance = seed.distance;
            donor.phone = seed.phone.to_string();
            donor.id_verified = Some(seed.id_verified);
            donor.units_donated_year = Some(seed.units_donated_year);
            donor.donation_count = Some(seed.donation_count);
            donor.email = Some(format!("{}@test.com", seed.id));
            donor.access_key = Some(SEED_DONOR_KEY.to_string());
            donor
        })
        .collect()
}

/// Demo banks, stamped with `last_sync`.
#[must_use]
pub fn blood_banks(last_sync: &str) -> Vec<BloodBank> {
    let city = Inventory::default()
        .with_units(BloodType::APositive, 12)
        .with_units(BloodType::ANegative, 3)
        .with_units(BloodType::BPositive, 8)
        .with_units(BloodType::BNegative, 1)
        .with_units(BloodType::AbPositive, 4)
        .with_units(BloodType::OPositive, 15)
        .with_units(BloodType::ONegative, 2);
    let regional = Inventory::default()
        .with_units(BloodType::APositive, 5)
        .with_units(BloodType::BPositive, 3)
        .with_units(BloodType::AbPositive, 2)
        .with_units(BloodType::AbNegative, 1)
        .with_units(BloodType::OPositive, 7);

    vec![
        bank(
            "b1",
            "City Central Blood Center",
            city,
            45,
            Location {
                lat: 28.6139,
                lng: 77.2090,
                address: "Connaught Place, Delhi".into(),
            },
            BankSource::ERaktkosh,
            "011-20000001",
            last_sync,
        ),
        bank(
            "b2",
            "Regional Relief Blood Bank",
            regional,
            120,
            Location {
                lat: 28.5355,
                lng: 77.3910,
                address: "Sector 18, Noida".into(),
            },
            BankSource::WellSky,
            "0120-2000002",
            last_sync,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn bank(
    id: &str,
    name: &str,
    inventory: Inventory,
    platelets_count: u32,
    location: Location,
    source: BankSource,
    phone: &str,
    last_sync: &str,
) -> BloodBank {
    BloodBank {
        id: id.to_string(),
        name: name.to_string(),
        institution_name: Some(name.to_string()),
        inventory,
        platelets_count,
        location,
        source,
        last_sync: last_sync.to_string(),
        phone: phone.to_string(),
        email: Some(format!("{id}@test.com")),
        access_key: Some(SEED_INSTITUTION_KEY.to_string()),
    }
}

#[must_use]
pub fn hospitals() -> Vec<Hospital> {
    vec![Hospital {
        id: "h-default".into(),
        email: "hospital@test.com".into(),
        access_key: SEED_INSTITUTION_KEY.into(),
        institution_name: "General Hospital".into(),
        location: Location {
            lat: 28.6139,
            lng: 77.2090,
            address: "New Delhi".into(),
        },
    }]
}
