use anyhow::Result;
use tracing::{debug, info};

use crate::Database;
use crate::models::NewDestination;

pub const DEFAULT_DESTINATIONS: [NewDestination<'static>; 4] = [
    NewDestination {
        title: "Kashmir",
        description: "Experience the breathtaking views of the Himalayas, houseboats, and rich culture.",
        img_src: "/images/kashmir.jpg",
    },
    NewDestination {
        title: "Varanasi",
        description: "Explore the secrets of Kashi and its spiritual charm.",
        img_src: "/images/varanasi.jpg",
    },
    NewDestination {
        title: "Manali",
        description: "Let's shoot YJHD-2! Pack your bags and explore this trending destination.",
        img_src: "/images/manali.jpg",
    },
    NewDestination {
        title: "Vrindavan",
        description: "The place where you learn PREM RAS and experience divine love.",
        img_src: "/images/vrindavan.jpg",
    },
];

/// Populate the destinations table when it is empty.
/// Returns how many rows were inserted (0 if it already had data).
pub fn seed_destinations(db: &Database) -> Result<usize> {
    let existing = db.count_destinations()?;
    if existing != 0 {
        debug!("Skipping destination seed, {} already present", existing);
        return Ok(0);
    }

    let inserted = db.insert_destinations(&DEFAULT_DESTINATIONS)?;
    info!("Destinations initialized successfully ({} rows)", inserted);
    Ok(inserted)
}
