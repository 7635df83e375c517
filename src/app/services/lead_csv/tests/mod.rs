//! Test utilities for enriched lead CSV handling

use crate::app::models::EnrichedLead;


/// Build a lead with every field populated from `name`
pub fn sample_lead(name: &str, reviews: &str, email: &str, location: &str) -> EnrichedLead {
    EnrichedLead {
        forename: name.to_string(),
        company_name: format!("{} Plumbing Ltd", name),
        company_location: location.to_string(),
        google_reviews: reviews.to_string(),
        email: email.to_string(),
        phone_number: "+44 20 7946 0000".to_string(),
    }
}

/// Enrichment output with a header, three good rows and one short row
pub const MIXED_OUTPUT: &str = "\
forename,company_name,company_location,google_reviews,email,phone_number
Anna,Acme Roofing,\"Leeds, UK\",42,anna@acme.example,0113 496 0000
Ben,Brick & Co,London,7,,020 7946 0001
Cara,Cara's Cafe,Bristol,n/a,cara@cafe.example,
Dan,Half Row,Derby,3
";
