use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category of an advertised property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Apartment,
    House,
    Commercial,
}

impl PropertyKind {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyKind::Apartment => "apartment",
            PropertyKind::House => "house",
            PropertyKind::Commercial => "commercial",
        }
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "apartment" => Ok(Self::Apartment),
            "house" => Ok(Self::House),
            "commercial" => Ok(Self::Commercial),
            other => Err(format!("unknown property kind '{other}'")),
        }
    }
}

/// Advertised listing as stored in the backend `properties` collection.
///
/// The backend assigns `id`, `views_count`, and `created_at`; everything else
/// is authored by the listing agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub area: f64,
    pub rooms: u32,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub address: String,
    pub city: String,
    pub image_url: String,
    pub agent_id: i32,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PropertyListing {
    /// Case-insensitive substring match over title, address, and city.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.address.to_lowercase().contains(&needle)
            || self.city.to_lowercase().contains(&needle)
    }
}

/// Listing agent record from the backend `agents` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub experience_years: u32,
    pub photo_url: String,
}

/// Client request for a property showing.
///
/// `agent_id` is a denormalized copy of the property's agent taken when the
/// request is built; it is not re-validated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub property_id: i32,
    pub agent_id: i32,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub preferred_date: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ShowingRequest {
    /// Builds a request for `property`, copying its agent assignment as it
    /// stands right now.
    pub fn for_property(
        property: &PropertyListing,
        client_name: impl Into<String>,
        client_phone: impl Into<String>,
        client_email: impl Into<String>,
        preferred_date: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            property_id: property.id,
            agent_id: property.agent_id,
            client_name: client_name.into(),
            client_phone: client_phone.into(),
            client_email: client_email.into(),
            preferred_date: preferred_date.into(),
            message: message.into(),
            created_at: None,
        }
    }

    /// Contact fields and the preferred date must be present for the request
    /// to be worth sending.
    pub fn has_required_fields(&self) -> bool {
        !self.client_name.trim().is_empty()
            && !self.client_phone.trim().is_empty()
            && !self.client_email.trim().is_empty()
            && !self.preferred_date.trim().is_empty()
    }
}
