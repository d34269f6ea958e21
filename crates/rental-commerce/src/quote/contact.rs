//! Buyer and venue details collected by the quote form.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// The person requesting the quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuyerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl BuyerInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), CommerceError> {
        required("name", &self.name)?;
        required("phone", &self.phone)?;
        required("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CommerceError::validation(
                "email",
                format!("{:?} is not an email address", self.email),
            ));
        }
        Ok(())
    }
}

/// Where the event takes place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VenueInfo {
    pub venue_name: String,
    #[serde(default)]
    pub venue_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub notes: String,
}

impl VenueInfo {
    pub fn new(venue_name: impl Into<String>) -> Self {
        Self {
            venue_name: venue_name.into(),
            ..Self::default()
        }
    }

    /// Set the street address.
    pub fn with_address(
        mut self,
        venue_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        self.venue_address = venue_address.into();
        self.city = city.into();
        self.state = state.into();
        self.postcode = postcode.into();
        self
    }

    /// Set free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [
            self.venue_name.as_str(),
            self.venue_address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postcode.as_str(),
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), CommerceError> {
        required("venueName", &self.venue_name)
    }
}

fn required(field: &'static str, value: &str) -> Result<(), CommerceError> {
    if value.trim().is_empty() {
        return Err(CommerceError::validation(field, "required"));
    }
    Ok(())
}
