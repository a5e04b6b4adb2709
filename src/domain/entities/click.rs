//! Click event entity representing a single resolved visit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::geo::Location;

/// Coarse device family derived from a User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = std::convert::Infallible;

    /// Unknown values read back from storage fall into [`DeviceType::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            "desktop" => DeviceType::Desktop,
            _ => DeviceType::Other,
        })
    }
}

/// A recorded visit to a short link.
///
/// Geo fields are `None` whenever the location lookup failed or no lookup
/// backend is configured. Click events are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickEvent {
    pub id: i64,
    pub link_id: i64,
    pub client_address: String,
    pub user_agent: String,
    pub device_type: DeviceType,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Input data for recording a new click event.
///
/// The `link_id` must reference an existing link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClickEvent {
    pub link_id: i64,
    pub client_address: String,
    pub user_agent: String,
    pub device_type: DeviceType,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl NewClickEvent {
    /// Builds a click event with no geo data attached.
    pub fn new(
        link_id: i64,
        client_address: impl Into<String>,
        user_agent: impl Into<String>,
        device_type: DeviceType,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            link_id,
            client_address: client_address.into(),
            user_agent: user_agent.into(),
            device_type,
            country: None,
            country_code: None,
            city: None,
            latitude: None,
            longitude: None,
            timezone: None,
            occurred_at,
        }
    }

    /// Copies every geo field from a resolved location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.country = location.country;
        self.country_code = location.country_code;
        self.city = location.city;
        self.latitude = location.latitude;
        self.longitude = location.longitude;
        self.timezone = location.timezone;
        self
    }

    /// Attaches the store-assigned id.
    pub fn into_event(self, id: i64) -> ClickEvent {
        ClickEvent {
            id,
            link_id: self.link_id,
            client_address: self.client_address,
            user_agent: self.user_agent,
            device_type: self.device_type,
            country: self.country,
            country_code: self.country_code,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            occurred_at: self.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_round_trips_through_str() {
        for device in [
            DeviceType::Mobile,
            DeviceType::Tablet,
            DeviceType::Desktop,
            DeviceType::Other,
        ] {
            assert_eq!(device.as_str().parse::<DeviceType>().unwrap(), device);
        }
    }

    #[test]
    fn test_unknown_device_string_parses_to_other() {
        assert_eq!("smart-fridge".parse::<DeviceType>().unwrap(), DeviceType::Other);
    }

    #[test]
    fn test_new_click_event_has_no_geo_data() {
        let click = NewClickEvent::new(7, "10.0.0.1", "curl/8.0", DeviceType::Other, Utc::now());

        assert_eq!(click.link_id, 7);
        assert!(click.country.is_none());
        assert!(click.latitude.is_none());
        assert!(click.timezone.is_none());
    }

    #[test]
    fn test_with_location_copies_all_fields() {
        let location = Location {
            country: Some("Australia".to_string()),
            country_code: Some("AU".to_string()),
            city: Some("Sydney".to_string()),
            latitude: Some(-33.86),
            longitude: Some(151.2),
            timezone: Some("Australia/Sydney".to_string()),
        };

        let click = NewClickEvent::new(1, "1.1.1.1", "", DeviceType::Desktop, Utc::now())
            .with_location(location)
            .into_event(42);

        assert_eq!(click.id, 42);
        assert_eq!(click.country_code.as_deref(), Some("AU"));
        assert_eq!(click.city.as_deref(), Some("Sydney"));
        assert_eq!(click.timezone.as_deref(), Some("Australia/Sydney"));
    }
}
