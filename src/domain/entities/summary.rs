//! Per-link click summary.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::click::{ClickEvent, DeviceType};

/// Number of countries reported in [`Summary::counts_by_country`].
pub const TOP_COUNTRIES: usize = 10;

/// Number of events reported in [`Summary::recent_events`].
pub const RECENT_EVENTS: usize = 10;

/// Click count for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub count: u64,
}

/// Aggregated view of every click recorded for a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub link_id: i64,
    pub total_clicks: u64,
    /// Only devices with at least one click appear.
    pub counts_by_device: BTreeMap<DeviceType, u64>,
    /// Top countries, most clicks first. Clicks without geo data are not
    /// attributed to any country.
    pub counts_by_country: Vec<CountryCount>,
    /// Most recent clicks, newest first.
    pub recent_events: Vec<ClickEvent>,
}

impl Summary {
    /// Computes every facet from one snapshot of a link's click events.
    pub fn from_events(link_id: i64, events: Vec<ClickEvent>) -> Self {
        let total_clicks = events.len() as u64;

        let mut counts_by_device = BTreeMap::new();
        let mut by_country: HashMap<(Option<String>, Option<String>), u64> = HashMap::new();

        for event in &events {
            *counts_by_device.entry(event.device_type).or_insert(0) += 1;

            if event.country.is_some() || event.country_code.is_some() {
                *by_country
                    .entry((event.country.clone(), event.country_code.clone()))
                    .or_insert(0) += 1;
            }
        }

        let mut counts_by_country: Vec<CountryCount> = by_country
            .into_iter()
            .map(|((country, country_code), count)| CountryCount {
                country,
                country_code,
                count,
            })
            .collect();
        counts_by_country.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.country.cmp(&b.country))
                .then_with(|| a.country_code.cmp(&b.country_code))
        });
        counts_by_country.truncate(TOP_COUNTRIES);

        let mut recent_events = events;
        recent_events.sort_by_key(|e| Reverse((e.occurred_at, e.id)));
        recent_events.truncate(RECENT_EVENTS);

        Self {
            link_id,
            total_clicks,
            counts_by_device,
            counts_by_country,
            recent_events,
        }
    }
}
