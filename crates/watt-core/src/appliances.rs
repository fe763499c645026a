//! Appliance catalog — sample appliances, search, add, efficiency classification.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::billing::round_cents;
use crate::error::ValidationError;
use crate::types::{Appliance, Efficiency, DEFAULT_ICON, LOCATIONS};

/// (name, location, icon, expected watts, current watts)
const SAMPLE_APPLIANCES: &[(&str, &str, &str, u32, u32)] = &[
    ("Refrigerator", "Kitchen", "🧊", 150, 145),
    ("Washing Machine", "Utility Room", "🧺", 500, 520),
    ("Air Conditioner", "Living Room", "❄️", 1200, 1350),
    ("Smart TV", "Living Room", "📺", 80, 72),
    ("Electric Oven", "Kitchen", "🔥", 2400, 2500),
    ("Ceiling Fan", "Bedroom", "💨", 60, 55),
    ("Water Heater", "Bathroom", "🚿", 4000, 3800),
    ("Desktop Computer", "Office", "💻", 175, 180),
    ("LED Lights", "Living Room", "💡", 40, 38),
];

/// Classify drift from rated draw: `<= -5%` excellent, `<= 5%` good,
/// `<= 15%` average, anything above poor.
pub fn classify_efficiency(expected_watts: u32, current_watts: u32) -> Efficiency {
    if expected_watts == 0 {
        return Efficiency::Poor;
    }
    let difference =
        (current_watts as f64 - expected_watts as f64) * 100.0 / expected_watts as f64;
    if difference <= -5.0 {
        Efficiency::Excellent
    } else if difference <= 5.0 {
        Efficiency::Good
    } else if difference <= 15.0 {
        Efficiency::Average
    } else {
        Efficiency::Poor
    }
}

/// Cost of running at `current_watts` around the clock for a day, to the cent.
pub fn daily_cost(current_watts: u32, rate_per_kwh: f64) -> f64 {
    round_cents(current_watts as f64 * 24.0 * rate_per_kwh / 1000.0)
}

/// Add-appliance form input. Everything is optional so that missing fields
/// surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAppliance {
    pub name: Option<String>,
    pub location: Option<String>,
    pub expected_watts: Option<u32>,
    pub current_watts: Option<u32>,
    pub icon: Option<String>,
}

/// An appliance together with its derived efficiency and running cost.
#[derive(Debug, Clone, Serialize)]
pub struct ApplianceReport {
    #[serde(flatten)]
    pub appliance: Appliance,
    pub efficiency: Efficiency,
    /// current - expected, in watts
    pub watt_difference: i64,
    /// Dollars per day at the current draw
    pub daily_cost: f64,
}

impl ApplianceReport {
    pub fn new(appliance: &Appliance, rate_per_kwh: f64) -> Self {
        Self {
            appliance: appliance.clone(),
            efficiency: classify_efficiency(appliance.expected_watts, appliance.current_watts),
            watt_difference: appliance.current_watts as i64 - appliance.expected_watts as i64,
            daily_cost: daily_cost(appliance.current_watts, rate_per_kwh),
        }
    }
}

pub struct ApplianceCatalog {
    appliances: Vec<Appliance>,
    next_id: u32,
}

impl ApplianceCatalog {
    pub fn new() -> Self {
        Self {
            appliances: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_samples() -> Self {
        let mut catalog = Self::new();
        for &(name, location, icon, expected, current) in SAMPLE_APPLIANCES {
            let id = catalog.allocate_id();
            catalog.appliances.push(Appliance {
                id,
                name: name.to_string(),
                location: location.to_string(),
                icon: icon.to_string(),
                expected_watts: expected,
                current_watts: current,
            });
        }
        catalog
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        id
    }

    pub fn list(&self) -> &[Appliance] {
        &self.appliances
    }

    pub fn reports(&self, rate_per_kwh: f64) -> Vec<ApplianceReport> {
        self.appliances
            .iter()
            .map(|a| ApplianceReport::new(a, rate_per_kwh))
            .collect()
    }

    /// Case-insensitive match against name or location. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Appliance> {
        let term = term.to_lowercase();
        self.appliances
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&term) || a.location.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn add(&mut self, form: NewAppliance) -> Result<&Appliance, ValidationError> {
        let name = form
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField("name"))?
            .to_string();

        let location = form
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(ValidationError::MissingField("location"))?;
        let location = LOCATIONS
            .iter()
            .find(|known| known.eq_ignore_ascii_case(location))
            .ok_or_else(|| ValidationError::UnknownLocation(location.to_string()))?
            .to_string();

        let expected_watts = form
            .expected_watts
            .ok_or(ValidationError::MissingField("expected_watts"))?;
        if expected_watts == 0 {
            return Err(ValidationError::InvalidWatts {
                field: "expected_watts",
            });
        }
        // A blank or zero reading means "same as rated".
        let current_watts = form
            .current_watts
            .filter(|w| *w > 0)
            .unwrap_or(expected_watts);

        let icon = form
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());

        let id = self.allocate_id();
        info!("Added appliance {} ({}) in {}", name, id, location);
        self.appliances.push(Appliance {
            id,
            name,
            location,
            icon,
            expected_watts,
            current_watts,
        });
        Ok(&self.appliances[self.appliances.len() - 1])
    }
}

impl Default for ApplianceCatalog {
    fn default() -> Self {
        Self::with_samples()
    }
}
