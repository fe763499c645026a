//! Profile page data and the signed-in viewer.
//!
//! Authentication itself lives with an external identity provider; the core
//! only ever asks it whether someone is signed in and what to call them.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ValidationError;
use crate::types::{BillRecord, PaymentStatus, Viewer};

pub trait IdentityProvider: Send + Sync {
    fn viewer(&self) -> Viewer;
}

/// Identity fixed at startup from config (`user:` / `WATT_USER`).
pub struct StaticIdentity {
    display_name: Option<String>,
}

impl StaticIdentity {
    pub fn new(display_name: Option<String>) -> Self {
        Self {
            display_name: display_name.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.user.clone())
    }
}

impl IdentityProvider for StaticIdentity {
    fn viewer(&self) -> Viewer {
        Viewer {
            authenticated: self.display_name.is_some(),
            display_name: self.display_name.clone(),
        }
    }
}

pub fn welcome_line(viewer: &Viewer) -> String {
    match (viewer.authenticated, viewer.display_name.as_deref()) {
        (true, Some(name)) => format!("Welcome back, {}", name),
        _ => "Welcome".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub home_size: String,
    /// Monthly budget in dollars
    pub monthly_budget: u32,
    pub bill_history: Vec<BillRecord>,
}

/// Edits from the profile form. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub home_size: Option<String>,
    pub monthly_budget: Option<u32>,
}

const BILL_HISTORY: &[(&str, f64, PaymentStatus)] = &[
    ("Nov 2024", 55.67, PaymentStatus::Current),
    ("Oct 2024", 52.45, PaymentStatus::Paid),
    ("Sep 2024", 67.82, PaymentStatus::Paid),
    ("Aug 2024", 58.93, PaymentStatus::Paid),
    ("Jul 2024", 71.23, PaymentStatus::Paid),
];

impl Profile {
    pub fn sample() -> Self {
        Self {
            full_name: "John Smith".into(),
            email: "john.smith@email.com".into(),
            phone: "(555) 123-4567".into(),
            address: "123 Green Street, Eco City, EC 12345".into(),
            home_size: "1,200 sq ft".into(),
            monthly_budget: 80,
            bill_history: BILL_HISTORY
                .iter()
                .map(|&(date, amount, status)| BillRecord {
                    date: date.to_string(),
                    amount,
                    status,
                })
                .collect(),
        }
    }

    /// Sample profile with the name swapped for the signed-in viewer's, if any.
    pub fn for_viewer(viewer: &Viewer) -> Self {
        let mut profile = Self::sample();
        if let Some(name) = viewer.display_name.as_ref().filter(|_| viewer.authenticated) {
            profile.full_name = name.clone();
        }
        profile
    }

    /// Apply a partial edit. Nothing changes if any field is rejected.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ValidationError> {
        let full_name = required(update.full_name, "full_name")?;
        let email = required(update.email, "email")?;

        if let Some(full_name) = full_name {
            self.full_name = full_name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(address) = update.address {
            self.address = address.trim().to_string();
        }
        if let Some(home_size) = update.home_size {
            self.home_size = home_size.trim().to_string();
        }
        if let Some(budget) = update.monthly_budget {
            self.monthly_budget = budget;
        }
        Ok(())
    }

    pub fn average_bill(&self) -> f64 {
        if self.bill_history.is_empty() {
            return 0.0;
        }
        let total: f64 = self.bill_history.iter().map(|b| b.amount).sum();
        total / self.bill_history.len() as f64
    }
}

/// A field that may be left out of an edit but not blanked.
fn required(value: Option<String>, field: &'static str) -> Result<Option<String>, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(ValidationError::MissingField(field)),
        other => Ok(other),
    }
}
