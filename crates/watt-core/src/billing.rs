//! Mock electricity bill — sample consumption priced at a flat rate, summary
//! figures, and the plain-text export.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::types::{BillItem, Efficiency, PastBill, Trend};

pub const DEFAULT_RATE_PER_KWH: f64 = 0.12;

/// Days used for the "average daily" figures.
const BILLING_DAYS: f64 = 30.0;

/// (appliance, location, monthly kWh, efficiency)
const SAMPLE_USAGE: &[(&str, &str, f64, Efficiency)] = &[
    ("Air Conditioner", "Living Room", 324.0, Efficiency::Poor),
    ("Refrigerator", "Kitchen", 104.4, Efficiency::Excellent),
    ("Washing Machine", "Utility Room", 37.44, Efficiency::Average),
];

const PREVIOUS_BILLS: &[(&str, f64, f64, Trend)] = &[
    ("October 2024", 52.45, 437.1, Trend::Down),
    ("September 2024", 67.82, 565.2, Trend::Up),
    ("August 2024", 58.93, 491.1, Trend::Down),
];

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn previous_bills() -> Vec<PastBill> {
    PREVIOUS_BILLS
        .iter()
        .map(|&(month, amount, consumption_kwh, trend)| PastBill {
            month: month.to_string(),
            amount,
            consumption_kwh,
            trend,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct BillLine {
    #[serde(flatten)]
    pub item: BillItem,
    /// Share of total consumption, 0-100
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillSummary {
    pub month: String,
    pub rate_per_kwh: f64,
    pub total_consumption_kwh: f64,
    pub total_cost: f64,
    pub avg_daily_kwh: f64,
    pub avg_daily_cost: f64,
    pub items: Vec<BillLine>,
}

#[derive(Debug, Clone)]
pub struct Bill {
    pub period: NaiveDate,
    pub rate_per_kwh: f64,
    pub items: Vec<BillItem>,
}

impl Bill {
    /// The sample household bill for the month containing `period`, priced at `rate_per_kwh`.
    pub fn sample(period: NaiveDate, rate_per_kwh: f64) -> Self {
        let items = SAMPLE_USAGE
            .iter()
            .map(|&(appliance, location, consumption_kwh, efficiency)| BillItem {
                appliance: appliance.to_string(),
                location: location.to_string(),
                consumption_kwh,
                cost: round_cents(consumption_kwh * rate_per_kwh),
                efficiency,
            })
            .collect();
        Self {
            period,
            rate_per_kwh,
            items,
        }
    }

    /// "October 2026"
    pub fn month_label(&self) -> String {
        self.period.format("%B %Y").to_string()
    }

    pub fn total_consumption(&self) -> f64 {
        self.items.iter().map(|i| i.consumption_kwh).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.items.iter().map(|i| i.cost).sum()
    }

    pub fn summary(&self) -> BillSummary {
        let total_consumption = self.total_consumption();
        let total_cost = self.total_cost();
        let items = self
            .items
            .iter()
            .map(|item| BillLine {
                item: item.clone(),
                share_percent: if total_consumption > 0.0 {
                    item.consumption_kwh / total_consumption * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        BillSummary {
            month: self.month_label(),
            rate_per_kwh: self.rate_per_kwh,
            total_consumption_kwh: total_consumption,
            total_cost,
            avg_daily_kwh: total_consumption / BILLING_DAYS,
            avg_daily_cost: total_cost / BILLING_DAYS,
            items,
        }
    }

    /// Plain-text bill. Each appliance line reads
    /// `<name> (<location>): <kWh> kWh - $<cost>`, preceded by the totals.
    pub fn export_text(&self, generated_on: NaiveDate) -> String {
        let mut out = String::new();
        out.push_str("SMART ENERGY MANAGEMENT SYSTEM\n");
        out.push_str(&format!("Electricity Bill - {}\n", self.month_label()));
        out.push('\n');
        out.push_str(&format!(
            "Total Consumption: {:.2} kWh\n",
            self.total_consumption()
        ));
        out.push_str(&format!("Total Cost: ${:.2}\n", self.total_cost()));
        out.push_str(&format!("Rate: ${}/kWh\n", self.rate_per_kwh));
        out.push('\n');
        out.push_str("APPLIANCE BREAKDOWN:\n");
        for item in &self.items {
            out.push_str(&format!(
                "{} ({}): {} kWh - ${:.2}\n",
                item.appliance, item.location, item.consumption_kwh, item.cost
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "Generated on: {}\n",
            generated_on.format("%Y-%m-%d")
        ));
        out
    }

    /// `energy-bill-october-2026.txt`
    pub fn export_filename(&self) -> String {
        format!(
            "energy-bill-{}-{}.txt",
            self.period.format("%B").to_string().to_lowercase(),
            self.period.year()
        )
    }
}
