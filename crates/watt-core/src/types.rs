//! Core types — Message, ChatState, Appliance, BillItem, Efficiency, etc.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Chat ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatState {
    Idle,
    Typing,
}

impl std::fmt::Display for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatState::Idle => write!(f, "idle"),
            ChatState::Typing => write!(f, "typing"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusData {
    pub state: ChatState,
    /// Bot replies scheduled but not yet appended
    pub pending: usize,
}

// ── Appliances ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Efficiency {
    Excellent,
    Good,
    Average,
    Poor,
}

impl std::fmt::Display for Efficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Efficiency::Excellent => write!(f, "excellent"),
            Efficiency::Good => write!(f, "good"),
            Efficiency::Average => write!(f, "average"),
            Efficiency::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub name: String,
    pub location: String,
    pub icon: String,
    /// Rated draw in watts
    pub expected_watts: u32,
    /// Latest measured draw in watts
    pub current_watts: u32,
}

/// Rooms an appliance can be placed in.
pub const LOCATIONS: &[&str] = &[
    "Kitchen",
    "Living Room",
    "Bedroom",
    "Bathroom",
    "Utility Room",
    "Office",
    "Garage",
];

pub const DEFAULT_ICON: &str = "⚡";

// ── Billing ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub appliance: String,
    pub location: String,
    pub consumption_kwh: f64,
    pub cost: f64,
    pub efficiency: Efficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastBill {
    pub month: String,
    pub amount: f64,
    pub consumption_kwh: f64,
    pub trend: Trend,
}

// ── Profile ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Current,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillRecord {
    pub date: String,
    pub amount: f64,
    pub status: PaymentStatus,
}

/// What the external identity provider tells us about the person at the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
