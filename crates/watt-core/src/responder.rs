//! Canned-response selector — first-match-wins substring lookup over an
//! ordered trigger table.

/// Seeded as the first message of every transcript.
pub const GREETING: &str = "Hello! I'm your Energy Assistant. Ask me anything about the Smart Energy Management System!";

/// Quick replies offered while the transcript holds only the greeting.
pub const SUGGESTIONS: &[&str] = &[
    "How does this system work",
    "Tips for saving energy",
    "How do I add appliances",
    "Can I set energy budgets",
];

/// Ordered trigger → response pairs plus the reply used when nothing matches.
///
/// Order is priority: a short trigger listed early shadows any later trigger
/// that contains it.
#[derive(Debug, Clone, Copy)]
pub struct TriggerTable {
    pub entries: &'static [(&'static str, &'static str)],
    pub fallback: &'static str,
}

/// "hi" is a substring of "this", so the greetings must stay below
/// "how does this system work".
const ENTRIES: &[(&str, &str)] = &[
    (
        "how does this system work",
        "Our Smart Energy Management System monitors your appliances in real-time, tracks consumption patterns, and provides intelligent insights to help you optimize energy usage and reduce costs.",
    ),
    (
        "what appliances can i monitor",
        "You can monitor any electrical appliance including refrigerators, washing machines, air conditioners, televisions, lights, and more. Simply add them to your appliances page.",
    ),
    (
        "how accurate are the bills",
        "Our bill calculations use real consumption data and current utility rates to provide accurate estimates. The demo uses sample data for demonstration purposes.",
    ),
    (
        "can i set energy budgets",
        "Yes! You can set monthly energy budgets in your profile and receive notifications when you're approaching your limits.",
    ),
    (
        "how do i add appliances",
        "Go to the Appliances page, click 'Add Appliance', fill in the details like name, location, and expected consumption, then save it to start monitoring.",
    ),
    (
        "what is energy efficiency",
        "Energy efficiency means using less energy to provide the same level of performance. Our system helps identify inefficient appliances that consume more power than expected.",
    ),
    (
        "help",
        "I can help you with questions about energy monitoring, adding appliances, generating bills, understanding your consumption patterns, and system features. What would you like to know?",
    ),
    (
        "tips for saving energy",
        "Start with the biggest consumers: raise your air conditioner setpoint a degree or two, run washing machines on full cold loads, switch remaining bulbs to LEDs, and unplug idle electronics. The Appliances page flags anything drawing more than expected.",
    ),
    (
        "hello",
        "Hi there! I'm your Energy Assistant. Ask me how the system works, how to add appliances, or for tips on saving energy.",
    ),
    (
        "hi",
        "Hi there! I'm your Energy Assistant. Ask me how the system works, how to add appliances, or for tips on saving energy.",
    ),
];

const FALLBACK: &str = "I'm here to help with your energy management questions! Try asking about how the system works, adding appliances, or generating bills.";

pub static DEFAULT_TABLE: TriggerTable = TriggerTable {
    entries: ENTRIES,
    fallback: FALLBACK,
};

impl TriggerTable {
    /// Pick the reply for `input`. Only lowercasing is applied; punctuation
    /// and surrounding whitespace are left for substring matching to tolerate.
    pub fn select(&self, input: &str) -> &'static str {
        let normalized = input.to_lowercase();
        self.entries
            .iter()
            .find(|(trigger, _)| normalized.contains(trigger))
            .map(|(_, response)| *response)
            .unwrap_or(self.fallback)
    }
}

pub fn select_response(input: &str, table: &TriggerTable) -> &'static str {
    table.select(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_for(trigger: &str) -> &'static str {
        ENTRIES
            .iter()
            .find(|(t, _)| *t == trigger)
            .map(|(_, r)| *r)
            .unwrap()
    }

    #[test]
    fn test_system_overview() {
        assert_eq!(
            select_response("how does this system work", &DEFAULT_TABLE),
            response_for("how does this system work")
        );
    }

    #[test]
    fn test_greeting() {
        assert_eq!(select_response("hi", &DEFAULT_TABLE), response_for("hi"));
        assert_eq!(select_response("Hello!", &DEFAULT_TABLE), response_for("hello"));
    }

    #[test]
    fn test_unmatched_falls_back() {
        assert_eq!(select_response("xyz-unmatched-query", &DEFAULT_TABLE), FALLBACK);
        assert_eq!(select_response("", &DEFAULT_TABLE), FALLBACK);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(
            select_response("Um, HOW DO I ADD APPLIANCES to my account?", &DEFAULT_TABLE),
            response_for("how do i add appliances")
        );
    }

    #[test]
    fn test_earlier_trigger_wins() {
        // Both "what is energy efficiency" and "help" occur; the earlier entry wins.
        assert_eq!(
            select_response("help: what is energy efficiency", &DEFAULT_TABLE),
            response_for("what is energy efficiency")
        );
        // "hi" is buried in "which" and shadows nothing earlier, so it matches.
        assert_eq!(select_response("which one", &DEFAULT_TABLE), response_for("hi"));
    }

    #[test]
    fn test_every_trigger_selects_itself_or_earlier() {
        for (idx, (trigger, response)) in ENTRIES.iter().enumerate() {
            let selected = select_response(trigger, &DEFAULT_TABLE);
            let earlier = ENTRIES[..idx].iter().find(|(t, _)| trigger.contains(t));
            match earlier {
                Some((_, r)) => assert_eq!(selected, *r),
                None => assert_eq!(selected, *response),
            }
        }
    }

    #[test]
    fn test_no_normalization_beyond_lowercase() {
        // Internal whitespace is significant.
        assert_eq!(select_response("how  does this system work", &DEFAULT_TABLE), response_for("hi"));
    }

    #[test]
    fn test_custom_table() {
        static TABLE: TriggerTable = TriggerTable {
            entries: &[("on", "short"), ("turn on", "long")],
            fallback: "none",
        };
        assert_eq!(TABLE.select("turn ON the fan"), "short");
        assert_eq!(TABLE.select("off"), "none");
    }

    #[test]
    fn test_suggestions_have_triggers() {
        for s in SUGGESTIONS {
            assert_ne!(select_response(s, &DEFAULT_TABLE), FALLBACK, "{}", s);
        }
    }
}
