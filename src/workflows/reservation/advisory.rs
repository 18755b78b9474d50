//! Purpose-to-time-of-day advisory. A static lookup feeding the
//! `suggested_times` pass-through fields of the recommendation response.

use serde::{Deserialize, Serialize};

struct AdvisoryRule {
    keywords: &'static [&'static str],
    slots: &'static [&'static str],
    label: &'static str,
}

const RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        keywords: &["sport", "basketball", "volleyball", "zumba", "fitness", "badminton"],
        slots: &["06:00-09:00", "16:00-19:00"],
        label: "Early morning or late afternoon keeps courts cooler",
    },
    AdvisoryRule {
        keywords: &["meeting", "assembly", "conference", "seminar", "orientation", "training"],
        slots: &["09:00-12:00", "13:00-17:00"],
        label: "Office hours suit meetings and assemblies",
    },
    AdvisoryRule {
        keywords: &["celebration", "party", "wedding", "birthday", "reception"],
        slots: &["10:00-14:00", "17:00-22:00"],
        label: "Late morning or evening slots fit celebrations",
    },
];

const DEFAULT_SLOTS: &[&str] = &["08:00-17:00"];
const DEFAULT_LABEL: &str = "Daytime slots are generally available";

/// Suggested slots with a human label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAdvice {
    pub suggested_slots: Vec<String>,
    pub label: String,
}

/// Stateless advisory over the static rule table. First matching purpose
/// category wins.
#[derive(Debug, Clone, Default)]
pub struct TimeAdvisor;

impl TimeAdvisor {
    pub fn advise(&self, purpose: &str) -> TimeAdvice {
        let normalized = purpose.trim().to_lowercase();
        for rule in RULES {
            if rule
                .keywords
                .iter()
                .any(|keyword| normalized.contains(keyword))
            {
                return TimeAdvice {
                    suggested_slots: rule.slots.iter().map(|slot| slot.to_string()).collect(),
                    label: rule.label.to_string(),
                };
            }
        }

        TimeAdvice {
            suggested_slots: DEFAULT_SLOTS.iter().map(|slot| slot.to_string()).collect(),
            label: DEFAULT_LABEL.to_string(),
        }
    }
}
