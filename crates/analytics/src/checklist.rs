use crate::tally::percentage;
use serde::{Deserialize, Serialize};

/// One item of a setup checklist as it was filled in for a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    /// Retired items stay on old trades but no longer count toward adherence.
    pub active: bool,
    pub checked: bool,
}

/// Share of active items that were checked, in percent. `None` without active items.
pub fn adherence_pct(items: &[ChecklistItem]) -> Option<f64> {
    let active = items.iter().filter(|i| i.active).count();
    if active == 0 {
        return None;
    }
    let checked = items.iter().filter(|i| i.active && i.checked).count();
    Some(percentage(checked, active))
}
