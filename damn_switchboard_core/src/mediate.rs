use std::collections::HashMap;

use crate::envelope::NormalizedMessage;
use crate::eta::eta_minutes;

/// Grouping key: trimmed, lowercased goal. Missing goals share the `""` group.
pub fn goal_key(p: &NormalizedMessage) -> String {
    p.goal().unwrap_or("").trim().to_lowercase()
}

/// Whether `challenger` should replace the current group `champion`.
///
/// More evidence wins outright; with equal evidence the shorter ETA wins;
/// a full tie keeps the champion.
pub fn supersedes(challenger: &NormalizedMessage, champion: &NormalizedMessage) -> bool {
    let (ec, ea) = (challenger.evidence_count(), champion.evidence_count());
    if ec != ea {
        return ec > ea;
    }
    eta_minutes(challenger.eta()) < eta_minutes(champion.eta())
}

/// Collapse proposals sharing a goal key into one representative each.
///
/// Output keeps the first-seen order of distinct keys.
pub fn mediate<'a, I>(accepted: I) -> Vec<&'a NormalizedMessage>
where
    I: IntoIterator<Item = &'a NormalizedMessage>,
{
    let mut champions: Vec<&'a NormalizedMessage> = Vec::new();
    let mut slot_by_key: HashMap<String, usize> = HashMap::new();

    for p in accepted {
        let key = goal_key(p);
        match slot_by_key.get(&key) {
            Some(&slot) => {
                if supersedes(p, champions[slot]) {
                    champions[slot] = p;
                }
            }
            None => {
                slot_by_key.insert(key, champions.len());
                champions.push(p);
            }
        }
    }

    champions
}
