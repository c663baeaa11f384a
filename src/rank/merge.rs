use crate::aggregate::AuthorStats;
use crate::model::AuthorIdentity;
use std::collections::HashMap;
use tracing::debug;

/// Collapses accumulators whose keys share a display name.
///
/// The first key seen for a name is retained. Once a merge happens the
/// retained accumulator lists every distinct email it absorbed. Inputs
/// without duplicate names come back unchanged.
pub fn merge_authors(stats: AuthorStats, enabled: bool) -> AuthorStats {
    if !enabled {
        return stats;
    }

    let before = stats.len();
    let mut merged = AuthorStats::new();
    let mut retained: HashMap<String, String> = HashMap::new();

    for (key, acc) in stats {
        let identity = AuthorIdentity::parse(&key);
        let name = identity.normalized_name().to_string();

        match retained.get(&name).cloned() {
            Some(retained_key) => {
                if let Some(existing) = merged.get_mut(&retained_key) {
                    if existing.emails.is_empty() {
                        existing.add_email(&AuthorIdentity::parse(&retained_key).email);
                    }
                    existing.absorb(&acc);
                    existing.add_email(&identity.email);
                }
            }
            None => {
                retained.insert(name, key.clone());
                merged.insert(key, acc);
            }
        }
    }

    debug!(before, after = merged.len(), "merged author identities");
    merged
}
