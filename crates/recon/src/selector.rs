use std::collections::HashMap;

/// Rank lookup built from a best-first category list.
///
/// The first listed category gets the highest rank (`len`), the last gets 1.
/// Unlisted categories have no rank and are never selected.
#[derive(Debug, Clone)]
pub struct Priority<'a> {
    ranks: HashMap<&'a str, usize>,
}

impl<'a> Priority<'a> {
    pub fn new<S: AsRef<str>>(best_first: &'a [S]) -> Self {
        let len = best_first.len();
        let mut ranks = HashMap::with_capacity(len);
        for (i, category) in best_first.iter().enumerate() {
            // A repeated category keeps its best (earliest) rank.
            ranks.entry(category.as_ref()).or_insert(len - i);
        }
        Self { ranks }
    }

    pub fn rank(&self, category: &str) -> Option<usize> {
        self.ranks.get(category).copied()
    }
}

/// Pick the candidate whose category ranks highest.
///
/// Ties go to the earliest candidate. Returns `None` when there are no
/// candidates or none of them has a listed category.
pub fn select_best<'t, T>(
    items: &'t [T],
    category: impl Fn(&T) -> &str,
    priority: &Priority<'_>,
) -> Option<&'t T> {
    let mut best: Option<(usize, &'t T)> = None;

    for item in items {
        let Some(rank) = priority.rank(category(item)) else {
            continue;
        };
        if best.map_or(true, |(best_rank, _)| rank > best_rank) {
            best = Some((rank, item));
        }
    }

    best.map(|(_, item)| item)
}

/// [`select_best`], then extract and parse a sub-field of the winner.
///
/// No winner yields `Ok(None)`; only a failing `extract` is an error.
pub fn select_best_with<T, R, E>(
    items: &[T],
    category: impl Fn(&T) -> &str,
    priority: &Priority<'_>,
    extract: impl FnOnce(&T) -> Result<R, E>,
) -> Result<Option<R>, E> {
    select_best(items, category, priority).map(extract).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Cand {
        cat: &'static str,
        val: &'static str,
    }

    fn cand(cat: &'static str, val: &'static str) -> Cand {
        Cand { cat, val }
    }

    fn pick<'t>(items: &'t [Cand], priority: &[&str]) -> Option<&'t Cand> {
        select_best(items, |c| c.cat, &Priority::new(priority))
    }

    #[test]
    fn higher_priority_wins_regardless_of_position() {
        let items = [cand("ICAO", "KXYZ"), cand("NEXRAD", "ABC")];
        assert_eq!(pick(&items, &["NEXRAD", "ICAO"]).unwrap().val, "ABC");
    }

    #[test]
    fn ties_go_to_earliest() {
        let items = [cand("ICAO", "first"), cand("ICAO", "second")];
        assert_eq!(pick(&items, &["NEXRAD", "ICAO"]).unwrap().val, "first");
    }

    #[test]
    fn unlisted_never_selected() {
        let items = [cand("WMO", "72357"), cand("ICAO", "KOUN"), cand("COOP", "1")];
        assert_eq!(pick(&items, &["NEXRAD", "ICAO"]).unwrap().val, "KOUN");

        let only_unlisted = [cand("SEA", "10")];
        assert!(pick(&only_unlisted, &["GROUND"]).is_none());
    }

    #[test]
    fn empty_is_none() {
        assert!(pick(&[], &["GROUND"]).is_none());
        assert!(pick(&[cand("GROUND", "1")], &[]).is_none());
    }

    #[test]
    fn extract_parses_winner() {
        let items = [cand("SEA", "10"), cand("GROUND", "1204.5")];
        let priority = Priority::new(&["GROUND"]);
        let got = select_best_with(&items, |c| c.cat, &priority, |c| c.val.parse::<f64>());
        assert_eq!(got, Ok(Some(1204.5)));
    }

    #[test]
    fn extract_skipped_without_winner() {
        let items = [cand("SEA", "not-a-number")];
        let priority = Priority::new(&["GROUND"]);
        let got = select_best_with(&items, |c| c.cat, &priority, |c| c.val.parse::<f64>());
        assert_eq!(got, Ok(None));
    }

    #[test]
    fn extract_error_propagates() {
        let items = [cand("GROUND", "n/a")];
        let priority = Priority::new(&["GROUND"]);
        let got = select_best_with(&items, |c| c.cat, &priority, |c| c.val.parse::<f64>());
        assert!(got.is_err());
    }

    #[test]
    fn repeated_category_keeps_earliest_rank() {
        let priority = Priority::new(&["NEXRAD", "ICAO", "NEXRAD"]);
        assert_eq!(priority.rank("NEXRAD"), Some(3));
        assert_eq!(priority.rank("ICAO"), Some(2));
        assert_eq!(priority.rank("WMO"), None);
    }
}
