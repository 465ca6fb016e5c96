//! Driver identity and deduplication.

use std::collections::BTreeSet;

use crate::{DriverKpi, DriverRecord};

/// Anything identified by a driver name.
pub trait DriverIdentity {
    /// The driver's identifying name.
    fn driver_name(&self) -> &str;
}

impl DriverIdentity for DriverRecord {
    fn driver_name(&self) -> &str {
        &self.name
    }
}

impl DriverIdentity for DriverKpi {
    fn driver_name(&self) -> &str {
        &self.name
    }
}

impl DriverIdentity for String {
    fn driver_name(&self) -> &str {
        self
    }
}

impl DriverIdentity for &str {
    fn driver_name(&self) -> &str {
        self
    }
}

/// Removes drivers whose name was already seen, keeping the first
/// occurrence and the input order.
#[must_use]
pub fn deduplicate_drivers<T: DriverIdentity>(drivers: Vec<T>) -> Vec<T> {
    let total = drivers.len();
    let mut seen = BTreeSet::new();
    let unique: Vec<T> = drivers
        .into_iter()
        .filter(|d| seen.insert(d.driver_name().to_owned()))
        .collect();

    let dropped = total - unique.len();
    if dropped > 0 {
        log::debug!("Removed {dropped} duplicate drivers ({} remain)", unique.len());
    }

    unique
}

#[cfg(test)]
mod tests {
    use crate::MetricValue;

    use super::*;

    #[test]
    fn keeps_first_occurrence() {
        let names = vec!["A1AAAAAAAAAAAA", "A1AAAAAAAAAAAA", "B222"];
        assert_eq!(deduplicate_drivers(names), vec!["A1AAAAAAAAAAAA", "B222"]);
    }

    #[test]
    fn retained_record_is_first_seen() {
        let mut first = DriverRecord::new("A1");
        first
            .metrics
            .insert("Station".to_owned(), MetricValue::from("DSU1"));
        let mut second = DriverRecord::new("A1");
        second
            .metrics
            .insert("Station".to_owned(), MetricValue::from("DSU2"));
        let third = DriverRecord::new("A2");

        let unique = deduplicate_drivers(vec![first.clone(), second, third]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], first);
        assert_eq!(unique[1].name, "A2");
    }

    #[test]
    fn output_length_is_unique_count() {
        let names: Vec<String> = ["a", "b", "a", "c", "b", "a"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(deduplicate_drivers(names).len(), 3);
    }
}
