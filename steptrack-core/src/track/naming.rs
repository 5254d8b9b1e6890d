//! Flattened key naming, shared by the finalizer and `partition_into`.
//!
//! A step named `fetch` flattens to `step_fetch_<field>`. The second step
//! named `fetch` in the same record resolves to `fetch_1`, the third to
//! `fetch_2`, and so on.

use std::collections::HashSet;

use super::fields::INDEX;

const PREFIX: &str = "step_";

/// Flattened key for one field of a step with an already resolved name.
pub fn flat_key(resolved: &str, field: &str) -> String {
    format!("{PREFIX}{resolved}_{field}")
}

/// Prefix shared by every key flattened from steps named `name`,
/// including the disambiguated ones.
pub fn step_prefix(name: &str) -> String {
    format!("{PREFIX}{name}_")
}

/// Resolved name for the `ordinal`-th duplicate (`0` is the plain name).
pub fn disambiguated(name: &str, ordinal: usize) -> String {
    if ordinal == 0 {
        name.to_string()
    } else {
        format!("{name}_{ordinal}")
    }
}

/// Ordinal of the step whose run opens at `remainder`, the part of a key
/// after [`step_prefix`].
///
/// Every flattened step starts with its index key, so `i` opens the plain
/// name and `<n>_i` opens duplicate `n`. Any other remainder is not a run
/// start for this name.
pub fn run_start(remainder: &str) -> Option<usize> {
    if remainder == INDEX {
        return Some(0);
    }
    let digits = remainder.strip_suffix(INDEX)?.strip_suffix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|ordinal| *ordinal > 0)
}

/// Whether `remainder` is the index key of a different step whose name
/// extends this one, e.g. `write_i` under `step_db_` for a step `db_write`.
pub fn opens_other_step(remainder: &str) -> bool {
    run_start(remainder).is_none()
        && remainder
            .strip_suffix(INDEX)
            .is_some_and(|rest| rest.ends_with('_'))
}

/// Allocates resolved names for one record.
///
/// Uniqueness is checked against the names handed out so far, not against
/// the keys already written, so payload fields cannot fake a collision.
#[derive(Debug, Default)]
pub struct NameAllocator {
    assigned: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` to the first free variant: `name`, `name_1`, `name_2`, ...
    pub fn assign(&mut self, name: &str) -> String {
        let resolved = (0..)
            .map(|ordinal| disambiguated(name, ordinal))
            .find(|candidate| !self.assigned.contains(candidate))
            .unwrap_or_else(|| name.to_string());
        self.assigned.insert(resolved.clone());
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_key() {
        assert_eq!(flat_key("fetch", "split"), "step_fetch_split");
        assert_eq!(flat_key("fetch_1", "i"), "step_fetch_1_i");
    }

    #[test]
    fn test_allocator_suffixes_duplicates() {
        let mut names = NameAllocator::new();
        assert_eq!(names.assign("last"), "last");
        assert_eq!(names.assign("step"), "step");
        assert_eq!(names.assign("last"), "last_1");
        assert_eq!(names.assign("last"), "last_2");
    }

    #[test]
    fn test_allocator_skips_taken_suffix() {
        let mut names = NameAllocator::new();
        assert_eq!(names.assign("a_1"), "a_1");
        assert_eq!(names.assign("a"), "a");
        assert_eq!(names.assign("a"), "a_2");
    }

    #[test]
    fn test_run_start() {
        assert_eq!(run_start("i"), Some(0));
        assert_eq!(run_start("1_i"), Some(1));
        assert_eq!(run_start("12_i"), Some(12));
        assert_eq!(run_start("0_i"), None);
        assert_eq!(run_start("_i"), None);
        assert_eq!(run_start("split"), None);
        assert_eq!(run_start("1_split"), None);
        assert_eq!(run_start("write_i"), None);
    }

    #[test]
    fn test_opens_other_step() {
        assert!(opens_other_step("write_i"));
        assert!(opens_other_step("1_write_i"));
        assert!(!opens_other_step("i"));
        assert!(!opens_other_step("2_i"));
        assert!(!opens_other_step("row_count"));
        assert!(!opens_other_step("multi"));
    }

    #[test]
    fn test_round_trip_with_prefix() {
        let key = flat_key(&disambiguated("db", 2), INDEX);
        let remainder = key.strip_prefix(&step_prefix("db")).unwrap();
        assert_eq!(run_start(remainder), Some(2));
    }
}
