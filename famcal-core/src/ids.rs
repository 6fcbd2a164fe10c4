//! Temporary identifiers for events that have not been persisted yet.

use uuid::Uuid;

use crate::event::TEMP_ID_PREFIX;

/// Source of client-assigned temporary event ids.
///
/// Every id carries the `temp-` prefix and is unique for the lifetime of the
/// source. Temporary ids are never reused, even after a rollback, and are
/// never sent to the event store as real identifiers.
pub trait TempIds {
    fn next(&mut self) -> String;
}

/// Production source: random v4 UUIDs under the `temp-` prefix.
#[derive(Debug, Default)]
pub struct UuidTempIds;

impl TempIds for UuidTempIds {
    fn next(&mut self) -> String {
        format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4())
    }
}

/// Deterministic source for tests: `temp-1`, `temp-2`, ...
#[derive(Debug, Default)]
pub struct SequentialTempIds {
    counter: u64,
}

impl TempIds for SequentialTempIds {
    fn next(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", TEMP_ID_PREFIX, self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::is_temp_id;

    #[test]
    fn uuid_ids_are_prefixed_and_unique() {
        let mut ids = UuidTempIds;
        let a = ids.next();
        let b = ids.next();
        assert!(is_temp_id(&a));
        assert!(is_temp_id(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialTempIds::default();
        assert_eq!(ids.next(), "temp-1");
        assert_eq!(ids.next(), "temp-2");
        assert_eq!(ids.next(), "temp-3");
    }
}
