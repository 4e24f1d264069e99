use jiff::Timestamp;

use crate::models::store::Store;

/// Source of the current time. Injected so services and tests can run
/// against a frozen clock instead of the wall clock.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Generates integer ids derived from the millisecond clock, with a
/// monotonic floor so two creations inside the same tick still get distinct,
/// strictly increasing ids.
pub struct IdGen {
    last: i64,
}

impl IdGen {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Seeds the floor from the highest id already present in a loaded
    /// snapshot, so a restart cannot hand out an id that is already taken.
    pub fn seeded_from(store: &Store) -> Self {
        let last = store
            .resolutions
            .iter()
            .flat_map(|r| std::iter::once(r.id).chain(r.milestones.iter().map(|m| m.id)))
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next(&mut self, clock: &impl Clock) -> i64 {
        let now = clock.now().as_millisecond();
        self.last = now.max(self.last + 1);
        self.last
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedClock;
    use super::*;
    use crate::models::resolution::{Priority, Resolution};
    use crate::models::store::Command;

    #[test]
    fn test_ids_are_strictly_increasing_within_one_tick() {
        let clock = FixedClock("2026-01-01T00:00:00Z".parse().unwrap());
        let mut ids = IdGen::new();

        let a = ids.next(&clock);
        let b = ids.next(&clock);
        let c = ids.next(&clock);

        assert_eq!(a, clock.0.as_millisecond());
        assert!(a < b && b < c);
    }

    #[test]
    fn test_seeding_skips_past_loaded_ids() {
        let clock = FixedClock(Timestamp::UNIX_EPOCH);
        let store = Store::default().apply(Command::AddResolution(Resolution {
            id: 1_700_000_000_000,
            title: String::from("Existing"),
            description: None,
            category_id: 1,
            deadline: None,
            priority: Priority::Medium,
            milestones: vec![],
            created_at: Timestamp::UNIX_EPOCH,
        }));

        let mut ids = IdGen::seeded_from(&store);
        assert_eq!(ids.next(&clock), 1_700_000_000_001);
    }
}
