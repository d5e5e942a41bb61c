//! Deterministic in-memory page for exercising the controllers without a
//! browser, plus the TOML scenario format the replay binary reads.

mod driver;
mod page;
mod scenario;
mod snapshot;

pub use page::{AutoplayPolicy, SimMedia, SimPage};
pub use scenario::{
    ElementFixture, PageFixture, Scenario, Step, load_scenario, parse_scenario, replay,
};
pub use snapshot::{ElementSnapshot, ObservedTarget, PageSnapshot, PendingTimerSnapshot};
