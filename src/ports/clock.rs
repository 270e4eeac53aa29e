//! Clock Port - source of the current time.
//!
//! Expiry and completion stamps read time through this port so tests can
//! move time forward without sleeping.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
