//! [`Appointment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::patient;
#[cfg(doc)]
use crate::domain::Patient;

/// Appointment of a [`Patient`].
#[derive(Clone, Debug)]
pub struct Appointment {
    /// ID of this [`Appointment`].
    pub id: Id,

    /// ID of the [`Patient`] this [`Appointment`] is scheduled for.
    pub patient_id: patient::Id,

    /// [`DateTime`] this [`Appointment`] is scheduled at.
    pub scheduled_at: SchedulingDateTime,

    /// [`Status`] of this [`Appointment`].
    pub status: Status,

    /// [`Reason`] of this [`Appointment`].
    pub reason: Option<Reason>,
}

/// New [`Appointment`] to be scheduled.
///
/// Scheduling always produces an [`Appointment`] in the
/// [`Status::Scheduled`] status, so a [`Draft`] doesn't carry one.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Patient`] the [`Appointment`] is scheduled for.
    pub patient_id: patient::Id,

    /// [`DateTime`] the [`Appointment`] is scheduled at.
    pub scheduled_at: SchedulingDateTime,

    /// [`Reason`] of the [`Appointment`].
    pub reason: Option<Reason>,
}

/// ID of an [`Appointment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Reason of an [`Appointment`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`Reason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Checks whether the given `reason` is a valid [`Reason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 512
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

define_kind! {
    #[doc = "Status of an [`Appointment`]."]
    enum Status {
        #[doc = "The [`Appointment`] is scheduled and pending."]
        Scheduled = 1,

        #[doc = "The [`Appointment`] took place."]
        Completed = 2,

        #[doc = "The [`Appointment`] was cancelled."]
        Cancelled = 3,
    }
}

/// [`DateTime`] an [`Appointment`] is scheduled at.
pub type SchedulingDateTime = DateTimeOf<(Appointment, unit::Scheduling)>;
