//! [`Record`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{patient, user};
#[cfg(doc)]
use crate::domain::{Patient, User};

/// Medical record entry of a [`Patient`].
#[derive(Clone, Debug)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: Id,

    /// ID of the [`Patient`] this [`Record`] belongs to.
    pub patient_id: patient::Id,

    /// [`Kind`] of this [`Record`].
    pub kind: Kind,

    /// [`Title`] of this [`Record`].
    pub title: Title,

    /// [`Note`] attached to this [`Record`].
    pub note: Option<Note>,

    /// [`DateTime`] when this [`Record`] was taken.
    pub recorded_at: RecordingDateTime,

    /// ID of the [`User`] who authored this [`Record`].
    pub author_id: user::Id,
}

/// New [`Record`] to be added to a [`Patient`]'s history.
///
/// The author is derived from the authorization the operation is performed
/// with, so a [`Draft`] doesn't carry one.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Patient`] the [`Record`] belongs to.
    pub patient_id: patient::Id,

    /// [`Kind`] of the [`Record`].
    pub kind: Kind,

    /// [`Title`] of the [`Record`].
    pub title: Title,

    /// [`Note`] attached to the [`Record`].
    pub note: Option<Note>,

    /// [`DateTime`] when the [`Record`] was taken.
    pub recorded_at: RecordingDateTime,
}

/// ID of a [`Record`].
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

/// Title of a [`Record`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Free-form note attached to a [`Record`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `note` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        Self::check(&note).then_some(Self(note))
    }

    /// Checks whether the given `note` is a valid [`Note`].
    fn check(note: impl AsRef<str>) -> bool {
        let note = note.as_ref();
        note.trim() == note && !note.is_empty() && note.len() <= 4096
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Record`]."]
    enum Kind {
        #[doc = "A consultation summary."]
        Consultation = 1,

        #[doc = "A prescribed medication."]
        Prescription = 2,

        #[doc = "A laboratory test result."]
        TestResult = 3,

        #[doc = "An administered vaccination."]
        Vaccination = 4,
    }
}

/// [`DateTime`] when a [`Record`] was taken.
pub type RecordingDateTime = DateTimeOf<(Record, unit::Recording)>;
