//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a recording.
#[derive(Clone, Copy, Debug)]
pub struct Recording;

/// Marker type describing a scheduling.
#[derive(Clone, Copy, Debug)]
pub struct Scheduling;
