//! Timed event object kinds

/// Kind of object a timed event is bound to
///
/// Determines the callback argument shape at fire time:
/// `(eventId, delay, repeats)` for [`Global`](Self::Global),
/// `(eventId, delay, repeats, object)` for the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TimedEventObjectType {
    /// Not bound to any object
    #[default]
    Global,
    Player,
    Creature,
    GameObject,
}
