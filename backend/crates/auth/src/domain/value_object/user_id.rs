use kernel::id::Id;

/// Marker for user record ids. Ids are assigned by the store at insert
/// time and never change afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;
pub type UserId = Id<UserMarker>;
