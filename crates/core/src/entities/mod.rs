//! Host object handles exposed to scripts
//!
//! The host passes lightweight identity snapshots instead of live object
//! pointers. A handle stays valid after the object it names has left the
//! world; everything keyed on it (timed events, unique handlers) goes
//! through the [`ObjectGuid`].
//!
//! # Example
//!
//! ```ignore
//! use ale_core::entities::{CreatureRef, PlayerRef, WorldObject};
//! use ale_sdk::{HighGuid, ObjectGuid};
//!
//! let player = PlayerRef::new(ObjectGuid::new(HighGuid::Player, 0, 42), "Thrall").with_map(1);
//! let object = WorldObject::from(player.clone());
//! assert_eq!(object.to_player().map(PlayerRef::name), Some("Thrall"));
//! ```
//!
//! # Script API
//!
//! Every handle answers `GetGUID`, `GetGUIDLow`, `GetEntry`, `GetName`,
//! `GetMapId`, and the per-object timed event methods `RegisterEvent`,
//! `RemoveEvent`, `RemoveEvents` and `GetEventCount`.

mod creature;
mod game_object;
mod object;
mod player;

pub use creature::CreatureRef;
pub use game_object::GameObjectRef;
pub use object::{ObjectHandle, WorldObject};
pub use player::PlayerRef;

pub(crate) use object::{add_object_methods, guid_from_lua, guid_to_lua};
