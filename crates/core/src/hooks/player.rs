//! Player hooks

use ale_sdk::{EventType, PlayerEvent};
use mlua::{FromLua, IntoLuaMulti};

use super::master_timers;
use crate::entities::{PlayerRef, WorldObject};
use crate::manager::AleManager;

/// Forwards player callbacks to `RegisterPlayerEvent` handlers
pub struct PlayerHooks<'a> {
    ale: &'a AleManager,
}

impl<'a> PlayerHooks<'a> {
    pub fn new(ale: &'a AleManager) -> Self {
        Self { ale }
    }

    /// Whether `event` has anyone to deliver to
    ///
    /// Arguments are only built for observed events.
    fn observed(&self, event: PlayerEvent) -> bool {
        self.ale.is_initialized() && self.ale.events().has_global_handlers(event)
    }

    fn trigger<A>(&self, event: PlayerEvent, args: impl FnOnce() -> A)
    where
        A: IntoLuaMulti + Clone,
    {
        if self.observed(event) {
            self.ale.events().trigger_global_event(event, args());
        }
    }

    fn trigger_with_return<R, A>(&self, event: PlayerEvent, default: R, args: impl FnOnce() -> A) -> R
    where
        R: FromLua,
        A: IntoLuaMulti + Clone,
    {
        if !self.observed(event) {
            return default;
        }
        self.ale
            .events()
            .trigger_global_event_with_return(event, default, args())
    }

    pub fn on_login(&self, player: &PlayerRef) {
        self.trigger(PlayerEvent::OnLogin, || (PlayerEvent::OnLogin.id(), player.clone()));
    }

    pub fn on_logout(&self, player: &PlayerRef) {
        self.trigger(PlayerEvent::OnLogout, || {
            (PlayerEvent::OnLogout.id(), player.clone())
        });
    }

    pub fn on_first_login(&self, player: &PlayerRef) {
        self.trigger(
            PlayerEvent::OnFirstLogin,
            || (PlayerEvent::OnFirstLogin.id(), player.clone()),
        );
    }

    pub fn on_level_change(&self, player: &PlayerRef, old_level: u8) {
        self.trigger(
            PlayerEvent::OnLevelChange,
            || (PlayerEvent::OnLevelChange.id(), player.clone(), old_level),
        );
    }

    /// Money about to change by `amount`
    ///
    /// # Returns
    /// The amount to apply, possibly rewritten by a handler
    pub fn on_money_change(&self, player: &PlayerRef, amount: i32) -> i32 {
        self.trigger_with_return(
            PlayerEvent::OnMoneyChange,
            amount,
            || (PlayerEvent::OnMoneyChange.id(), player.clone(), amount),
        )
    }

    /// Experience about to be granted
    ///
    /// # Arguments
    /// * `victim` - Killed unit, if the XP comes from a kill
    /// * `xp_source` - Host XP source id
    ///
    /// # Returns
    /// The XP to grant, possibly rewritten by a handler
    pub fn on_give_xp(
        &self,
        player: &PlayerRef,
        amount: u32,
        victim: Option<WorldObject>,
        xp_source: u8,
    ) -> u32 {
        self.trigger_with_return(
            PlayerEvent::OnGiveXp,
            amount,
            || (PlayerEvent::OnGiveXp.id(), player.clone(), amount, victim, xp_source),
        )
    }

    /// Player tick
    ///
    /// Runs the timed events registered through `player:RegisterEvent`.
    pub fn on_update(&self, player: &PlayerRef, diff: u32) {
        if let Some(timers) = master_timers(self.ale) {
            timers.update_object_events(&WorldObject::from(player.clone()), diff);
        }
    }
}
