//! Creature hooks
//!
//! Creature events reach three audiences in turn: handlers bound to the
//! creature's entry, handlers bound to its guid, and all-creature handlers.

use ale_sdk::{AllCreatureEvent, CreatureEvent, EventType};
use mlua::IntoLua;

use crate::entities::{CreatureRef, WorldObject};
use crate::manager::AleManager;

/// Forwards creature callbacks to creature event handlers
pub struct CreatureHooks<'a> {
    ale: &'a AleManager,
}

impl<'a> CreatureHooks<'a> {
    pub fn new(ale: &'a AleManager) -> Self {
        Self { ale }
    }

    /// Trigger `event` for the creature's entry, its guid and every creature
    ///
    /// Handlers receive `(event, creature, other)`.
    fn fan_out<A>(&self, event: CreatureEvent, all: AllCreatureEvent, creature: &CreatureRef, other: A)
    where
        A: IntoLua + Clone,
    {
        if !self.ale.is_initialized() {
            return;
        }

        let events = self.ale.events();
        let entry = events.has_entry_handlers(event, creature.entry());
        let unique = events.has_unique_handlers(event, creature.guid());
        let global = events.has_global_handlers(all);
        if !(entry || unique || global) {
            return;
        }

        let args = (event.id(), creature.clone(), other);
        if entry {
            events.trigger_entry_event(event, creature.entry(), args.clone());
        }
        if unique {
            events.trigger_unique_event(event, creature.guid(), args.clone());
        }
        if global {
            events.trigger_global_event(all, (all.id(), args.1, args.2));
        }
    }

    pub fn on_death(&self, creature: &CreatureRef, killer: Option<WorldObject>) {
        self.fan_out(
            CreatureEvent::OnDeath,
            AllCreatureEvent::OnDeath,
            creature,
            killer,
        );
    }

    pub fn on_enter_combat(&self, creature: &CreatureRef, target: &WorldObject) {
        self.fan_out(
            CreatureEvent::OnEnterCombat,
            AllCreatureEvent::OnEnterCombat,
            creature,
            target.clone(),
        );
    }

    /// Creature about to deal `damage` to `target`
    ///
    /// Each audience sees the amount left by the one before it.
    ///
    /// # Returns
    /// The damage to apply
    pub fn on_damage(&self, creature: &CreatureRef, target: &WorldObject, damage: u32) -> u32 {
        if !self.ale.is_initialized() {
            return damage;
        }

        let events = self.ale.events();
        let event = CreatureEvent::OnDamage;
        let all = AllCreatureEvent::OnDamage;

        let mut damage = damage;
        if events.has_entry_handlers(event, creature.entry()) {
            damage = events.trigger_entry_event_with_return(
                event,
                creature.entry(),
                damage,
                (event.id(), creature.clone(), target.clone(), damage),
            );
        }
        if events.has_unique_handlers(event, creature.guid()) {
            damage = events.trigger_unique_event_with_return(
                event,
                creature.guid(),
                damage,
                (event.id(), creature.clone(), target.clone(), damage),
            );
        }
        if events.has_global_handlers(all) {
            damage = events.trigger_global_event_with_return(
                all,
                damage,
                (all.id(), creature.clone(), target.clone(), damage),
            );
        }
        damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AleConfig;
    use crate::entities::{guid_to_lua, PlayerRef};
    use ale_sdk::{HighGuid, ObjectGuid};

    fn running() -> (tempfile::TempDir, AleManager) {
        let dir = tempfile::tempdir().unwrap();
        let mut ale = AleManager::new(AleConfig {
            script_path: dir.path().display().to_string(),
            ..AleConfig::default()
        });
        ale.initialize().unwrap();
        (dir, ale)
    }

    fn hogger() -> CreatureRef {
        CreatureRef::new(ObjectGuid::new(HighGuid::Unit, 448, 9), "Hogger")
    }

    fn target() -> WorldObject {
        PlayerRef::new(ObjectGuid::new(HighGuid::Player, 0, 1), "Jaina").into()
    }

    #[test]
    fn test_death_reaches_every_audience() {
        let (_dir, ale) = running();
        let lua = ale.master_state().unwrap().lua();
        lua.globals().set("hogger_guid", guid_to_lua(hogger().guid())).unwrap();
        lua.load(
            r#"
            log = ""
            RegisterCreatureEvent(448, 14, function(event, c, killer)
                log = log .. "entry " .. event .. " " .. c:GetName() .. ";"
            end)
            RegisterUniqueCreatureEvent(hogger_guid, 14, function(event, c, killer)
                log = log .. "unique " .. tostring(killer == nil) .. ";"
            end)
            RegisterAllCreatureEvent(14, function() log = log .. "all;" end)
            RegisterCreatureEvent(99, 14, function() log = log .. "wrong entry;" end)
            "#,
        )
        .exec()
        .unwrap();

        CreatureHooks::new(&ale).on_death(&hogger(), None);
        let log: String = lua.globals().get("log").unwrap();
        assert_eq!(log, "entry 14 Hogger;unique true;all;");
    }

    #[test]
    fn test_enter_combat_passes_target() {
        let (_dir, ale) = running();
        let lua = ale.master_state().unwrap().lua();
        lua.load("RegisterAllCreatureEvent(13, function(_, _, t) target = t:GetName() end)")
            .exec()
            .unwrap();

        CreatureHooks::new(&ale).on_enter_combat(&hogger(), &target());
        let name: String = lua.globals().get("target").unwrap();
        assert_eq!(name, "Jaina");
    }

    #[test]
    fn test_damage_chains_through_audiences() {
        let (_dir, ale) = running();
        let hooks = CreatureHooks::new(&ale);
        assert_eq!(hooks.on_damage(&hogger(), &target(), 100), 100);

        ale.master_state()
            .unwrap()
            .execute(
                r#"
                RegisterCreatureEvent(448, 2, function(_, _, _, dmg) return dmg + 10 end)
                RegisterAllCreatureEvent(2, function(_, _, _, dmg) return dmg * 2 end)
                "#,
                "damage.lua",
            )
            .unwrap();
        assert_eq!(hooks.on_damage(&hogger(), &target(), 100), 220);
    }
}
