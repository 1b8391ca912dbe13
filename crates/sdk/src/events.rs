//! Event families and event type enums
//!
//! Several independent enumerations share small integer values with
//! different meanings (player event 3 is a login, world event 3 is a
//! shutdown request). Every event therefore carries an explicit
//! [`EventFamily`] next to its numeric id, and registries key on both.
//!
//! Numeric ids match the values scripts use, so they must not be renumbered.

use std::fmt;

/// Discriminates which enumeration an event id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventFamily {
    /// Server / world events (`RegisterServerEvent`)
    Server = 1,
    /// Player events (`RegisterPlayerEvent`)
    Player = 2,
    /// WorldObject lifecycle events
    WorldObject = 3,
    /// Creature events bound to an entry or a single guid
    Creature = 4,
    /// Creature events for every creature regardless of entry
    AllCreature = 5,
}

impl EventFamily {
    /// Short lowercase name used in log output
    pub const fn name(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Player => "player",
            Self::WorldObject => "worldobject",
            Self::Creature => "creature",
            Self::AllCreature => "allcreature",
        }
    }
}

impl fmt::Display for EventFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event id together with the family it belongs to
///
/// Implemented by every event enum in this module and by [`RawEvent`].
pub trait EventType: Copy {
    /// The enumeration this event belongs to
    fn family(&self) -> EventFamily;

    /// Numeric event id within its family
    fn id(&self) -> u32;
}

/// An event addressed by plain family + id
///
/// Used where the id arrives as an integer, e.g. from script registration
/// functions, and may not correspond to a known enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub family: EventFamily,
    pub id: u32,
}

impl RawEvent {
    pub const fn new(family: EventFamily, id: u32) -> Self {
        Self { family, id }
    }
}

impl EventType for RawEvent {
    fn family(&self) -> EventFamily {
        self.family
    }

    fn id(&self) -> u32 {
        self.id
    }
}

macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident in $family:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )*
        }

        impl $name {
            /// Look up an event by its numeric id
            pub const fn from_id(id: u32) -> Option<Self> {
                match id {
                    $( $value => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }

        impl EventType for $name {
            fn family(&self) -> EventFamily {
                EventFamily::$family
            }

            fn id(&self) -> u32 {
                *self as u32
            }
        }

        impl From<$name> for RawEvent {
            fn from(event: $name) -> Self {
                RawEvent::new(EventFamily::$family, event as u32)
            }
        }
    };
}

event_enum! {
    /// Player events, triggered by the host's player script hooks
    ///
    /// The comment on each variant lists the script callback arguments.
    pub enum PlayerEvent in Player {
        /// (event, player)
        OnCharacterCreate = 1,
        /// (event, guid)
        OnCharacterDelete = 2,
        /// (event, player)
        OnLogin = 3,
        /// (event, player)
        OnLogout = 4,
        /// (event, player, spell, skipCheck)
        OnSpellCast = 5,
        /// (event, player, victim)
        OnKillPlayer = 6,
        /// (event, player, creature)
        OnKillCreature = 7,
        /// (event, player, creature)
        OnKilledByCreature = 8,
        /// (event, target, challenger)
        OnDuelRequest = 9,
        /// (event, player1, player2)
        OnDuelStart = 10,
        /// (event, winner, loser, type)
        OnDuelEnd = 11,
        /// (event, player, amount, victim, xpSource) - Can return new XP amount
        OnGiveXp = 12,
        /// (event, player, oldLevel)
        OnLevelChange = 13,
        /// (event, player, amount) - Can return new money amount
        OnMoneyChange = 14,
        /// (event, player, factionID, standing, incremental) - Can return new standing -> if standing == -1, it will prevent default action (rep gain)
        OnReputationChange = 15,
        /// (event, player, points)
        OnFreeTalentPointsChanged = 16,
        /// (event, player, noCost)
        OnTalentsReset = 17,
        /// (event, player, type, lang, msg) - Can return false, newMessage
        OnChat = 18,
        /// (event, player, msg, lang, receiver) - Can return false, newMessage
        OnWhisper = 19,
        /// (event, player, msg, lang, channel) - Can return false, newMessage
        OnGroupChat = 20,
        /// (event, player, msg, lang, guild) - Can return false, newMessage
        OnGuildChat = 21,
        /// (event, player, msg, lang, channel) - Can return false, newMessage
        OnChannelChat = 22,
        /// (event, player, emote) - Not triggered on any known emote
        OnEmote = 23,
        /// (event, player, textEmote, emoteNum, guid)
        OnTextEmote = 24,
        /// (event, player)
        OnSave = 25,
        /// (event, player, difficulty, mapid, permanent)
        OnBindToInstance = 26,
        /// (event, player, newZone, newArea)
        OnUpdateZone = 27,
        /// (event, player)
        OnMapChanged = 28,
        /// (event, player, item, bag, slot, update)
        OnEquipItem = 29,
        /// (event, player)
        OnFirstLogin = 30,
        /// (event, player, item, bag, slot) - Can return InventoryResult enum value
        OnCanUseItem = 31,
        /// (event, player, item, count, lootguid)
        OnLootItem = 32,
        /// (event, player, enemy)
        OnEnterCombat = 33,
        /// (event, player)
        OnLeaveCombat = 34,
        /// (event, player) - Can return false
        OnCanRepopAtGraveyard = 35,
        /// (event, player, retore_percent, applySickness)
        OnResurrect = 36,
        /// (event, player, quest)
        OnQuestAbandon = 38,
        /// (event, player, talentId, talentRank, spellid)
        OnLearnTalents = 39,
        /// (event, player, talentPointsForLevel) - Can return new talent points amount
        OnCalculateTalentsPoints = 40,
        /// (event, player, command, chatHandler) - player is nil if command used from console. Can return false
        OnCommand = 42,
        /// (event, player, spellId)
        OnLearnSpell = 44,
        /// (event, player, achievement)
        OnAchievementComplete = 45,
        /// (event, player, isFlaggedForFfaPvp)
        OnFfaPvpStateUpdate = 46,
        /// (event, player, oldArea, newArea)
        OnUpdateArea = 47,
        /// (event, player, target) - Can return false to prevent the trade
        OnCanInitTrade = 48,
        /// (event, player, receiverGuid, mailbox, subject, body, money, cod, item) - Can return false to prevent sending the mail
        OnCanSendMail = 49,
        /// (event, player, roles, dungeons, comment) - Can return false to prevent queueing
        OnCanJoinLfg = 50,
        /// (event, player, item, count)
        OnQuestRewardItem = 51,
        /// (event, player, item, count)
        OnCreateItem = 52,
        /// (event, player, item, count)
        OnStoreNewItem = 53,
        /// (event, player, quest)
        OnCompleteQuest = 54,
        /// (event, player, memberName) - Can return false to prevent the inviting
        OnCanGroupInvite = 55,
        /// (event, player, item, count, voteType, roll)
        OnGroupRollRewardItem = 56,
        /// (event, player, bgType)
        OnBgDesertion = 57,
        /// (event, player, creature)
        OnPetKilledCreature = 58,
        /// (event, player) - Can return false to prevent resurrection
        OnCanResurrect = 59,
        /// (event, player, skill_id) - Can return false to prevent skill up
        OnCanUpdateSkill = 60,
        /// (event, player, skill_id, value, max, step) - Can return new amount
        OnBeforeUpdateSkill = 61,
        /// (event, player, skill_id, value, max, step, new_value)
        OnUpdateSkill = 62,
        /// (event, player, aura)
        OnAuraApply = 64,
        /// (event, player, target, heal_amount) - Can return new heal amount
        OnHeal = 65,
        /// (event, player, target, damage_amount) - Can return new damage amount
        OnDamage = 66,
        /// (event, player, aura_application, remove_mode)
        OnAuraRemove = 67,
        /// (event, player, target, damage_amount, spellInfo) - Can return new damage amount
        OnPeriodicDamageTick = 68,
        /// (event, player, target, damage_amount) - Can return new damage amount
        OnMeleeDamage = 69,
        /// (event, player, target, damage_amount, spellInfo) - Can return new damage amount
        OnSpellDamageTaken = 70,
        /// (event, player, target, heal_amount, spellInfo) - Can return new heal amount
        OnHealReceived = 71,
        /// (event, player, target, damage_amount, damage_type) - Can return new damage amount
        OnDealDamage = 72,
        /// (event, player)
        OnReleasedGhost = 73,
        /// (event, player, outcome)
        OnBeforeRollMeleeOutcome = 74,
        /// (event, player, displayId)
        OnDisplayIdChange = 75,
        /// (event, player) - Triggered when player dies
        OnDeath = 76,
        /// (event, player, form)
        OnSetShapeshiftForm = 77,
        /// (event, player, menu_id, sender, action, code)
        OnGossipSelect = 78,
        /// (event, player, npcGUID, itemGUID, discountMod, guildBank) - Can return new discountMod
        OnBeforeDurabilityRepair = 79,
        /// (event, player, packet)
        OnSendInitialPackets = 80,
        /// (event, player, mapId, zoneId, spellInfo) - Can return false
        OnCanFlyInZone = 81,
        /// (event, player, state)
        OnPvpFlagChange = 82,
        /// (event, player, newSlot)
        OnAfterSpecSlotChanged = 83,
        /// (event, player, loot)
        OnBeforeLootMoney = 84,
        /// (event, player, factionID, newRank, oldRank, increased)
        OnReputationRankChange = 85,
        /// (event, player, factionID, amount, repSource) - Can return new amount
        OnGiveReputation = 86,
        /// (event, player, spellID)
        OnForgotSpell = 87,
        /// (event, player, type, lang, msg)
        OnBeforeSendChatMessage = 88,
        /// (event, player, diff)
        OnBeforeUpdate = 89,
        /// (event, player)
        OnLoadFromDb = 90,
        /// (event, player)
        OnBeforeLogout = 91,
        /// (event, guid, accountId)
        OnFailedDelete = 92,
        /// (event, player, mapid, x, y, z, orientation, options, target) - Can return false
        OnBeforeTeleport = 93,
        /// (event, player)
        OnUpdateFaction = 94,
        /// (event, player, bg)
        OnAddToBattleground = 95,
        /// (event, player, rDungeonId) - Can return new rDungeonId
        OnQueueRandomDungeon = 96,
        /// (event, player, bg)
        OnRemoveFromBattleground = 97,
        /// (event, player, achievement) - Can return false
        OnBeforeAchievementComplete = 98,
        /// (event, player, criteria) - Can return false
        OnBeforeCriteriaProgress = 99,
        /// (event, player, criteria)
        OnCriteriaProgress = 100,
        /// (event, player, achiId, achiData)
        OnAchievementSave = 101,
        /// (event, player, critId, criteriaData)
        OnCriteriaSave = 102,
        /// (event, player, charmer, oldFactionId, newFactionId)
        OnBeingCharmed = 103,
        /// (event, player, slot, item)
        OnAfterSetVisibleItemSlot = 104,
        /// (event, player, item, bag, slot, update)
        OnAfterMoveItemFromInventory = 105,
        /// (event, player, item)
        OnUnequipItem = 106,
        /// (event, player)
        OnJoinBg = 107,
        /// (event, player)
        OnJoinArena = 108,
        /// (event, player, minSlot, maxArenaRating) - Can return new maxArenaRating
        OnGetMaxPersonalArenaRating = 109,
        /// (event, player, item)
        OnBeforeFillQuestLootItem = 110,
        /// (event, player, auction) - Can return false
        OnCanPlaceAuctionBid = 111,
        /// (event, player, item) - Can return false
        OnBeforeOpenItem = 112,
        /// (event, player, maxPlayerLevel) - Can return new maxPlayerLevel
        OnSetMaxLevel = 113,
        /// (event, player, battlemasterGuid, bgTypeId, joinAsGroup, err) - Can return false
        OnCanJoinBgQueue = 114,
        /// (event, player) - Can return false
        OnShouldRewardMoney = 115,
        /// (event, player, tempSummon, duration) - Can return new duration
        OnBeforeTempSummon = 116,
        /// (event, player, guardian, cinfo, petType)
        OnBeforeGuardianInit = 117,
        /// (event, player, guardian)
        OnAfterGuardianInit = 118,
        /// (event, player, petEntry, petNumber, current, forceLoadFromDB)
        OnBeforeLoadPet = 119,
        /// (event, player, vendorGuid, vendorSlot, item, count, bag, slot) - Can return new item
        OnBeforeBuyItem = 120,
        /// (event, player, vendorSlot, item, count, bag, slot, proto, vendor, crItem, store)
        OnAfterStoreOrEquip = 121,
        /// (event, player, power, value)
        OnAfterUpdateMaxPower = 122,
        /// (event, player, value) - Can return new value
        OnAfterUpdateMaxHealth = 123,
        /// (event, player, level, val2, ranged)
        OnBeforeUpdateAttackPower = 124,
        /// (event, player, level, base_attPower, attPowerMod, attPowerMultiplier, ranged)
        OnAfterUpdateAttackPower = 125,
        /// (event, player, level, talentPointsForLevel)
        OnBeforeInitTalent = 126,
        /// (event, player, questId) - Can return false
        OnBeforeQuestComplete = 127,
        /// (event, player, quest, xpValue) - Can return new xpValue
        OnQuestComputeXp = 128,
        /// (event, player, vendorSlot, item, count, bag, slot, proto, vendor, crItem, store) - Can return new item
        OnBeforeStoreOrEquip = 129,
        /// (event, player, battlemasterGuid, arenaSlot, bgTypeId, joinAsGroup, isRated, err) - Can return false
        OnCanJoinArenaQueue = 130,
        /// (event, player, arenaType, bgTypeId, action) - Can return false
        OnCanBattlefieldPort = 131,
        /// (event, player, group) - Can return false
        OnCanGroupAccept = 132,
        /// (event, player, item, creature) - Can return false
        OnCanSellItem = 133,
        /// (event, player) - Can return false
        OnCanSendErrorLooted = 134,
        /// (event, player)
        OnAfterCreatureLoot = 135,
        /// (event, player)
        OnAfterCreatureLootMoney = 136,
        /// (event, player, creature, charterId, cost, type)
        OnPetitionBuy = 137,
        /// (event, player, creature, charterEntry, charterDisplayId, charterCost)
        OnPetitionShowList = 138,
        /// (event, player, rewarder, isDungeon, rate) - Can return new rate
        OnRewardKillRewarder = 139,
        /// (event, player, level) - Can return false
        OnCanGiveMailReward = 140,
        /// (event, transaction, guid)
        OnDeleteFromDb = 141,
        /// (event, player, class, context)
        OnIsClass = 142,
        /// (event, player, skill, result, isPure) - Can return new result
        OnGetMaxSkillValue = 143,
        /// (event, player, power) - Can return false
        OnHasActivePowerType = 144,
        /// (event, player, skillId, currentLevel, gray, green, yellow, gain) - Can return new gain
        OnUpdateGatheringSkill = 145,
        /// (event, player, skill, currentLevel, gain) - Can return new gain
        OnUpdateCraftingSkill = 146,
        /// (event, player, skill, zoneSkill, chance, roll) - Can return false
        OnUpdateFishingSkill = 147,
        /// (event, player) - Can return false
        OnCanAreaExploreOutdoor = 148,
        /// (event, player, victim, killerTitle, victimRank)
        OnVictimRewardBefore = 149,
        /// (event, player, victim, killerTitle, victimRank, honor)
        OnVictimRewardAfter = 150,
        /// (event, player, proto, slot, apply, value) - Can return new value
        OnCustomScalingStatBefore = 151,
        /// (event, player, proto, statType, val, itemProtoStatNumber, scalingStatValue, ssv)
        OnCustomScalingStat = 152,
        /// (event, player, slot, apply, itemProtoStatNumber, statType, val) - Can return new val
        OnApplyItemModsBefore = 153,
        /// (event, player, item, slot, apply, spellId, amount) - Can return new amount
        OnApplyEnchantItemModsBefore = 154,
        /// (event, player, slot, proto, minDamage, maxDamage, damageIndex)
        OnApplyWeaponDamage = 155,
        /// (event, player) - Can return false
        OnCanArmorDamageModifier = 156,
        /// (event, player, feralBonus, dpsMod, proto, ssv) - Can return new feralBonus
        OnGetFeralApBonus = 157,
        /// (event, player, item, attackType, aura, apply) - Can return false
        OnCanApplyWeaponAuraDamage = 158,
        /// (event, player, spellInfo, item, apply, formChange) - Can return false
        OnCanApplyEquipSpell = 159,
        /// (event, player, eff) - Can return false
        OnCanApplyEquipSpellsItemSet = 160,
        /// (event, player, target, attackType, procVictim, procEx, item, proto) - Can return false
        OnCanCastItemCombatSpell = 161,
        /// (event, player, item, targets, castCount, glyphIndex) - Can return false
        OnCanCastItemUseSpell = 162,
        /// (event, player, proto, currentAmmoDPS) - Can return new currentAmmoDPS
        OnApplyAmmoBonuses = 163,
        /// (event, player, slot, dest, item, swap, notLoading) - Can return false
        OnCanEquipItem = 164,
        /// (event, player, pos, swap) - Can return false
        OnCanUnequipItem = 165,
        /// (event, player, item, pos, update) - Can return false
        OnCanSaveEquipNewItem = 166,
        /// (event, player, item, slot, apply, applyDur, ignoreCondition) - Can return false
        OnCanApplyEnchantment = 167,
        /// (event, player, rate) - Can return new rate
        OnGetQuestRate = 168,
        /// (event, player, qinfo, entry, realEntry, guid) - Can return false
        OnPassedQuestMonsterCredit = 169,
        /// (event, player, item, slot, err, dest) - Can return false
        OnCheckItemSlotLoad = 170,
        /// (event, player, ar, targetMap, report) - Can return false
        OnNotAvoidSatisfy = 171,
        /// (event, player, target) - Can return false
        OnNotVisibleGlobally = 172,
        /// (event, player, slot, result) - Can return new result
        OnGetArenaPersonalRating = 173,
        /// (event, player, slot, result) - Can return new result
        OnGetArenaTeamId = 174,
        /// (event, player, result) - Can return new result
        OnIsFfaPvp = 175,
        /// (event, player, result) - Can return new result
        OnIsPvp = 176,
        /// (event, player, result) - Can return new result
        OnGetMaxSkillForLevel = 177,
        /// (event, player, slot, type, value) - Can return false
        OnNotSetArenaTeamInfo = 178,
        /// (event, player, item, tradeSlot) - Can return false
        OnCanSetTradeItem = 179,
        /// (event, player, type, sec)
        OnSetServerSideVisibility = 180,
        /// (event, player, type, sec)
        OnSetServerSideVisibilityDetect = 181,
        /// (event, player, teamId, nearCorpse, graveyardOverride) - Can return new graveyardOverride
        OnBeforeChooseGraveyard = 182,
        /// (event, player, newLevel) - Can return false
        OnCanGiveLevel = 183,
        /// (event, player, vendorGuid, vendorEntry) - Can return new vendorEntry
        OnSendListInventory = 184,
        /// (event, player, entry, instance, mapDiff, loginCheck) - Can return false
        OnCanEnterMap = 185,
        /// (event, player, apply)
        OnAnticheatSetCanFly = 186,
        /// (event, player)
        OnAnticheatSetUnderAckMount = 187,
        /// (event, player)
        OnAnticheatSetRootAckUpd = 188,
        /// (event, player, jump)
        OnAnticheatSetJumping = 189,
        /// (event, player, movementInfo)
        OnAnticheatUpdateMovement = 190,
        /// (event, player, mover) - Can return false
        OnAnticheatHandleDoubleJump = 191,
        /// (event, player, movementInfo, mover, jump) - Can return false
        OnAnticheatCheckMovement = 192,
        /// (event, player, diff)
        OnUpdate = 193,
    }
}

event_enum! {
    /// Server-wide events
    pub enum WorldEvent in Server {
        /// (event, diff)
        OnUpdate = 1,
        /// (event, reload)
        OnConfigLoad = 2,
        /// (event, code, mask)
        OnShutdownInit = 3,
        /// (event)
        OnShutdownCancel = 4,
        /// (event)
        OnShutdown = 6,
        /// (event)
        OnStartup = 14,
    }
}

event_enum! {
    /// WorldObject lifecycle events
    pub enum WorldObjectEvent in WorldObject {
        /// (event, object)
        OnCreate = 1,
        /// (event, object)
        OnDestroy = 2,
        /// (event, object, diff)
        OnUpdate = 3,
        /// (event, object)
        OnRepop = 4,
    }
}

event_enum! {
    /// Creature events registered per entry or per guid
    pub enum CreatureEvent in Creature {
        /// (event, creature, target, heal) - Can return new heal amount
        OnHeal = 1,
        /// (event, creature, target, damage) - Can return new damage amount
        OnDamage = 2,
        /// (event, creature, aura)
        OnAuraApply = 3,
        /// (event, creature, aura, removeMode)
        OnAuraRemove = 4,
        /// (event, creature, target, damage, spellInfo) - Can return new damage amount
        OnPeriodicDamageTick = 5,
        /// (event, creature, target, damage) - Can return new damage amount
        OnMeleeDamage = 6,
        /// (event, creature, target, damage, spellInfo) - Can return new damage amount
        OnSpellDamageTaken = 7,
        /// (event, creature, target, heal, spellInfo) - Can return new heal amount
        OnHealReceived = 8,
        /// (event, creature, target, damage, damageType) - Can return new damage amount
        OnDealDamage = 9,
        /// (event, creature, outcome)
        OnBeforeRollMeleeOutcome = 10,
        /// (event, creature, displayId)
        OnDisplayIdChange = 11,
        /// (event, creature)
        OnEnterEvadeMode = 12,
        /// (event, creature, target)
        OnEnterCombat = 13,
        /// (event, creature, killer)
        OnDeath = 14,
        /// (event, creature, form)
        OnSetShapeshiftForm = 15,
    }
}

event_enum! {
    /// Creature events delivered for every creature regardless of entry
    pub enum AllCreatureEvent in AllCreature {
        /// (event, creature, target, heal) - Can return new heal amount
        OnHeal = 1,
        /// (event, creature, target, damage) - Can return new damage amount
        OnDamage = 2,
        /// (event, creature, aura)
        OnAuraApply = 3,
        /// (event, creature, aura, removeMode)
        OnAuraRemove = 4,
        /// (event, creature, target, damage, spellInfo) - Can return new damage amount
        OnPeriodicDamageTick = 5,
        /// (event, creature, target, damage) - Can return new damage amount
        OnMeleeDamage = 6,
        /// (event, creature, target, damage, spellInfo) - Can return new damage amount
        OnSpellDamageTaken = 7,
        /// (event, creature, target, heal, spellInfo) - Can return new heal amount
        OnHealReceived = 8,
        /// (event, creature, target, damage, damageType) - Can return new damage amount
        OnDealDamage = 9,
        /// (event, creature, outcome)
        OnBeforeRollMeleeOutcome = 10,
        /// (event, creature, displayId)
        OnDisplayIdChange = 11,
        /// (event, creature)
        OnEnterEvadeMode = 12,
        /// (event, creature, target)
        OnEnterCombat = 13,
        /// (event, creature, killer)
        OnDeath = 14,
        /// (event, creature, form)
        OnSetShapeshiftForm = 15,
    }
}
