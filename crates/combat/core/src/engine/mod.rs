//! Combat orchestration: the round loop driving a battle to its terminal
//! state.
//!
//! The engine owns the roster for the duration of one battle and consumes
//! itself on [`CombatEngine::run`]; a finished engine cannot be reused.
//! Player actions come from an [`ActionProvider`], enemy actions from the
//! behavior selector, and every turn lands in the log as a
//! [`TurnRecord`].
//!
//! # Round structure
//!
//! 1. Freeze acting order: active entities by speed descending, roster
//!    order breaking ties. Speed changes mid-round apply next round.
//! 2. Per actor: clear the defend stance, substitute a no-op if stunned,
//!    otherwise obtain and resolve an action. Recoverable resolution
//!    errors forfeit the turn; the battle continues.
//! 3. After the last actor: tick effects on every living entity, tick
//!    enemy cooldowns, then check termination, the abort flag, and the
//!    round limit.

mod order;
mod rewards;
mod roster;

pub use order::round_order;
pub use roster::Roster;

use crate::action::{
    ActionOutcome, CombatAction, CombatOutcome, CombatReport, EffectTickRecord, ItemConsumed,
    TurnRecord,
};
use crate::ai;
use crate::combat::{ResolutionCtx, resolve_action};
use crate::config::CombatConfig;
use crate::effect;
use crate::entity::{Entity, EntityId};
use crate::env::CombatEnv;
use crate::error::{CombatError, SetupError};

/// Where a battle is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    Setup,
    InProgress,
    Complete(CombatOutcome),
}

/// Supplies player actions, one synchronous call per player turn.
///
/// Errors from `choose` are not retried; they abort the battle and
/// surface to the caller of [`CombatEngine::run`].
pub trait ActionProvider {
    fn choose(
        &mut self,
        roster: &Roster,
        actor: EntityId,
        round: u32,
    ) -> Result<CombatAction, CombatError>;

    /// Polled at every round boundary; `true` ends the battle as
    /// [`CombatOutcome::Fled`] with no rewards.
    fn abort_requested(&mut self) -> bool {
        false
    }
}

/// Presentation hook invoked after each completed round.
pub trait RoundObserver {
    fn round_complete(&mut self, round: u32, roster: &Roster);
}

struct NoObserver;

impl RoundObserver for NoObserver {
    fn round_complete(&mut self, _round: u32, _roster: &Roster) {}
}

/// Final state of a finished battle: the report plus the participants,
/// returned to the caller for persistence.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub report: CombatReport,
    pub participants: Vec<Entity>,
}

/// Drives one battle from validated setup to a terminal outcome.
pub struct CombatEngine<'e> {
    env: CombatEnv<'e>,
    config: CombatConfig,
    roster: Roster,
    phase: CombatPhase,
    round: u32,
    completed_rounds: u32,
    turn: u64,
    turns: Vec<TurnRecord>,
    effect_ticks: Vec<EffectTickRecord>,
    consumed: Vec<ItemConsumed>,
}

impl<'e> CombatEngine<'e> {
    /// Validate the participants and start the battle.
    ///
    /// Nothing is mutated on failure. On success every participant's
    /// turn-scoped state is reset and the phase becomes `InProgress`.
    pub fn new(
        participants: Vec<Entity>,
        env: CombatEnv<'e>,
        config: CombatConfig,
    ) -> Result<Self, SetupError> {
        env.tables().growth().validate()?;
        let mut roster = Roster::new(participants)?;
        for entity in roster.entities_mut() {
            entity.reset_combat_state();
        }
        Ok(Self {
            env,
            config,
            roster,
            phase: CombatPhase::InProgress,
            round: 0,
            completed_rounds: 0,
            turn: 0,
            turns: Vec::new(),
            effect_ticks: Vec::new(),
            consumed: Vec::new(),
        })
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Run the battle to completion.
    pub fn run(self, provider: &mut dyn ActionProvider) -> Result<BattleResult, CombatError> {
        self.run_with_observer(provider, &mut NoObserver)
    }

    /// Run the battle to completion, notifying `observer` after each
    /// completed round.
    pub fn run_with_observer(
        mut self,
        provider: &mut dyn ActionProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<BattleResult, CombatError> {
        let outcome = 'battle: loop {
            self.round += 1;
            let order = round_order(self.roster.entities());

            for index in order {
                if self.termination().is_some() {
                    break;
                }
                self.take_turn(index, provider)?;
            }

            // A battle decided mid-round skips that round's ticking.
            if let Some(outcome) = self.termination() {
                break 'battle outcome;
            }

            self.end_of_round();
            observer.round_complete(self.round, &self.roster);

            if let Some(outcome) = self.termination() {
                break 'battle outcome;
            }
            if provider.abort_requested() {
                break 'battle CombatOutcome::Fled;
            }
            if self.round >= self.config.max_rounds {
                break 'battle CombatOutcome::Draw;
            }
        };

        Ok(self.finish(outcome))
    }

    fn take_turn(
        &mut self,
        index: usize,
        provider: &mut dyn ActionProvider,
    ) -> Result<(), CombatError> {
        let round = self.round;
        let turn = self.turn;
        let (actor_id, is_enemy) = {
            let actor = &mut self.roster.entities_mut()[index];
            if !actor.is_active() {
                return Ok(());
            }
            // The defend stance lasts until the actor's next turn.
            actor.set_defending(false);
            (actor.id, actor.is_enemy())
        };

        if self.roster.entities()[index].is_stunned() {
            self.turns.push(TurnRecord {
                round,
                turn,
                actor: actor_id,
                action: None,
                outcome: ActionOutcome::Stunned,
            });
            self.turn += 1;
            return Ok(());
        }

        let action = if is_enemy {
            ai::select_action(self.roster.entities(), index, round, &self.env)
        } else {
            provider.choose(&self.roster, actor_id, round)?
        };

        let env = self.env;
        let mut ctx = ResolutionCtx {
            env: &env,
            nonce: turn,
            consumed: &mut self.consumed,
        };
        let outcome = match resolve_action(self.roster.entities_mut(), index, action, &mut ctx) {
            Ok(outcome) => outcome,
            Err(error) if error.severity().is_recoverable() => {
                ActionOutcome::Forfeited { error }
            }
            Err(error) => return Err(error),
        };

        self.turns.push(TurnRecord {
            round,
            turn,
            actor: actor_id,
            action: Some(action),
            outcome,
        });
        self.turn += 1;
        Ok(())
    }

    fn end_of_round(&mut self) {
        let round = self.round;
        for entity in self.roster.entities_mut() {
            if !entity.is_alive() {
                continue;
            }
            let id = entity.id;
            let report = effect::tick(entity);
            if !report.is_empty() {
                self.effect_ticks.push(EffectTickRecord {
                    round,
                    entity: id,
                    report,
                });
            }
        }
        for entity in self.roster.entities_mut() {
            if entity.is_alive() {
                if let Some(profile) = entity.enemy_profile_mut() {
                    profile.tick_cooldowns();
                }
            }
        }
        self.completed_rounds = round;
    }

    /// Terminal outcome if either side is out of the fight.
    fn termination(&self) -> Option<CombatOutcome> {
        if self.roster.active_players().next().is_none() {
            let any_escaped = self
                .roster
                .entities()
                .iter()
                .any(|e| e.is_player() && e.is_alive() && e.has_fled());
            return Some(if any_escaped {
                CombatOutcome::Fled
            } else {
                CombatOutcome::Defeat
            });
        }
        if self.roster.active_enemies().next().is_none() {
            return Some(CombatOutcome::Victory);
        }
        None
    }

    fn finish(mut self, outcome: CombatOutcome) -> BattleResult {
        let rewards = (outcome == CombatOutcome::Victory).then(|| {
            let mut rewards = rewards::collect(self.roster.entities(), &self.env, self.turn);
            rewards.level_ups =
                rewards::apply_experience(self.roster.entities_mut(), rewards.experience, &self.env);
            rewards
        });

        self.phase = CombatPhase::Complete(outcome);
        BattleResult {
            report: CombatReport {
                outcome,
                rounds: self.completed_rounds,
                turns: self.turns,
                effect_ticks: self.effect_ticks,
                consumed: self.consumed,
                rewards,
            },
            participants: self.roster.into_entities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::effect::{Effect, EffectKind, EffectSource, StatusFlag};
    use crate::entity::{EnemyRank, PlayerClass};
    use crate::env::{CritParams, DefaultTables, PcgRng};
    use crate::stats::StatKind;

    /// Always attacks the first active enemy; defends if none remain.
    struct Attacker;

    impl ActionProvider for Attacker {
        fn choose(
            &mut self,
            roster: &Roster,
            _actor: EntityId,
            _round: u32,
        ) -> Result<CombatAction, CombatError> {
            Ok(roster
                .active_enemies()
                .next()
                .map(|e| CombatAction::Attack { target: e.id })
                .unwrap_or(CombatAction::Defend))
        }
    }

    /// Plays a fixed script, defending once it runs out.
    struct Scripted {
        actions: Vec<CombatAction>,
        next: usize,
        abort_after: Option<u32>,
        rounds_seen: u32,
    }

    impl Scripted {
        fn new(actions: Vec<CombatAction>) -> Self {
            Self {
                actions,
                next: 0,
                abort_after: None,
                rounds_seen: 0,
            }
        }
    }

    impl ActionProvider for Scripted {
        fn choose(
            &mut self,
            _roster: &Roster,
            _actor: EntityId,
            _round: u32,
        ) -> Result<CombatAction, CombatError> {
            let action = self
                .actions
                .get(self.next)
                .copied()
                .unwrap_or(CombatAction::Defend);
            self.next += 1;
            Ok(action)
        }

        fn abort_requested(&mut self) -> bool {
            self.rounds_seen += 1;
            self.abort_after
                .is_some_and(|after| self.rounds_seen > after)
        }
    }

    fn no_crit_tables() -> DefaultTables {
        DefaultTables {
            crit: CritParams {
                base_permille: 0,
                per_speed_permille: 0,
                multiplier_permille: 1500,
            },
            ..DefaultTables::default()
        }
    }

    fn duel() -> Vec<Entity> {
        vec![
            Entity::player(EntityId(1), "Aria", PlayerClass::Warrior),
            Entity::enemy(
                EntityId(2),
                "Rat",
                EnemyRank::Normal,
                Behavior::Aggressive,
                1,
            ),
        ]
    }

    #[test]
    fn player_victory_grants_rewards_and_experience() {
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let engine = CombatEngine::new(duel(), env, CombatConfig::new()).unwrap();

        let result = engine.run(&mut Attacker).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Victory);

        let rewards = result.report.rewards.unwrap();
        assert_eq!(rewards.experience, 10);
        assert_eq!(rewards.gold, 5);

        let player = result
            .participants
            .iter()
            .find(|e| e.id == EntityId(1))
            .unwrap();
        assert_eq!(player.stats.get(StatKind::Experience), 10);
        assert!(player.is_alive());
    }

    #[test]
    fn hopeless_battle_ends_in_defeat_without_rewards() {
        let mut participants = duel();
        participants[0].stats.set(StatKind::Attack, 0);
        participants[0].stats.set(StatKind::MaxHealth, 5);
        participants[0].stats.set(StatKind::Health, 5);

        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let engine = CombatEngine::new(participants, env, CombatConfig::new()).unwrap();

        let result = engine.run(&mut Attacker).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Defeat);
        assert!(result.report.rewards.is_none());
    }

    #[test]
    fn round_limit_forces_a_draw() {
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let config = CombatConfig::new().with_max_rounds(2);
        let engine = CombatEngine::new(duel(), env, config).unwrap();

        // Player never attacks; two rounds cannot kill anyone.
        let mut provider = Scripted::new(vec![]);
        let result = engine.run(&mut provider).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Draw);
        assert_eq!(result.report.rounds, 2);
        assert!(result.report.rewards.is_none());
    }

    #[test]
    fn successful_flee_ends_the_battle_without_rewards() {
        let mut participants = duel();
        // Overwhelming speed plus a band clamped to certainty.
        participants[0].stats.set(StatKind::Speed, 10_000);
        let tables = DefaultTables {
            flee: crate::env::FleeParams {
                min_permille: 1000,
                max_permille: 1000,
            },
            ..no_crit_tables()
        };
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let engine = CombatEngine::new(participants, env, CombatConfig::new()).unwrap();

        let mut provider = Scripted::new(vec![CombatAction::Flee]);
        let result = engine.run(&mut provider).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Fled);
        assert!(result.report.rewards.is_none());

        let player = result
            .participants
            .iter()
            .find(|e| e.id == EntityId(1))
            .unwrap();
        assert!(player.is_alive() && player.has_fled());
    }

    #[test]
    fn abort_request_maps_to_fled_at_the_round_boundary() {
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let engine = CombatEngine::new(duel(), env, CombatConfig::new()).unwrap();

        let mut provider = Scripted::new(vec![]);
        provider.abort_after = Some(1);
        let result = engine.run(&mut provider).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Fled);
        assert_eq!(result.report.rounds, 2);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let tables = DefaultTables::default();
        let rng = PcgRng;

        let mut reports = Vec::new();
        for _ in 0..2 {
            let env = CombatEnv::new(&tables, &rng, 12345);
            let engine = CombatEngine::new(duel(), env, CombatConfig::new()).unwrap();
            reports.push(engine.run(&mut Attacker).unwrap().report);
        }
        assert_eq!(reports[0], reports[1]);
    }

    #[test]
    fn different_seeds_may_diverge() {
        let tables = DefaultTables::default();
        let rng = PcgRng;

        let run_with = |seed: u64| {
            let env = CombatEnv::new(&tables, &rng, seed);
            let engine = CombatEngine::new(duel(), env, CombatConfig::new()).unwrap();
            engine.run(&mut Attacker).unwrap().report
        };
        // Crit rolls depend on the seed; scan a few seeds for a pair of
        // runs whose logs differ.
        let baseline = run_with(0);
        assert!((1..50).any(|seed| run_with(seed) != baseline));
    }

    #[test]
    fn stunned_actor_forfeits_the_turn() {
        let participants = duel();
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let mut engine = CombatEngine::new(participants, env, CombatConfig::new()).unwrap();
        let index = engine.roster.index_of(EntityId(1)).unwrap();
        effect::apply(
            &mut engine.roster.entities_mut()[index],
            Effect::new(
                EffectKind::Status {
                    flag: StatusFlag::Stunned,
                },
                0,
                1,
                EffectSource::new(EntityId(2), 1),
            ),
        );
        engine.round = 1;
        engine.take_turn(index, &mut Attacker).unwrap();

        assert_eq!(engine.turns.len(), 1);
        assert_eq!(engine.turns[0].action, None);
        assert_eq!(engine.turns[0].outcome, ActionOutcome::Stunned);
    }

    #[test]
    fn defend_stance_halves_incoming_hits_until_the_next_turn() {
        let mut participants = duel();
        // Defense 5: undefended hits cost 3, defended hits floor at 1.
        participants[0].stats.set(StatKind::Defense, 5);
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let config = CombatConfig::new().with_max_rounds(3);
        let engine = CombatEngine::new(participants, env, config).unwrap();

        // Defend in round 1, attack in round 2: only the round-1 hit
        // should land on a guarded target.
        let mut provider = Scripted::new(vec![
            CombatAction::Defend,
            CombatAction::Attack {
                target: EntityId(2),
            },
        ]);
        let result = engine.run(&mut provider).unwrap();

        // Rat (aggressive, speed 8) acts after the warrior (speed 10).
        let rat_hits: Vec<i32> = result
            .report
            .turns
            .iter()
            .filter(|t| t.actor == EntityId(2) && t.round <= 2)
            .map(|t| t.outcome.damage())
            .collect();
        // Round 1: 8 vs 5*2 floors at 1. Round 2: 8 vs 5 deals 3.
        assert_eq!(rat_hits, vec![1, 3]);
    }

    #[test]
    fn setup_failures_leave_no_engine() {
        let tables = no_crit_tables();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 99);
        let only_players = vec![Entity::player(EntityId(1), "Aria", PlayerClass::Warrior)];
        assert!(CombatEngine::new(only_players, env, CombatConfig::new()).is_err());
    }
}
