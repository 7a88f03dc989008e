use std::{cell::Cell, collections::HashSet};

use rand::Rng;

use crate::{
    search::{
        config::SearchConfig,
        domain::{Domain, StepOutcome},
        error::SearchError,
        planner::{BeliefUpdate, Planner},
        shield::all_actions,
    },
    tree::{
        error::TreeError,
        history::History,
        ids::{ActionId, ObservationId},
    },
};

use super::support::{BitDomain, BitState, shared_table, small_config};

/// `BitDomain` whose legal-action hook can be switched to report an action that does not exist.
#[derive(Debug)]
struct SwitchableLegal {
    inner: BitDomain,
    broken: Cell<bool>,
}

impl Domain for SwitchableLegal {
    type State = BitState;
    type Stats = ();

    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn num_observations(&self) -> u64 {
        self.inner.num_observations()
    }

    fn create_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> BitState {
        self.inner.create_start_state(rng)
    }

    fn step<R: Rng + ?Sized>(&self, state: &mut BitState, action: ActionId, rng: &mut R) -> StepOutcome {
        self.inner.step(state, action, rng)
    }

    fn generate_legal(&self, _state: &BitState, _history: &History) -> Vec<ActionId> {
        if self.broken.get() {
            vec![ActionId::from(5)]
        } else {
            all_actions(2)
        }
    }

    fn belief_stats(&self) {}
}

fn bit_planner(p_set: f64, config: SearchConfig) -> Planner<BitDomain> {
    Planner::with_ucb_table(BitDomain { p_set }, config, shared_table())
        .expect("planner should build")
}

#[test]
fn reroot_keeps_only_matched_or_accepted_particles() {
    let config = SearchConfig {
        num_transforms: 40,
        max_attempts: 200,
        ..small_config(200, 3)
    };
    let mut planner = bit_planner(0.5, config);
    let action = planner.select_action().expect("search should succeed");
    let observation = ObservationId::from(1);

    let root = planner.tree().root_id();
    let matched_child = planner
        .tree()
        .child(root, action, observation)
        .expect("lookup should succeed")
        .expect("both observations are reached during search");
    let matched_ids: HashSet<u64> = planner
        .tree()
        .node(matched_child)
        .expect("child exists")
        .belief()
        .particles()
        .iter()
        .map(|particle| particle.id)
        .collect();
    assert!(!matched_ids.is_empty());

    let update = planner
        .update(action, observation, 0.0)
        .expect("update should succeed");
    let BeliefUpdate::Survived {
        matched,
        transformed,
    } = update
    else {
        panic!("belief should survive, got {update:?}");
    };

    let belief = planner.root_belief().expect("root exists");
    assert_eq!(belief.len(), matched + transformed);
    assert!(transformed > 0);
    for particle in belief.particles() {
        assert!(particle.bit, "every particle must explain the observation");
        assert!(
            particle.transformed || matched_ids.contains(&particle.id),
            "particle {} leaked in from elsewhere",
            particle.id
        );
    }

    assert_eq!(planner.tree().node_count(), 1);
    assert_eq!(
        planner.tree().node(matched_child).map(|_| ()),
        Err(TreeError::MissingNode {
            node_id: matched_child
        })
    );
}

#[test]
fn matched_particles_move_without_transforms() {
    let config = SearchConfig {
        use_transforms: false,
        ..small_config(200, 3)
    };
    let mut planner = bit_planner(0.5, config);
    let action = planner.select_action().expect("search should succeed");

    let update = planner
        .update(action, ObservationId::from(0), 0.0)
        .expect("update should succeed");

    match update {
        BeliefUpdate::Survived {
            matched,
            transformed,
        } => {
            assert!(matched > 0);
            assert_eq!(transformed, 0);
            let belief = planner.root_belief().expect("root exists");
            assert_eq!(belief.len(), matched);
            assert!(belief.particles().iter().all(|particle| !particle.bit));
        }
        BeliefUpdate::Deprived => panic!("matched particles should survive"),
    }
}

#[test]
fn impossible_observation_deprives_the_belief() {
    let config = SearchConfig {
        num_transforms: 10,
        max_attempts: 50,
        ..small_config(100, 3)
    };
    let mut planner = bit_planner(0.0, config);
    planner.select_action().expect("search should succeed");
    let nodes_before = planner.tree().node_count();

    let update = planner
        .update(ActionId::from(1), ObservationId::from(1), 0.0)
        .expect("deprivation is not an error");

    assert_eq!(update, BeliefUpdate::Deprived);
    assert!(!update.survived());
    assert_eq!(planner.history().len(), 1);
    assert_eq!(planner.tree().node_count(), nodes_before);
}

#[test]
fn out_of_range_actions_are_refused() {
    let mut planner = bit_planner(0.5, small_config(10, 2));
    let err = planner
        .update(ActionId::from(9), ObservationId::from(0), 0.0)
        .expect_err("action 9 does not exist");
    assert!(matches!(
        err,
        SearchError::InvalidAction {
            num_actions: 2,
            ..
        }
    ));
    assert!(planner.history().is_empty());
}

#[test]
fn failed_update_leaves_history_and_matched_particles_in_place() {
    let config = SearchConfig {
        use_transforms: false,
        ..small_config(200, 3)
    };
    let domain = SwitchableLegal {
        inner: BitDomain { p_set: 0.5 },
        broken: Cell::new(false),
    };
    let mut planner: Planner<SwitchableLegal> =
        Planner::with_ucb_table(domain, config, shared_table()).expect("planner should build");
    let action = planner.select_action().expect("search should succeed");
    let observation = ObservationId::from(0);

    let root = planner.tree().root_id();
    let child = planner
        .tree()
        .child(root, action, observation)
        .expect("lookup should succeed")
        .expect("both observations are reached during search");
    let particle_count = |planner: &Planner<SwitchableLegal>| {
        planner
            .tree()
            .node(child)
            .expect("child exists")
            .belief()
            .len()
    };
    let before = particle_count(&planner);
    assert!(before > 0);

    planner.domain().broken.set(true);
    let err = planner
        .update(action, observation, 0.0)
        .expect_err("priors for the new root cannot be built");
    assert!(matches!(
        err,
        SearchError::InvalidAction {
            num_actions: 2,
            ..
        }
    ));
    assert!(planner.history().is_empty());
    assert_eq!(planner.tree().root_id(), root);
    assert_eq!(particle_count(&planner), before);

    planner.domain().broken.set(false);
    let update = planner
        .update(action, observation, 0.0)
        .expect("update should succeed");
    assert_eq!(
        update,
        BeliefUpdate::Survived {
            matched: before,
            transformed: 0,
        }
    );
    assert_eq!(planner.history().len(), 1);
}
