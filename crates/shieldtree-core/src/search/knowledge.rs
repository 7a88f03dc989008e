use rand::{Rng, seq::SliceRandom};

use crate::{
    search::{
        config::{Knowledge, KnowledgeLevel},
        domain::Domain,
        error::SearchError,
    },
    tree::{history::History, ids::ActionId, node::ObservationNode, outcomes::ObservationTable},
};

/// Visit count that pins an action's prior value in place.
pub const LARGE_INTEGER: u64 = 1_000_000;

/// Seed the action values of a freshly grown node.
///
/// At `Pure`, or when no state is known, every action starts at `(0, 0)`.
/// Otherwise illegal actions are buried under `(LARGE_INTEGER, -inf)` so selection never picks them,
/// legal actions start at `(0, 0)`, and at `Smart` preferred actions get the configured prior.
pub fn apply_prior<D, T>(
    domain: &D,
    knowledge: &Knowledge,
    state: Option<&D::State>,
    history: &History,
    node: &mut ObservationNode<D::State, D::Stats, T>,
) -> Result<(), SearchError>
where
    D: Domain,
    T: ObservationTable,
{
    let state = match state {
        Some(state) if knowledge.tree_level > KnowledgeLevel::Pure => state,
        _ => {
            node.set_children(0, 0.0);
            return Ok(());
        }
    };

    node.set_children(LARGE_INTEGER, f64::NEG_INFINITY);

    for action in domain.generate_legal(state, history) {
        node.action_mut(action)
            .ok_or(SearchError::InvalidAction {
                action,
                num_actions: domain.num_actions(),
            })?
            .value_mut()
            .set(0, 0.0);
    }

    if knowledge.tree_level >= KnowledgeLevel::Smart {
        for action in domain.generate_preferred(state, history) {
            node.action_mut(action)
                .ok_or(SearchError::InvalidAction {
                    action,
                    num_actions: domain.num_actions(),
                })?
                .value_mut()
                .set(knowledge.smart_tree_count, knowledge.smart_tree_value);
        }
    }

    Ok(())
}

/// Pick a rollout action with the knowledge allowed by `level`.
///
/// Falls through from preferred to legal to uniform whenever a level yields no actions.
pub fn select_random<D, R>(
    domain: &D,
    level: KnowledgeLevel,
    state: &D::State,
    history: &History,
    rng: &mut R,
) -> ActionId
where
    D: Domain,
    R: Rng + ?Sized,
{
    if level >= KnowledgeLevel::Smart {
        if let Some(action) = domain.generate_preferred(state, history).choose(rng) {
            return *action;
        }
    }

    if level >= KnowledgeLevel::Legal {
        if let Some(action) = domain.generate_legal(state, history).choose(rng) {
            return *action;
        }
    }

    ActionId::from(rng.gen_range(0..domain.num_actions()))
}
