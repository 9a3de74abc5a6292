//! Linearity checks.

use hashbrown::HashSet;
use worldbench_graph::prelude::*;

use crate::error::ExpansionError;

/// Returns the single path of a linear world, from the initial state to the
/// only state without exits.
///
/// A world is linear when every state lies on that path and no state has
/// more than one outgoing transition.
///
/// # Errors
///
/// Returns [`ExpansionError::NotLinear`] naming the first state that breaks
/// linearity.
pub fn linear_path(world: &WorldGraph) -> Result<Vec<&Transition>, ExpansionError> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = world.initial_state_id();
    seen.insert(current);

    loop {
        let mut outgoing = world.outgoing(current.as_str());
        let Some(next) = outgoing.next() else {
            break;
        };
        if outgoing.next().is_some() {
            return Err(not_linear(current, "state has more than one outgoing transition"));
        }
        if !seen.insert(next.end()) {
            return Err(not_linear(next.end(), "path revisits this state"));
        }
        path.push(next);
        current = next.end();
    }

    if let Some(stray) = world.states().find(|s| !seen.contains(s.id())) {
        return Err(not_linear(stray.id(), "state is not on the path from the initial state"));
    }
    Ok(path)
}

/// Returns true if the world is a single path covering every state.
#[must_use]
pub fn is_linear(world: &WorldGraph) -> bool {
    linear_path(world).is_ok()
}

fn not_linear(state: &StateId, reason: &'static str) -> ExpansionError {
    ExpansionError::NotLinear {
        state: state.to_string(),
        reason,
    }
}
