//! Linear-to-branching expansion.
//!
//! The expanded world keeps every state, action and transition of the linear
//! source and adds:
//!
//! - new endings (goals and failures) until the ending target is met
//! - at each branch point, one or more deviations: an alternative action
//!   followed by a chain of intermediate states ending in one of the endings
//!
//! Branch points are spread evenly over the non-terminal states of the
//! canonical path. Deviations are assigned to branch points round-robin and
//! the state budget is split evenly across deviations. Because canonical
//! actions are inserted before any alternative, the canonical path stays the
//! first successful path of the expanded world.

use worldbench_graph::prelude::*;

use crate::config::ExpansionConfig;
use crate::error::ExpansionError;
use crate::ids::IdAllocator;
use crate::linear::linear_path;
use crate::synth::{
    ActionContent, BranchSynthesizer, Deviation, DeviationRequest, EndingRequest, StateContent,
    StepRequest,
};

/// How many entities an expansion creates, checked before anything is built.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Plan {
    new_successes: usize,
    new_failures: usize,
    /// Intermediate-state count of each deviation, in creation order.
    chains: Vec<usize>,
}

impl Plan {
    fn new(
        config: &ExpansionConfig,
        source_states: usize,
        candidates: usize,
    ) -> Result<Self, ExpansionError> {
        let endings = config.target_ending_count();
        let successes = config.success_ending_count();
        let branch_points = config.branch_point_count();
        let ending_error = |reason| ExpansionError::EndingCount {
            endings,
            successes,
            reason,
        };

        if branch_points > candidates {
            return Err(ExpansionError::TooManyBranchPoints {
                requested: branch_points,
                available: candidates,
            });
        }
        if endings == 0 {
            return Err(ending_error("the canonical goal is always an ending"));
        }
        if successes == 0 || successes > endings {
            return Err(ending_error(
                "successes must include the canonical goal and not exceed the endings",
            ));
        }
        let new_endings = endings - 1;
        if new_endings > 0 && branch_points == 0 {
            return Err(ending_error("new endings need at least one branch point"));
        }

        let minimum = source_states + new_endings;
        let target = config.target_state_count();
        if target < minimum {
            return Err(ExpansionError::TooFewStates { target, minimum });
        }
        let extra = target - minimum;
        let chain_count = if branch_points == 0 {
            0
        } else {
            branch_points.max(new_endings)
        };
        if extra > 0 && chain_count == 0 {
            return Err(ExpansionError::NoRoomForStates { extra });
        }

        let chains = (0..chain_count)
            .map(|j| extra / chain_count + usize::from(j < extra % chain_count))
            .collect();
        Ok(Self {
            new_successes: successes - 1,
            new_failures: endings - successes,
            chains,
        })
    }
}

/// Picks `count` states spread evenly over `candidates`: the centre of each
/// of `count` equal segments.
fn spread<T: Copy>(candidates: &[T], count: usize) -> Vec<T> {
    let len = candidates.len();
    (0..count)
        .map(|i| candidates[((2 * i + 1) * len) / (2 * count)])
        .collect()
}

/// Expands a linear world into a branching one.
///
/// The result has exactly `config.target_state_count()` states and exactly
/// `config.target_ending_count()` states without exits, and its first
/// successful path is the canonical path of `world`.
///
/// # Errors
///
/// - [`ExpansionError::NotLinear`] or [`ExpansionError::NoCanonicalGoal`] if
///   `world` is not a single path to a goal
/// - [`ExpansionError::TooManyBranchPoints`], [`ExpansionError::EndingCount`],
///   [`ExpansionError::TooFewStates`] or [`ExpansionError::NoRoomForStates`]
///   if the targets cannot be met
/// - [`ExpansionError::Synthesis`] if the synthesizer fails
///
/// # Example
///
/// ```
/// use worldbench_expand::{ExpansionConfig, TemplateSynthesizer, expand};
/// use worldbench_graph::prelude::*;
///
/// let mut world = WorldGraph::new("tea_linear", State::new("s0", "Kettle is cold")?)?;
/// world
///     .add_state(State::new("s1", "Water is boiling")?)?
///     .add_goal_state(State::new("s2", "Tea is brewed")?)?
///     .add_action(Action::new("a0", "Boil the water")?)?
///     .add_action(Action::new("a1", "Pour over the leaves")?)?
///     .add_transition(Transition::new("s0", "a0", "s1"))?
///     .add_transition(Transition::new("s1", "a1", "s2"))?;
///
/// let config = ExpansionConfig::new(6, 3, 1);
/// let branching = expand(&world, &config, &mut TemplateSynthesizer)?;
///
/// assert_eq!(branching.name(), "tea_branching");
/// assert_eq!(branching.state_count(), 6);
/// assert_eq!(branching.terminal_states().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn expand<S>(
    world: &WorldGraph,
    config: &ExpansionConfig,
    synthesizer: &mut S,
) -> Result<WorldGraph, ExpansionError>
where
    S: BranchSynthesizer + ?Sized,
{
    let path = linear_path(world)?;
    let goal_id = path
        .last()
        .map_or(world.initial_state_id(), |t| t.end());
    if !world.is_goal(goal_id.as_str()) {
        return Err(ExpansionError::NoCanonicalGoal {
            state: goal_id.to_string(),
        });
    }
    let plan = Plan::new(config, world.state_count(), path.len())?;
    let branch_points = spread(&path, config.branch_point_count());

    tracing::debug!(
        world = %world.name(),
        branch_points = branch_points.len(),
        deviations = plan.chains.len(),
        new_successes = plan.new_successes,
        new_failures = plan.new_failures,
        "planned expansion"
    );

    let mut expanded = world.clone();
    expanded.rename(config.expanded_name(world.name()));
    let mut ids = IdAllocator::new();
    let scenario = world.name();
    let canonical_goal = world
        .state(goal_id.as_str())
        .ok_or_else(|| GraphError::unknown_state(goal_id, "expansion"))?;

    // Endings first, so deviations can target them.
    let mut endings: Vec<State> = Vec::new();
    let kinds = core::iter::repeat_n(StateKind::Goal, plan.new_successes)
        .chain(core::iter::repeat_n(StateKind::Failure, plan.new_failures));
    let (mut goals, mut failures) = (0, 0);
    for kind in kinds {
        let counter = if kind == StateKind::Goal {
            &mut goals
        } else {
            &mut failures
        };
        let content = synthesizer.ending(&EndingRequest {
            scenario,
            canonical_goal,
            kind,
            index: *counter,
        })?;
        *counter += 1;
        let state = build_state(ids.ending_id(&expanded, kind), content)?.with_kind(kind);
        expanded.add_state(state.clone())?;
        endings.push(state);
    }

    for (j, &steps) in plan.chains.iter().enumerate() {
        let canonical = branch_points[j % branch_points.len()];
        let target = if endings.is_empty() {
            canonical_goal
        } else {
            &endings[j % endings.len()]
        };
        let deviation = Deviation::nth(j / branch_points.len());
        let branch_state = world
            .state(canonical.start().as_str())
            .ok_or_else(|| GraphError::unknown_state(canonical.start(), "expansion"))?;
        let canonical_action = world
            .action(canonical.action().as_str())
            .ok_or_else(|| GraphError::unknown_action(canonical.action(), "expansion"))?;

        let content = synthesizer.alternative_action(&DeviationRequest {
            scenario,
            branch_state,
            canonical_action,
            deviation,
            target,
        })?;
        let mut via = ids.action_id(&expanded);
        expanded.add_action(build_action(via.clone(), content, deviation)?)?;
        let mut previous = branch_state.id().clone();

        for step in 0..steps {
            let request = StepRequest {
                scenario,
                branch_state,
                deviation,
                target,
                step,
                steps,
            };
            let state = build_state(
                ids.state_id(&expanded),
                synthesizer.intermediate_state(&request)?,
            )?;
            let state_id = state.id().clone();
            expanded
                .add_state(state)?
                .add_transition(Transition::new(previous, via, state_id.clone()))?;

            via = ids.action_id(&expanded);
            expanded.add_action(build_action(
                via.clone(),
                synthesizer.step_action(&request)?,
                deviation,
            )?)?;
            previous = state_id;
        }
        expanded.add_transition(Transition::new(previous, via, target.id().clone()))?;
    }

    let canonical: Vec<_> = path.iter().map(|t| t.triple()).collect();
    if !expanded.all_paths().any(|p| p.to_triples() == canonical) {
        return Err(ExpansionError::CanonicalPathLost {
            world: expanded.name().to_owned(),
        });
    }

    tracing::info!(
        world = %expanded.name(),
        states = expanded.state_count(),
        transitions = expanded.transition_count(),
        endings = expanded.terminal_states().len(),
        "expanded world"
    );
    Ok(expanded)
}

fn build_state(id: StateId, content: StateContent) -> Result<State, GraphError> {
    let mut state = State::new(id, content.description)?;
    if let Some(quality) = content.quality {
        state = state.with_quality(quality);
    }
    if let Some(reasoning) = content.reasoning {
        state = state.with_reasoning(reasoning);
    }
    Ok(state)
}

fn build_action(
    id: ActionId,
    content: ActionContent,
    deviation: Deviation,
) -> Result<Action, GraphError> {
    let action_type = content
        .action_type
        .unwrap_or_else(|| deviation.as_str().to_owned());
    Ok(Action::new(id, content.description)?.with_action_type(action_type))
}
