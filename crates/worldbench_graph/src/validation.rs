//! Soft validation of world graphs.
//!
//! Hard structural rules are enforced by the `add_*` methods. Everything a
//! well-formed world *should* satisfy but an authored or generated world may
//! still violate is collected here into a [`ValidationReport`], so callers
//! can inspect a complete diagnostic before deciding whether to reject.

use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::graph::WorldGraph;
use crate::state::{StateId, StateKind};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Tolerated anomaly; the world is still usable.
    Warning,
    /// The world does not satisfy a required invariant.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single finding of [`WorldGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The state cannot be reached from the initial state.
    UnreachableState {
        /// The orphaned state.
        state: StateId,
    },
    /// A state that is not designated terminal has no outgoing transitions.
    DeadEnd {
        /// The stuck state.
        state: StateId,
    },
    /// A reachable state has exits, but none of them leads to a terminal state.
    NoRouteToEnding {
        /// The trapped state.
        state: StateId,
    },
    /// A designated goal or final state still has outgoing transitions.
    TerminalHasExits {
        /// The terminal state.
        state: StateId,
        /// Number of outgoing transitions.
        out_degree: usize,
    },
    /// A quality score was attached to a state that is not terminal.
    QualityOnOrdinaryState {
        /// The annotated state.
        state: StateId,
    },
    /// A state classified as a failure is designated a goal.
    GoalClassifiedAsFailure {
        /// The contradictory state.
        state: StateId,
    },
    /// No state is designated a goal.
    NoGoalState,
}

impl Diagnostic {
    /// Returns the severity of this finding.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::GoalClassifiedAsFailure { .. } | Diagnostic::NoGoalState => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }

    /// Returns the state the finding is about, if it concerns one state.
    #[must_use]
    pub fn state(&self) -> Option<&StateId> {
        match self {
            Diagnostic::UnreachableState { state }
            | Diagnostic::DeadEnd { state }
            | Diagnostic::NoRouteToEnding { state }
            | Diagnostic::TerminalHasExits { state, .. }
            | Diagnostic::QualityOnOrdinaryState { state }
            | Diagnostic::GoalClassifiedAsFailure { state } => Some(state),
            Diagnostic::NoGoalState => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnreachableState { state } => {
                write!(f, "state '{state}' is unreachable from the initial state")
            }
            Diagnostic::DeadEnd { state } => {
                write!(
                    f,
                    "state '{state}' has no outgoing transitions but is not designated goal or final"
                )
            }
            Diagnostic::NoRouteToEnding { state } => {
                write!(f, "no terminal state can be reached from state '{state}'")
            }
            Diagnostic::TerminalHasExits { state, out_degree } => {
                write!(
                    f,
                    "terminal state '{state}' has {out_degree} outgoing transition(s)"
                )
            }
            Diagnostic::QualityOnOrdinaryState { state } => {
                write!(f, "non-terminal state '{state}' carries a quality score")
            }
            Diagnostic::GoalClassifiedAsFailure { state } => {
                write!(f, "state '{state}' is classified as failure but designated a goal")
            }
            Diagnostic::NoGoalState => write!(f, "world has no goal state"),
        }
    }
}

/// Every finding of one validation run, unreachable states first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Returns true if the report contains no errors (warnings are allowed).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Returns true if the report contains nothing at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns every finding in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the error-level findings.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
    }

    /// Returns the warning-level findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    /// Converts the report into a `Result`, failing with the error-level findings.
    ///
    /// # Errors
    ///
    /// Returns every error-level diagnostic if there is at least one.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, Vec<Diagnostic>> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .diagnostics
            .into_iter()
            .partition(|d| d.severity() == Severity::Error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(errors)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return write!(f, "no problems found");
        }
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {diagnostic}", diagnostic.severity())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl WorldGraph {
    /// Checks the world against every soft invariant and collects all findings.
    ///
    /// Never fails: the report is returned even for badly malformed worlds.
    ///
    /// # Example
    ///
    /// ```
    /// use worldbench_graph::prelude::*;
    ///
    /// let mut world = WorldGraph::new("stub", State::new("s0", "Nothing happens")?)?;
    /// world.add_state(State::new("orphan", "Never visited")?)?;
    ///
    /// let report = world.validate();
    /// assert!(!report.is_ok());
    /// assert!(matches!(report.diagnostics()[0], Diagnostic::UnreachableState { .. }));
    /// # Ok::<(), GraphError>(())
    /// ```
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut diagnostics = Vec::new();
        let reachable = self.reachable_states();

        for state in self.states() {
            if !reachable.contains(state.id()) {
                diagnostics.push(Diagnostic::UnreachableState {
                    state: state.id().clone(),
                });
            }
        }

        let can_end = self.states_with_route_to_ending();
        for state in self.states() {
            let id = state.id();
            let designated = self.is_goal(id.as_str()) || self.is_final(id.as_str());
            let out_degree = self.out_degree(id.as_str());

            if out_degree == 0 && !designated {
                diagnostics.push(Diagnostic::DeadEnd { state: id.clone() });
            } else if out_degree > 0 && designated {
                diagnostics.push(Diagnostic::TerminalHasExits {
                    state: id.clone(),
                    out_degree,
                });
            } else if out_degree > 0 && reachable.contains(id) && !can_end.contains(id) {
                diagnostics.push(Diagnostic::NoRouteToEnding { state: id.clone() });
            }

            if state.quality().is_some() && !designated && !state.kind().is_terminal() {
                diagnostics.push(Diagnostic::QualityOnOrdinaryState { state: id.clone() });
            }
            if self.is_goal(id.as_str()) && state.kind() == StateKind::Failure {
                diagnostics.push(Diagnostic::GoalClassifiedAsFailure { state: id.clone() });
            }
        }

        if self.goal_state_ids().next().is_none() {
            diagnostics.push(Diagnostic::NoGoalState);
        }

        let report = ValidationReport { diagnostics };
        tracing::debug!(
            world = %self.name(),
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "validated world"
        );
        report
    }

    /// States from which some terminal state (designated, or without exits)
    /// can be reached, found by walking transitions backwards.
    fn states_with_route_to_ending(&self) -> HashSet<&StateId> {
        let mut incoming: HashMap<&StateId, Vec<&StateId>> = HashMap::new();
        for transition in self.transitions() {
            incoming
                .entry(transition.end())
                .or_default()
                .push(transition.start());
        }

        let mut seen: HashSet<&StateId> = self
            .states()
            .map(|s| s.id())
            .filter(|id| self.is_terminal(id.as_str()))
            .collect();
        let mut stack: Vec<&StateId> = seen.iter().copied().collect();
        while let Some(current) = stack.pop() {
            for &previous in incoming.get(current).into_iter().flatten() {
                if seen.insert(previous) {
                    stack.push(previous);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::state::State;
    use crate::transition::Transition;

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(Diagnostic::NoGoalState.severity(), Severity::Error);
        assert_eq!(
            Diagnostic::DeadEnd {
                state: StateId::from("s1")
            }
            .severity(),
            Severity::Warning
        );
    }

    #[test]
    fn report_display_prefixes_severity() {
        let report = ValidationReport {
            diagnostics: vec![
                Diagnostic::UnreachableState {
                    state: StateId::from("s9"),
                },
                Diagnostic::NoGoalState,
            ],
        };
        assert_eq!(
            report.to_string(),
            "warning: state 's9' is unreachable from the initial state\n\
             error: world has no goal state"
        );
        assert_eq!(report.clone().into_result().unwrap_err().len(), 1);
    }

    #[test]
    fn trapped_cycle_is_reported() {
        let mut world = WorldGraph::new("loop", State::new("s0", "start").unwrap()).unwrap();
        world
            .add_state(State::new("s1", "spinning").unwrap())
            .unwrap()
            .add_goal_state(State::new("goal", "never reached").unwrap())
            .unwrap()
            .add_action(Action::new("go", "go").unwrap())
            .unwrap()
            .add_action(Action::new("back", "back").unwrap())
            .unwrap()
            .add_transition(Transition::new("s0", "go", "s1"))
            .unwrap()
            .add_transition(Transition::new("s1", "back", "s0"))
            .unwrap();

        let report = world.validate();
        let trapped: Vec<_> = report
            .iter_trapped()
            .map(|id| id.as_str().to_owned())
            .collect();
        assert_eq!(trapped, ["s0", "s1"]);
        assert!(matches!(
            report.diagnostics()[0],
            Diagnostic::UnreachableState { ref state } if state.as_str() == "goal"
        ));
    }

    impl ValidationReport {
        fn iter_trapped(&self) -> impl Iterator<Item = &StateId> + '_ {
            self.diagnostics.iter().filter_map(|d| match d {
                Diagnostic::NoRouteToEnding { state } => Some(state),
                _ => None,
            })
        }
    }
}
