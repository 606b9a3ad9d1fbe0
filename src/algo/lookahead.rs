use log::warn;
use rand::{seq::SliceRandom, Rng};
use strum::VariantArray;

use crate::{
    assert_interval,
    env::Environment,
    exploration::{Choice, EpsilonGreedy},
    gym::{Action, Maze},
};

/// Outcome of [`Policy::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// The best one-step lookahead value from the agent's cell
    pub value: f64,
    /// The action to take next
    pub action: Action,
}

/// One-step lookahead policy over the four neighbors of the agent
///
/// The lookahead value of a move is the reward of the neighbor plus its current value
/// estimate. Walls are never out of range since they ring the maze, they only score very low.
///
/// Action selection, in priority order:
/// 1. a random agent picks uniformly among all actions
/// 2. an exploration draw picks uniformly among all actions
/// 3. otherwise, with probability `partial_greedy` one of the best actions is picked, and one of
///    the remaining actions if not
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    partial_greedy: f64,
    random_agent: bool,
}

impl Policy {
    /// **Panics** if `partial_greedy` is not in the interval `[0,1]`
    pub fn new(partial_greedy: f64, random_agent: bool) -> Self {
        assert_interval!(partial_greedy, 0.0, 1.0);
        Self {
            partial_greedy,
            random_agent,
        }
    }

    /// A policy that always takes one of the best actions
    pub fn greedy() -> Self {
        Self::new(1.0, false)
    }

    pub fn partial_greedy(&self) -> f64 {
        self.partial_greedy
    }

    /// **Panics** if `partial_greedy` is not in the interval `[0,1]`
    pub fn set_partial_greedy(&mut self, partial_greedy: f64) {
        assert_interval!(partial_greedy, 0.0, 1.0);
        self.partial_greedy = partial_greedy;
    }

    /// Lookahead values of every action, indexed by [`Action::index`]
    pub fn lookahead(maze: &Maze) -> [f64; 4] {
        let agent = maze.agent();
        std::array::from_fn(|i| {
            maze.neighbor(agent, Action::VARIANTS[i])
                .map(|pos| {
                    let cell = maze.cell(pos);
                    cell.reward() + cell.value()
                })
                .unwrap_or(f64::NEG_INFINITY)
        })
    }

    /// The largest lookahead value from the agent's cell
    pub fn best_value(maze: &Maze) -> f64 {
        max_value(&Self::lookahead(maze))
    }

    /// Compute the best lookahead value and choose the next action
    ///
    /// The returned value never depends on how the action was chosen.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        maze: &Maze,
        exploration: &EpsilonGreedy,
        rng: &mut R,
    ) -> Evaluation {
        let values = Self::lookahead(maze);
        let value = max_value(&values);

        let action = if self.random_agent {
            maze.random_action(rng)
        } else {
            match exploration.choose(rng) {
                Choice::Explore => maze.random_action(rng),
                Choice::Exploit => self.exploit(&values, value, rng),
            }
        };

        Evaluation { value, action }
    }

    fn exploit<R: Rng + ?Sized>(&self, values: &[f64; 4], best: f64, rng: &mut R) -> Action {
        let (best_actions, other_actions): (Vec<Action>, Vec<Action>) = Action::VARIANTS
            .iter()
            .copied()
            .partition(|action| values[action.index()] == best);

        let candidates = if rng.gen::<f64>() < self.partial_greedy {
            &best_actions
        } else if other_actions.is_empty() {
            warn!("All actions tie at {best}, falling back to a best action");
            &best_actions
        } else {
            &other_actions
        };

        *candidates
            .choose(rng)
            .expect("The best value is attained by at least one action")
    }
}

fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
