use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::LinkerOptions;
use crate::core::command::Command;
use crate::core::module::{ModuleName, ModuleSet};
use crate::graph::{DependencyGraph, GraphNode};
use crate::link::LinkStrategy;

/// A module that could not be ordered, with the local edges that were
/// still unsatisfied when the engine gave up.
#[derive(Debug, Clone)]
pub struct UnresolvedModule {
    pub name: ModuleName,
    pub waiting_on: Vec<ModuleName>,
}

#[derive(Debug, Error)]
#[error("unable to fully resolve dependencies: {}", describe_remaining(.remaining))]
pub struct UnresolvedError {
    pub remaining: Vec<UnresolvedModule>,
}

impl UnresolvedError {
    pub fn names(&self) -> Vec<&str> {
        self.remaining
            .iter()
            .map(|module| module.name.as_str())
            .collect()
    }
}

fn describe_remaining(remaining: &[UnresolvedModule]) -> String {
    remaining
        .iter()
        .map(|module| {
            if module.waiting_on.is_empty() {
                module.name.as_str().to_string()
            } else {
                let deps: Vec<&str> = module.waiting_on.iter().map(ModuleName::as_str).collect();
                format!("{} (waiting on {})", module.name, deps.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One unit of engine progress: a plain module, or a mutually-dependent
/// pair committed atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    Single(ModuleName),
    Pair(ModuleName, ModuleName),
}

impl Serialize for ResolutionStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResolutionStep::Single(name) => serializer.serialize_str(name.as_str()),
            ResolutionStep::Pair(first, second) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(first.as_str())?;
                seq.serialize_element(second.as_str())?;
                seq.end()
            }
        }
    }
}

#[derive(Debug)]
pub struct Resolution {
    pub steps: Vec<ResolutionStep>,
    pub commands: Vec<Command>,
}

struct ResolutionState {
    unresolved: Vec<GraphNode>,
    solved: Vec<ModuleName>,
}

impl ResolutionState {
    fn satisfied(&self, deps: &[ModuleName], extra: Option<&ModuleName>) -> bool {
        deps.iter()
            .all(|dep| self.solved.contains(dep) || extra == Some(dep))
    }
}

enum Pass {
    Plain(usize),
    Cycle(usize, usize),
}

/// Order every module of `graph` and emit the command stream that links
/// them. The engine scans its remaining work list in discovery order and
/// commits at most one step per pass: the first plain node whose local
/// dependencies are all solved, or the first mutually-dependent pair
/// whose remaining edges cover each other. Each committed step resets the
/// retry counter; `options.retries` consecutive unproductive passes abort
/// the run with the full remaining set.
pub fn resolve(
    graph: &DependencyGraph,
    modules: &ModuleSet,
    strategy: &dyn LinkStrategy,
    options: &LinkerOptions,
) -> Result<Resolution, UnresolvedError> {
    let mut state = ResolutionState {
        unresolved: graph.iter().cloned().collect(),
        solved: Vec::new(),
    };
    let mut steps = Vec::new();
    let mut commands = Vec::new();
    let mut retries = options.retries;

    while !state.unresolved.is_empty() {
        match scan(&state) {
            Some(Pass::Plain(idx)) => {
                let node = state.unresolved.remove(idx);
                commands.extend(strategy.link_module(&node, modules));
                append_hooks(&mut commands, options);
                state.solved.push(node.name.clone());
                steps.push(ResolutionStep::Single(node.name));
                retries = options.retries;
            }
            Some(Pass::Cycle(idx, partner_idx)) => {
                // remove the higher index first so the lower one stays valid
                let (node, partner) = if idx < partner_idx {
                    let partner = state.unresolved.remove(partner_idx);
                    (state.unresolved.remove(idx), partner)
                } else {
                    let node = state.unresolved.remove(idx);
                    (node, state.unresolved.remove(partner_idx))
                };
                commands.extend(strategy.link_cycle(&node, &partner, modules));
                append_hooks(&mut commands, options);
                state.solved.push(node.name.clone());
                state.solved.push(partner.name.clone());
                steps.push(ResolutionStep::Pair(node.name, partner.name));
                retries = options.retries;
            }
            None => {
                if retries <= 1 {
                    return Err(unresolved_error(&state));
                }
                retries -= 1;
            }
        }
    }

    Ok(Resolution { steps, commands })
}

fn scan(state: &ResolutionState) -> Option<Pass> {
    for (idx, node) in state.unresolved.iter().enumerate() {
        if !node.cyclic {
            if state.satisfied(&node.depends_on, None) {
                return Some(Pass::Plain(idx));
            }
            continue;
        }
        // only another cyclic node can be the partner
        for (partner_idx, partner) in state.unresolved.iter().enumerate() {
            if partner_idx == idx || !partner.cyclic {
                continue;
            }
            if state.satisfied(&node.depends_on, Some(&partner.name))
                && state.satisfied(&partner.depends_on, Some(&node.name))
            {
                return Some(Pass::Cycle(idx, partner_idx));
            }
        }
    }
    None
}

fn append_hooks(commands: &mut Vec<Command>, options: &LinkerOptions) {
    for hook in &options.post_link {
        commands.push(Command::Shell(hook.clone()));
    }
}

fn unresolved_error(state: &ResolutionState) -> UnresolvedError {
    let remaining = state
        .unresolved
        .iter()
        .map(|node| UnresolvedModule {
            name: node.name.clone(),
            waiting_on: node
                .depends_on
                .iter()
                .filter(|dep| !state.solved.contains(dep))
                .cloned()
                .collect(),
        })
        .collect();

    UnresolvedError { remaining }
}
