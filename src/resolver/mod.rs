//! Dependency resolution for components
//!
//! This module handles:
//! - Computing missing dependencies when a component is added
//! - Computing the transitive dependent set when a component is removed
//! - Cycle detection over the registry's dependency graph
//!
//! Resolution is a pure planning phase: nothing is mutated here. The caller
//! shows the plan, asks for confirmation once, and applies it atomically;
//! a declined plan leaves the configuration untouched.

use crate::error::{LocaldevError, Result};
use crate::registry;

/// Outcome of planning a component addition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPlan {
    /// Target is already in the enabled set; a no-op, not an error
    AlreadyEnabled,
    /// Ordered ids to enable: dependencies first, the target last
    Add { to_add: Vec<String> },
}

/// Ordered ids to disable: dependents first, the target last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePlan {
    pub to_remove: Vec<String>,
}

impl RemovePlan {
    /// Dependents that get cascaded out along with the target
    pub fn cascaded(&self) -> &[String] {
        let len = self.to_remove.len();
        &self.to_remove[..len.saturating_sub(1)]
    }
}

/// Plan enabling `target` given the currently enabled set.
///
/// Missing dependencies are resolved recursively and ordered so that
/// applying the list sequentially never violates an unsatisfied dependency.
/// The dependency graph is expected to be acyclic; a cycle is a registry
/// bug and surfaces as a fatal [`LocaldevError::RegistryCycle`].
pub fn resolve_add(target: &str, enabled: &[String]) -> Result<AddPlan> {
    registry::get(target)?;

    if enabled.iter().any(|c| c == target) {
        return Ok(AddPlan::AlreadyEnabled);
    }

    let mut to_add = Vec::new();
    let mut stack = Vec::new();
    visit_dependencies(target, enabled, &mut stack, &mut to_add)?;

    Ok(AddPlan::Add { to_add })
}

fn visit_dependencies(
    id: &str,
    enabled: &[String],
    stack: &mut Vec<String>,
    plan: &mut Vec<String>,
) -> Result<()> {
    if enabled.iter().any(|c| c == id) || plan.iter().any(|c| c == id) {
        return Ok(());
    }
    if stack.iter().any(|c| c == id) {
        return Err(LocaldevError::RegistryCycle { id: id.to_string() });
    }

    let def = registry::get(id)?;

    stack.push(id.to_string());
    for dep in def.dependencies {
        visit_dependencies(dep, enabled, stack, plan)?;
    }
    stack.pop();

    plan.push(id.to_string());
    Ok(())
}

/// Plan disabling `target` given the currently enabled set.
///
/// The dependent set is transitively closed: removing a component that
/// others depend on removes the whole dependent subtree, dependents before
/// the target.
pub fn resolve_remove(target: &str, enabled: &[String]) -> Result<RemovePlan> {
    registry::get(target)?;

    let mut to_remove = Vec::new();
    let mut stack = Vec::new();
    visit_dependents(target, enabled, &mut stack, &mut to_remove)?;

    Ok(RemovePlan { to_remove })
}

fn visit_dependents(
    id: &str,
    enabled: &[String],
    stack: &mut Vec<String>,
    plan: &mut Vec<String>,
) -> Result<()> {
    if plan.iter().any(|c| c == id) {
        return Ok(());
    }
    if stack.iter().any(|c| c == id) {
        return Err(LocaldevError::RegistryCycle { id: id.to_string() });
    }

    stack.push(id.to_string());
    for other in enabled {
        if other == id {
            continue;
        }
        let def = registry::get(other)?;
        if def.dependencies.contains(&id) {
            visit_dependents(other, enabled, stack, plan)?;
        }
    }
    stack.pop();

    plan.push(id.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_add_without_dependencies() {
        let plan = resolve_add("cache", &[]).unwrap();
        assert_eq!(
            plan,
            AddPlan::Add {
                to_add: set(&["cache"])
            }
        );
    }

    #[test]
    fn test_add_resolves_missing_dependency_first() {
        let plan = resolve_add("vector", &[]).unwrap();
        assert_eq!(
            plan,
            AddPlan::Add {
                to_add: set(&["database", "vector"])
            }
        );
    }

    #[test]
    fn test_add_skips_satisfied_dependency() {
        let plan = resolve_add("vector", &set(&["database"])).unwrap();
        assert_eq!(
            plan,
            AddPlan::Add {
                to_add: set(&["vector"])
            }
        );
    }

    #[test]
    fn test_add_already_enabled_is_a_signal_not_an_error() {
        let plan = resolve_add("llm", &set(&["llm"])).unwrap();
        assert_eq!(plan, AddPlan::AlreadyEnabled);
    }

    #[test]
    fn test_add_unknown_component() {
        let err = resolve_add("nope", &[]).unwrap_err();
        assert!(matches!(err, LocaldevError::UnknownComponent { .. }));
    }

    #[test]
    fn test_dependencies_never_depend_on_later_entries() {
        for def in registry::all() {
            if let Ok(AddPlan::Add { to_add }) = resolve_add(def.id, &[]) {
                for (i, id) in to_add.iter().enumerate() {
                    let deps = registry::get(id).unwrap().dependencies;
                    for later in &to_add[i + 1..] {
                        assert!(
                            !deps.contains(&later.as_str()),
                            "{id} depends on later entry {later}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_remove_leaf_component() {
        let plan = resolve_remove("cache", &set(&["cache", "llm"])).unwrap();
        assert_eq!(plan.to_remove, set(&["cache"]));
        assert!(plan.cascaded().is_empty());
    }

    #[test]
    fn test_remove_cascades_dependents_before_target() {
        let plan = resolve_remove("database", &set(&["database", "vector"])).unwrap();
        assert_eq!(plan.to_remove, set(&["vector", "database"]));
        assert_eq!(plan.cascaded(), &set(&["vector"])[..]);
    }

    #[test]
    fn test_remove_without_dependents_when_vector_disabled() {
        let plan = resolve_remove("database", &set(&["database", "cache"])).unwrap();
        assert_eq!(plan.to_remove, set(&["database"]));
    }
}
