//! Assertions for merged histories.
//!
//! These hold for anything produced by the graph path:
//! - uuids are unique
//! - display indices count up from 0 in emission order
//! - every parent with several emitted children has exactly one child on its
//!   own branch, the rest on distinct fresh branches one level deeper

use anyhow::{Result, bail};
use chatweave_types::NormalizedMessage;
use std::collections::{HashMap, HashSet};

pub fn assert_unique_uuids(history: &[NormalizedMessage]) -> Result<()> {
    let mut seen = HashSet::new();
    for message in history {
        if !seen.insert(message.uuid) {
            bail!(
                "Duplicate uuid {} at display index {}",
                message.uuid,
                message.display_index
            );
        }
    }
    Ok(())
}

pub fn assert_display_order(history: &[NormalizedMessage]) -> Result<()> {
    for (position, message) in history.iter().enumerate() {
        if message.display_index != position {
            bail!(
                "Message at position {} has display index {}",
                position,
                message.display_index
            );
        }
    }
    Ok(())
}

pub fn assert_branch_uniqueness(history: &[NormalizedMessage]) -> Result<()> {
    let by_uuid: HashMap<_, _> = history.iter().map(|m| (m.uuid, m)).collect();

    let mut children: HashMap<_, Vec<&NormalizedMessage>> = HashMap::new();
    for message in history {
        if let Some(parent) = message.parent_uuid {
            children.entry(parent).or_default().push(message);
        }
    }

    for (parent_uuid, kids) in &children {
        if kids.len() < 2 {
            continue;
        }
        let Some(parent) = by_uuid.get(parent_uuid) else {
            continue;
        };

        let continuing = kids
            .iter()
            .filter(|k| k.branch_id == parent.branch_id && k.branch_level == parent.branch_level)
            .count();
        if continuing != 1 {
            bail!(
                "Parent {} has {} children continuing branch {}, expected 1",
                parent.display_index,
                continuing,
                parent.branch_id
            );
        }

        let mut fresh = HashSet::new();
        for kid in kids.iter().filter(|k| k.branch_id != parent.branch_id) {
            if !fresh.insert(kid.branch_id.clone()) {
                bail!(
                    "Branch {} reused by siblings under parent {}",
                    kid.branch_id,
                    parent.display_index
                );
            }
            if kid.branch_level != parent.branch_level + 1 {
                bail!(
                    "Message {} on branch {} has level {}, expected {}",
                    kid.display_index,
                    kid.branch_id,
                    kid.branch_level,
                    parent.branch_level + 1
                );
            }
        }
    }

    Ok(())
}

/// Run every history check
pub fn assert_history_invariants(history: &[NormalizedMessage]) -> Result<()> {
    assert_unique_uuids(history)?;
    assert_display_order(history)?;
    assert_branch_uniqueness(history)?;
    Ok(())
}
