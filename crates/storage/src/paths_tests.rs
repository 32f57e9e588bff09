// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn skeleton_covers_every_documented_directory() {
    let paths = AgentPaths::new("/agent");
    let skeleton = paths.skeleton();
    assert!(skeleton.contains(&paths.events_dir()));
    assert!(skeleton.contains(&paths.history_dir()));
    assert!(skeleton.contains(&paths.runtime_dir()));
    assert!(skeleton.contains(&paths.scratch_dir()));
}

#[test]
fn paths_are_rooted_under_agent_home() {
    let paths = AgentPaths::new("/agent");
    assert_eq!(paths.inbox_md(), Path::new("/agent/tasks/inbox.md"));
    assert_eq!(paths.budgets_json(), Path::new("/agent/runtime/budgets.json"));
    assert_eq!(paths.identity_md(), Path::new("/agent/boot/identity.md"));
}
