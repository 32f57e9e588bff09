// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recall`, the skill-* family, the belief-* family, and `web` name
//! collaborator surfaces (the Skill Manager, the Belief Store, and a
//! dashboard server) that spec.md §1 marks out of scope for this core.
//! These handlers report themselves as unimplemented rather than
//! silently succeeding, matching `NoopMaintenance`'s contract.

use anyhow::{bail, Result};

pub fn not_implemented(command: &str) -> Result<()> {
    bail!("'{command}' is not implemented by this core; it names a collaborator surface out of scope for this build")
}
