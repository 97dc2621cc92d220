use std::collections::BTreeSet;

use crate::unit::UnitHost;

/// Load every unit reachable from the program's direct references.
///
/// Walks the reference graph depth-first in declaration order. Each unit is
/// loaded once; the visited set also ends the walk on reference cycles.
/// Returns the names of every unit loaded.
pub fn preload_references<H>(host: &mut H) -> anyhow::Result<BTreeSet<String>>
where
    H: UnitHost + ?Sized,
{
    let mut loaded = BTreeSet::new();
    let mut pending: Vec<String> = host.entry_references()?.into_iter().rev().collect();

    while let Some(name) = pending.pop() {
        if loaded.contains(&name) {
            continue;
        }

        tracing::debug!(unit = %name, "preloading code unit");
        let references = host.load(&name)?;
        loaded.insert(name);
        pending.extend(references.into_iter().rev());
    }

    tracing::debug!(units = loaded.len(), "preloaded referenced code units");
    Ok(loaded)
}
