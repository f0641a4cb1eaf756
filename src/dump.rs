// Textual introspection view over a `LirsCache`, for debugging and tests.
// Formatting is not part of the crate's stability contract.

use std::fmt;
use std::hash::Hash;

use crate::lirs::LirsCache;

/// Borrowing `Display` view produced by [`LirsCache::dump`].
pub struct Dump<'a, K, V>(pub(crate) &'a LirsCache<K, V>);

impl<'a, K, V> fmt::Display for Dump<'a, K, V>
where
    K: fmt::Display + Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.0;

        writeln!(f, "LIRS cache dump")?;
        writeln!(
            f,
            "  capacity: total={} lir={} hir={} lir_count={} size={}",
            cache.capacity(),
            cache.lir_capacity(),
            cache.hir_capacity(),
            cache.lir_count(),
            cache.size(),
        )?;

        writeln!(f, "  stack S (top -> bottom):")?;
        let mut any = false;
        for (key, classification) in cache.iter_stack() {
            any = true;
            writeln!(f, "    {key} [{classification}]")?;
        }
        if !any {
            writeln!(f, "    (empty)")?;
        }

        writeln!(f, "  queue Q (top -> bottom):")?;
        let mut any = false;
        for key in cache.iter_queue() {
            any = true;
            writeln!(f, "    {key}")?;
        }
        if !any {
            writeln!(f, "    (empty)")?;
        }

        writeln!(f, "  resident:")?;
        let mut any = false;
        for (key, _value, classification) in cache.iter_resident() {
            any = true;
            writeln!(f, "    {key} [{classification}]")?;
        }
        if !any {
            writeln!(f, "    (empty)")?;
        }

        Ok(())
    }
}
