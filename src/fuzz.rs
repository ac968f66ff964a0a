//! Module implement [Arbitrary] for [RbTree], so that trees can be
//! generated from raw fuzzer bytes.

use arbitrary::{Arbitrary, Result, Unstructured};
use compare::Compare;

use crate::RbTree;

impl<K, V, C> Arbitrary for RbTree<K, V, C>
where
    K: Arbitrary,
    V: Arbitrary,
    C: 'static + Compare<K> + Default,
{
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        let items: Vec<(K, V)> = u.arbitrary()?;
        Ok(items.into_iter().collect())
    }
}
