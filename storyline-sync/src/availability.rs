//! Candidate availability — the part of the pool no template has claimed.

use std::collections::HashSet;

use storyline_core::{Product, ProductId};

/// Return `pool` minus every claimed product, preserving pool order.
///
/// `claimed` is the union of every template's current selection
/// ([`crate::SelectionStore::claimed_ids`]). Recomputed after every store
/// mutation rather than patched incrementally; pool sizes are small
/// enough that the full pass is the simpler and safer choice.
pub fn available(pool: &[Product], claimed: &HashSet<ProductId>) -> Vec<Product> {
    pool.iter()
        .filter(|product| !claimed.contains(&product.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use storyline_core::ExternalId;

    use super::*;

    fn product(id: &str, external: u64) -> Product {
        Product {
            id: ProductId::from(id),
            external_id: ExternalId(external),
            name: format!("Product {id}"),
            story_url: None,
        }
    }

    #[test]
    fn unclaimed_pool_is_fully_available() {
        let pool = vec![product("p1", 1), product("p2", 2)];
        let got = available(&pool, &HashSet::new());
        assert_eq!(got, pool);
    }

    #[test]
    fn claimed_products_are_excluded() {
        let pool = vec![product("p1", 1), product("p2", 2), product("p3", 3)];
        let claimed = HashSet::from([ProductId::from("p2")]);
        let got = available(&pool, &claimed);
        assert_eq!(got, vec![product("p1", 1), product("p3", 3)]);
    }

    #[test]
    fn fully_claimed_pool_is_empty() {
        let pool = vec![product("p1", 1), product("p2", 2)];
        let claimed = HashSet::from([ProductId::from("p1"), ProductId::from("p2")]);
        assert!(available(&pool, &claimed).is_empty());
    }
}
