//! Deterministic ordering for server-ordered lists.
//!
//! Both helpers take the list by value and return a new, normalized list, so a
//! caller never observes a half-sorted structure.

/// A node that owns an ordered list of nodes of the same type.
pub trait Nested: Sized {
    fn split_children(self) -> (Self, Vec<Self>);
    fn with_children(self, children: Vec<Self>) -> Self;
}

/// Stable ascending sort of a flat list by `key`.
pub fn sorted_by_key<T, K, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by_key(|item| key(item));
    items
}

/// Sorts every level of a tree by `key`, children before parents.
pub fn sorted_tree_by_key<T, K, F>(items: Vec<T>, key: &F) -> Vec<T>
where
    T: Nested,
    K: Ord,
    F: Fn(&T) -> K,
{
    let items = items
        .into_iter()
        .map(|item| {
            let (node, children) = item.split_children();
            node.with_children(sorted_tree_by_key(children, key))
        })
        .collect();

    sorted_by_key(items, key)
}
