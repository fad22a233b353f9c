/// Rearranges `items` into the next lexicographic permutation.
///
/// Returns `false` once `items` was the last permutation, leaving it sorted
/// in descending order. Starting from ascending order enumerates all `n!`
/// permutations exactly once, in a fixed order.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }

    // longest non-increasing suffix
    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }

    if pivot == 0 {
        return false;
    }

    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot - 1] {
        successor -= 1;
    }

    items.swap(pivot - 1, successor);
    items[pivot..].reverse();

    true
}
