/// Returns a sub-multiset of `candidates` whose elements sum exactly to
/// `target`, or `None` if no such selection exists. The input is not
/// mutated; the caller applies the removal.
///
/// Classic 0/1 subset-sum DP: `reachable[i][s]` records whether sum `s` is
/// reachable using the first `i` candidates, and a parallel parent table
/// records the predecessor sum when candidate `i` was used. O(n * target)
/// time and space, so it degrades on very large targets; lengths here are
/// small bounded integers in practice.
pub fn subset_sum(candidates: &[u64], target: u64) -> Option<Vec<u64>> {
    if candidates.iter().sum::<u64>() < target {
        return None;
    }

    let n = candidates.len();
    let t = target as usize;
    let mut reachable = vec![vec![false; t + 1]; n + 1];
    let mut parent: Vec<Vec<Option<usize>>> = vec![vec![None; t + 1]; n + 1];
    reachable[0][0] = true;

    for i in 1..=n {
        let c = candidates[i - 1] as usize;
        for s in 0..=t {
            reachable[i][s] = reachable[i - 1][s];
            if s >= c && reachable[i - 1][s - c] {
                reachable[i][s] = true;
                parent[i][s] = Some(s - c);
            }
        }
    }

    if !reachable[n][t] {
        return None;
    }

    // Walk the parent table backward; explicit loop rather than recursion
    // so large targets cannot exhaust the stack.
    let mut witness = Vec::new();
    let mut i = n;
    let mut s = t;
    while s > 0 {
        if let Some(prev) = parent[i][s] {
            witness.push((s - prev) as u64);
            s = prev;
        }
        i -= 1;
    }
    Some(witness)
}
