//! Longest-common-subsequence anchor computation.
//!
//! Both strategies return matched `(old_index, new_index)` pairs, 0-based and
//! strictly increasing in both coordinates.

/// Full (m+1)x(n+1) table, backtracked from (m, n).
///
/// On a mismatch with equal neighbours the walk moves up, leaving the old
/// line unmatched first. That is what makes a replaced line come out as
/// `delete` followed by `insert`.
pub(crate) fn table_anchors(old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
    let (m, n) = (old.len(), new.len());
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if old[i - 1] == new[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    let mut anchors = Vec::with_capacity(dp[m * width + n] as usize);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            anchors.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[(i - 1) * width + j] >= dp[i * width + (j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    anchors.reverse();
    anchors
}

/// Linear-space LCS (Hirschberg) for inputs past the table limit.
///
/// Common prefix and suffix are matched directly before dividing.
pub(crate) fn linear_space_anchors(old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut anchors: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();
    hirschberg(
        &old[prefix..old.len() - suffix],
        &new[prefix..new.len() - suffix],
        prefix,
        prefix,
        &mut anchors,
    );
    let (old_tail, new_tail) = (old.len() - suffix, new.len() - suffix);
    anchors.extend((0..suffix).map(|k| (old_tail + k, new_tail + k)));
    anchors
}

fn hirschberg(
    old: &[&str],
    new: &[&str],
    old_offset: usize,
    new_offset: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if old.is_empty() || new.is_empty() {
        return;
    }
    if old.len() == 1 {
        if let Some(j) = new.iter().position(|line| *line == old[0]) {
            out.push((old_offset, new_offset + j));
        }
        return;
    }

    let mid = old.len() / 2;
    let forward = last_row(old[..mid].iter().copied(), new.iter().copied().collect());
    let backward = last_row(
        old[mid..].iter().rev().copied(),
        new.iter().rev().copied().collect(),
    );

    let n = new.len();
    let split = (0..=n)
        .max_by_key(|&k| (forward[k] + backward[n - k], std::cmp::Reverse(k)))
        .unwrap_or(0);

    hirschberg(&old[..mid], &new[..split], old_offset, new_offset, out);
    hirschberg(
        &old[mid..],
        &new[split..],
        old_offset + mid,
        new_offset + split,
        out,
    );
}

/// Last row of the LCS length table, kept in two rolling rows.
fn last_row<'a>(old: impl Iterator<Item = &'a str>, new: Vec<&'a str>) -> Vec<u32> {
    let mut prev = vec![0u32; new.len() + 1];
    let mut cur = vec![0u32; new.len() + 1];
    for line in old {
        for j in 1..=new.len() {
            cur[j] = if line == new[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(cur[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<&str> {
        s.split(',').filter(|l| !l.is_empty()).collect()
    }

    #[test]
    fn table_prefers_up_on_ties() {
        let anchors = table_anchors(&lines("a,b,c"), &lines("a,x,c"));
        assert_eq!(anchors, vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn table_handles_empty_side() {
        assert!(table_anchors(&[], &lines("a,b")).is_empty());
        assert!(table_anchors(&lines("a"), &[]).is_empty());
    }

    #[test]
    fn linear_space_finds_same_length_as_table() {
        let cases = [
            ("a,b,c,d,e,f", "b,c,x,e,f,g"),
            ("x,y,z", "z,y,x"),
            ("a,a,b,a", "b,a,a,a"),
            ("", "q"),
            ("same,same", "same,same"),
        ];
        for (old, new) in cases {
            let (old, new) = (lines(old), lines(new));
            let table = table_anchors(&old, &new);
            let linear = linear_space_anchors(&old, &new);
            assert_eq!(table.len(), linear.len(), "{:?} vs {:?}", old, new);
            for (i, j) in linear {
                assert_eq!(old[i], new[j]);
            }
        }
    }

    #[test]
    fn linear_space_anchors_are_strictly_increasing() {
        let old = lines("p,q,r,s,t,u,v");
        let new = lines("q,p,r,t,s,v,u");
        let anchors = linear_space_anchors(&old, &new);
        for pair in anchors.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }
}
