//! Cluster partitioner — split a layer into groups of bounded width while
//! keeping mutually close items together.
//!
//! This is an extremity-based heuristic rather than exact k-nearest
//! neighbours, so no full similarity matrix is ever built:
//!
//! 1. Rank every item by proximity to the first one and remember that rank.
//! 2. Peel off the `width` closest items (the anchor included) as a left group.
//! 3. Re-rank what is left by proximity to its furthest item and peel off
//!    up to `width` items as a right group.
//! 4. Restore the survivors to their step-1 rank order and repeat on them.
//!
//! Groups come back as `[left, middle.., right]`. The middle groups are
//! produced by a loop instead of recursion, so very large layers cannot
//! exhaust the stack.

use mazewalk_core::{ModelError, Proximity, Result, TreeError};

/// Partition `items` into groups of at most `width` items.
///
/// `score` compares two items and `proximity` says which end of its range
/// means "close". Every input item appears in exactly one group; an empty
/// input yields no groups. The first failing `score` call aborts the
/// partition.
pub fn partition<T, F>(
    items: Vec<T>,
    width: usize,
    proximity: Proximity,
    mut score: F,
) -> Result<Vec<Vec<T>>>
where
    F: FnMut(&T, &T) -> std::result::Result<f32, ModelError>,
{
    if width == 0 {
        return Err(TreeError::InvalidWidth(width).into());
    }

    let mut heads: Vec<Vec<T>> = Vec::new();
    let mut tails: Vec<Vec<T>> = Vec::new();
    let mut pending = items;

    while pending.len() > width {
        let mut ranked: Vec<(usize, T)> = rank_by_proximity(pending, 0, proximity, &mut score)?
            .into_iter()
            .enumerate()
            .collect();

        let rest = ranked.split_off(width);
        heads.push(ranked.into_iter().map(|(_, item)| item).collect());

        // Anchor the right group on the item furthest from the left one.
        let furthest = rest.len() - 1;
        let mut reranked = rank_by_proximity(
            rest,
            furthest,
            proximity,
            &mut |a: &(usize, T), b: &(usize, T)| score(&a.1, &b.1),
        )?;
        let mut leftover = reranked.split_off(width.min(reranked.len()));
        tails.push(reranked.into_iter().map(|(_, item)| item).collect());

        leftover.sort_by_key(|(rank, _)| *rank);
        pending = leftover.into_iter().map(|(_, item)| item).collect();
    }

    if !pending.is_empty() {
        heads.push(pending);
    }
    heads.extend(tails.into_iter().rev());
    Ok(heads)
}

/// Move the anchor to the front and order the rest closest-first.
///
/// The sort is stable, so equally scored items keep their input order.
fn rank_by_proximity<U, F>(
    mut items: Vec<U>,
    anchor: usize,
    proximity: Proximity,
    score: &mut F,
) -> std::result::Result<Vec<U>, ModelError>
where
    F: FnMut(&U, &U) -> std::result::Result<f32, ModelError>,
{
    let anchor = items.remove(anchor);
    let mut scored = Vec::with_capacity(items.len());
    for item in items {
        scored.push((score(&anchor, &item)?, item));
    }
    scored.sort_by(|a, b| proximity.closer_first(a.0, b.0));

    let mut ranked = Vec::with_capacity(scored.len() + 1);
    ranked.push(anchor);
    ranked.extend(scored.into_iter().map(|(_, item)| item));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazewalk_core::Error;

    /// Items are points on a line; the score is a negated gap (closer = higher).
    fn similarity(a: &f32, b: &f32) -> std::result::Result<f32, ModelError> {
        Ok(-(a - b).abs())
    }

    fn gap(a: &f32, b: &f32) -> std::result::Result<f32, ModelError> {
        Ok((a - b).abs())
    }

    fn sorted(mut v: Vec<f32>) -> Vec<f32> {
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn small_input_is_a_single_group() {
        let groups = partition(vec![1.0, 2.0, 3.0], 3, Proximity::HigherIsCloser, similarity)
            .unwrap();
        assert_eq!(groups, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = partition(Vec::<f32>::new(), 3, Proximity::HigherIsCloser, similarity)
            .unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn seven_items_width_three_split_three_one_three() {
        let items = vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 5.0];
        let groups = partition(items, 3, Proximity::HigherIsCloser, similarity).unwrap();

        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 1, 3]);
        // Left group gathers around the first item, right group around the furthest.
        assert_eq!(groups[0], vec![0.0, 1.0, 2.0]);
        assert_eq!(groups[1], vec![5.0]);
        assert_eq!(groups[2], vec![12.0, 11.0, 10.0]);
    }

    #[test]
    fn survivors_keep_their_first_ranking_between_rounds() {
        // Several rounds, each leaving more than one survivor to re-partition.
        let points = [25.0, 3.0, 4.0, 34.0, 6.0, 23.0, 37.0, 3.0, 32.0, 13.0, 2.0];
        let groups = partition(
            (0..points.len()).collect::<Vec<usize>>(),
            2,
            Proximity::HigherIsCloser,
            |a: &usize, b: &usize| similarity(&points[*a], &points[*b]),
        )
        .unwrap();

        assert_eq!(
            groups,
            vec![
                vec![0, 5],
                vec![8, 3],
                vec![6, 9],
                vec![4],
                vec![7, 2],
                vec![10, 1],
            ]
        );
    }

    #[test]
    fn lower_is_closer_convention_gives_same_grouping() {
        let items = vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 5.0];
        let by_similarity =
            partition(items.clone(), 3, Proximity::HigherIsCloser, similarity).unwrap();
        let by_distance = partition(items, 3, Proximity::LowerIsCloser, gap).unwrap();
        assert_eq!(by_similarity, by_distance);
    }

    #[test]
    fn every_item_kept_exactly_once_and_groups_bounded() {
        for width in 1..=5 {
            for n in 1..=40 {
                let items: Vec<f32> = (0..n).map(|i| ((i * 37) % 23) as f32).collect();
                let groups =
                    partition(items.clone(), width, Proximity::HigherIsCloser, similarity)
                        .unwrap();

                assert!(groups.iter().all(|g| !g.is_empty() && g.len() <= width));
                let flattened: Vec<f32> = groups.into_iter().flatten().collect();
                assert_eq!(sorted(flattened), sorted(items), "width={width} n={n}");
            }
        }
    }

    #[test]
    fn large_input_does_not_overflow() {
        let items: Vec<f32> = (0..5_000).map(|i| i as f32).collect();
        let groups = partition(items, 2, Proximity::HigherIsCloser, similarity).unwrap();
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 5_000);
        assert!(groups.iter().all(|g| g.len() <= 2));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = partition(vec![1.0], 0, Proximity::HigherIsCloser, similarity).unwrap_err();
        assert!(matches!(err, Error::Tree(TreeError::InvalidWidth(0))));
    }

    #[test]
    fn score_failure_propagates() {
        let err = partition(vec![1.0, 2.0, 3.0], 2, Proximity::HigherIsCloser, |_, _| {
            Err(ModelError::DistanceFailed("bad vector".into()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::DistanceFailed(_))));
    }
}
