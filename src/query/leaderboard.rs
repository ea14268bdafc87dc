use super::{Subset, latest_per_video};
use crate::dataset::models::{LeaderboardRow, RankMetric};

/// Minimum ("competition") ranks for values already sorted in descending order:
/// tied values share the lowest rank and the next distinct value skips ahead.
/// `[50, 50, 10]` → `[1, 1, 3]`.
pub fn min_ranks(sorted_desc: &[u64]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted_desc.len());
    let mut current = 0;
    for (i, value) in sorted_desc.iter().enumerate() {
        if i == 0 || sorted_desc[i - 1] != *value {
            current = i + 1;
        }
        ranks.push(current);
    }
    ranks
}

/// Rank the latest row of each video by `metric`, highest first.
/// Rows tied on the metric are ordered by `video_id`.
pub fn build_leaderboard(subset: &Subset<'_>, metric: RankMetric) -> Vec<LeaderboardRow> {
    // latest_per_video returns video_id order; the stable sort keeps it within ties
    let mut latest = latest_per_video(subset);
    latest.sort_by(|a, b| metric.value(&b.video).cmp(&metric.value(&a.video)));

    let values: Vec<u64> = latest.iter().map(|r| metric.value(&r.video)).collect();
    min_ranks(&values)
        .into_iter()
        .zip(latest)
        .map(|(rank, r)| LeaderboardRow::new(rank, &r.video))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::dataset::fixtures::row;

    fn with_comments(id: &str, day: &str, comments: u64) -> crate::dataset::models::EnrichedRecord {
        let mut r = row(id, day, "Music", 1000, 0.0);
        r.video.comment_count = comments;
        r
    }

    #[test]
    fn test_min_ranks() {
        assert_eq!(min_ranks(&[50, 50, 10]), vec![1, 1, 3]);
        assert_eq!(min_ranks(&[9, 8, 8, 8, 1]), vec![1, 2, 2, 2, 5]);
        assert_eq!(min_ranks(&[7, 7, 7]), vec![1, 1, 1]);
        assert!(min_ranks(&[]).is_empty());
    }

    #[test]
    fn test_rank_by_comments_with_ties() {
        let ds = Dataset::from_records(vec![
            with_comments("x", "2020-08-11", 10),
            with_comments("y", "2020-08-11", 50),
            with_comments("z", "2020-08-11", 50),
        ]);
        let board = build_leaderboard(&Subset::all(&ds), RankMetric::Comments);
        let ranks: Vec<usize> = board.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        let ids: Vec<&str> = board.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["y", "z", "x"]);
        assert_eq!(board[2].comments, 10);
    }

    #[test]
    fn test_leaderboard_uses_latest_metrics() {
        let ds = Dataset::from_records(vec![
            row("a", "2020-08-11", "Music", 100, 0.0),
            row("a", "2020-08-15", "Music", 300, 0.0),
            row("b", "2020-08-12", "Gaming", 200, 0.0),
        ]);
        let board = build_leaderboard(&Subset::all(&ds), RankMetric::Views);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].video_id, "a");
        assert_eq!(board[0].views, 300);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].category, "Gaming");
        assert_eq!(board[1].channel_name, "Channel of b");
    }

    #[test]
    fn test_ranks_non_decreasing_from_one() {
        let ds = Dataset::from_records(
            (0..30)
                .map(|i| row(&format!("v{i}"), "2020-08-11", "Music", (i % 4) * 100, 0.0))
                .collect(),
        );
        for metric in [RankMetric::Views, RankMetric::Likes, RankMetric::Dislikes, RankMetric::Comments] {
            let board = build_leaderboard(&Subset::all(&ds), metric);
            assert_eq!(board.len(), 30);
            assert_eq!(board[0].rank, 1);
            assert!(board.windows(2).all(|w| w[0].rank <= w[1].rank));
        }
    }

    #[test]
    fn test_leaderboard_is_deterministic() {
        let ds = Dataset::from_records(vec![
            row("b", "2020-08-11", "Music", 5, 0.0),
            row("a", "2020-08-11", "Music", 5, 0.0),
            row("c", "2020-08-11", "Music", 5, 0.0),
        ]);
        let first = build_leaderboard(&Subset::all(&ds), RankMetric::Views);
        let second = build_leaderboard(&Subset::all(&ds), RankMetric::Views);
        assert_eq!(first, second);
        let ids: Vec<&str> = first.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
