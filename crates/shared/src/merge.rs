use std::collections::HashSet;

use crate::models::RepositoryRecord;

pub const MAX_MERGED_REPOSITORIES: usize = 15;

/// Merges strategy results into one ranked list.
///
/// The first occurrence of an id wins, the result is sorted by stars
/// (descending, stable for ties) and cut to `cap` entries.
pub fn merge_repositories(lists: Vec<Vec<RepositoryRecord>>, cap: usize) -> Vec<RepositoryRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<RepositoryRecord> = lists
        .into_iter()
        .flatten()
        .filter(|repo| seen.insert(repo.id))
        .collect();

    merged.sort_by(|a, b| b.stars.cmp(&a.stars));
    merged.truncate(cap);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(id: u64, stars: u64) -> RepositoryRecord {
        RepositoryRecord {
            id,
            name: format!("owner/repo-{}", id),
            stars,
            description: None,
            url: format!("https://github.com/owner/repo-{}", id),
            updated_at: None,
            language: None,
        }
    }

    fn ids_and_stars(repos: &[RepositoryRecord]) -> Vec<(u64, u64)> {
        repos.iter().map(|r| (r.id, r.stars)).collect()
    }

    #[test]
    fn test_merge_two_overlapping_lists() {
        let merged = merge_repositories(
            vec![vec![repo(1, 50), repo(2, 10)], vec![repo(2, 10), repo(3, 80)]],
            MAX_MERGED_REPOSITORIES,
        );

        assert_eq!(ids_and_stars(&merged), vec![(3, 80), (1, 50), (2, 10)]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut later = repo(7, 10);
        later.name = "later/copy".to_string();
        let mut first = repo(7, 10);
        first.name = "first/copy".to_string();

        let merged = merge_repositories(vec![vec![first], vec![later]], MAX_MERGED_REPOSITORIES);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "first/copy");
    }

    #[test]
    fn test_duplicate_with_different_stars_keeps_first_count() {
        let merged = merge_repositories(
            vec![vec![repo(4, 5)], vec![repo(4, 500)]],
            MAX_MERGED_REPOSITORIES,
        );

        assert_eq!(ids_and_stars(&merged), vec![(4, 5)]);
    }

    #[test]
    fn test_ties_keep_merge_order() {
        let merged = merge_repositories(
            vec![vec![repo(9, 30), repo(2, 30)], vec![repo(5, 30)]],
            MAX_MERGED_REPOSITORIES,
        );

        assert_eq!(ids_and_stars(&merged), vec![(9, 30), (2, 30), (5, 30)]);
    }

    #[test]
    fn test_truncates_to_cap_keeping_most_starred() {
        let lists: Vec<Vec<RepositoryRecord>> = vec![
            (0..10).map(|i| repo(i, i * 3)).collect(),
            (10..25).map(|i| repo(i, i)).collect(),
        ];

        let merged = merge_repositories(lists, MAX_MERGED_REPOSITORIES);

        assert_eq!(merged.len(), MAX_MERGED_REPOSITORIES);
        assert!(merged.windows(2).all(|w| w[0].stars >= w[1].stars));
        assert_eq!(merged[0].stars, 27);
    }

    #[test]
    fn test_each_id_appears_once() {
        let lists = vec![
            vec![repo(1, 1), repo(2, 2), repo(1, 1)],
            vec![repo(2, 2), repo(3, 3)],
            vec![repo(3, 3), repo(1, 1)],
        ];

        let merged = merge_repositories(lists, MAX_MERGED_REPOSITORIES);
        let mut ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        ids.sort_unstable();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_repositories(Vec::new(), MAX_MERGED_REPOSITORIES).is_empty());
        assert!(merge_repositories(vec![Vec::new(), Vec::new()], 15).is_empty());
    }
}
