//! Content scoring of columns over a bounded sample of data rows

use crate::ingest::RawGrid;
use std::collections::HashSet;

/// Count, per column, the sampled cells that are non-empty and satisfy `predicate`
///
/// Only data rows `1..=sample_size` are looked at; the header row never
/// contributes. The result is as wide as the widest sampled row.
pub fn column_scores<P>(grid: &RawGrid, predicate: P, sample_size: usize) -> Vec<usize>
where
    P: Fn(&str) -> bool,
{
    let sample = grid.sample(sample_size);
    let width = sample.iter().map(Vec::len).max().unwrap_or(0);
    let mut scores = vec![0; width];

    for row in sample {
        for (column, cell) in row.iter().enumerate() {
            if !cell.is_empty() && predicate(cell) {
                scores[column] += 1;
            }
        }
    }

    scores
}

/// Best-matching column for `predicate`, or `None`
///
/// Highest count wins, ties go to the lowest index, and a column needs at
/// least one match to be returned at all.
pub fn score<P>(grid: &RawGrid, predicate: P, sample_size: usize) -> Option<usize>
where
    P: Fn(&str) -> bool,
{
    score_excluding(grid, predicate, sample_size, &HashSet::new())
}

/// Same as [`score`], never returning a column in `skipped`
pub fn score_excluding<P>(
    grid: &RawGrid,
    predicate: P,
    sample_size: usize,
    skipped: &HashSet<usize>,
) -> Option<usize>
where
    P: Fn(&str) -> bool,
{
    let mut best: Option<(usize, usize)> = None;

    for (column, count) in column_scores(grid, predicate, sample_size)
        .into_iter()
        .enumerate()
    {
        if count == 0 || skipped.contains(&column) {
            continue;
        }
        // Strictly greater only, so earlier columns keep ties
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((column, count));
        }
    }

    best.map(|(column, _)| column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::tokenize;
    use crate::services::inference::predicates::looks_like_email;

    #[test]
    fn test_picks_highest_count() {
        let grid = tokenize("a,b,c\nx,j@x.io,k@x.io\ny,nope,l@x.io\nz,m@x.io,n@x.io");
        assert_eq!(column_scores(&grid, looks_like_email, 10), vec![0, 2, 3]);
        assert_eq!(score(&grid, looks_like_email, 10), Some(2));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let grid = tokenize("a,b\nj@x.io,k@x.io\n");
        assert_eq!(score(&grid, looks_like_email, 10), Some(0));
    }

    #[test]
    fn test_zero_matches_is_none() {
        let grid = tokenize("a,b\n1,2\n3,4");
        assert_eq!(score(&grid, looks_like_email, 10), None);
    }

    #[test]
    fn test_header_row_is_not_sampled() {
        let grid = tokenize("j@x.io,b\nplain,text");
        assert_eq!(score(&grid, looks_like_email, 10), None);
    }

    #[test]
    fn test_sample_bounds_rows() {
        // Column 1 only wins if rows past the sample were counted
        let grid = tokenize("a,b\nj@x.io,\n,k@x.io\n,l@x.io\n,m@x.io");
        assert_eq!(score(&grid, looks_like_email, 1), Some(0));
        assert_eq!(score(&grid, looks_like_email, 10), Some(1));
    }

    #[test]
    fn test_skipped_columns_are_ignored() {
        let grid = tokenize("a,b\nj@x.io,k@x.io\nl@x.io,n");
        let skipped: HashSet<usize> = [0].into_iter().collect();
        assert_eq!(score_excluding(&grid, looks_like_email, 10, &skipped), Some(1));

        let all: HashSet<usize> = [0, 1].into_iter().collect();
        assert_eq!(score_excluding(&grid, looks_like_email, 10, &all), None);
    }

    #[test]
    fn test_adding_matches_never_lowers_a_column() {
        let base = "a,b\nj@x.io,k@x.io\n,l@x.io\n";
        let grid = tokenize(base);
        assert_eq!(score(&grid, looks_like_email, 10), Some(1));

        // More matches in the winning column keep it selected
        let grid = tokenize(&format!("{base}x,m@x.io\n"));
        assert_eq!(score(&grid, looks_like_email, 10), Some(1));
        assert_eq!(column_scores(&grid, looks_like_email, 10), vec![1, 3]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = RawGrid::default();
        assert!(column_scores(&grid, |_| true, 10).is_empty());
        assert_eq!(score(&grid, |_| true, 10), None);
    }
}
