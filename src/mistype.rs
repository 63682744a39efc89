use std::cmp::{max, min};

use crate::aggregator::FrequencyTable;

/// Commands this far apart in length are never considered similar.
const MAX_LENGTH_GAP: usize = 5;
const SIMILARITY: f32 = 0.3;

fn similarity_threshold(a_len: usize, b_len: usize) -> usize {
    (max(a_len, b_len) as f32 * SIMILARITY).ceil() as usize
}

/// Levenshtein distance that gives up early once the result is certain to
/// exceed the similarity threshold; the returned value is then only a lower
/// bound.
pub fn bounded_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return max(a.len(), b.len());
    }

    let length_gap = a.len().abs_diff(b.len());
    if length_gap > MAX_LENGTH_GAP {
        return length_gap;
    }

    let threshold = similarity_threshold(a.len(), b.len());
    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr_row[0] = i;
        let mut row_min = i;

        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr_row[j] = min(min(curr_row[j - 1] + 1, prev_row[j] + 1), prev_row[j - 1] + cost);
            row_min = min(row_min, curr_row[j]);
        }

        if row_min > threshold {
            return row_min;
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Counts commands seen exactly once that are not close to any other
/// distinct command.
pub fn count_potential_mistypes(commands: &FrequencyTable<String>) -> usize {
    let distinct: Vec<&String> = commands.iter().map(|(cmd, _)| cmd).collect();

    commands
        .iter()
        .filter(|&(_, count)| count == 1)
        .filter(|&(cmd, _)| {
            let len = cmd.chars().count();
            !distinct.iter().any(|other| {
                if *other == cmd {
                    return false;
                }
                let other_len = other.chars().count();
                if len.abs_diff(other_len) > MAX_LENGTH_GAP {
                    return false;
                }
                bounded_levenshtein(cmd, other) <= similarity_threshold(len, other_len)
            })
        })
        .count()
}
