//! Duplicate-block suppression for multi-copy receipts.
//!
//! AFIP receipts are often printed as ORIGINAL/DUPLICADO/TRIPLICADO on the same
//! file, repeating whole sections verbatim.

use std::collections::HashSet;

use super::rules::COPY_MARKERS;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Drop repeated blank-line-separated blocks, keeping first occurrences.
///
/// Blocks are compared by their whitespace-normalized signature; the kept
/// blocks retain their original formatting and relative order.
pub fn dedupe(text: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();

    for block in text.split(BLOCK_SEPARATOR) {
        if seen.insert(signature(block)) {
            kept.push(block);
        }
    }

    kept.join(BLOCK_SEPARATOR)
}

/// Count lines that are exactly a copy marker after trimming.
pub fn count_copies(text: &str) -> usize {
    text.split('\n')
        .filter(|line| COPY_MARKERS.contains(&line.trim()))
        .count()
}

fn signature(block: &str) -> String {
    block.split_whitespace().collect::<Vec<_>>().join(" ")
}
