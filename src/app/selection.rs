//! `--select` parsing: pick tracks from a resolved playlist by position.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};

/// Parses a 1-based selection list such as `"1,3,5-7"` into 0-based indices.
///
/// Indices come back sorted and deduplicated so the queue keeps playlist
/// order regardless of how the list was written.
pub(crate) fn parse_selection(list: &str, available: usize) -> Result<Vec<usize>> {
    let mut selected = BTreeSet::new();

    for part in list.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_position(start)?, parse_position(end)?),
            None => {
                let position = parse_position(part)?;
                (position, position)
            }
        };
        if start > end {
            bail!("Invalid selection range '{part}': start is after end");
        }
        if end > available {
            bail!(
                "Selection '{part}' is out of range: only {available} track(s) were resolved"
            );
        }
        selected.extend((start - 1)..end);
    }

    if selected.is_empty() {
        bail!("Selection '{list}' does not name any track");
    }
    Ok(selected.into_iter().collect())
}

fn parse_position(raw: &str) -> Result<usize> {
    let position = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid track position '{}'", raw.trim()))?;
    if position == 0 {
        bail!("Track positions start at 1");
    }
    Ok(position)
}

/// Keeps the items at `indices` (0-based, sorted), preserving their order.
pub(crate) fn apply_selection<T>(items: Vec<T>, indices: &[usize]) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter(|(index, _)| indices.binary_search(index).is_ok())
        .map(|(_, item)| item)
        .collect()
}
