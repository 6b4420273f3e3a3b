// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{CharacterIndex, CharacterRun, Length};

/// A style run: a character range plus a style payload for one axis.
pub trait Run: Clone {
    /// The characters covered.
    fn character_run(&self) -> CharacterRun;

    /// Mutable access to the covered range.
    fn character_run_mut(&mut self) -> &mut CharacterRun;

    /// Applies the attributes of a run opened inside this one.
    ///
    /// Attributes defined on `inner` replace those of `self`; undefined ones are inherited.
    fn overlay(&mut self, inner: &Self);

    /// Whether both runs carry the same style payload.
    fn same_style(&self, other: &Self) -> bool;
}

fn is_sorted_and_disjoint<R: Run>(runs: &[R]) -> bool {
    runs.windows(2)
        .all(|w| w[0].character_run().end() <= w[1].character_run().character_index)
}

/// Flattens a run list into sorted, non-overlapping runs.
///
/// `runs` must be in opening order. Where runs overlap, later runs are overlaid on
/// earlier ones. Adjacent pieces of a split run with equal payload are coalesced, and
/// empty runs are dropped.
pub fn normalize_runs<R: Run>(runs: &mut Vec<R>) {
    runs.retain(|run| !run.character_run().is_empty());
    if is_sorted_and_disjoint(runs) {
        return;
    }

    let mut boundaries: Vec<CharacterIndex> = runs
        .iter()
        .flat_map(|run| {
            let character_run = run.character_run();
            [character_run.character_index, character_run.end()]
        })
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut flattened: Vec<R> = Vec::with_capacity(runs.len());
    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        let mut piece: Option<R> = None;
        for run in runs.iter() {
            let character_run = run.character_run();
            if character_run.character_index <= start && character_run.end() >= end {
                match &mut piece {
                    Some(piece) => piece.overlay(run),
                    None => piece = Some(run.clone()),
                }
            }
        }
        let Some(mut piece) = piece else {
            continue;
        };
        *piece.character_run_mut() = CharacterRun::new(start, end - start);

        if let Some(last) = flattened.last_mut() {
            if last.character_run().end() == start && last.same_style(&piece) {
                last.character_run_mut().number_of_characters += end - start;
                continue;
            }
        }
        flattened.push(piece);
    }
    *runs = flattened;
}

/// Updates run ranges after `count` characters were inserted before `index`.
///
/// A run containing the insertion point, or ending exactly at it, grows. Runs after the
/// insertion point are shifted.
pub fn insert_characters<R: Run>(runs: &mut [R], index: CharacterIndex, count: Length) {
    if count == 0 {
        return;
    }
    for run in runs.iter_mut() {
        let character_run = run.character_run_mut();
        let start = character_run.character_index;
        if start > index || (start == index && index != 0) {
            character_run.character_index += count;
        } else if index <= character_run.end() {
            character_run.number_of_characters += count;
        }
    }
}

/// Updates run ranges after the characters `index..index + count` were removed.
///
/// Runs that lose all their characters are dropped.
pub fn remove_characters<R: Run>(runs: &mut Vec<R>, index: CharacterIndex, count: Length) {
    if count == 0 {
        return;
    }
    let removed_end = index + count;
    for run in runs.iter_mut() {
        let character_run = run.character_run_mut();
        *character_run = shrink(*character_run, index, removed_end);
    }
    runs.retain(|run| !run.character_run().is_empty());
}

pub(crate) fn shrink(
    character_run: CharacterRun,
    removed_start: CharacterIndex,
    removed_end: CharacterIndex,
) -> CharacterRun {
    let start = character_run.character_index;
    let end = character_run.end();
    let count = removed_end - removed_start;

    let removed_before = start.saturating_sub(removed_start).min(count);
    let overlap = end
        .min(removed_end)
        .saturating_sub(start.max(removed_start));
    CharacterRun::new(
        start - removed_before,
        character_run.number_of_characters - overlap,
    )
}
