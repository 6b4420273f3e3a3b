// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{CharacterIndex, CharacterRun};
use unicode_script::{Script, UnicodeScript};

/// A run of characters sharing one script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptRun {
    /// The characters of the run.
    pub character_run: CharacterRun,
    /// Their script.
    pub script: Script,
}

fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Itemizes `text`, whose first character is at `start`, into script runs.
///
/// Common and inherited characters join the run before them; leading ones take the
/// script of the first real script character. Text with no real script at all is a
/// single [`Script::Common`] run.
pub(crate) fn script_runs(text: &[char], start: CharacterIndex) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();
    let mut current = text
        .iter()
        .map(|character| character.script())
        .find(|&script| !is_neutral(script))
        .unwrap_or(Script::Common);
    let mut run_start = 0;

    for (index, character) in text.iter().enumerate() {
        let script = character.script();
        if is_neutral(script) || script == current {
            continue;
        }
        if index > run_start {
            runs.push(ScriptRun {
                character_run: CharacterRun::new(start + run_start, index - run_start),
                script: current,
            });
        }
        current = script;
        run_start = index;
    }
    if text.len() > run_start {
        runs.push(ScriptRun {
            character_run: CharacterRun::new(start + run_start, text.len() - run_start),
            script: current,
        });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::script_runs;
    use text_runs::CharacterRun;
    use unicode_script::Script;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn punctuation_joins_the_previous_run() {
        let runs = script_runs(&chars("abc, \u{5d0}\u{5d1}!"), 10);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].script, Script::Latin);
        assert_eq!(runs[0].character_run, CharacterRun::new(10, 5));
        assert_eq!(runs[1].script, Script::Hebrew);
        assert_eq!(runs[1].character_run, CharacterRun::new(15, 3));
    }

    #[test]
    fn leading_neutrals_take_the_first_script() {
        let runs = script_runs(&chars("12 abc"), 0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].script, Script::Latin);
    }

    #[test]
    fn digits_only() {
        let runs = script_runs(&chars("123"), 0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].script, Script::Common);
        assert!(script_runs(&[], 0).is_empty());
    }
}
