//! Scripted control input for headless runs.
//!
//! A script is plain text, one step per line: a tick count followed by the
//! keys held for those ticks.
//!
//! ```text
//! # walk to the first ladder, then climb
//! 90 right
//! 40 up
//! 20 right jump
//! 45 rewind
//! 30 idle
//! ```
//!
//! `jump`, `space` and `g` all press anti-gravity. Text after `#` is ignored.

use std::{fs, iter, path::Path};

use thiserror::Error;
use troposphere_core::ControlInput;

/// Failures while reading or parsing an input script.
#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read script {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: missing tick count")]
    MissingCount { line: usize },
    #[error("line {line}: invalid tick count '{value}'")]
    InvalidCount { line: usize, value: String },
    #[error("line {line}: unknown key '{key}'")]
    UnknownKey { line: usize, key: String },
}

/// One scripted span of identical input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) ticks: u32,
    pub(crate) input: ControlInput,
}

/// Ordered list of input spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let mut tokens = text.split_whitespace();
            let count = tokens.next().ok_or(ScriptError::MissingCount { line })?;
            let ticks = count
                .parse::<u32>()
                .map_err(|_| ScriptError::InvalidCount {
                    line,
                    value: count.to_owned(),
                })?;

            let mut input = ControlInput::IDLE;
            for key in tokens {
                press(&mut input, key, line)?;
            }
            steps.push(Step { ticks, input });
        }
        Ok(Self { steps })
    }

    /// Total number of ticks the script drives.
    pub(crate) fn len(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.ticks)).sum()
    }

    /// Expands the script into one input per tick.
    pub(crate) fn inputs(&self) -> impl Iterator<Item = ControlInput> + '_ {
        self.steps
            .iter()
            .flat_map(|step| iter::repeat(step.input).take(step.ticks as usize))
    }
}

fn press(input: &mut ControlInput, key: &str, line: usize) -> Result<(), ScriptError> {
    match key.to_ascii_lowercase().as_str() {
        "idle" => {}
        "left" | "a" => input.movement.left = true,
        "right" | "d" => input.movement.right = true,
        "up" | "w" => input.movement.up = true,
        "down" | "s" => input.movement.down = true,
        "jump" | "space" | "g" => input.anti_gravity = true,
        "rewind" | "t" => input.rewind = true,
        _ => {
            return Err(ScriptError::UnknownKey {
                line,
                key: key.to_owned(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_and_keys() {
        let script = Script::parse(
            "# warm up\n\
             3 right\n\
             \n\
             2 Right JUMP   # leap\n\
             1 idle\n\
             4 t\n",
        )
        .expect("script parses");

        assert_eq!(script.len(), 10);
        let inputs: Vec<ControlInput> = script.inputs().collect();
        assert_eq!(inputs.len(), 10);
        assert!(inputs[0].movement.right && !inputs[0].anti_gravity);
        assert!(inputs[3].movement.right && inputs[3].anti_gravity);
        assert_eq!(inputs[5], ControlInput::IDLE);
        assert!(inputs[9].rewind);
    }

    #[test]
    fn bare_count_means_idle() {
        let script = Script::parse("5").expect("script parses");
        assert!(script.inputs().all(|input| input == ControlInput::IDLE));
    }

    #[test]
    fn reports_the_offending_line() {
        let error = Script::parse("1 left\n2 sideways\n").expect_err("unknown key");
        assert!(matches!(
            error,
            ScriptError::UnknownKey { line: 2, ref key } if key == "sideways"
        ));

        let error = Script::parse("\n\nmany left").expect_err("bad count");
        assert_eq!(error.to_string(), "line 3: invalid tick count 'many'");
    }

    #[test]
    fn missing_file_is_reported() {
        let error = Script::load(Path::new("/definitely/not/here.script")).expect_err("no file");
        assert!(matches!(error, ScriptError::Read { .. }));
    }
}
