use crate::errors::{Error, Result};
use crate::types::JointOffset;
use once_cell::sync::Lazy;
use regex::Regex;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static RE_JOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(ROOT|JOINT)\s+(\w+)").expect("joint pattern"));
static RE_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)OFFSET\s+([-+\d.eE]+)\s+([-+\d.eE]+)\s+([-+\d.eE]+)").expect("offset pattern")
});
static RE_MOTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*MOTION(\s|$)").expect("motion pattern"));

/// One line of a .bvh file, as far as offset parsing and rewriting are concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind<'a> {
    Root(&'a str),
    Joint(&'a str),
    /// `indent` is the exact whitespace prefix of the line. Tokens are numeric-looking
    /// but not yet parsed, see [`parse_offset_tokens`].
    Offset {
        indent: &'a str,
        tokens: [&'a str; 3],
    },
    Motion,
    Other(&'a str),
}

/// Classify a single line (without its line terminator).
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(captures) = RE_JOINT.captures(line) {
        let name = captures.get(2).map_or("", |m| m.as_str());
        return match &captures[1] {
            "ROOT" => LineKind::Root(name),
            _ => LineKind::Joint(name),
        };
    }
    if let Some(captures) = RE_OFFSET.captures(line) {
        let group = |i: usize| captures.get(i).map_or("", |m| m.as_str());
        return LineKind::Offset {
            indent: group(1),
            tokens: [group(2), group(3), group(4)],
        };
    }
    if RE_MOTION.is_match(line) {
        return LineKind::Motion;
    }
    LineKind::Other(line)
}

/// The report tool starts the hierarchy section at the first line mentioning HIERARCHY.
pub fn is_hierarchy_marker(line: &str) -> bool {
    line.contains("HIERARCHY")
}

/// Parse the three OFFSET tokens. `line_number` is 1-based and only used for the error.
pub fn parse_offset_tokens(tokens: [&str; 3], line_number: usize) -> Result<JointOffset> {
    let mut values = [0.0f64; 3];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token.parse::<f64>().map_err(|source| Error::Format {
            line: line_number,
            token: token.to_string(),
            source,
        })?;
    }
    Ok(JointOffset::new(values[0], values[1], values[2]))
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// State carried between lines of one pass: which joint is still waiting for its OFFSET.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PassState {
    #[default]
    AwaitingDeclaration,
    AwaitingOffset { joint: String, is_root: bool },
}

impl PassState {
    /// A ROOT or JOINT line was seen. Returns the previously pending joint, which is dropped.
    pub fn declare(&mut self, joint: &str, is_root: bool) -> Option<String> {
        let previous = std::mem::replace(
            self,
            PassState::AwaitingOffset {
                joint: joint.to_string(),
                is_root,
            },
        );
        match previous {
            PassState::AwaitingOffset { joint, .. } => Some(joint),
            PassState::AwaitingDeclaration => None,
        }
    }

    /// An OFFSET line was seen. Hands out the pending joint and resets.
    pub fn take(&mut self) -> Option<(String, bool)> {
        match std::mem::take(self) {
            PassState::AwaitingOffset { joint, is_root } => Some((joint, is_root)),
            PassState::AwaitingDeclaration => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PassState::AwaitingOffset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations() {
        assert_eq!(classify("ROOT Hips"), LineKind::Root("Hips"));
        assert_eq!(classify("\t\tJOINT LeftUpLeg_2"), LineKind::Joint("LeftUpLeg_2"));
        // keywords are case sensitive
        assert_eq!(classify("  joint Spine"), LineKind::Other("  joint Spine"));
        assert_eq!(classify("JOINT"), LineKind::Other("JOINT"));
    }

    #[test]
    fn offset_keeps_indent_and_raw_tokens() {
        assert_eq!(
            classify("    OFFSET -1.5 2e-3 0.000000"),
            LineKind::Offset {
                indent: "    ",
                tokens: ["-1.5", "2e-3", "0.000000"],
            }
        );
        assert_eq!(
            classify("\tOFFSET\t1\t2\t3"),
            LineKind::Offset {
                indent: "\t",
                tokens: ["1", "2", "3"],
            }
        );
        // fewer than three values is not an offset declaration
        assert_eq!(classify("OFFSET 1 2"), LineKind::Other("OFFSET 1 2"));
    }

    #[test]
    fn motion_marker() {
        assert_eq!(classify("MOTION"), LineKind::Motion);
        assert_eq!(classify("  MOTION  "), LineKind::Motion);
        assert_eq!(classify("MOTIONLESS"), LineKind::Other("MOTIONLESS"));
        assert_eq!(classify("Frames: 10"), LineKind::Other("Frames: 10"));
        assert_eq!(classify("0.0 10.0 0.0"), LineKind::Other("0.0 10.0 0.0"));
    }

    #[test]
    fn offset_tokens_parse_scientific_notation() {
        let offset = parse_offset_tokens(["1e2", "-0.5", "3.25E-1"], 1).unwrap();
        assert_eq!(offset, JointOffset::new(100.0, -0.5, 0.325));
    }

    #[test]
    fn bad_offset_token_is_format_error() {
        let err = parse_offset_tokens(["1.0", "1.2.3", "0"], 7).unwrap_err();
        match err {
            Error::Format { line, token, .. } => {
                assert_eq!(line, 7);
                assert_eq!(token, "1.2.3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pass_state_transitions() {
        let mut state = PassState::default();
        assert!(!state.is_pending());
        assert_eq!(state.take(), None);

        assert_eq!(state.declare("Hips", true), None);
        // second declaration without an offset drops the first
        assert_eq!(state.declare("Spine", false), Some("Hips".to_string()));
        assert_eq!(state.take(), Some(("Spine".to_string(), false)));
        assert_eq!(state, PassState::AwaitingDeclaration);
    }
}
