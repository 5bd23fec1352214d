use crate::mouse_gestures::engine::Direction;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabCommand {
    CloseTab,
    GoBack,
    GoForward,
    ReloadTab,
}

impl TabCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            TabCommand::CloseTab => "close-tab",
            TabCommand::GoBack => "go-back",
            TabCommand::GoForward => "go-forward",
            TabCommand::ReloadTab => "reload-tab",
        }
    }
}

impl fmt::Display for TabCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a direction sequence is consulted when resolving a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Only the first two strokes matter; extra strokes are ignored.
    #[default]
    Prefix,
    /// The gesture must consist of exactly two strokes.
    Exact,
}

pub const PATTERN_LEN: usize = 2;

const PATTERNS: [([Direction; PATTERN_LEN], TabCommand); 4] = [
    ([Direction::Down, Direction::Right], TabCommand::CloseTab),
    ([Direction::Down, Direction::Left], TabCommand::GoBack),
    ([Direction::Up, Direction::Right], TabCommand::GoForward),
    ([Direction::Up, Direction::Left], TabCommand::ReloadTab),
];

static TABLE: Lazy<GesturePatternTable> = Lazy::new(GesturePatternTable::builtin);

#[derive(Debug, Clone)]
pub struct GesturePatternTable {
    entries: HashMap<String, TabCommand>,
}

impl GesturePatternTable {
    fn builtin() -> Self {
        let entries = PATTERNS
            .iter()
            .map(|(dirs, command)| (Self::join(dirs), *command))
            .collect();
        Self { entries }
    }

    pub fn global() -> &'static GesturePatternTable {
        &TABLE
    }

    /// Joined, order-sensitive key of a direction sequence, e.g. `DOWN,RIGHT`.
    pub fn join(directions: &[Direction]) -> String {
        directions
            .iter()
            .map(|dir| dir.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn lookup(&self, pattern: &str) -> Option<TabCommand> {
        self.entries.get(pattern).copied()
    }

    pub fn resolve(&self, directions: &[Direction], policy: MatchPolicy) -> Option<TabCommand> {
        if directions.len() < PATTERN_LEN {
            return None;
        }
        if policy == MatchPolicy::Exact && directions.len() != PATTERN_LEN {
            return None;
        }
        self.lookup(&Self::join(&directions[..PATTERN_LEN]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TabCommand)> {
        self.entries.iter().map(|(key, cmd)| (key.as_str(), *cmd))
    }
}
