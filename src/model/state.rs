//! Scalar values with history

use serde::{Serialize, Serializer};
use std::fmt;

use super::Scalar;

/// A configuration value together with every `(value, source)` pair that
/// has set it, oldest first.
///
/// The last pair is authoritative: [`State::current`] and
/// [`State::source`] always reflect it. History is append-only.
#[derive(Debug, Clone, Default)]
pub struct State {
    values: Vec<Scalar>,
    sources: Vec<String>,
}

impl State {
    /// An empty state with no current value.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state holding a single `(value, source)` pair.
    pub fn single(value: impl Into<Scalar>, source: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.update(value, source);
        state
    }

    /// Build a state by applying `pairs` in order.
    pub fn from_pairs<I, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, S)>,
        V: Into<Scalar>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for (value, source) in pairs {
            state.update(value, source);
        }
        state
    }

    /// Record a new value set by `source`.
    pub fn update(&mut self, value: impl Into<Scalar>, source: impl Into<String>) {
        self.values.push(value.into());
        self.sources.push(source.into());
    }

    /// Append the whole history of `other` after ours.
    pub fn append(&mut self, other: &State) {
        for (value, source) in other.history() {
            self.update(value.clone(), source);
        }
    }

    pub fn current(&self) -> Option<&Scalar> {
        self.values.last()
    }

    /// Source of the current value.
    pub fn source(&self) -> Option<&str> {
        self.sources.last().map(String::as_str)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn history(&self) -> impl Iterator<Item = (&Scalar, &str)> + '_ {
        self.values.iter().zip(self.sources.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Two states are equal when both have history and their most recent
/// `(value, source)` pairs match. Earlier history is not compared, and an
/// empty state equals nothing, itself included.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        match (self.current(), other.current()) {
            (Some(a), Some(b)) => a == b && self.source() == other.source(),
            _ => false,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current(), self.source()) {
            (Some(value), Some(source)) => write!(f, "current value: {} source: {}", value, source),
            _ => write!(f, "current value: None source: None"),
        }
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.current() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_has_no_current() {
        let state = State::new();
        assert!(state.current().is_none());
        assert!(state.source().is_none());
        assert!(state.is_empty());
        assert_eq!(state.to_string(), "current value: None source: None");
    }

    #[test]
    fn update_keeps_values_and_sources_parallel() {
        let mut state = State::single(1, "default");
        state.update("two", "env");
        state.update(true, "cli");

        assert_eq!(state.values().len(), state.sources().len());
        assert_eq!(state.len(), 3);
        assert_eq!(state.current(), Some(&Scalar::Bool(true)));
        assert_eq!(state.source(), Some("cli"));
    }

    #[test]
    fn pairs_apply_in_order() {
        let state = State::from_pairs([(Scalar::Int(1), "left"), (Scalar::Int(2), "right")]);
        let history: Vec<_> = state.history().collect();
        assert_eq!(history, vec![(&Scalar::Int(1), "left"), (&Scalar::Int(2), "right")]);
        assert_eq!(state.to_string(), "current value: 2 source: right");
    }

    #[test]
    fn equality_compares_latest_pair_only() {
        let long = State::from_pairs([(Scalar::Int(9), "toml"), (Scalar::Int(1), "env")]);
        let short = State::single(1, "env");
        assert_eq!(long, short);

        assert_ne!(State::single(1, "env"), State::single(1, "cli"));
        assert_ne!(State::single(1, "env"), State::single(2, "env"));
    }

    #[test]
    fn empty_states_are_never_equal() {
        assert_ne!(State::new(), State::new());
        assert_ne!(State::new(), State::single(1, "env"));
        assert_ne!(State::single(1, "env"), State::new());
    }

    #[test]
    fn append_copies_other_history_after_ours() {
        let mut left = State::single(1, "left");
        let right = State::from_pairs([(Scalar::Int(2), "a"), (Scalar::Int(3), "b")]);
        left.append(&right);

        assert_eq!(left.sources(), &["left", "a", "b"]);
        assert_eq!(left.current(), Some(&Scalar::Int(3)));
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn serializes_as_current_value() {
        let state = State::from_pairs([(Scalar::Int(1), "default"), (Scalar::from("x"), "cli")]);
        assert_eq!(serde_json::to_string(&state).expect("serialize"), "\"x\"");
        assert_eq!(serde_json::to_string(&State::new()).expect("serialize"), "null");
    }
}
