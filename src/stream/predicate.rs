//! Attribute predicates and the slots a filter keeps them in

use super::observer::StreamResult;
use crate::graph::AttributeValue;
use std::collections::HashSet;

/// A test over `(attribute name, value)`.
///
/// `value` is `None` for removal events. A predicate that returns `true`
/// vetoes the event. Predicates are called repeatedly and must not depend on
/// being called once per event.
pub trait AttributePredicate {
    fn matches(&self, attribute: &str, value: Option<&AttributeValue>) -> StreamResult<bool>;
}

impl<F> AttributePredicate for F
where
    F: Fn(&str, Option<&AttributeValue>) -> bool,
{
    fn matches(&self, attribute: &str, value: Option<&AttributeValue>) -> StreamResult<bool> {
        Ok(self(attribute, value))
    }
}

/// Predicate built from a closure that can fail
pub struct Fallible<F>(F);

/// Wrap a fallible closure as a predicate; its errors abort the event
pub fn fallible<F>(f: F) -> Fallible<F>
where
    F: Fn(&str, Option<&AttributeValue>) -> StreamResult<bool>,
{
    Fallible(f)
}

impl<F> AttributePredicate for Fallible<F>
where
    F: Fn(&str, Option<&AttributeValue>) -> StreamResult<bool>,
{
    fn matches(&self, attribute: &str, value: Option<&AttributeValue>) -> StreamResult<bool> {
        (self.0)(attribute, value)
    }
}

/// Matches attributes by exact name or name prefix, and optionally every
/// removal event.
#[derive(Debug, Clone, Default)]
pub struct AttributeMatcher {
    names: HashSet<String>,
    prefixes: Vec<String>,
    removals: bool,
}

impl AttributeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Also match every removal, whatever the attribute
    pub fn with_removals(mut self) -> Self {
        self.removals = true;
        self
    }
}

impl AttributePredicate for AttributeMatcher {
    fn matches(&self, attribute: &str, value: Option<&AttributeValue>) -> StreamResult<bool> {
        Ok((self.removals && value.is_none())
            || self.names.contains(attribute)
            || self.prefixes.iter().any(|p| attribute.starts_with(p.as_str())))
    }
}

/// A predicate slot that may be empty.
///
/// An empty slot never matches, so evaluating it is always safe.
#[derive(Default)]
pub struct PredicateSlot {
    predicate: Option<Box<dyn AttributePredicate>>,
}

impl PredicateSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&mut self, predicate: Option<Box<dyn AttributePredicate>>) {
        self.predicate = predicate;
    }

    pub fn get(&self) -> Option<&dyn AttributePredicate> {
        self.predicate.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn matches(&self, attribute: &str, value: Option<&AttributeValue>) -> StreamResult<bool> {
        match &self.predicate {
            Some(predicate) => predicate.matches(attribute, value),
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for PredicateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_set() { "PredicateSlot(set)" } else { "PredicateSlot(empty)" })
    }
}
