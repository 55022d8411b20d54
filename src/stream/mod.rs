//! Attribute event stream: observers, fan-out and filtering

pub mod config;
mod filter;
mod observer;
pub mod predicate;
mod registry;

pub use config::{ConfigError, FilterConfig, PredicateSpec};
pub use filter::{AttributeFilter, FilterSlot};
pub use observer::{
    AttributeEvent, AttributeObserver, ElementKind, EventRecorder, StreamError, StreamResult,
};
pub use predicate::{AttributeMatcher, AttributePredicate, PredicateSlot};
pub use registry::{shared, ObserverHandle, ObserverId, ObserverList};
