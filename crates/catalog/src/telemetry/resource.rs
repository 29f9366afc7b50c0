//! Resource descriptor shared by all three signal providers.

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};

/// Attribute identifying the implementation language of the service.
pub const LIBRARY_LANGUAGE: &str = "library.language";

/// Build the immutable resource descriptor stamped on every emitted signal.
///
/// Pure construction; the returned value is cloned into each provider so all
/// three carry an identical attribute set. An empty `service_name` still
/// produces a resource — rejecting it is the configuration layer's job.
pub fn build(service_name: &str) -> Resource {
    Resource::new(vec![
        KeyValue::new(SERVICE_NAME, service_name.to_owned()),
        KeyValue::new(LIBRARY_LANGUAGE, "rust"),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ])
}
