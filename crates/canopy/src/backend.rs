//! Backend resolution from a textual spec.

use canopy_core::generator::{Generator, StubGenerator};
use canopy_core::{CanopyError, Result};
use std::sync::Arc;

/// Known backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Deterministic in-process stub, used for tests and dry runs.
    Stub,
}

impl BackendKind {
    /// Resolve a spec prefix to a backend kind.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "stub" | "dummy" => Some(Self::Stub),
            _ => None,
        }
    }
}

/// Construct a generation backend from a `kind:variant` spec string.
///
/// A bare name with no colon is treated as a stub variant, so `"tiny"`
/// and `"stub:tiny"` are equivalent. Unknown prefixes are an error.
pub fn backend_from_spec(spec: &str) -> Result<Arc<dyn Generator>> {
    let (prefix, variant) = match spec.split_once(':') {
        Some((p, v)) => (p, v),
        None => ("stub", spec),
    };
    match BackendKind::from_prefix(prefix) {
        Some(BackendKind::Stub) => Ok(Arc::new(StubGenerator::new(variant))),
        None => Err(CanopyError::UnknownBackend(spec.to_string())),
    }
}
