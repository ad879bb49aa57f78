//! Identifiers for document entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque layer identity, stable across reorders and history restores.
///
/// Persisted documents carry whatever id the external store assigned; new layers
/// get a `layer_<uuid>` id.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    #[inline]
    pub fn generate() -> Self {
        Self(format!("layer_{}", Uuid::new_v4().simple()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
