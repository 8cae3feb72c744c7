//! # Resource Model
//!
//! The two control-plane resources that expectations observe: applications
//! and the application sets that generate them. Spec and status bodies are
//! kept as opaque JSON. Interpreting them belongs to the predicates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and bookkeeping shared by every stored resource.
///
/// `uid`, `created_at`, and `generation` are assigned by the store. A
/// freshly built object has `uid == None` and `generation == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generation: u64,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            uid: None,
            labels: BTreeMap::new(),
            created_at: None,
            generation: 0,
        }
    }
}

/// A deployed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: serde_json::Value,
    #[serde(default)]
    pub status: serde_json::Value,
}

/// A generator of applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSet {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: serde_json::Value,
    #[serde(default)]
    pub status: serde_json::Value,
}

macro_rules! resource_builders {
    ($ty:ident) => {
        impl $ty {
            pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    metadata: ObjectMeta::new(namespace, name),
                    spec: serde_json::Value::Null,
                    status: serde_json::Value::Null,
                }
            }

            pub fn name(&self) -> &str {
                &self.metadata.name
            }

            pub fn namespace(&self) -> &str {
                &self.metadata.namespace
            }

            pub fn with_spec(mut self, spec: serde_json::Value) -> Self {
                self.spec = spec;
                self
            }

            pub fn with_status(mut self, status: serde_json::Value) -> Self {
                self.status = status;
                self
            }

            pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.metadata.labels.insert(key.into(), value.into());
                self
            }
        }
    };
}

resource_builders!(Application);
resource_builders!(ApplicationSet);
