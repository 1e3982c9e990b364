//! In-memory repositories for development and testing.
//!
//! Feature geometries go through the document-store codec on the way in and
//! out, so this adapter exercises the same encoding the cloud store uses.

pub mod projects;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

use crate::codec::{from_store_map, to_store_map, StoreValue};
use crate::error::Result;
use crate::models::{AuditInfo, Geometry, Polygon, PolygonFeature};
use crate::ports::{FeatureRepository, StoredFeature};

pub use projects::MemoryProjectRepository;

/// A feature document as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub project_id: String,
    pub layer_id: String,
    pub geometry: StoreValue,
    pub created: AuditInfo,
    pub last_modified: AuditInfo,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFeatureRepository {
    documents: Arc<RwLock<HashMap<String, StoredDocument>>>,
    /// Insertion order of document ids
    order: Arc<RwLock<Vec<String>>>,
}

impl MemoryFeatureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw document, replacing any existing one with the same id
    pub fn put_document(&self, id: impl Into<String>, document: StoredDocument) {
        let id = id.into();
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        if documents.insert(id.clone(), document).is_none() {
            self.order.write().unwrap_or_else(PoisonError::into_inner).push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode(id: &str, document: &StoredDocument) -> Result<StoredFeature> {
    Ok(StoredFeature {
        id: id.to_string(),
        project_id: document.project_id.clone(),
        layer_id: document.layer_id.clone(),
        geometry: from_store_map(Some(&document.geometry))?,
        created: document.created.clone(),
        last_modified: document.last_modified.clone(),
    })
}

impl FeatureRepository for MemoryFeatureRepository {
    fn save_polygon_feature(&self, feature: &PolygonFeature) -> Result<()> {
        let geometry = Geometry::Polygon(Polygon::from_vertices(&feature.vertices)?);
        self.put_document(
            feature.id.clone(),
            StoredDocument {
                project_id: feature.project.id.clone(),
                layer_id: feature.layer.id.clone(),
                geometry: to_store_map(&geometry),
                created: feature.created.clone(),
                last_modified: feature.last_modified.clone(),
            },
        );
        Ok(())
    }

    fn get_feature(&self, id: &str) -> Result<Option<StoredFeature>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        documents.get(id).map(|document| decode(id, document)).transpose()
    }

    fn list_features(&self, project_id: &str) -> Result<Vec<StoredFeature>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        let order = self.order.read().unwrap_or_else(PoisonError::into_inner);

        let features = order
            .iter()
            .filter_map(|id| documents.get(id).map(|document| (id, document)))
            .filter(|(_, document)| document.project_id == project_id)
            .filter_map(|(id, document)| match decode(id, document) {
                Ok(feature) => Some(feature),
                Err(e) => {
                    warn!(feature_id = %id, error = %e, "Skipping feature with unreadable geometry");
                    None
                }
            })
            .collect();
        Ok(features)
    }
}
