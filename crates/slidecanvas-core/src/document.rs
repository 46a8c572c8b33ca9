//! Document store seam and the in-memory slide document.

use crate::element::{Bounds, Element, ElementId, ElementPatch};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors from document store writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Element already exists: {0}")]
    DuplicateElement(ElementId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence collaborator the geometry engine commits into.
///
/// Reads happen freely during a gesture. Writes happen once, on release.
pub trait DocumentStore {
    /// Look up an element.
    fn element(&self, id: ElementId) -> Option<&Element>;

    /// All elements in document order (back to front).
    fn elements(&self) -> impl DoubleEndedIterator<Item = &Element>;

    /// Append an element on top of the z-order.
    fn insert_element(&mut self, element: Element) -> StoreResult<()>;

    /// Apply a patch to one element.
    fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> StoreResult<()>;

    /// Apply several patches as one write. Either all ids exist and every patch is
    /// applied, or nothing changes.
    fn batch_update(&mut self, updates: &[(ElementId, ElementPatch)]) -> StoreResult<()>;

    /// Current selection, in selection order.
    fn selection(&self) -> &[ElementId];

    /// Replace the selection.
    fn set_selection(&mut self, ids: Vec<ElementId>);
}

/// A slide: elements keyed by id plus their z-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideDocument {
    /// Unique document identifier.
    pub id: String,
    /// All elements, keyed by ID.
    pub elements: HashMap<ElementId, Element>,
    /// Z-order of elements (back to front).
    pub z_order: Vec<ElementId>,
    #[serde(default)]
    selection: Vec<ElementId>,
}

impl Default for SlideDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideDocument {
    /// Create a new empty slide.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            elements: HashMap::new(),
            z_order: Vec::new(),
            selection: Vec::new(),
        }
    }

    /// Remove an element, dropping it from the selection too.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&element_id| element_id != id);
        self.selection.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    /// Visible elements under a point, front-most first.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| e.visible && e.bounds().contains_point(point))
                    .map(|_| id)
            })
            .collect()
    }

    /// Visible elements lying entirely inside `rect`, in document order.
    pub fn elements_in_rect(&self, rect: &Bounds) -> Vec<ElementId> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                self.elements
                    .get(&id)
                    .filter(|e| e.visible && rect.contains_bounds(&e.bounds()))
                    .map(|_| id)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the slide to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a slide from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl DocumentStore for SlideDocument {
    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    fn insert_element(&mut self, element: Element) -> StoreResult<()> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(StoreError::DuplicateElement(id));
        }
        self.z_order.push(id);
        self.elements.insert(id, element);
        Ok(())
    }

    fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> StoreResult<()> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(StoreError::ElementNotFound(id))?;
        element.apply_patch(patch);
        Ok(())
    }

    fn batch_update(&mut self, updates: &[(ElementId, ElementPatch)]) -> StoreResult<()> {
        if let Some((missing, _)) = updates
            .iter()
            .find(|(id, _)| !self.elements.contains_key(id))
        {
            return Err(StoreError::ElementNotFound(*missing));
        }
        for (id, patch) in updates {
            if let Some(element) = self.elements.get_mut(id) {
                element.apply_patch(patch);
            }
        }
        Ok(())
    }

    fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    fn set_selection(&mut self, ids: Vec<ElementId>) {
        self.selection = ids;
    }
}
