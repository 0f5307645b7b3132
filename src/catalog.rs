//! Tablet catalog: brand/model → physical active-area size.
//!
//! [`DeviceCatalog`] is an in-memory table keyed by brand, each brand owning a
//! list of models with their active-area dimensions in millimeters. It starts
//! from a built-in table ([`DeviceCatalog::builtin`]) and can be extended with
//! a JSON inventory ([`TabletInventory`]) of the shape:
//!
//! ```json
//! { "tablets": [ { "model": "CTL-472", "width_mm": 152.0, "height_mm": 95.0 } ] }
//! ```
//!
//! The inventory format carries no brand, so callers choose the brand it is
//! merged under ([`DeviceCatalog::merge_inventory`]).
//!
//! # Lookup semantics
//! - Brand and model names are matched exactly (case-sensitive), as displayed.
//! - A miss is [`Error::LookupFailure`]; there are no fallback dimensions.
//! - [`brands`](DeviceCatalog::brands) and [`models`](DeviceCatalog::models) are
//!   sorted, which is the order the picker shows them in.

use crate::error::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Physical active area of one tablet model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub brand: String,
    pub model: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl DeviceSpec {
    /// Build a spec, rejecting non-positive or non-finite dimensions.
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        width_mm: f64,
        height_mm: f64,
    ) -> Result<Self> {
        let model = model.into();
        if !(width_mm.is_finite() && height_mm.is_finite() && width_mm > 0.0 && height_mm > 0.0) {
            return Err(Error::Catalog(format!(
                "{model}: dimensions must be positive, got {width_mm} x {height_mm} mm"
            )));
        }
        Ok(Self {
            brand: brand.into(),
            model,
            width_mm,
            height_mm,
        })
    }
}

/// One row of the catalog under a brand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub model: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// `(brand, model, width_mm, height_mm)`
const BUILTIN: &[(&str, &str, f64, f64)] = &[
    ("Wacom", "CTL-472 (One by Wacom S)", 152.0, 95.0),
    ("Wacom", "CTL-672 (One by Wacom M)", 216.0, 135.0),
    ("Wacom", "CTL-480 (Intuos S 2014)", 152.0, 95.0),
    ("Wacom", "CTL-4100 (Intuos S)", 152.0, 95.0),
    ("Wacom", "CTL-6100 (Intuos M)", 216.0, 135.0),
    ("Wacom", "PTH-460 (Intuos Pro S)", 160.0, 100.0),
    ("Wacom", "PTH-660 (Intuos Pro M)", 224.0, 148.0),
    ("Wacom", "PTH-860 (Intuos Pro L)", 311.0, 216.0),
    ("XP-Pen", "Star G430S", 101.6, 76.2),
    ("XP-Pen", "Star G640", 152.4, 101.6),
    ("XP-Pen", "Deco Fun S", 160.0, 100.0),
    ("XP-Pen", "Deco 01 V2", 254.0, 158.75),
    ("XP-Pen", "Deco Pro S", 228.6, 127.0),
    ("Huion", "H420", 101.6, 57.15),
    ("Huion", "H430P", 121.9, 76.2),
    ("Huion", "Inspiroy H640P", 160.0, 100.0),
    ("Huion", "Inspiroy H950P", 221.0, 138.0),
    ("Huion", "H610 Pro V2", 254.0, 158.8),
    ("Gaomon", "S620", 165.1, 101.6),
    ("Gaomon", "M10K Pro", 254.0, 158.8),
    ("Veikk", "S640", 160.0, 100.0),
    ("Veikk", "A50", 254.0, 152.4),
];

/// Brand-keyed table of known tablets.
#[derive(Clone, Debug, Default)]
pub struct DeviceCatalog {
    brands: BTreeMap<String, Vec<ModelEntry>>,
}

impl DeviceCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with the built-in tablet table.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for &(brand, model, width_mm, height_mm) in BUILTIN {
            catalog.insert_unchecked(brand, model, width_mm, height_mm);
        }
        debug!("built-in catalog: {} brand(s)", catalog.brands.len());
        catalog
    }

    /// Add or replace a model under `brand`.
    pub fn insert(&mut self, spec: DeviceSpec) -> Result<()> {
        // Re-validate; fields are public so a spec may have been built by hand.
        let spec = DeviceSpec::new(spec.brand, spec.model, spec.width_mm, spec.height_mm)?;
        self.insert_unchecked(&spec.brand, &spec.model, spec.width_mm, spec.height_mm);
        Ok(())
    }

    fn insert_unchecked(&mut self, brand: &str, model: &str, width_mm: f64, height_mm: f64) {
        let models = self.brands.entry(brand.to_string()).or_default();
        let entry = ModelEntry {
            model: model.to_string(),
            width_mm,
            height_mm,
        };
        match models.iter_mut().find(|m| m.model == model) {
            Some(existing) => *existing = entry,
            None => models.push(entry),
        }
    }

    /// Merge every tablet of `inventory` under `brand`.
    pub fn merge_inventory(&mut self, brand: &str, inventory: &TabletInventory) -> Result<usize> {
        for t in &inventory.tablets {
            self.insert(DeviceSpec::new(brand, &t.model, t.width_mm, t.height_mm)?)?;
        }
        info!(
            "merged {} inventory tablet(s) under brand {:?}",
            inventory.tablets.len(),
            brand
        );
        Ok(inventory.tablets.len())
    }

    /// Sorted, de-duplicated brand names.
    pub fn brands(&self) -> Vec<String> {
        // BTreeMap keys are already unique and ordered.
        self.brands.keys().cloned().collect()
    }

    /// Sorted model names of `brand` (empty if the brand is unknown).
    pub fn models(&self, brand: &str) -> Vec<String> {
        let mut models: Vec<String> = self
            .brands
            .get(brand)
            .map(|m| m.iter().map(|e| e.model.clone()).collect())
            .unwrap_or_default();
        models.sort();
        models
    }

    /// Resolve a brand/model pair to its physical dimensions.
    pub fn find(&self, brand: &str, model: &str) -> Result<DeviceSpec> {
        self.brands
            .get(brand)
            .and_then(|models| models.iter().find(|m| m.model == model))
            .map(|m| DeviceSpec {
                brand: brand.to_string(),
                model: m.model.clone(),
                width_mm: m.width_mm,
                height_mm: m.height_mm,
            })
            .ok_or_else(|| Error::LookupFailure {
                brand: brand.to_string(),
                model: model.to_string(),
            })
    }

    /// Total number of models across all brands.
    pub fn len(&self) -> usize {
        self.brands.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brand-less JSON inventory: `{"tablets": [{"model", "width_mm", "height_mm"}, ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TabletInventory {
    pub tablets: Vec<ModelEntry>,
}

impl TabletInventory {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let inventory = Self::from_json_str(&content)?;
        debug!(
            "loaded {} tablet(s) from {}",
            inventory.tablets.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Find `model` in the inventory. The returned spec carries `brand`.
    pub fn find(&self, brand: &str, model: &str) -> Result<DeviceSpec> {
        let entry = self
            .tablets
            .iter()
            .find(|t| t.model == model)
            .ok_or_else(|| Error::InventoryModelMissing {
                model: model.to_string(),
            })?;
        DeviceSpec::new(brand, &entry.model, entry.width_mm, entry.height_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"{
        "tablets": [
            { "model": "Pad One", "width_mm": 200, "height_mm": 120.5 },
            { "model": "Pad Two", "width_mm": 300.0, "height_mm": 200.0 }
        ]
    }"#;

    #[test]
    fn builtin_brands_are_sorted_and_unique() {
        let catalog = DeviceCatalog::builtin();
        let brands = catalog.brands();
        let mut sorted = brands.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(brands, sorted);
        assert!(brands.contains(&"Wacom".to_string()));
        assert_eq!(catalog.len(), BUILTIN.len());
    }

    #[test]
    fn find_known_model() {
        let catalog = DeviceCatalog::builtin();
        let spec = catalog.find("Wacom", "CTL-472 (One by Wacom S)").unwrap();
        assert_eq!(spec.width_mm, 152.0);
        assert_eq!(spec.height_mm, 95.0);
        assert_eq!(spec.brand, "Wacom");
    }

    #[test]
    fn unknown_brand_or_model_is_lookup_failure() {
        let catalog = DeviceCatalog::builtin();
        let err = catalog.find("Wacom", "Imaginary").unwrap_err();
        assert!(matches!(err, Error::LookupFailure { .. }));
        assert!(catalog.find("Nobody", "CTL-472 (One by Wacom S)").is_err());
        assert!(catalog.models("Nobody").is_empty());
    }

    #[test]
    fn models_are_sorted() {
        let catalog = DeviceCatalog::builtin();
        let models = catalog.models("Huion");
        let mut sorted = models.clone();
        sorted.sort();
        assert_eq!(models, sorted);
        assert!(!models.is_empty());
    }

    #[test]
    fn inventory_parses_and_merges_under_brand() {
        let inventory = TabletInventory::from_json_str(INVENTORY).unwrap();
        assert_eq!(inventory.tablets.len(), 2);

        let mut catalog = DeviceCatalog::new();
        assert!(catalog.is_empty());
        let n = catalog.merge_inventory("Custom", &inventory).unwrap();
        assert_eq!(n, 2);
        assert_eq!(catalog.brands(), vec!["Custom".to_string()]);
        let spec = catalog.find("Custom", "Pad One").unwrap();
        assert_eq!(spec.width_mm, 200.0);
        assert_eq!(spec.height_mm, 120.5);
    }

    #[test]
    fn inventory_lookup_miss() {
        let inventory = TabletInventory::from_json_str(INVENTORY).unwrap();
        let spec = inventory.find("Custom", "Pad Two").unwrap();
        assert_eq!(spec.width_mm, 300.0);
        let err = inventory.find("Custom", "Pad Three").unwrap_err();
        assert!(matches!(err, Error::InventoryModelMissing { .. }));
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn malformed_inventory_is_json_error() {
        let err = TabletInventory::from_json_str(r#"{"tablets": [{"model": 1}]}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn non_positive_dimensions_rejected() {
        let inventory = TabletInventory::from_json_str(
            r#"{"tablets": [{"model": "Flat", "width_mm": 0, "height_mm": 10}]}"#,
        )
        .unwrap();
        let mut catalog = DeviceCatalog::new();
        assert!(matches!(
            catalog.merge_inventory("X", &inventory),
            Err(Error::Catalog(_))
        ));
    }

    #[test]
    fn insert_replaces_existing_model() {
        let mut catalog = DeviceCatalog::new();
        catalog
            .insert(DeviceSpec::new("A", "M", 10.0, 10.0).unwrap())
            .unwrap();
        catalog
            .insert(DeviceSpec::new("A", "M", 20.0, 15.0).unwrap())
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("A", "M").unwrap().width_mm, 20.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablets.json");
        std::fs::write(&path, INVENTORY).unwrap();
        let inventory = TabletInventory::load(&path).unwrap();
        assert_eq!(inventory.tablets[1].model, "Pad Two");
        assert!(TabletInventory::load(&dir.path().join("missing.json")).is_err());
    }
}
