use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable keys of the host form fields the widget writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// The anchor input. Required.
    Street,
    PostalCode,
    Locality,
    RegionCode,
    BuildingId,
}

impl FieldKey {
    pub const ALL: [FieldKey; 5] = [
        FieldKey::Street,
        FieldKey::PostalCode,
        FieldKey::Locality,
        FieldKey::RegionCode,
        FieldKey::BuildingId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Street => "street",
            FieldKey::PostalCode => "postal_code",
            FieldKey::Locality => "locality",
            FieldKey::RegionCode => "region_code",
            FieldKey::BuildingId => "building_id",
        }
    }
}

/// DOM ids of the host fields, keyed by `FieldKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIds {
    #[serde(default = "default_street_id")]
    pub street: String,
    #[serde(default = "default_postal_code_id")]
    pub postal_code: String,
    #[serde(default = "default_locality_id")]
    pub locality: String,
    #[serde(default = "default_region_code_id")]
    pub region_code: String,
    #[serde(default = "default_building_id_id")]
    pub building_id: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            street: default_street_id(),
            postal_code: default_postal_code_id(),
            locality: default_locality_id(),
            region_code: default_region_code_id(),
            building_id: default_building_id_id(),
        }
    }
}

impl FieldIds {
    pub fn id(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Street => &self.street,
            FieldKey::PostalCode => &self.postal_code,
            FieldKey::Locality => &self.locality,
            FieldKey::RegionCode => &self.region_code,
            FieldKey::BuildingId => &self.building_id,
        }
    }
}

fn default_street_id() -> String { "id_strasse".to_string() }
fn default_postal_code_id() -> String { "id_plz".to_string() }
fn default_locality_id() -> String { "id_ort".to_string() }
fn default_region_code_id() -> String { "id_kanton".to_string() }
fn default_building_id_id() -> String { "id_egid".to_string() }

/// The host page's form, seen through the fields the widget cares about.
pub trait HostForm {
    fn has_field(&self, key: FieldKey) -> bool;
    /// Only called for fields reported present by `has_field`.
    fn write(&mut self, key: FieldKey, value: &str);
}

/// Which optional fields exist, resolved once when the widget attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBindings {
    pub postal_code: bool,
    pub locality: bool,
    pub region_code: bool,
    pub building_id: bool,
}

impl FormBindings {
    /// `None` when the anchor (street) field is missing.
    pub fn resolve(form: &dyn HostForm) -> Option<Self> {
        if !form.has_field(FieldKey::Street) {
            return None;
        }
        Some(FormBindings {
            postal_code: form.has_field(FieldKey::PostalCode),
            locality: form.has_field(FieldKey::Locality),
            region_code: form.has_field(FieldKey::RegionCode),
            building_id: form.has_field(FieldKey::BuildingId),
        })
    }

    pub fn is_bound(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::Street => true,
            FieldKey::PostalCode => self.postal_code,
            FieldKey::Locality => self.locality,
            FieldKey::RegionCode => self.region_code,
            FieldKey::BuildingId => self.building_id,
        }
    }
}

/// In-memory form: present fields map to their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryForm {
    fields: BTreeMap<FieldKey, String>,
}

impl MemoryForm {
    /// A form with the given fields present and empty.
    pub fn with_fields(keys: &[FieldKey]) -> Self {
        MemoryForm {
            fields: keys.iter().map(|k| (*k, String::new())).collect(),
        }
    }

    /// A form with all five fields present.
    pub fn complete() -> Self {
        Self::with_fields(&FieldKey::ALL)
    }

    pub fn set(&mut self, key: FieldKey, value: &str) {
        self.fields.insert(key, value.to_string());
    }

    /// Value of a present field, `""` for absent ones.
    pub fn value(&self, key: FieldKey) -> &str {
        self.fields.get(&key).map_or("", String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl HostForm for MemoryForm {
    fn has_field(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    fn write(&mut self, key: FieldKey, value: &str) {
        if let Some(slot) = self.fields.get_mut(&key) {
            *slot = value.to_string();
        }
    }
}
