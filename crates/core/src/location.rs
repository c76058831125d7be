//! The structured location record the whole system exists to produce.
//!
//! Every field is either a non-empty string or absent. Writers go through
//! [`LocationRecord::fill_missing`], which never replaces a value that is
//! already present.

use serde::{Deserialize, Serialize};

/// A location resolved (possibly partially) from free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Name of the place or landmark
    #[serde(default)]
    pub name: Option<String>,

    /// City the place is in
    #[serde(default)]
    pub city: Option<String>,

    /// Country the place is in
    #[serde(default)]
    pub country: Option<String>,

    /// Coordinates formatted as `"lat, lon"`
    #[serde(default)]
    pub latlong: Option<String>,

    /// Set when the record is a failure marker rather than an answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Addressable fields of a [`LocationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    Name,
    City,
    Country,
    Latlong,
}

impl LocationField {
    /// The three fields produced by text extraction.
    pub const EXTRACTED: [LocationField; 3] = [Self::Name, Self::City, Self::Country];

    /// The fields a complete final answer carries.
    pub const ANSWER: [LocationField; 4] = [Self::Name, Self::City, Self::Country, Self::Latlong];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
            Self::Country => "country",
            Self::Latlong => "latlong",
        }
    }
}

impl std::fmt::Display for LocationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LocationRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The record returned when the iteration budget runs out.
    pub fn budget_exhausted() -> Self {
        Self {
            error: Some("Max iterations reached".into()),
            ..Self::default()
        }
    }

    /// Read a field.
    pub fn get(&self, field: LocationField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Whether a field currently holds a value.
    pub fn has(&self, field: LocationField) -> bool {
        self.slot(field).is_some()
    }

    /// Write `value` into `field` only if the field is absent.
    ///
    /// Blank values are ignored. Returns `true` when the record changed.
    pub fn fill_missing(&mut self, field: LocationField, value: impl Into<String>) -> bool {
        let value = value.into();
        let value = value.trim();
        let slot = self.slot_mut(field);
        if slot.is_some() || value.is_empty() {
            return false;
        }
        *slot = Some(value.to_string());
        true
    }

    /// Fields a final answer needs but this record lacks.
    pub fn missing_answer_fields(&self) -> Vec<LocationField> {
        LocationField::ANSWER
            .into_iter()
            .filter(|f| !self.has(*f))
            .collect()
    }

    /// Build a record from a loosely-typed parameter map.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified, and
    /// `null`, blanks, and nested values count as absent.
    pub fn from_params(params: &serde_json::Map<String, serde_json::Value>) -> Self {
        let text = |key: &str| -> Option<String> {
            let value = match params.get(key)? {
                serde_json::Value::String(s) => s.trim().to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            (!value.is_empty()).then_some(value)
        };

        Self {
            name: text("name"),
            city: text("city"),
            country: text("country"),
            latlong: text("latlong"),
            error: text("error"),
        }
    }

    /// Convert into a JSON object map (absent fields become `null`).
    pub fn to_params(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    fn slot(&self, field: LocationField) -> &Option<String> {
        match field {
            LocationField::Name => &self.name,
            LocationField::City => &self.city,
            LocationField::Country => &self.country,
            LocationField::Latlong => &self.latlong,
        }
    }

    fn slot_mut(&mut self, field: LocationField) -> &mut Option<String> {
        match field {
            LocationField::Name => &mut self.name,
            LocationField::City => &mut self.city,
            LocationField::Country => &mut self.country,
            LocationField::Latlong => &mut self.latlong,
        }
    }
}

impl std::fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        write!(
            f,
            "name: {}, city: {}, country: {}, latlong: {}",
            show(&self.name),
            show(&self.city),
            show(&self.country),
            show(&self.latlong)
        )?;
        if let Some(error) = &self.error {
            write!(f, " (error: {error})")?;
        }
        Ok(())
    }
}
