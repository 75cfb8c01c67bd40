// Copyright (c) 2025 - Cowboy AI, Inc.
//! Geospatial value objects

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Constraint, FieldViolation, SchemaResult, ValidationError};
use crate::validation::{self, Schema};

/// Latitude bounds in decimal degrees (inclusive)
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Longitude bounds in decimal degrees (inclusive)
///
/// Values up to 360 are tolerated for devices reporting 0..360 longitudes.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 360.0);

/// Validated position fix
///
/// # Invariants
/// - `lat` ∈ [-90, 90]
/// - `lon` ∈ [-180, 360]
/// - `alt` ≥ 0 meters, defaulting to 0
///
/// # Examples
///
/// ```rust
/// use gundi_core::domain::Location;
///
/// let fix = Location::new(-1.59083, 35.43902).unwrap();
/// assert_eq!(fix.alt(), 0.0);
///
/// assert!(Location::new(91.0, 0.0).is_err());
/// assert!(Location::new(90.0, 0.0).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    lat: f64,

    #[validate(range(min = -180.0, max = 360.0))]
    lon: f64,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    alt: f64,

    #[serde(default)]
    hdop: Option<i64>,

    #[serde(default)]
    vdop: Option<i64>,
}

impl Location {
    /// Create a location, rejecting out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> SchemaResult<Self> {
        let location = Self {
            lat,
            lon,
            alt: 0.0,
            hdop: None,
            vdop: None,
        };
        location.validate().map_err(ValidationError::from)?;
        Ok(location)
    }

    /// Set the altitude, rejecting negative values
    pub fn with_alt(mut self, alt: f64) -> SchemaResult<Self> {
        self.alt = alt;
        self.validate().map_err(ValidationError::from)?;
        Ok(self)
    }

    /// Horizontal dilution of precision
    pub fn with_hdop(mut self, hdop: i64) -> Self {
        self.hdop = Some(hdop);
        self
    }

    /// Vertical dilution of precision
    pub fn with_vdop(mut self, vdop: i64) -> Self {
        self.vdop = Some(vdop);
        self
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn alt(&self) -> f64 {
        self.alt
    }

    pub fn hdop(&self) -> Option<i64> {
        self.hdop
    }

    pub fn vdop(&self) -> Option<i64> {
        self.vdop
    }
}

impl Schema for Location {
    fn check_shape(value: &serde_json::Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_coordinate(fields, path, "lat", LATITUDE_RANGE, out);
        check_coordinate(fields, path, "lon", LONGITUDE_RANGE, out);
        if let Some(alt) = validation::check_number(fields, path, "alt", false, out) {
            if alt < 0.0 {
                out.push(FieldViolation::new(
                    validation::join(path, "alt"),
                    Constraint::Range,
                    format!("value {} below 0", alt),
                ));
            }
        }
        validation::check_integer(fields, path, "hdop", out);
        validation::check_integer(fields, path, "vdop", out);
    }
}

/// EarthRanger flavoured position (`latitude`/`longitude`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct ERLocation {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 360.0))]
    pub longitude: f64,
}

impl ERLocation {
    pub fn new(latitude: f64, longitude: f64) -> SchemaResult<Self> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate().map_err(ValidationError::from)?;
        Ok(location)
    }
}

impl From<Location> for ERLocation {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.lat,
            longitude: location.lon,
        }
    }
}

impl Schema for ERLocation {
    fn check_shape(value: &serde_json::Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_coordinate(fields, path, "latitude", LATITUDE_RANGE, out);
        check_coordinate(fields, path, "longitude", LONGITUDE_RANGE, out);
    }
}

// Range checks run on raw input too, so a bad coordinate is reported
// alongside missing fields elsewhere in the same document.
fn check_coordinate(
    fields: &serde_json::Map<String, serde_json::Value>,
    path: &str,
    field: &str,
    (min, max): (f64, f64),
    out: &mut Vec<FieldViolation>,
) {
    let Some(value) = validation::check_number(fields, path, field, true, out) else {
        return;
    };
    if !(min..=max).contains(&value) {
        out.push(FieldViolation::new(
            validation::join(path, field),
            Constraint::Range,
            format!("value {} outside [{}, {}]", value, min, max),
        ));
    }
}
