//! Latitude-aware grid snapping
//!
//! Converts a physical resolution in kilometers into a local grid of
//! longitude/latitude cells and snaps coordinates onto cell indices. One
//! degree of latitude is treated as 111 km everywhere; one degree of
//! longitude shrinks with `cos(latitude)` away from the equator.

use crate::error::{AggregateError, Result};
use crate::types::GridCell;

/// Kilometers per degree of latitude (spherical small-angle approximation)
const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Latitudes beyond this are rejected: `cos(latitude)` approaches zero near
/// the poles and the longitude cell width diverges.
const MAX_SUPPORTED_LATITUDE: f64 = 89.9;

/// Decimal places kept when materializing a cell center coordinate
const COORD_PRECISION: f64 = 1e6;

/// Snaps coordinates onto a fixed-resolution grid
///
/// Cells are addressed by integer indices counted from the (0°, 0°) origin,
/// so snapping is exact and two samples in the same physical cell always
/// produce the same [`GridCell`]. The physical cell center is computed only
/// when an output row is built.
///
/// Rounding is `f64::round`, i.e. half-away-from-zero: a coordinate exactly
/// between two cell centers snaps away from the origin.
#[derive(Debug, Clone)]
pub struct GridSnapper {
    resolution_km: f64,
    /// Cell height in degrees of latitude, constant everywhere
    lat_cell_deg: f64,
}

impl GridSnapper {
    /// Create a snapper for the given resolution
    pub fn new(resolution_km: f64) -> Result<Self> {
        if !resolution_km.is_finite() || resolution_km <= 0.0 {
            return Err(AggregateError::invalid_config(format!(
                "spatial resolution must be positive and finite, got {resolution_km}"
            )));
        }
        Ok(Self {
            resolution_km,
            lat_cell_deg: resolution_km / KM_PER_DEGREE_LAT,
        })
    }

    /// Longitude cell width in degrees at the given latitude
    fn lon_cell_deg(&self, latitude: f64) -> f64 {
        let km_per_degree_lon = KM_PER_DEGREE_LAT * latitude.to_radians().cos();
        self.resolution_km / km_per_degree_lon
    }

    /// Snap a coordinate onto its grid cell
    ///
    /// The longitude cell width is evaluated at the *snapped* latitude band,
    /// not the raw latitude, so every sample landing in one band sees the
    /// same width and cell assignment is deterministic.
    pub fn snap(&self, longitude: f64, latitude: f64) -> Result<GridCell> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(AggregateError::invalid_input(format!(
                "non-finite coordinate ({longitude}, {latitude})"
            )));
        }
        if latitude.abs() > MAX_SUPPORTED_LATITUDE {
            return Err(AggregateError::invalid_input(format!(
                "latitude {latitude} is outside the supported range ±{MAX_SUPPORTED_LATITUDE}"
            )));
        }

        let lat_idx = (latitude / self.lat_cell_deg).round() as i64;
        let band_latitude = lat_idx as f64 * self.lat_cell_deg;
        let lon_idx = (longitude / self.lon_cell_deg(band_latitude)).round() as i64;

        Ok(GridCell { lon_idx, lat_idx })
    }

    /// Physical center of a cell, each coordinate rounded to 6 decimal places
    pub fn cell_center(&self, cell: GridCell) -> (f64, f64) {
        let latitude = cell.lat_idx as f64 * self.lat_cell_deg;
        let longitude = cell.lon_idx as f64 * self.lon_cell_deg(latitude);
        (round_coord(longitude), round_coord(latitude))
    }
}

/// Round a coordinate to 6 decimal places (~0.11 m at the equator)
fn round_coord(value: f64) -> f64 {
    (value * COORD_PRECISION).round() / COORD_PRECISION
}
