use exif::Rational;

use crate::constants::{FALLBACK_CENTER_LAT, FALLBACK_CENTER_LNG};
use crate::exif_parser::GpsMetadata;
use crate::processing::PhotoRecord;

/// A GPS coordinate as stored in EXIF: degrees, minutes and seconds, each an
/// unsigned rational. Minutes and seconds are conventionally below 60; the
/// sign comes from the hemisphere reference alone.
#[derive(Debug, Clone, Copy)]
pub struct DmsCoordinate {
    degrees: Rational,
    minutes: Rational,
    seconds: Rational,
}

impl DmsCoordinate {
    /// Builds a coordinate from the raw EXIF value. GPS coordinates are
    /// exactly three rationals; anything else is treated as absent.
    pub fn from_rationals(components: &[Rational]) -> Option<Self> {
        match components {
            [degrees, minutes, seconds] => Some(Self {
                degrees: *degrees,
                minutes: *minutes,
                seconds: *seconds,
            }),
            _ => None,
        }
    }

    /// Reduces each rational to floating point, then converts the triple to
    /// unsigned decimal degrees.
    pub fn to_decimal(&self) -> f64 {
        self.degrees.to_f64() + self.minutes.to_f64() / 60.0 + self.seconds.to_f64() / 3600.0
    }

    /// Applies the hemisphere reference. Any reference other than
    /// `positive_marker` selects the negative hemisphere, so a malformed
    /// reference reads as "S"/"W" rather than an error.
    pub fn signed_decimal(&self, reference: &str, positive_marker: &str) -> f64 {
        let decimal = self.to_decimal();
        if reference == positive_marker {
            decimal
        } else {
            -decimal
        }
    }
}

/// Resolves a metadata record to a signed (latitude, longitude) pair in
/// decimal degrees.
///
/// All four GPS sub-fields must be present and well-formed; otherwise the
/// coordinate is absent as a whole. Missing data is never an error here.
pub fn resolve_coordinates(metadata: &GpsMetadata) -> Option<(f64, f64)> {
    let latitude = metadata
        .latitude
        .as_deref()
        .and_then(DmsCoordinate::from_rationals)?;
    let latitude_ref = metadata.latitude_ref.as_deref()?;
    let longitude = metadata
        .longitude
        .as_deref()
        .and_then(DmsCoordinate::from_rationals)?;
    let longitude_ref = metadata.longitude_ref.as_deref()?;

    Some((
        latitude.signed_decimal(latitude_ref, "N"),
        longitude.signed_decimal(longitude_ref, "E"),
    ))
}

/// Map center: the arithmetic mean of all record coordinates, or the fixed
/// fallback when nothing carries GPS data.
pub fn map_center(records: &[PhotoRecord]) -> (f64, f64) {
    if records.is_empty() {
        return (FALLBACK_CENTER_LAT, FALLBACK_CENTER_LNG);
    }

    let count = records.len() as f64;
    let lat = records.iter().map(|r| r.lat).sum::<f64>() / count;
    let lng = records.iter().map(|r| r.lng).sum::<f64>() / count;
    (lat, lng)
}
