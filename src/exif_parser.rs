use anyhow::Result;
use exif::{Exif, In, Rational, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

/// The GPS-related subset of a photo's EXIF data.
///
/// Every field is optional; the default value describes a photo with no
/// usable metadata. DMS triples are kept as raw rationals so the resolver
/// owns the conversion to decimal degrees.
#[derive(Debug, Clone, Default)]
pub struct GpsMetadata {
    pub latitude: Option<Vec<Rational>>,
    pub latitude_ref: Option<String>,
    pub longitude: Option<Vec<Rational>>,
    pub longitude_ref: Option<String>,
    pub datetime: Option<String>,
}

impl GpsMetadata {
    /// Extracts the GPS schema from decoded EXIF.
    pub fn from_exif(exif: &Exif) -> Self {
        Self {
            latitude: rational_field(exif, Tag::GPSLatitude),
            latitude_ref: ascii_field(exif, Tag::GPSLatitudeRef),
            longitude: rational_field(exif, Tag::GPSLongitude),
            longitude_ref: ascii_field(exif, Tag::GPSLongitudeRef),
            datetime: capture_datetime(exif),
        }
    }
}

/// Reads the GPS metadata from a photo file.
///
/// Never fails: any open or decode error is logged and the empty record is
/// returned, so one unreadable file cannot stop a run.
pub fn read_gps_metadata(path: &Path) -> GpsMetadata {
    match decode_exif(path) {
        Ok(exif) => GpsMetadata::from_exif(&exif),
        Err(err) => {
            warn!("failed to read EXIF data from {}: {}", path.display(), err);
            GpsMetadata::default()
        }
    }
}

fn decode_exif(path: &Path) -> Result<Exif> {
    let file = File::open(path)?;
    let mut buf_reader = BufReader::new(file);
    let mut exif_reader = exif::Reader::new();
    exif_reader.continue_on_error(true); // Tolerate non-standard EXIF structures

    match exif_reader.read_from_container(&mut buf_reader) {
        Ok(exif) => Ok(exif),
        Err(exif::Error::PartialResult(partial)) => {
            let (exif, _errors) = partial.into_inner();
            Ok(exif)
        }
        Err(err) => Err(err.into()),
    }
}

fn rational_field(exif: &Exif, tag: Tag) -> Option<Vec<Rational>> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Rational(ref components) = field.value {
        Some(components.clone())
    } else {
        None
    }
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref entries) = field.value {
        let text = std::str::from_utf8(entries.first()?).ok()?.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    } else {
        None
    }
}

/// Capture time as "DD.MM.YYYY HH:MM", preferring DateTimeOriginal over the
/// more general DateTime tag. EXIF stores "YYYY:MM:DD HH:MM:SS".
fn capture_datetime(exif: &Exif) -> Option<String> {
    for tag in [Tag::DateTimeOriginal, Tag::DateTime] {
        let Some(raw) = ascii_field(exif, tag) else {
            continue;
        };
        let Some((date, time)) = raw.split_once(' ') else {
            continue;
        };
        let date_parts: Vec<&str> = date.split(':').collect();
        let time_parts: Vec<&str> = time.split(':').collect();

        if let ([year, month, day], [hour, minute, ..]) =
            (date_parts.as_slice(), time_parts.as_slice())
        {
            return Some(format!("{}.{}.{} {}:{}", day, month, year, hour, minute));
        }
    }

    None
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Hand-assembled EXIF fixtures: a little-endian TIFF blob whose IFD0
    //! points at a GPS IFD, optionally wrapped in a minimal JPEG (SOI +
    //! APP1 + EOI), which is all the reader needs.

    fn push_u16(buf: &mut Vec<u8>, value: u16) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    fn push_u32(buf: &mut Vec<u8>, value: u32) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    fn push_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
        push_u16(buf, tag);
        push_u16(buf, kind);
        push_u32(buf, count);
        buf.extend_from_slice(&value);
    }

    fn ascii_inline(marker: &str) -> [u8; 4] {
        let mut value = [0u8; 4];
        value[0] = marker.as_bytes()[0];
        value
    }

    pub(crate) fn gps_exif_blob(
        latitude: [(u32, u32); 3],
        latitude_ref: &str,
        longitude: [(u32, u32); 3],
        longitude_ref: &str,
    ) -> Vec<u8> {
        gps_exif_blob_with_datetime(latitude, latitude_ref, longitude, longitude_ref, None)
    }

    pub(crate) fn gps_exif_blob_with_datetime(
        latitude: [(u32, u32); 3],
        latitude_ref: &str,
        longitude: [(u32, u32); 3],
        longitude_ref: &str,
        datetime: Option<&str>,
    ) -> Vec<u8> {
        const ENTRY_SIZE: usize = 12;

        let ifd0_entries = 1 + usize::from(datetime.is_some());
        let gps_ifd_offset = 8 + 2 + ifd0_entries * ENTRY_SIZE + 4;
        let data_offset = gps_ifd_offset + 2 + 4 * ENTRY_SIZE + 4;
        let lat_offset = data_offset;
        let lng_offset = lat_offset + 24;
        let datetime_offset = lng_offset + 24;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"II");
        push_u16(&mut buf, 42);
        push_u32(&mut buf, 8); // IFD0 offset

        // IFD0, entries in ascending tag order: DateTime (0x0132), then the
        // GPS IFD pointer (0x8825)
        push_u16(&mut buf, ifd0_entries as u16);
        if let Some(value) = datetime {
            assert_eq!(value.len(), 19, "EXIF datetime is YYYY:MM:DD HH:MM:SS");
            push_entry(
                &mut buf,
                0x0132,
                2,
                20,
                (datetime_offset as u32).to_le_bytes(),
            );
        }
        push_entry(&mut buf, 0x8825, 4, 1, (gps_ifd_offset as u32).to_le_bytes());
        push_u32(&mut buf, 0);

        // GPS IFD: LatitudeRef, Latitude, LongitudeRef, Longitude
        push_u16(&mut buf, 4);
        push_entry(&mut buf, 1, 2, 2, ascii_inline(latitude_ref));
        push_entry(&mut buf, 2, 5, 3, (lat_offset as u32).to_le_bytes());
        push_entry(&mut buf, 3, 2, 2, ascii_inline(longitude_ref));
        push_entry(&mut buf, 4, 5, 3, (lng_offset as u32).to_le_bytes());
        push_u32(&mut buf, 0);

        assert_eq!(buf.len(), data_offset);
        for (num, denom) in latitude.into_iter().chain(longitude) {
            push_u32(&mut buf, num);
            push_u32(&mut buf, denom);
        }
        if let Some(value) = datetime {
            buf.extend_from_slice(value.as_bytes());
            buf.push(0);
        }
        buf
    }

    pub(crate) fn jpeg_with_gps(
        latitude: [(u32, u32); 3],
        latitude_ref: &str,
        longitude: [(u32, u32); 3],
        longitude_ref: &str,
    ) -> Vec<u8> {
        let tiff = gps_exif_blob(latitude, latitude_ref, longitude, longitude_ref);

        let mut jpeg = Vec::new();
        jpeg.extend_from_slice(&[0xFF, 0xD8]); // SOI
        jpeg.extend_from_slice(&[0xFF, 0xE1]); // APP1
        // Segment length covers itself plus the "Exif\0\0" identifier
        jpeg.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]); // EOI
        jpeg
    }
}
