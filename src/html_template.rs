use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::constants::INITIAL_ZOOM;
use crate::coordinates::map_center;
use crate::processing::PhotoRecord;

/// Renders the complete map page for the given records.
///
/// Deterministic: the same record sequence always produces the same bytes.
pub fn render_map_page(records: &[PhotoRecord]) -> Result<String> {
    let (center_lat, center_lng) = map_center(records);
    let places = serde_json::to_string(records).context("Failed to serialize photo records")?;

    Ok(MAP_HTML_TEMPLATE
        .replace("__CENTER_LAT__", &format!("{:.6}", center_lat))
        .replace("__CENTER_LNG__", &format!("{:.6}", center_lng))
        .replace("__INITIAL_ZOOM__", &INITIAL_ZOOM.to_string())
        .replace("__PLACES_DATA__", &places))
}

/// Writes the rendered page to `output`, replacing any previous run.
pub fn write_map_page(records: &[PhotoRecord], output: &Path) -> Result<()> {
    let html = render_map_page(records)?;
    fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

// HTML template for the map page. Leaflet comes from the unpkg CDN,
// unmodified; tiles from OpenTopoMap.
const MAP_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>My Personal Photo Map</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body { height: 100%; margin: 0; padding: 0; }
        #map { width: 100%; height: 100%; }
        .leaflet-popup-content-wrapper { background-color: #f9f9f9; border-radius: 8px; }
        .leaflet-popup-content { margin: 15px; text-align: center; }
        .popup-image { max-width: 200px; height: auto; border-radius: 5px; margin-bottom: 5px; }
        .popup-datetime { color: #666; font-size: 0.8em; margin-top: 4px; }
    </style>
</head>
<body>
<div id="map"></div>
<script>
    const map = L.map('map').setView([__CENTER_LAT__, __CENTER_LNG__], __INITIAL_ZOOM__);
    L.tileLayer('https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png', {
        maxZoom: 17,
        attribution: 'Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)'
    }).addTo(map);

    const places = __PLACES_DATA__;

    const markers = [];
    places.forEach(place => {
        const marker = L.marker([place.lat, place.lng]);
        markers.push(marker);

        const datetimeLine = place.datetime ? `<div class="popup-datetime">${place.datetime}</div>` : '';
        const popupContent = `
            <b>${place.name}</b><br>
            <img src="${place.path}" alt="${place.name}" class="popup-image">
            ${datetimeLine}
        `;
        marker.bindPopup(popupContent);
        marker.on('mouseover', function (e) { this.openPopup(); });
        marker.on('mouseout', function (e) { this.closePopup(); });
        marker.addTo(map);
    });

    if (markers.length > 0) {
        const group = new L.featureGroup(markers);
        map.fitBounds(group.getBounds());
    }
</script>
</body>
</html>"#;
