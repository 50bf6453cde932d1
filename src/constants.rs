// Map defaults
pub const FALLBACK_CENTER_LAT: f64 = 60.6;
pub const FALLBACK_CENTER_LNG: f64 = 15.5;
pub const INITIAL_ZOOM: u8 = 8;

// Output
pub const OUTPUT_FILE: &str = "maps.html";

// Every container format the EXIF reader understands
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tif", "tiff", "webp", "heic", "heif",
];
