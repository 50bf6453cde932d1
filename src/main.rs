use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod constants;
mod coordinates;
mod exif_parser;
mod html_template;
mod processing;

use constants::OUTPUT_FILE;
use html_template::write_map_page;
use processing::process_directory;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🗺️  PhotoMap generator starting...");

    let current_dir = std::env::current_dir()?;
    println!("🔍 Scanning directory: {}", current_dir.display());

    let (records, summary) = process_directory(&current_dir);

    if summary.files_checked == 0 {
        println!("No image files found in the current directory.");
        return Ok(());
    }

    write_map_page(&records, Path::new(OUTPUT_FILE))?;

    println!("\n📊 Processing statistics:");
    println!("   🔍 Files checked: {}", summary.files_checked);
    println!("   🗺️  With GPS data: {}", summary.with_gps);
    println!("   ❌ Skipped: {}", summary.skipped);
    println!("   ⏱️  Processing time: {:.2} s", summary.elapsed_secs);

    println!("\n🎉 Done! Map saved to '{}'.", OUTPUT_FILE);
    println!(
        "🌐 To view the map, open in browser: {}",
        current_dir.join(OUTPUT_FILE).display()
    );

    Ok(())
}
