//! Example: Cover a cap with cells
//!
//! Covers a small cap around a city and prints the resulting cell tokens.
//! The coverer's debug events are printed to stdout.

use rust_s2_cells::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Cap Covering Example");
    println!("====================\n");

    // 5 km around central Tokyo
    let center = LatLng::from_degrees(35.6812, 139.7671);
    let radius_km = 5.0;
    let cap = Cap::from_axis_angle(center.to_point(), radius_km / 6371.0);

    let options = CovererOptionsBuilder::new()
        .min_level(8)
        .unwrap()
        .max_level(16)
        .unwrap()
        .max_cells(12)
        .build()
        .unwrap();

    println!("Region:");
    println!("  Center: {}", center);
    println!("  Radius: {} km", radius_km);
    println!("  Area: {:.3e} sr", cap.area());
    println!();

    println!("Options:");
    println!("  Levels: {}..={}", options.min_level, options.max_level);
    println!("  Max cells: {}", options.max_cells);
    println!();

    let coverer = RegionCoverer::new(options).unwrap();
    let region = Region::Cap(cap);
    let covering = coverer.get_covering(&region);
    let interior = coverer.get_interior_covering(&region);

    println!("Covering ({} cells, {:.3e} sr):", covering.len(), covering.exact_area());
    for id in &covering {
        println!("  {:<18} level {:>2}  {}", id.to_token(), id.level(), id);
    }
    println!();

    println!("Interior covering ({} cells):", interior.len());
    for id in &interior {
        println!("  {:<18} level {:>2}", id.to_token(), id.level());
    }

    let ratio = covering.exact_area() / cap.area();
    println!("\nCovering area / cap area: {:.2}", ratio);
}
