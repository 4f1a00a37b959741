//! Deterministic route coloring
//!
//! The dashboard tints each `SRC>DST` route so conversations are easy to
//! follow in a busy stream. The hue is hashed from the route text, so the
//! same route always renders the same color, on every client, across
//! restarts. Saturation and lightness are fixed to keep every hue legible
//! on a dark background.

/// HSL color string for a route, `hsl(h, 60%, 67%)` with `h < 360`
pub fn route_color(route: &str) -> String {
    let mut hash: u64 = 0;
    for &byte in route.as_bytes() {
        hash = hash.rotate_left(5) ^ (byte as u64);
        hash = hash.wrapping_mul(0x517cc1b727220a95);
    }
    let hue = hash % 360;
    format!("hsl({hue}, 60%, 67%)")
}
