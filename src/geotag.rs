//! Geotag checks follow the Freesound bulk-describe constraints:
//! `"lat, lon, zoom"` with |lat| <= 90, |lon| <= 180 and zoom in 11..=21.

pub const MIN_ZOOM: i64 = 11;
pub const MAX_ZOOM: i64 = 21;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geotag {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: i64,
}

/// Parse a complete geotag. Partial or out-of-range values yield `None`.
pub fn parse_geotag(geotag: &str) -> Option<Geotag> {
    let parts: Vec<&str> = geotag.split(", ").collect();
    if parts.len() != 3 {
        return None;
    }
    let latitude = parse_number(parts[0])?;
    let longitude = parse_number(parts[1])?;
    let zoom = parse_number(parts[2])?.trunc();
    if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
        return None;
    }
    if zoom < MIN_ZOOM as f64 || zoom > MAX_ZOOM as f64 {
        return None;
    }
    Some(Geotag { latitude, longitude, zoom: zoom as i64 })
}

/// Empty geotags are valid: the column is optional.
pub fn is_geotag_valid(geotag: &str) -> bool {
    geotag.is_empty() || parse_geotag(geotag).is_some()
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
