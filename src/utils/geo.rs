// utils/geo.rs

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, long) points in degrees.
pub fn haversine_km(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_long = (long2 - long1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_long / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Squared distance in degree space. Longitude degrees shrink with latitude,
/// so this can disagree with `haversine_km` on ordering; only usable as a
/// tie-break between equal great-circle distances, never for ranking or
/// radius filtering.
pub fn squared_degree_distance(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    (lat2 - lat1).powi(2) + (long2 - long1).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMSTERDAM: (f64, f64) = (52.3676, 4.9041);
    const ROTTERDAM: (f64, f64) = (51.9244, 4.4777);
    const UTRECHT: (f64, f64) = (52.0907, 5.1214);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(AMSTERDAM.0, AMSTERDAM.1, AMSTERDAM.0, AMSTERDAM.1), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(AMSTERDAM.0, AMSTERDAM.1, ROTTERDAM.0, ROTTERDAM.1);
        let back = haversine_km(ROTTERDAM.0, ROTTERDAM.1, AMSTERDAM.0, AMSTERDAM.1);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn known_distance_amsterdam_rotterdam() {
        // Roughly 57 km as the crow flies.
        let d = haversine_km(AMSTERDAM.0, AMSTERDAM.1, ROTTERDAM.0, ROTTERDAM.1);
        assert!(d > 55.0 && d < 60.0, "got {d}");
    }

    #[test]
    fn triangle_ordering_matches_geography() {
        // Utrecht is closer to Amsterdam than Rotterdam is.
        let to_utrecht = haversine_km(AMSTERDAM.0, AMSTERDAM.1, UTRECHT.0, UTRECHT.1);
        let to_rotterdam = haversine_km(AMSTERDAM.0, AMSTERDAM.1, ROTTERDAM.0, ROTTERDAM.1);
        assert!(to_utrecht < to_rotterdam);
    }

    #[test]
    fn degree_space_can_invert_the_great_circle_order() {
        // East-west displacement is compressed in kilometres but not in
        // degrees, so the two metrics disagree on this pair.
        let origin = (52.0, 5.0);
        let east = (52.0, 6.0);
        let north = (52.9, 5.0);

        let km_east = haversine_km(origin.0, origin.1, east.0, east.1);
        let km_north = haversine_km(origin.0, origin.1, north.0, north.1);
        assert!(km_east < km_north);

        let deg_east = squared_degree_distance(origin.0, origin.1, east.0, east.1);
        let deg_north = squared_degree_distance(origin.0, origin.1, north.0, north.1);
        assert!(deg_north < deg_east);
    }
}
