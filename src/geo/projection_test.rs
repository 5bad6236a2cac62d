#[cfg(test)]
mod tests {
    use crate::geo::{LatLng, MAX_LATITUDE, Offset, Projection, TILE_SIZE, WebMercator};

    #[test]
    fn test_origin_maps_to_world_center() {
        let proj = WebMercator::new(0.0);
        let o = proj.coord_to_offset(LatLng::new(0.0, 0.0));
        assert!((o.x - TILE_SIZE / 2.0).abs() < 1e-9);
        assert!((o.y - TILE_SIZE / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_grows_southward() {
        let proj = WebMercator::new(5.0);
        let north = proj.coord_to_offset(LatLng::new(40.0, 0.0));
        let south = proj.coord_to_offset(LatLng::new(-40.0, 0.0));
        assert!(north.y < south.y);

        let top = proj.coord_to_offset(LatLng::new(MAX_LATITUDE, -180.0));
        assert!(top.y.abs() < 1e-6);
        assert!(top.x.abs() < 1e-9);
    }

    #[test]
    fn test_scale_doubles_per_zoom() {
        assert_eq!(WebMercator::new(1.0).scale(), 2.0 * WebMercator::new(0.0).scale());
        assert_eq!(WebMercator::new(13.0).scale(), TILE_SIZE * 8192.0);
    }

    #[test]
    fn test_round_trip() {
        let proj = WebMercator::new(13.0);
        for p in [
            LatLng::new(37.5665, 126.978),
            LatLng::new(-33.8688, 151.2093),
            LatLng::new(59.955982, 30.244759),
        ] {
            let back = proj.offset_to_coord(proj.coord_to_offset(p));
            assert!((back.lat - p.lat).abs() < 1e-9, "{:?} -> {:?}", p, back);
            assert!((back.lng - p.lng).abs() < 1e-9, "{:?} -> {:?}", p, back);
        }

        let o = Offset::new(1234.5, 6789.25);
        let back = proj.coord_to_offset(proj.offset_to_coord(o));
        assert!((back.x - o.x).abs() < 1e-6);
        assert!((back.y - o.y).abs() < 1e-6);
    }

    #[test]
    fn test_default_distance_is_spherical() {
        let proj = WebMercator::new(10.0);
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        assert!((proj.distance(a, b) - 111_194.926_644_558_73).abs() < 1e-3);
    }
}
