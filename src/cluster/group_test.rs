#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cluster::{Cluster, ClusterOptions, Visibility};
    use crate::geo::LatLng;
    use crate::map::{InMemoryMap, MapProvider, MarkerId, Viewport};

    type Options = ClusterOptions<InMemoryMap>;

    fn seoul_map() -> InMemoryMap {
        InMemoryMap::new(Viewport::new(
            LatLng::new(37.5665, 126.978),
            10.0,
            1200.0,
            900.0,
        ))
    }

    fn marker_at(map: &mut InMemoryMap, dx: f64, dy: f64) -> MarkerId {
        let position = map.coord_at(dx, dy);
        map.add_marker(position)
    }

    fn icons() -> Vec<String> {
        vec!["small".to_string(), "medium".to_string(), "large".to_string()]
    }

    #[test]
    fn test_empty_cluster() {
        let cluster = Cluster::new();
        assert_eq!(cluster.center(), None);
        assert_eq!(cluster.bounds(), None);
        assert_eq!(cluster.count(), 0);
        assert!(!cluster.is_in_bounds(&LatLng::new(37.5665, 126.978)));
    }

    #[test]
    fn test_center_is_fixed_by_first_member() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);
        let b = marker_at(&mut map, 30.0, 10.0);
        let c = marker_at(&mut map, -20.0, -5.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        let center = cluster.center();
        let bounds = cluster.bounds();

        cluster.add_marker(&map, &options, b);
        cluster.add_marker(&map, &options, c);

        assert_eq!(cluster.center(), center);
        assert_eq!(cluster.center(), map.marker_position(a));
        assert_eq!(cluster.bounds(), bounds);
        assert_eq!(cluster.members(), &[a, b, c]);
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, a);
        assert_eq!(cluster.count(), 1);
    }

    #[test]
    fn test_first_marker_without_position_is_ignored() {
        let map = seoul_map();
        let options = Options::default();

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, MarkerId(99));
        assert_eq!(cluster.count(), 0);
        assert_eq!(cluster.center(), None);
    }

    #[test]
    fn test_bounds_extend_half_grid() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);

        for (dx, dy) in [(49.0, 0.0), (-49.0, 0.0), (0.0, 49.0), (0.0, -49.0), (35.0, -35.0)] {
            assert!(cluster.is_in_bounds(&map.coord_at(dx, dy)), "({}, {})", dx, dy);
        }
        for (dx, dy) in [(51.0, 0.0), (-51.0, 0.0), (0.0, 51.0), (0.0, -51.0)] {
            assert!(!cluster.is_in_bounds(&map.coord_at(dx, dy)), "({}, {})", dx, dy);
        }
    }

    #[test]
    fn test_bounds_clamped_to_view() {
        let mut map = seoul_map();
        let options = Options::default();
        let edge = marker_at(&mut map, 590.0, -440.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, edge);

        let bounds = cluster.bounds().expect("bounds computed with the first member");
        let view = map.bounds();
        assert!(bounds.ne.lng <= view.ne.lng + 1e-9);
        assert!(bounds.ne.lat <= view.ne.lat + 1e-9);
        assert!(bounds.sw.lng < map.coord_at(590.0, 0.0).lng);
        assert!(cluster.is_in_bounds(&map.marker_position(edge).unwrap()));
    }

    #[test]
    fn test_bounds_contain_member_on_view_corner() {
        let mut map = InMemoryMap::new(Viewport::new(LatLng::new(60.1, 30.3), 10.0, 1200.0, 900.0));
        let options = Options::default();
        let corner = marker_at(&mut map, 600.0, -450.0);
        let twin = marker_at(&mut map, 600.0, -450.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, corner);

        let position = map.marker_position(corner).unwrap();
        assert!(cluster.is_in_bounds(&position));
        assert!(cluster.is_in_bounds(&map.marker_position(twin).unwrap()));
    }

    #[test]
    fn test_zero_grid_size_has_no_bounds() {
        let mut map = seoul_map();
        let options = Options::default().with_grid_size(0.0);
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        assert_eq!(cluster.count(), 1);
        assert_eq!(cluster.bounds(), None);
        assert!(!cluster.is_in_bounds(&map.marker_position(a).unwrap()));
    }

    #[test]
    fn test_single_member_shows_member() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.update_cluster(&mut map, &options);

        let rep = cluster.representative().expect("representative created");
        assert_eq!(map.marker_position(rep), cluster.center());
        assert!(map.is_marker_attached(a));
        assert!(!map.is_marker_attached(rep));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);
        let b = marker_at(&mut map, 30.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, b);
        cluster.update_cluster(&mut map, &options);

        let rep = cluster.representative().unwrap();
        let attached = map.attached_markers();
        assert_eq!(attached, vec![rep]);

        for _ in 0..2 {
            let visibility = cluster.check_by_zoom_and_min_cluster_size(&mut map, &options);
            assert_eq!(visibility, Visibility::Aggregate);
            assert_eq!(map.attached_markers(), attached);
        }

        // Representative is created once
        cluster.update_cluster(&mut map, &options);
        assert_eq!(cluster.representative(), Some(rep));
        assert_eq!(map.marker_count(), 3);
    }

    #[test]
    fn test_zoom_override_shows_members() {
        let mut map = seoul_map();
        let options = Options::default().with_max_zoom(10.0);
        let a = marker_at(&mut map, 0.0, 0.0);
        let b = marker_at(&mut map, 30.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, b);
        cluster.update_cluster(&mut map, &options);

        assert_eq!(map.attached_markers(), vec![a, b]);
    }

    #[test]
    fn test_average_center_uses_pixel_mean() {
        let mut map = seoul_map();
        let options = Options::default().with_average_center(true);
        let a = marker_at(&mut map, -20.0, 0.0);
        let b = marker_at(&mut map, 20.0, 10.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, b);
        cluster.update_cluster(&mut map, &options);

        let rep = cluster.representative().unwrap();
        let o = map.offset_from_center(map.marker_position(rep).unwrap());
        assert!((o.x - 0.0).abs() < 1e-6);
        assert!((o.y - 5.0).abs() < 1e-6);
        assert_eq!(cluster.center(), map.marker_position(a));
    }

    #[test]
    fn test_update_icon_follows_count() {
        let mut map = seoul_map();
        let options = Options::default().with_icons(icons());
        let mut cluster = Cluster::new();

        for i in 0..10 {
            let m = marker_at(&mut map, i as f64, 0.0);
            cluster.add_marker(&map, &options, m);
        }
        cluster.update_cluster(&mut map, &options);

        let rep = cluster.representative().unwrap();
        assert_eq!(map.marker_icon(rep).map(String::as_str), Some("medium"));
    }

    #[test]
    fn test_update_icon_without_icons_keeps_marker_plain() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.update_cluster(&mut map, &options);
        assert_eq!(map.marker_icon(cluster.representative().unwrap()), None);
    }

    #[test]
    fn test_styling_receives_representative_and_count() {
        let mut map = seoul_map();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let options = Options::default().with_styling(move |map, rep, count| {
            map.set_marker_icon(rep, format!("count-{}", count));
            sink.borrow_mut().push((rep, count));
        });

        let a = marker_at(&mut map, 0.0, 0.0);
        let b = marker_at(&mut map, 10.0, 0.0);
        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, b);

        // No representative yet
        cluster.update_count(&mut map, &options);
        assert!(calls.borrow().is_empty());

        cluster.update_cluster(&mut map, &options);
        let rep = cluster.representative().unwrap();
        assert_eq!(*calls.borrow(), vec![(rep, 2)]);
        assert_eq!(map.marker_icon(rep).map(String::as_str), Some("count-2"));
    }

    #[test]
    fn test_click_zoom_toggle_is_idempotent() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.update_cluster(&mut map, &options);

        let listener = cluster.click_listener().expect("click zoom enabled by default");
        cluster.enable_click_zoom(&mut map);
        assert_eq!(cluster.click_listener(), Some(listener));
        assert_eq!(map.listener_count(), 1);

        cluster.disable_click_zoom(&mut map);
        cluster.disable_click_zoom(&mut map);
        assert_eq!(cluster.click_listener(), None);
        assert_eq!(map.listener_count(), 0);
    }

    #[test]
    fn test_click_zoom_disabled_by_option() {
        let mut map = seoul_map();
        let options = Options::default().with_disable_click_zoom(true);
        let a = marker_at(&mut map, 0.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.update_cluster(&mut map, &options);
        assert_eq!(cluster.click_listener(), None);
        assert_eq!(map.listener_count(), 0);
    }

    #[test]
    fn test_zoom_on_click_morphs_one_level_in() {
        let mut map = seoul_map();
        let cluster = Cluster::new();
        let target = map.coord_at(100.0, 100.0);

        cluster.zoom_on_click(&mut map, target);
        assert_eq!(map.zoom(), 11.0);
        assert_eq!(map.viewport().center, target);
    }

    #[test]
    fn test_destroy_is_terminal_and_idempotent() {
        let mut map = seoul_map();
        let options = Options::default();
        let a = marker_at(&mut map, 0.0, 0.0);
        let b = marker_at(&mut map, 30.0, 0.0);

        let mut cluster = Cluster::new();
        cluster.add_marker(&map, &options, a);
        cluster.add_marker(&map, &options, b);
        cluster.update_cluster(&mut map, &options);
        let rep = cluster.representative().unwrap();

        for _ in 0..2 {
            cluster.destroy(&mut map);
            assert!(cluster.members().is_empty());
            assert_eq!(cluster.representative(), None);
            assert_eq!(cluster.center(), None);
            assert_eq!(cluster.click_listener(), None);
        }

        assert!(map.is_marker_removed(rep));
        assert!(map.attached_markers().is_empty());
        assert_eq!(map.listener_count(), 0);
    }
}
