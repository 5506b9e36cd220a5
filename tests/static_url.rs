//! Static-map wire contract, exercised through the facade.

use omnimap::adapter::StaticMarkers;
use omnimap::{
    Backend, ConfigOverrides, GlobalMap, InitState, LatLng, MapRuntime, MemoryImageSurface,
    StaticImageAdapter, StaticMapOptions,
};

fn bound_url(runtime: &mut MapRuntime, name: &str, options: StaticMapOptions) -> String {
    bound_url_with(runtime, name, options, ConfigOverrides::new().with_lazyload(false))
}

fn bound_url_with(
    runtime: &mut MapRuntime,
    name: &str,
    options: StaticMapOptions,
    overrides: ConfigOverrides,
) -> String {
    let surface = MemoryImageSurface::new();
    let backend = Backend::Static(Box::new(StaticImageAdapter::new(
        Box::new(surface.clone()),
        options,
    )));
    let map = GlobalMap::create(runtime, name, backend, overrides, |r| r.unwrap()).unwrap();
    assert_eq!(map.borrow().state(), InitState::AdapterReady);
    let (selector, url) = surface.bound().expect("image bound at setup");
    assert_eq!(selector, "#map");
    url
}

#[test]
fn no_points_url_ends_with_center_and_zoom() {
    let mut runtime = MapRuntime::new();
    let url = bound_url(&mut runtime, "plain", StaticMapOptions::new());
    assert_eq!(
        url,
        "http://maps.googleapis.com/maps/api/staticmap?sensor=false&size=400x400&format=png\
         &maptype=roadmap&scale=1&center=37.4419,-122.1419&zoom=7"
    );
}

#[test]
fn facade_overrides_feed_the_center_and_zoom_fallbacks() {
    let mut runtime = MapRuntime::new();
    let url = bound_url_with(
        &mut runtime,
        "centered",
        StaticMapOptions::new(),
        ConfigOverrides::new()
            .with_lazyload(false)
            .with_zoom(11.0)
            .with_center(48.8566, 2.3522),
    );
    assert!(url.ends_with("&center=48.8566,2.3522&zoom=11"));
}

#[test]
fn single_point_keeps_zoom_in_the_tail() {
    let mut runtime = MapRuntime::new();
    let url = bound_url(
        &mut runtime,
        "single",
        StaticMapOptions::new()
            .with_markers(StaticMarkers::colored(vec![LatLng::new(40.7128, -74.006)])),
    );
    assert!(url.ends_with("&markers=color:blue|label:1|40.7128,-74.006&zoom=7"));
    assert!(!url.contains("center="));
}

#[test]
fn letter_labels_saturate_at_z() {
    let mut runtime = MapRuntime::new();
    let points: Vec<LatLng> = (0..28).map(|i| LatLng::new(10.0 + i as f64, 20.0)).collect();
    let url = bound_url(
        &mut runtime,
        "alphabet",
        StaticMapOptions::new()
            .with_char_labels()
            .with_markers(StaticMarkers::colored(points)),
    );
    assert!(url.contains("label:A|10,20"));
    assert!(url.contains("label:Y|34,20"));
    assert!(url.contains("label:Z|35,20"));
    // Points beyond the alphabet stay pinned at Z.
    assert!(url.contains("label:Z|36,20"));
    assert!(url.contains("label:Z|37,20"));
}

#[test]
fn numeric_labels_count_past_nine() {
    let mut runtime = MapRuntime::new();
    let points: Vec<LatLng> = (0..12).map(|i| LatLng::new(10.0 + i as f64, 20.0)).collect();
    let url = bound_url(
        &mut runtime,
        "numeric",
        StaticMapOptions::new().with_markers(StaticMarkers::colored(points)),
    );
    assert!(url.contains("label:1|10,20"));
    assert!(url.contains("label:12|21,20"));
    assert!(!url.contains("zoom="));
}

#[test]
fn marker_color_is_configurable() {
    let mut runtime = MapRuntime::new();
    let url = bound_url(
        &mut runtime,
        "colored",
        StaticMapOptions::new().with_markers(
            StaticMarkers::colored(vec![LatLng::new(40.0, -74.0), LatLng::new(41.0, -73.0)])
                .with_color("red"),
        ),
    );
    assert!(url.contains("&markers=color:red|label:1|40,-74"));
    assert!(url.contains("&markers=color:red|label:2|41,-73"));
}

#[test]
fn base_parameters_reflect_options() {
    let mut runtime = MapRuntime::new();
    let url = bound_url(
        &mut runtime,
        "sized",
        StaticMapOptions::new().with_size("640x480").with_client("gme-acme", "maps"),
    );
    assert!(url.contains("sensor=false&size=640x480&format=png&maptype=roadmap&scale=1"));
    assert!(url.contains("&client=gme-acme&channel=maps&center="));
}
