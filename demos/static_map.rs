use omnimap::adapter::StaticMarkers;
use omnimap::{
    Backend, ConfigOverrides, GlobalMap, LatLng, MapRuntime, MemoryImageSurface,
    StaticImageAdapter, StaticMapOptions,
};

/// Builds static map URLs through the facade for a few configurations.
fn main() -> omnimap::Result<()> {
    env_logger::init();

    println!("🗺️ Omnimap Static Example");
    println!("=========================");

    let mut runtime = MapRuntime::new();

    let cases = [
        ("centered", StaticMapOptions::new()),
        (
            "numbered",
            StaticMapOptions::new().with_markers(StaticMarkers::colored(vec![
                LatLng::new(40.7128, -74.006),
                LatLng::new(40.7484, -73.9857),
                LatLng::new(40.7061, -73.9969),
            ])),
        ),
        (
            "lettered",
            StaticMapOptions::new()
                .with_char_labels()
                .with_markers(
                    StaticMarkers::colored(vec![
                        LatLng::new(51.5074, -0.1278),
                        LatLng::new(51.5194, -0.127),
                    ])
                    .with_color("green"),
                ),
        ),
    ];

    for (name, options) in cases {
        let surface = MemoryImageSurface::new();
        let backend = Backend::Static(Box::new(StaticImageAdapter::new(
            Box::new(surface.clone()),
            options,
        )));
        GlobalMap::create(
            &mut runtime,
            name,
            backend,
            ConfigOverrides::new().with_lazyload(false),
            |result| result.expect("static map setup"),
        )?;
        let (_, url) = surface.bound().expect("image bound");
        println!("✅ {name}:\n   {url}");
    }
    Ok(())
}
