use omnimap::adapter::{IconConfig, IconImage, MarkerConfig};
use omnimap::events::names;
use omnimap::{
    Backend, CanvasMapAdapter, ConfigOverrides, GlobalMap, LatLng, MapRuntime, MemoryCanvas,
    MemoryScriptLoader, NativeEvent,
};
use std::rc::Rc;

/// Walks the interactive facade end to end against the in-memory canvas:
/// lazy script loading, marker collections, click/hover semantics, best fit.
fn main() -> omnimap::Result<()> {
    env_logger::init();

    println!("🗺️ Omnimap Interactive Example");
    println!("==============================");

    let mut runtime = MapRuntime::new();
    let canvas = MemoryCanvas::new();
    let loader = MemoryScriptLoader::new();
    let adapter = CanvasMapAdapter::new(Box::new(canvas.clone()), Box::new(loader.clone()));

    let map = GlobalMap::create(
        &mut runtime,
        "demo",
        Backend::Dynamic(Box::new(adapter)),
        ConfigOverrides::new()
            .with_key("demo-api-key")
            .with_center(37.7749, -122.4194)
            .with_zoom(12.0),
        |result| {
            result.expect("map initialization");
            println!("✅ Map is ready");
        },
    )?;

    println!(
        "   Script requested: {}",
        loader.injected().first().map(String::as_str).unwrap_or("-")
    );
    // The host signals when the provider SDK becomes usable.
    runtime.script_load_complete()?;

    map.borrow_mut().add_map_listener(
        names::MAP_CLICK,
        Rc::new(|payload| {
            if let Some(at) = payload.position {
                println!("   🖱 map clicked at {:.4}, {:.4}", at.lat, at.lng);
            }
        }),
    )?;

    let pin = IconConfig::new(IconImage::new("http://icons/pin.png", 25, 41))
        .with_selected(IconImage::new("http://icons/pin-selected.png", 25, 41));
    let marker = map.borrow_mut().add_marker(
        MarkerConfig::at(37.7749, -122.4194)
            .with_title("San Francisco")
            .with_content("<p>The city by the bay</p>")
            .with_icon(pin),
    )?;
    println!("✅ Added marker {marker}");

    let hotels = map.borrow_mut().add_marker_collection(
        vec![
            MarkerConfig::at(37.7849, -122.4094).with_title("Hotel North"),
            MarkerConfig::at(37.7649, -122.4294).with_title("Hotel South"),
        ],
        "hotels",
    )?;
    println!("✅ Loaded {} hotels", hotels.len());

    map.borrow_mut()
        .dispatch_native(NativeEvent::MapClick {
            position: LatLng::new(37.78, -122.41),
        })?;
    map.borrow_mut()
        .dispatch_native(NativeEvent::MarkerClick { marker })?;
    println!("   info window open: {:?}", canvas.current_window(omnimap::WindowKind::Info));

    map.borrow_mut().best_fit()?;
    let center = map.borrow().get_center()?;
    println!("   best fit centered the map at {:.4}, {:.4}", center.lat, center.lng);

    map.borrow_mut().remove_marker_collection("hotels")?;
    println!("✅ Removed the hotel collection");
    println!("\n{} canvas operations recorded", canvas.calls().len());
    Ok(())
}
