//! The static image adapter.
//!
//! Stateless beyond configuration: setup computes a fully-qualified image
//! URL and binds it as the container's image source. There is no live event
//! model; markers are baked into the URL. The URL layout is a wire contract
//! other systems depend on and is reproduced exactly, including the clause
//! ordering rules.

use crate::adapter::{ImageSurface, SetupRequest, StaticMapAdapter};
use crate::core::constants::STATIC_MAP_BASE;
use crate::core::geo::LatLng;
use crate::Result;
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Escapes a URL component value. Structural separators stay literal; this
/// set mirrors what browsers leave unescaped in full URIs.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Marker set baked into a static map URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticMarkers {
    /// Label color for points without a custom icon.
    pub color: String,
    /// Custom icon URLs. One URL is reused for every point; several URLs
    /// apply by index, with the remainder falling back to colored markers.
    pub icon_urls: Vec<String>,
    pub points: Vec<LatLng>,
}

impl Default for StaticMarkers {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            icon_urls: Vec::new(),
            points: Vec::new(),
        }
    }
}

impl StaticMarkers {
    pub fn colored(points: Vec<LatLng>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icon_urls(mut self, icon_urls: Vec<String>) -> Self {
        self.icon_urls = icon_urls;
        self
    }
}

/// Static map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticMapOptions {
    pub markers: Option<StaticMarkers>,
    pub size: String,
    pub scale: String,
    pub format: String,
    pub maptype: String,
    /// Falls back to the facade-supplied zoom when absent.
    pub zoom: Option<f64>,
    /// Falls back to the facade-supplied center when absent.
    pub center: Option<LatLng>,
    pub client_id: Option<String>,
    pub channel: Option<String>,
    /// Label points `A`, `B`, ... instead of `1`, `2`, ...
    pub use_char: bool,
    /// Disabling drops the `label:` segment entirely.
    pub use_label: bool,
}

impl Default for StaticMapOptions {
    fn default() -> Self {
        Self {
            markers: None,
            size: "400x400".to_string(),
            scale: "1".to_string(),
            format: "png".to_string(),
            maptype: "roadmap".to_string(),
            zoom: None,
            center: None,
            client_id: None,
            channel: None,
            use_char: false,
            use_label: true,
        }
    }
}

impl StaticMapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markers(mut self, markers: StaticMarkers) -> Self {
        self.markers = Some(markers);
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>, channel: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.channel = Some(channel.into());
        self
    }

    pub fn with_char_labels(mut self) -> Self {
        self.use_char = true;
        self
    }

    pub fn without_labels(mut self) -> Self {
        self.use_label = false;
        self
    }

    /// Assembles the image URL. Base query parameters are always present;
    /// marker points replace the center/zoom tail except in the single-point
    /// form, which keeps its zoom.
    pub fn build_url(&self, fallback_zoom: f64, fallback_center: LatLng) -> String {
        let zoom = self.zoom.unwrap_or(fallback_zoom);
        let center = self.center.unwrap_or(fallback_center);

        let mut url = format!(
            "{STATIC_MAP_BASE}?sensor=false&size={}&format={}&maptype={}&scale={}",
            encode(&self.size),
            encode(&self.format),
            encode(&self.maptype),
            encode(&self.scale),
        );
        if let Some(client) = &self.client_id {
            url.push_str(&format!("&client={}", encode(client)));
        }
        if let Some(channel) = &self.channel {
            url.push_str(&format!("&channel={}", encode(channel)));
        }

        let markers = match &self.markers {
            Some(markers) if !markers.points.is_empty() => markers,
            _ => {
                url.push_str(&format!("&center={},{}&zoom={zoom}", center.lat, center.lng));
                return url;
            }
        };

        let mut label = LabelSequence::new(self.use_char);
        for (i, point) in markers.points.iter().enumerate() {
            let icon = match markers.icon_urls.len() {
                0 => None,
                1 => markers.icon_urls.first(),
                _ => markers.icon_urls.get(i),
            };
            match icon {
                Some(icon_url) => url.push_str(&format!(
                    "&markers=icon:{}|{},{}",
                    encode(icon_url),
                    point.lat,
                    point.lng
                )),
                None => {
                    let label_clause = if self.use_label {
                        format!("label:{}|", label.current())
                    } else {
                        String::new()
                    };
                    url.push_str(&format!(
                        "&markers=color:{}|{label_clause}{},{}",
                        encode(&markers.color),
                        point.lat,
                        point.lng
                    ));
                }
            }
            // The sequence advances once per point regardless of form.
            label.advance();
        }
        if markers.points.len() == 1 {
            url.push_str(&format!("&zoom={zoom}"));
        }
        url
    }
}

/// Sequential marker labels: numeric from 1, or uppercase letters from `A`.
enum LabelSequence {
    Numeric(u32),
    Alpha(char),
}

impl LabelSequence {
    fn new(use_char: bool) -> Self {
        if use_char {
            Self::Alpha('A')
        } else {
            Self::Numeric(1)
        }
    }

    fn current(&self) -> String {
        match self {
            Self::Numeric(n) => n.to_string(),
            Self::Alpha(c) => c.to_string(),
        }
    }

    fn advance(&mut self) {
        match self {
            Self::Numeric(n) => *n += 1,
            Self::Alpha(c) => *c = increment_letter(*c),
        }
    }
}

/// Letter labels saturate at `Z`; no wraparound.
fn increment_letter(letter: char) -> char {
    match letter {
        'A'..='Y' => (letter as u8 + 1) as char,
        _ => letter,
    }
}

/// Static map backend: binds the computed URL to an image surface.
pub struct StaticImageAdapter {
    surface: Box<dyn ImageSurface>,
    options: StaticMapOptions,
    bound_url: Option<String>,
}

impl StaticImageAdapter {
    pub fn new(surface: Box<dyn ImageSurface>, options: StaticMapOptions) -> Self {
        Self {
            surface,
            options,
            bound_url: None,
        }
    }

    pub fn options(&self) -> &StaticMapOptions {
        &self.options
    }

    /// The URL bound at setup, if setup has run.
    pub fn bound_url(&self) -> Option<&str> {
        self.bound_url.as_deref()
    }
}

impl StaticMapAdapter for StaticImageAdapter {
    fn setup(&mut self, request: &SetupRequest) -> Result<()> {
        let url = self.options.build_url(request.zoom, request.center);
        debug!("binding static map image to {}", request.container_selector);
        self.surface.bind_image(&request.container_selector, &url)?;
        self.bound_url = Some(url);
        Ok(())
    }

    fn render_controls(&mut self) -> Result<()> {
        // Static images carry no controls.
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str =
        "http://maps.googleapis.com/maps/api/staticmap?sensor=false&size=400x400&format=png&maptype=roadmap&scale=1";

    fn fallback_center() -> LatLng {
        LatLng::new(37.4419, -122.1419)
    }

    #[test]
    fn test_no_points_ends_with_center_and_zoom() {
        let url = StaticMapOptions::new().build_url(7.0, fallback_center());
        assert_eq!(url, format!("{BASE}&center=37.4419,-122.1419&zoom=7"));
        assert!(!url.contains("markers="));
    }

    #[test]
    fn test_single_point_numeric_label_keeps_zoom() {
        let url = StaticMapOptions::new()
            .with_markers(StaticMarkers::colored(vec![LatLng::new(40.7128, -74.006)]))
            .build_url(7.0, fallback_center());
        assert_eq!(
            url,
            format!("{BASE}&markers=color:blue|label:1|40.7128,-74.006&zoom=7")
        );
    }

    #[test]
    fn test_single_point_char_label() {
        let url = StaticMapOptions::new()
            .with_char_labels()
            .with_markers(StaticMarkers::colored(vec![LatLng::new(40.7128, -74.006)]))
            .build_url(5.0, fallback_center());
        assert!(url.ends_with("&markers=color:blue|label:A|40.7128,-74.006&zoom=5"));
    }

    #[test]
    fn test_multiple_points_omit_zoom_and_center() {
        let url = StaticMapOptions::new()
            .with_markers(StaticMarkers::colored(vec![
                LatLng::new(40.0, -74.0),
                LatLng::new(41.0, -73.0),
            ]))
            .build_url(7.0, fallback_center());
        assert!(url.contains("&markers=color:blue|label:1|40,-74"));
        assert!(url.contains("&markers=color:blue|label:2|41,-73"));
        assert!(!url.contains("zoom="));
        assert!(!url.contains("center="));
    }

    #[test]
    fn test_labels_disabled_drops_label_segment() {
        let url = StaticMapOptions::new()
            .without_labels()
            .with_markers(StaticMarkers::colored(vec![
                LatLng::new(40.0, -74.0),
                LatLng::new(41.0, -73.0),
            ]))
            .build_url(7.0, fallback_center());
        assert!(url.contains("&markers=color:blue|40,-74"));
        assert!(url.contains("&markers=color:blue|41,-73"));
        assert!(!url.contains("label:"));
    }

    #[test]
    fn test_single_icon_reused_for_every_point() {
        let url = StaticMapOptions::new()
            .with_markers(
                StaticMarkers::colored(vec![LatLng::new(40.0, -74.0), LatLng::new(41.0, -73.0)])
                    .with_icon_urls(vec!["http://icons/pin.png".to_string()]),
            )
            .build_url(7.0, fallback_center());
        assert!(url.contains("&markers=icon:http://icons/pin.png|40,-74"));
        assert!(url.contains("&markers=icon:http://icons/pin.png|41,-73"));
        assert!(!url.contains("color:"));
    }

    #[test]
    fn test_indexed_icons_fall_back_to_colored() {
        let url = StaticMapOptions::new()
            .with_markers(
                StaticMarkers::colored(vec![
                    LatLng::new(40.0, -74.0),
                    LatLng::new(41.0, -73.0),
                    LatLng::new(42.0, -72.0),
                ])
                .with_icon_urls(vec![
                    "http://icons/a.png".to_string(),
                    "http://icons/b.png".to_string(),
                ]),
            )
            .build_url(7.0, fallback_center());
        assert!(url.contains("&markers=icon:http://icons/a.png|40,-74"));
        assert!(url.contains("&markers=icon:http://icons/b.png|41,-73"));
        // The label sequence advanced through the icon points too.
        assert!(url.contains("&markers=color:blue|label:3|42,-72"));
    }

    #[test]
    fn test_client_and_channel_precede_markers() {
        let url = StaticMapOptions::new()
            .with_client("gme-acme", "storefinder")
            .with_markers(StaticMarkers::colored(vec![LatLng::new(40.0, -74.0)]))
            .build_url(7.0, fallback_center());
        assert!(url.contains("&scale=1&client=gme-acme&channel=storefinder&markers="));
    }

    #[test]
    fn test_icon_url_components_are_escaped() {
        let url = StaticMapOptions::new()
            .with_markers(
                StaticMarkers::colored(vec![LatLng::new(40.0, -74.0)])
                    .with_icon_urls(vec!["http://icons/my pin.png".to_string()]),
            )
            .build_url(7.0, fallback_center());
        assert!(url.contains("markers=icon:http://icons/my%20pin.png|40,-74"));
    }

    #[test]
    fn test_letter_sequence_saturates_at_z() {
        assert_eq!(increment_letter('A'), 'B');
        assert_eq!(increment_letter('Y'), 'Z');
        assert_eq!(increment_letter('Z'), 'Z');
    }

    #[test]
    fn test_configured_zoom_and_center_win_over_fallbacks() {
        let url = StaticMapOptions::new()
            .with_zoom(12.0)
            .with_center(LatLng::new(51.5074, -0.1278))
            .build_url(7.0, fallback_center());
        assert!(url.ends_with("&center=51.5074,-0.1278&zoom=12"));
    }
}
