use hashbrown::HashMap;

use crate::color::normalize_hex;
use crate::data::{sort_by_time, Document, ImageHandle, Settings};
use crate::error::EditorError;
use crate::Result;

/// Supplies already-loaded images for layers, keyed by `imageUrl`.
pub trait ImageResolver {
    fn resolve(&self, image_url: &str) -> Option<ImageHandle>;
}

impl<S: std::hash::BuildHasher> ImageResolver for HashMap<String, ImageHandle, S> {
    fn resolve(&self, image_url: &str) -> Option<ImageHandle> {
        self.get(image_url).cloned()
    }
}

/// Resolver for hosts that attach images later (or never, e.g. headless tools).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _image_url: &str) -> Option<ImageHandle> {
        None
    }
}

/// Public API: serialize a document in the stored project shape.
///
/// Layer image handles are not part of the stored shape and are dropped.
pub fn to_project_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

/// Public API: parse a stored project into a `Document`.
///
/// Notes:
/// - Keyframe and background keyframe arrays are re-sorted by time.
/// - Negative or non-finite keyframe times are rejected.
/// - A non-positive workspace duration is reset to the default.
/// - Colors are normalized to lowercase `#rrggbb`; unparsable ones are kept as-is and
///   fall back at sampling time.
/// - Layer images are looked up through `images` by `imageUrl`.
pub fn parse_project_json(s: &str, images: &dyn ImageResolver) -> Result<Document> {
    let mut doc: Document = serde_json::from_str(s)?;

    if !(doc.settings.duration.is_finite() && doc.settings.duration > 0.0) {
        log::warn!(
            "stored duration {} is invalid, using default",
            doc.settings.duration
        );
        doc.settings.duration = Settings::default().duration;
    }
    doc.settings.background_color = normalize_or_keep(&doc.settings.background_color);

    for layer in &mut doc.layers {
        for k in &layer.keyframes {
            validate_time(k.time)?;
        }
        sort_by_time(&mut layer.keyframes);
        layer.image = images.resolve(&layer.image_url);
        if layer.image.is_none() {
            log::warn!(
                "no image resolved for layer {} ({})",
                layer.id,
                layer.image_url
            );
        }
    }

    for k in &mut doc.background_keyframes {
        validate_time(k.time)?;
        k.color = normalize_or_keep(&k.color);
    }
    sort_by_time(&mut doc.background_keyframes);

    log::debug!(
        "parsed project: {} layers, {} background keyframes",
        doc.layers.len(),
        doc.background_keyframes.len()
    );
    Ok(doc)
}

fn validate_time(time: f64) -> Result<()> {
    if time.is_finite() && time >= 0.0 {
        Ok(())
    } else {
        Err(EditorError::InvalidTime { time })
    }
}

fn normalize_or_keep(color: &str) -> String {
    normalize_hex(color).unwrap_or_else(|_| {
        log::warn!("stored color '{color}' is not #rrggbb");
        color.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_project_gets_defaults() {
        let json = r##"{
            "settings": {"width": 640, "height": 480, "fps": 24, "backgroundColor": "#FFFFFF", "duration": 0},
            "layers": [{
                "id": "layer_1", "name": "Ball", "imageUrl": "ball.png",
                "keyframes": [
                    {"time": 2000, "x": 10, "y": 0, "scaleX": 1, "scaleY": 1, "rotation": 0},
                    {"time": 0, "x": 0, "y": 0, "scaleX": 1, "scaleY": 1, "rotation": 0, "easing": "bogus"}
                ]
            }]
        }"##;
        let doc = parse_project_json(json, &NoImages).unwrap();
        assert_eq!(doc.settings.duration, 5000.0);
        assert_eq!(doc.settings.background_color, "#ffffff");
        assert!(doc.loop_enabled);
        assert!(!doc.smooth_playback);
        let layer = &doc.layers[0];
        assert!(layer.visible);
        assert_eq!(layer.opacity, 255);
        assert_eq!(layer.keyframes[0].time, 0.0);
        assert_eq!(layer.keyframes[1].time, 2000.0);
        assert!(doc.background_keyframes.is_empty());
    }

    #[test]
    fn negative_times_are_rejected() {
        let json = r##"{
            "settings": {"width": 1, "height": 1, "fps": 1, "backgroundColor": "#000000", "duration": 5000},
            "backgroundKeyframes": [{"time": -5, "color": "#000000"}]
        }"##;
        assert!(matches!(
            parse_project_json(json, &NoImages),
            Err(EditorError::InvalidTime { .. })
        ));
    }

    #[test]
    fn images_resolve_by_url() {
        let json = r##"{
            "settings": {"width": 1, "height": 1, "fps": 1, "backgroundColor": "#000000", "duration": 5000},
            "layers": [{"id": "a", "name": "A", "imageUrl": "a.png", "keyframes": []}]
        }"##;
        let handle = ImageHandle::new("pixels");
        let mut images: HashMap<String, ImageHandle> = HashMap::new();
        images.insert("a.png".to_string(), handle.clone());
        let doc = parse_project_json(json, &images).unwrap();
        assert!(doc.layers[0].image.as_ref().unwrap().ptr_eq(&handle));

        let text = to_project_json(&doc).unwrap();
        assert!(!text.contains("\"image\""));
        assert!(text.contains("\"imageUrl\":\"a.png\""));
    }
}
