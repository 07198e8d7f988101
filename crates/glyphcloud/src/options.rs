//! Point-set description accepted by `RenderModel::update`.
//!
//! Mirrors the JSON configuration object:
//!
//! ```json
//! { "position": [[0,0,0],[1,2,3]], "color": [1,0,0], "size": [1, 2],
//!   "glyph": "★", "orthographic": true, "pickId": 3 }
//! ```

use crate::error::{GlyphCloudError, Result};
use crate::glyph::DEFAULT_GLYPH;
use serde::{Deserialize, Deserializer};

/// An attribute given either once for every point or once per point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Attribute<T> {
    PerPoint(Vec<T>),
    Uniform(T),
}

impl<T> Attribute<T> {
    /// Value for point `i`. Per-point sequences must have been length-checked.
    #[inline]
    pub fn get(&self, i: usize) -> &T {
        match self {
            Self::PerPoint(values) => &values[i],
            Self::Uniform(value) => value,
        }
    }

    /// Fails unless a per-point sequence has exactly `expected` entries.
    pub fn check_len(&self, attribute: &'static str, expected: usize) -> Result<()> {
        match self {
            Self::PerPoint(values) if values.len() != expected => {
                Err(GlyphCloudError::LengthMismatch {
                    attribute,
                    expected,
                    actual: values.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

macro_rules! attribute_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Attribute<$t> {
            fn from(value: $t) -> Self {
                Self::Uniform(value)
            }
        }

        impl From<Vec<$t>> for Attribute<$t> {
            fn from(values: Vec<$t>) -> Self {
                Self::PerPoint(values)
            }
        }
    )*};
}

attribute_from!([f32; 3], f32, String);

impl From<&str> for Attribute<String> {
    fn from(value: &str) -> Self {
        Self::Uniform(value.to_owned())
    }
}

/// Inputs of one `update` call. `orthographic` and `pick_id` are sticky:
/// when absent the model keeps its previous setting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCloudOptions {
    #[serde(default)]
    pub position: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    pub color: Option<Attribute<[f32; 3]>>,
    #[serde(default)]
    pub size: Option<Attribute<f32>>,
    #[serde(default)]
    pub glyph: Option<Attribute<String>>,
    #[serde(default)]
    pub orthographic: Option<bool>,
    #[serde(default, deserialize_with = "pick_layer")]
    pub pick_id: Option<u8>,
}

impl PointCloudOptions {
    pub fn new(position: Vec<[f32; 3]>) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<Attribute<[f32; 3]>>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<Attribute<f32>>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_glyph(mut self, glyph: impl Into<Attribute<String>>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    pub fn with_orthographic(mut self, orthographic: bool) -> Self {
        self.orthographic = Some(orthographic);
        self
    }

    pub fn with_pick_id(mut self, layer: u8) -> Self {
        self.pick_id = Some(layer);
        self
    }
}

fn pick_layer<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<u8>, D::Error> {
    match Option::<u64>::deserialize(de)? {
        None => Ok(None),
        Some(v) => u8::try_from(v)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(GlyphCloudError::InvalidPickLayer(v))),
    }
}

/// Dataset-wide fallbacks for attributes an update leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefaults {
    pub color: [f32; 3],
    pub size: f32,
    pub glyph: String,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0],
            size: 1.0,
            glyph: DEFAULT_GLYPH.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_options() {
        let json = r#"{
            "position": [[0,0,0],[1,2,3]],
            "color": [[1,0,0],[0,1,0]],
            "size": 2.5,
            "glyph": ["★", "■"],
            "orthographic": true,
            "pickId": 7
        }"#;
        let opts: PointCloudOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.position.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            opts.color,
            Some(Attribute::PerPoint(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]))
        );
        assert_eq!(opts.size, Some(Attribute::Uniform(2.5)));
        assert_eq!(
            opts.glyph,
            Some(Attribute::PerPoint(vec!["★".to_owned(), "■".to_owned()]))
        );
        assert_eq!(opts.orthographic, Some(true));
        assert_eq!(opts.pick_id, Some(7));
    }

    #[test]
    fn test_single_color_is_broadcast() {
        let opts: PointCloudOptions =
            serde_json::from_str(r#"{"position": [[0,0,0]], "color": [0.5, 0.5, 1]}"#).unwrap();
        assert_eq!(opts.color, Some(Attribute::Uniform([0.5, 0.5, 1.0])));
        assert_eq!(opts.pick_id, None);
        assert_eq!(opts.orthographic, None);
    }

    #[test]
    fn test_pick_id_out_of_range() {
        let err = serde_json::from_str::<PointCloudOptions>(r#"{"pickId": 256}"#).unwrap_err();
        assert!(err.to_string().contains("pick layer 256"), "{err}");
    }

    #[test]
    fn test_length_check() {
        let sizes = Attribute::PerPoint(vec![1.0, 2.0]);
        assert!(sizes.check_len("size", 2).is_ok());
        assert_eq!(
            sizes.check_len("size", 3),
            Err(GlyphCloudError::LengthMismatch { attribute: "size", expected: 3, actual: 2 })
        );
        assert!(Attribute::Uniform(1.0).check_len("size", 3).is_ok());
    }
}
