use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a packed sprite-sheet manifest.
///
/// The format follows the common packer output: a `meta` block naming the
/// backing image and its size, and a `frames` collection describing each
/// packed rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetManifest {
    pub meta: Meta,
    pub frames: FrameSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Location of the backing image, relative to the manifest.
    pub image: String,
    /// Full sheet size in pixels.
    pub size: SizeDef,
    /// Named frame ranges (Aseprite-style tags). Optional.
    #[serde(rename = "frameTags", default)]
    pub frame_tags: Vec<FrameTag>,
}

/// A named, inclusive range of catalog indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameTag {
    pub name: String,
    pub from: usize,
    pub to: usize,
}

/// The `frames` collection comes in two shapes depending on the packer
/// configuration: a plain array (array order is catalog order) or an object
/// keyed by filename. JSON objects carry no ordering through serde, so the
/// map form is cataloged by sorted key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameSet {
    Array(Vec<FrameDef>),
    Map(BTreeMap<String, FrameDef>),
}

impl FrameSet {
    /// Iterates frames in catalog order, paired with their name if one is
    /// present (the `filename` field in array form, the key in map form).
    pub fn entries(&self) -> Box<dyn Iterator<Item = (Option<String>, &FrameDef)> + '_> {
        match self {
            FrameSet::Array(frames) => {
                Box::new(frames.iter().map(|f| (f.filename.clone(), f)))
            }
            FrameSet::Map(frames) => {
                Box::new(frames.iter().map(|(k, f)| (Some(k.clone()), f)))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FrameSet::Array(frames) => frames.len(),
            FrameSet::Map(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One packed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDef {
    #[serde(default)]
    pub filename: Option<String>,
    /// The packed rectangle inside the sheet.
    pub frame: RectDef,
    /// Size of the sprite before the packer trimmed it.
    #[serde(rename = "sourceSize")]
    pub source_size: SizeDef,
    /// Where the trimmed content sat inside the untrimmed bounding box.
    #[serde(rename = "spriteSourceSize", default)]
    pub sprite_source_size: Option<PointDef>,
    #[serde(default)]
    pub trimmed: bool,
    /// Per-frame display duration in milliseconds (Aseprite exports this).
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeDef {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointDef {
    pub x: f32,
    pub y: f32,
}
