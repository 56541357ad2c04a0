//! The frame catalog and named animation scripts.
//!
//! A [`SpriteSheet`] is resolved once from loaded manifest data and then
//! only read: the player looks scripts up by name and walks their resolved
//! frame sequences. Scripts are reference-counted so a playhead can hold
//! one without copying.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use flipbook_data::model::{FrameTag, SheetManifest};

use crate::errors::PlaybackError;
use crate::types::{Rect, Size};

/// One catalog entry: a packed rectangle plus the data needed to place it.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    /// Unique, in catalog order.
    pub index: usize,
    pub name: Option<String>,
    /// The packed rectangle inside the sheet.
    pub rect: Rect,
    /// Size of the sprite before trimming.
    pub source_size: Size,
    /// Offset of the trimmed content inside the untrimmed box.
    pub trim_origin: Option<Vec2>,
    pub trimmed: bool,
    /// Per-frame display delay override in milliseconds.
    pub delay: Option<f64>,
}

/// The script authoring format: one entry per step, identified by catalog
/// index or name, with optional per-entry overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Catalog index to match.
    #[serde(default)]
    pub frame: Option<usize>,
    /// Catalog name to match.
    #[serde(default)]
    pub name: Option<String>,
    /// Delay in milliseconds that must elapse before this entry is shown.
    #[serde(default)]
    pub delay: Option<f64>,
    /// Destination position override, applied after fit and trim.
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

impl ScriptEntry {
    pub fn index(i: usize) -> Self {
        Self {
            frame: Some(i),
            ..Self::default()
        }
    }

    fn offset(&self) -> Option<Vec2> {
        match (self.x, self.y) {
            (None, None) => None,
            (x, y) => Some(Vec2::new(x.unwrap_or(0.0), y.unwrap_or(0.0))),
        }
    }
}

/// A resolved script step: the matched catalog frame (if any) plus the
/// entry's own overrides. `sprite` stays `None` for an entry that matched
/// no catalog frame — the entry is kept, and drawing it is a logged no-op.
#[derive(Debug, Clone)]
pub struct ScriptFrame {
    pub sprite: Option<SpriteFrame>,
    pub delay: Option<f64>,
    pub offset: Option<Vec2>,
}

/// A named, ordered sequence of resolved frames.
#[derive(Debug, Clone)]
pub struct AnimationScript {
    pub name: String,
    pub frames: Vec<ScriptFrame>,
}

impl AnimationScript {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Script name every sheet ends up with: the full catalog in index order.
pub const ALL_SCRIPT: &str = "all";

/// The frame catalog and script registry for one loaded sheet.
pub struct SpriteSheet {
    frames: Vec<SpriteFrame>,
    scripts: HashMap<String, Arc<AnimationScript>>,
    tags: Vec<FrameTag>,
}

impl SpriteSheet {
    /// Builds the catalog from manifest data. Array-form frames keep their
    /// array position as `index`; map-form frames are cataloged by sorted
    /// key. Call [`SpriteSheet::auto_script`] afterwards to register the
    /// metadata animations and the `"all"` default.
    pub fn from_manifest(manifest: &SheetManifest) -> Self {
        let frames = manifest
            .frames
            .entries()
            .enumerate()
            .map(|(index, (name, def))| SpriteFrame {
                index,
                name,
                rect: Rect::new(def.frame.x, def.frame.y, def.frame.w, def.frame.h),
                source_size: Size::new(def.source_size.w, def.source_size.h),
                trim_origin: def.sprite_source_size.map(|p| Vec2::new(p.x, p.y)),
                trimmed: def.trimmed,
                delay: def.duration,
            })
            .collect();
        Self {
            frames,
            scripts: HashMap::new(),
            tags: manifest.meta.frame_tags.clone(),
        }
    }

    /// An empty sheet, useful for tests and for hand-built catalogs.
    pub fn from_frames(frames: Vec<SpriteFrame>) -> Self {
        Self {
            frames,
            scripts: HashMap::new(),
            tags: Vec::new(),
        }
    }

    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    pub fn script(&self, name: &str) -> Option<Arc<AnimationScript>> {
        self.scripts.get(name).cloned()
    }

    /// Resolves `entries` against the catalog and stores the result under
    /// `name`, replacing any script previously stored there.
    ///
    /// Each entry matches the first catalog frame equal by index or by
    /// name; the entry's own delay/position fields overlay the resolved
    /// frame. An entry matching nothing is logged and kept with its
    /// geometry absent — a documented caller-input contract, not
    /// auto-repaired.
    pub fn add_script(&mut self, name: &str, entries: &[ScriptEntry]) {
        let script = self.build_script(name, entries);
        self.scripts.insert(name.to_string(), Arc::new(script));
    }

    /// Resolves `entries` without registering the result; the inline-script
    /// form of `play` goes through here.
    pub fn build_script(&self, name: &str, entries: &[ScriptEntry]) -> AnimationScript {
        let frames = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| {
                let matched = self.frames.iter().find(|f| {
                    entry.frame == Some(f.index)
                        || (entry.name.is_some() && entry.name == f.name)
                });
                if matched.is_none() {
                    let err = PlaybackError::FrameNotFound {
                        script: name.to_string(),
                        entry: pos,
                    };
                    warn!("{err}");
                }
                ScriptFrame {
                    delay: entry.delay.or(matched.and_then(|f| f.delay)),
                    offset: entry.offset(),
                    sprite: matched.cloned(),
                }
            })
            .collect();
        AnimationScript {
            name: name.to_string(),
            frames,
        }
    }

    /// Registers one script per named animation in the loaded metadata,
    /// then `"all"` — the full catalog in index order — unconditionally
    /// overwriting any user-declared script of that name.
    pub fn auto_script(&mut self) {
        for tag in self.tags.clone() {
            let entries: Vec<ScriptEntry> =
                (tag.from..=tag.to).map(ScriptEntry::index).collect();
            self.add_script(&tag.name, &entries);
        }
        let everything: Vec<ScriptEntry> =
            (0..self.frames.len()).map(ScriptEntry::index).collect();
        self.add_script(ALL_SCRIPT, &everything);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpriteSheet {
        let frames = (0..6)
            .map(|i| SpriteFrame {
                index: i,
                name: Some(format!("f{i}")),
                rect: Rect::new(i as f32 * 16.0, 0.0, 16.0, 16.0),
                source_size: Size::new(16.0, 16.0),
                trim_origin: None,
                trimmed: false,
                delay: if i == 3 { Some(80.0) } else { None },
            })
            .collect();
        SpriteSheet::from_frames(frames)
    }

    #[test]
    fn test_add_script_resolves_by_index_and_name() {
        let mut sheet = catalog();
        sheet.add_script(
            "walk",
            &[
                ScriptEntry::index(2),
                ScriptEntry {
                    name: Some("f5".into()),
                    ..ScriptEntry::default()
                },
            ],
        );
        let script = sheet.script("walk").unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.frames[0].sprite.as_ref().unwrap().index, 2);
        assert_eq!(script.frames[1].sprite.as_ref().unwrap().index, 5);
    }

    #[test]
    fn test_entry_delay_overlays_frame_delay() {
        let mut sheet = catalog();
        sheet.add_script(
            "d",
            &[
                // Catalog frame 3 carries its own 80ms delay.
                ScriptEntry::index(3),
                ScriptEntry {
                    frame: Some(3),
                    delay: Some(100.0),
                    ..ScriptEntry::default()
                },
            ],
        );
        let script = sheet.script("d").unwrap();
        assert_eq!(script.frames[0].delay, Some(80.0));
        assert_eq!(script.frames[1].delay, Some(100.0));
    }

    #[test]
    fn test_unmatched_entry_is_kept_without_geometry() {
        let mut sheet = catalog();
        sheet.add_script("broken", &[ScriptEntry::index(0), ScriptEntry::index(99)]);
        let script = sheet.script("broken").unwrap();
        assert_eq!(script.len(), 2);
        assert!(script.frames[0].sprite.is_some());
        assert!(script.frames[1].sprite.is_none());
    }

    #[test]
    fn test_position_override_becomes_offset() {
        let mut sheet = catalog();
        sheet.add_script(
            "pos",
            &[ScriptEntry {
                frame: Some(1),
                x: Some(4.0),
                ..ScriptEntry::default()
            }],
        );
        let script = sheet.script("pos").unwrap();
        assert_eq!(script.frames[0].offset, Some(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn test_auto_script_builds_all_in_index_order() {
        let mut sheet = catalog();
        sheet.auto_script();
        let all = sheet.script(ALL_SCRIPT).unwrap();
        assert_eq!(all.len(), 6);
        for (pos, sf) in all.frames.iter().enumerate() {
            assert_eq!(sf.sprite.as_ref().unwrap().index, pos);
        }
    }

    #[test]
    fn test_auto_script_overwrites_user_declared_all() {
        let mut sheet = catalog();
        sheet.add_script(ALL_SCRIPT, &[ScriptEntry::index(2)]);
        sheet.auto_script();
        assert_eq!(sheet.script(ALL_SCRIPT).unwrap().len(), 6);
    }

    #[test]
    fn test_auto_script_registers_metadata_tags() {
        let mut sheet = catalog();
        sheet.tags = vec![FrameTag {
            name: "blink".into(),
            from: 1,
            to: 3,
        }];
        sheet.auto_script();
        let blink = sheet.script("blink").unwrap();
        assert_eq!(blink.len(), 3);
        assert_eq!(blink.frames[0].sprite.as_ref().unwrap().index, 1);
        // Frame 3's own delay rides along into the tag script.
        assert_eq!(blink.frames[2].delay, Some(80.0));
    }
}
