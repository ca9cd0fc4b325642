//! Working-set state: loaded images, selection, and watermark settings.
//!
//! A [`Session`] owns the ordered list of decoded images, the selection
//! set used for batch operations, the current/preview index, the preview
//! zoom level, and the single [`WatermarkSettings`] value that applies
//! to every image.
//!
//! All mutation flows through [`Session::apply`] with an explicit
//! [`Intent`], so user actions are decoupled from the pure render
//! pipeline and the state invariants live in exactly one place:
//!
//! - the current index is `None` or a valid index into the image list;
//! - deleting an image renumbers all selection entries above it and
//!   fixes the current index;
//! - selecting an image makes it the sole selection; toggling adds or
//!   removes it without disturbing the rest.

use std::collections::BTreeSet;

use image::RgbaImage;

use crate::constants::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::settings::{Position, WatermarkSettings};

/// An immutable decoded raster plus its cached thumbnail and the
/// original file metadata.
pub struct SourceImage {
    /// Original file name (no directory components)
    pub name: String,
    /// Original file size in bytes
    pub byte_size: u64,
    /// Full-resolution decoded raster
    pub image: RgbaImage,
    /// Cached thumbnail, max edge 100 px, aspect preserving
    pub thumbnail: RgbaImage,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("name", &self.name)
            .field("byte_size", &self.byte_size)
            .field("dimensions", &(self.image.width(), self.image.height()))
            .finish()
    }
}

/// A single field update for the shared watermark settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingUpdate {
    Text(String),
    Position(Position),
    SpacingX(u32),
    SpacingY(u32),
    FontFamily(String),
    FontSize(u32),
    FontColor(String),
    Opacity(u8),
    Rotation(f32),
}

/// A discrete user action against the session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Make this image the current preview and the sole selection
    Select(usize),
    /// Add or remove this image from the multi-selection
    ToggleSelect(usize),
    /// Remove this image from the working set
    Delete(usize),
    /// Change one watermark setting
    Update(SettingUpdate),
    /// Restore the default watermark settings
    ResetSettings,
    /// Step the preview zoom up
    ZoomIn,
    /// Step the preview zoom down
    ZoomOut,
}

/// The mutable working set. See the module docs for invariants.
pub struct Session {
    images: Vec<SourceImage>,
    selection: BTreeSet<usize>,
    current: Option<usize>,
    zoom: u32,
    settings: WatermarkSettings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(WatermarkSettings::default())
    }
}

impl Session {
    pub fn new(settings: WatermarkSettings) -> Self {
        Self {
            images: Vec::new(),
            selection: BTreeSet::new(),
            current: None,
            zoom: 100,
            settings,
        }
    }

    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&SourceImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn settings(&self) -> &WatermarkSettings {
        &self.settings
    }

    /// Append newly ingested images, preserving their order. If nothing
    /// was current before, the first image becomes current and selected.
    pub fn extend(&mut self, images: Vec<SourceImage>) {
        self.images.extend(images);
        if self.current.is_none() && !self.images.is_empty() {
            self.apply(Intent::Select(0));
        }
    }

    /// The indices a batch export operates on: the selection if any,
    /// otherwise every loaded image, in ascending order.
    pub fn export_indices(&self) -> Vec<usize> {
        if self.selection.is_empty() {
            (0..self.images.len()).collect()
        } else {
            self.selection.iter().copied().collect()
        }
    }

    /// Apply one user intent. Intents referring to out-of-range indices
    /// are ignored.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Select(index) => self.select(index),
            Intent::ToggleSelect(index) => self.toggle_select(index),
            Intent::Delete(index) => self.delete(index),
            Intent::Update(update) => self.update_setting(update),
            Intent::ResetSettings => self.settings = WatermarkSettings::default(),
            Intent::ZoomIn => {
                if self.zoom < ZOOM_MAX {
                    self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
                }
            }
            Intent::ZoomOut => {
                if self.zoom > ZOOM_MIN {
                    self.zoom = self.zoom.saturating_sub(ZOOM_STEP).max(ZOOM_MIN);
                }
            }
        }
    }

    fn select(&mut self, index: usize) {
        if index >= self.images.len() {
            return;
        }
        if self.current != Some(index) {
            self.current = Some(index);
            self.selection.clear();
            self.selection.insert(index);
        }
    }

    fn toggle_select(&mut self, index: usize) {
        if index >= self.images.len() {
            return;
        }
        if self.selection.contains(&index) {
            self.selection.remove(&index);
            if self.current == Some(index) {
                // Preview moves to the first remaining selected image
                self.current = self.selection.iter().next().copied();
            }
        } else {
            self.selection.insert(index);
            if self.current.is_none() {
                self.current = Some(index);
            }
        }
    }

    fn delete(&mut self, index: usize) {
        if index >= self.images.len() {
            return;
        }
        self.images.remove(index);

        // Renumber the selection: entries below the deleted index are
        // kept, entries above shift down by one, the entry itself goes.
        self.selection = self
            .selection
            .iter()
            .filter_map(|&i| match i.cmp(&index) {
                std::cmp::Ordering::Less => Some(i),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(i - 1),
            })
            .collect();

        match self.current {
            Some(c) if c == index => {
                self.current = if self.images.is_empty() { None } else { Some(0) };
            }
            Some(c) if c > index => self.current = Some(c - 1),
            _ => {}
        }
    }

    fn update_setting(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::Text(v) => self.settings.text = v,
            SettingUpdate::Position(v) => self.settings.position = v,
            SettingUpdate::SpacingX(v) => self.settings.spacing_x = v,
            SettingUpdate::SpacingY(v) => self.settings.spacing_y = v,
            SettingUpdate::FontFamily(v) => self.settings.font_family = v,
            SettingUpdate::FontSize(v) => self.settings.font_size = v,
            SettingUpdate::FontColor(v) => self.settings.font_color = v,
            SettingUpdate::Opacity(v) => self.settings.opacity = v,
            SettingUpdate::Rotation(v) => self.settings.rotation = v,
        }
    }
}

/// Format a byte count for display: 1024 base, two decimals with
/// trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const SIZES: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZES.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZES[exponent])
}
