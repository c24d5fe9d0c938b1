//! Sprite sheet manifest and texture cache.
//!
//! The manifest is a small TOML file naming the image behind each sheet:
//!
//! ```toml
//! version = 1
//!
//! [sheets]
//! terrain = "terrain.png"
//! units = "units.png"
//! ```
//!
//! Paths are resolved relative to the manifest. Sheets are loaded one at a
//! time so the adapter can report each completion separately.

use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};
use warboard_rendering::{ScreenRect, SourceRect, SpriteSheet};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    sheets: HashMap<String, String>,
}

/// Parsed sheet manifest listing one image per sprite sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetManifest {
    entries: Vec<(SpriteSheet, PathBuf)>,
}

impl SheetManifest {
    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("assets/sheets.toml")
    }

    /// Reads and validates the manifest at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sheet manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Parses manifest `contents`, resolving image paths against `base_path`.
    pub fn parse(contents: &str, base_path: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse sheet manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported sheet manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut resolved = HashMap::new();
        for (name, relative_path) in manifest.sheets {
            let sheet = parse_sheet_name(&name)?;
            let _ = resolved.insert(sheet, base_path.join(relative_path));
        }

        let mut entries = Vec::with_capacity(SpriteSheet::ALL.len());
        for sheet in SpriteSheet::ALL {
            let Some(path) = resolved.remove(&sheet) else {
                bail!("sheet manifest missing entry for `{}`", sheet.name());
            };
            entries.push((sheet, path));
        }

        Ok(Self { entries })
    }

    /// Sheets and their image paths in load order.
    #[must_use]
    pub fn entries(&self) -> &[(SpriteSheet, PathBuf)] {
        &self.entries
    }
}

fn parse_sheet_name(name: &str) -> Result<SpriteSheet> {
    SpriteSheet::ALL
        .into_iter()
        .find(|sheet| sheet.name() == name)
        .with_context(|| format!("unknown sheet `{name}` in manifest"))
}

/// Loads one sheet image from disk with pixel-exact filtering.
pub fn load_sheet_image(_sheet: SpriteSheet, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sheet image at {}", path.display()))?;
    let texture = Texture2D::from_file_with_format(&bytes, None);
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

/// Textures of the sheets loaded so far.
#[derive(Debug, Default)]
pub struct SheetTextures {
    textures: HashMap<SpriteSheet, Texture2D>,
}

impl SheetTextures {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the texture of `sheet`, rejecting a second texture for the same sheet.
    pub fn insert(&mut self, sheet: SpriteSheet, texture: Texture2D) -> Result<()> {
        if self.textures.insert(sheet, texture).is_some() {
            bail!("sheet `{}` loaded twice", sheet.name());
        }
        Ok(())
    }

    /// Texture of `sheet`, once loaded.
    #[must_use]
    pub fn get(&self, sheet: SpriteSheet) -> Option<Texture2D> {
        self.textures.get(&sheet).copied()
    }

    /// Number of loaded sheets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no sheet has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Draws `source` of `sheet` into `dest`, scaled by `scale` and shifted by `offset`.
    ///
    /// Returns `false` when the sheet has not been loaded.
    pub fn draw_region(
        &self,
        sheet: SpriteSheet,
        source: SourceRect,
        dest: ScreenRect,
        scale: f32,
        offset: glam::Vec2,
    ) -> bool {
        let Some(texture) = self.get(sheet) else {
            return false;
        };
        let origin = offset + dest.origin * scale;
        let size = dest.size * scale;
        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
            source: Some(Rect::new(
                source.x as f32,
                source.y as f32,
                source.width as f32,
                source.height as f32,
            )),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(
            texture,
            origin.x,
            origin.y,
            macroquad::color::WHITE,
            params,
        );
        true
    }
}

/// Loads manifest sheets one call at a time.
pub struct SheetLoader<L> {
    pending: VecDeque<(SpriteSheet, PathBuf)>,
    loader: L,
}

impl<L> SheetLoader<L>
where
    L: FnMut(SpriteSheet, &Path) -> Result<Texture2D>,
{
    /// Queues every sheet of `manifest` for loading with `loader`.
    pub fn new(manifest: &SheetManifest, loader: L) -> Self {
        Self {
            pending: manifest.entries().iter().cloned().collect(),
            loader,
        }
    }

    /// Whether every sheet has been loaded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Loads the next pending sheet into `textures`, returning which one.
    pub fn load_next(&mut self, textures: &mut SheetTextures) -> Result<Option<SpriteSheet>> {
        let Some((sheet, path)) = self.pending.pop_front() else {
            return Ok(None);
        };
        let texture = (self.loader)(sheet, &path).with_context(|| {
            format!("failed to load sheet `{}` from {}", sheet.name(), path.display())
        })?;
        textures.insert(sheet, texture)?;
        Ok(Some(sheet))
    }
}

impl<L> std::fmt::Debug for SheetLoader<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetLoader")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn manifest_requires_every_sheet() {
        let manifest = r#"
            version = 1

            [sheets]
            terrain = "terrain.png"
        "#;

        let result = SheetManifest::parse(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing the unit sheet should fail");
    }

    #[test]
    fn manifest_rejects_unknown_sheets_and_keys() {
        let unknown_sheet = r#"
            version = 1

            [sheets]
            terrain = "terrain.png"
            units = "units.png"
            portraits = "faces.png"
        "#;
        let unknown_key = r#"
            version = 1
            scale = 2

            [sheets]
            terrain = "terrain.png"
            units = "units.png"
        "#;

        assert!(SheetManifest::parse(unknown_sheet, Path::new("assets")).is_err());
        assert!(SheetManifest::parse(unknown_key, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = r#"
            version = 2

            [sheets]
            terrain = "terrain.png"
            units = "units.png"
        "#;

        assert!(SheetManifest::parse(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = r#"
            version = 1

            [sheets]
            units = "img/units.png"
            terrain = "img/terrain.png"
        "#;

        let parsed = SheetManifest::parse(manifest, Path::new("root")).expect("manifest parses");
        assert_eq!(
            parsed.entries(),
            &[
                (SpriteSheet::Terrain, PathBuf::from("root/img/terrain.png")),
                (SpriteSheet::Units, PathBuf::from("root/img/units.png")),
            ]
        );
    }

    #[test]
    fn loader_loads_one_sheet_per_call_in_manifest_order() {
        let manifest = SheetManifest::parse(
            "version = 1\n[sheets]\nterrain = \"t.png\"\nunits = \"u.png\"\n",
            Path::new("."),
        )
        .expect("manifest parses");
        let load_order = RefCell::new(Vec::new());
        let mut loader = SheetLoader::new(&manifest, |sheet: SpriteSheet, _: &Path| {
            load_order.borrow_mut().push(sheet);
            Ok(Texture2D::empty())
        });
        let mut textures = SheetTextures::new();

        assert_eq!(
            loader.load_next(&mut textures).expect("loads"),
            Some(SpriteSheet::Terrain)
        );
        assert_eq!(textures.len(), 1);
        assert_eq!(
            loader.load_next(&mut textures).expect("loads"),
            Some(SpriteSheet::Units)
        );
        assert!(loader.is_finished());
        assert_eq!(loader.load_next(&mut textures).expect("idle"), None);
        assert_eq!(
            load_order.into_inner(),
            vec![SpriteSheet::Terrain, SpriteSheet::Units]
        );
    }

    #[test]
    fn loader_errors_name_the_sheet() {
        let manifest = SheetManifest::parse(
            "version = 1\n[sheets]\nterrain = \"t.png\"\nunits = \"u.png\"\n",
            Path::new("."),
        )
        .expect("manifest parses");
        let mut loader = SheetLoader::new(&manifest, |_: SpriteSheet, _: &Path| -> Result<Texture2D> {
            bail!("disk on fire")
        });
        let mut textures = SheetTextures::new();

        let error = loader
            .load_next(&mut textures)
            .expect_err("loader failure propagates");
        assert!(format!("{error:#}").contains("terrain"));
        assert!(textures.is_empty());
    }

    #[test]
    fn bundled_manifest_lists_both_sheets() {
        let manifest = SheetManifest::parse(
            include_str!("../../../assets/sheets.toml"),
            Path::new("assets"),
        )
        .expect("bundled manifest parses");

        assert_eq!(manifest.entries().len(), SpriteSheet::ALL.len());
    }
}
