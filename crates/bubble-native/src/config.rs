use bubble_core::{FieldMode, LayoutParams, Project};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigMode {
    Home,
    Gallery,
}

impl Default for ConfigMode {
    fn default() -> Self {
        Self::Home
    }
}

impl From<ConfigMode> for FieldMode {
    fn from(m: ConfigMode) -> Self {
        match m {
            ConfigMode::Home => FieldMode::Home,
            ConfigMode::Gallery => FieldMode::Gallery,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub hover_thumbnail: Option<String>,
    pub link: Option<String>,
}

impl From<&ProjectEntry> for Project {
    fn from(e: &ProjectEntry) -> Self {
        Project {
            id: e.id.clone(),
            title: e.title.clone(),
            thumbnail_url: e.thumbnail.clone(),
            hover_thumbnail_url: e.hover_thumbnail.clone(),
            link: e.link.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub mode: ConfigMode,
    pub bubble_count: usize,
    pub seed: u32,
    /// Orbit speed in radians per pixel of drag.
    pub rotate_speed: f32,
    /// Zoom speed in world units per wheel step.
    pub zoom_speed: f32,
    pub entrance_enabled: bool,
    /// Extra hold per bubble index before its entrance ease starts.
    pub entrance_delay_sec: f32,
    pub refraction_enabled: bool,
    pub transparent_background: bool,
    pub touch_only: bool,
    pub placement_padding: f32,
    pub retry_cap_home: u32,
    pub retry_cap_gallery: u32,
    pub projects: Vec<ProjectEntry>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mode: ConfigMode::Home,
            bubble_count: 14,
            seed: 12345,
            rotate_speed: 0.005,
            zoom_speed: 1.6,
            entrance_enabled: true,
            entrance_delay_sec: 0.05,
            refraction_enabled: true,
            transparent_background: false,
            touch_only: false,
            placement_padding: bubble_core::PLACEMENT_PADDING,
            retry_cap_home: bubble_core::HOME_RETRY_CAP,
            retry_cap_gallery: bubble_core::GALLERY_RETRY_CAP,
            projects: Vec::new(),
        }
    }
}

impl FieldConfig {
    pub fn projects(&self) -> Vec<Project> {
        self.projects.iter().map(Project::from).collect()
    }

    pub fn layout_params(&self) -> LayoutParams {
        let mode: FieldMode = self.mode.into();
        let mut params = LayoutParams::for_mode(mode);
        params.padding = self.placement_padding;
        params.retry_cap = match mode {
            FieldMode::Home => self.retry_cap_home,
            FieldMode::Gallery => self.retry_cap_gallery,
        };
        params
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "bubblefield")?;
    Some(proj.config_dir().join("field.toml"))
}

pub fn load_or_default() -> FieldConfig {
    let Some(path) = config_file_path() else {
        return FieldConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> FieldConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return FieldConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| FieldConfig::default())
}

pub fn save(cfg: &FieldConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

/// Write a starter config on first run so the tuning knobs are
/// discoverable on disk.
pub fn ensure_saved(cfg: &FieldConfig) {
    let Some(path) = config_file_path() else {
        return;
    };
    if path.exists() {
        return;
    }
    if let Err(e) = save(cfg) {
        log::debug!("[config] could not write starter config: {e:#}");
    }
}

fn save_to_path(cfg: &FieldConfig, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize field config")?;
    fs::write(path, data).with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
