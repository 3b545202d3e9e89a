//! Application configuration loaded from a TOML file.
//!
//! The configuration is constructed once (by the CLI or embedding
//! application) and passed by reference into the pipeline; there is no
//! ambient global configuration.

use serde::Deserialize;

use skillgraph_core::{
    color::Color,
    taxonomy::{NodeKind, Palette},
};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout and clustering configuration section
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Style configuration section
    #[serde(default)]
    pub style: StyleConfig,

    /// Rendering limit configuration section
    #[serde(default)]
    pub limits: LimitConfig,
}

/// Layout and clustering configuration section.
///
/// The iteration and sweep budgets are deliberately bounded: layout and
/// clustering run synchronously on the calling thread, so their cost must
/// stay below interactive latency even for large exports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of force simulation iterations
    pub iterations: usize,

    /// Spring constant for edge attraction forces
    pub spring_constant: f32,

    /// Repulsion constant for node separation forces
    pub repulsion_constant: f32,

    /// Velocity damping factor per iteration
    pub damping_factor: f32,

    /// Minimum distance kept between node boundaries
    pub min_distance: f32,

    /// Maximum layout dimension before downscaling
    pub max_dimension: f32,

    /// Maximum label propagation sweeps for community detection
    pub cluster_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            spring_constant: 0.1,
            repulsion_constant: 1000.0,
            damping_factor: 0.85,
            min_distance: 80.0,
            max_dimension: 1200.0,
            cluster_sweeps: 10,
        }
    }
}

/// Style configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color for the rendered graph
    background_color: Option<String>,

    /// Fill color override for occupation nodes
    occupation_color: Option<String>,

    /// Fill color override for skill nodes
    skill_color: Option<String>,

    /// Fill color override for skill-group nodes
    skill_group_color: Option<String>,

    /// Fill color override for nodes of unknown kind
    fallback_color: Option<String>,
}

impl StyleConfig {
    /// Get the background color from configuration
    /// Returns None if no background color is configured
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Resolves the node fill palette, applying any configured overrides on
    /// top of the default per-kind colors.
    pub fn palette(&self) -> Result<Palette, String> {
        let defaults = Palette::default();

        let resolve = |override_color: &Option<String>, kind: Option<NodeKind>| {
            override_color
                .as_ref()
                .map(|color| Color::new(color))
                .transpose()
                .map(|color| color.unwrap_or_else(|| defaults.color_for(kind)))
                .map_err(|err| format!("Invalid node color in config: {err}"))
        };

        Ok(Palette::new(
            resolve(&self.occupation_color, Some(NodeKind::Occupation))?,
            resolve(&self.skill_color, Some(NodeKind::Skill))?,
            resolve(&self.skill_group_color, Some(NodeKind::SkillGroup))?,
            resolve(&self.fallback_color, None)?,
        ))
    }
}

/// Rendering limit configuration section.
///
/// These caps bound rendering cost regardless of dataset size.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum number of clusters initially visible
    pub max_visible_clusters: usize,

    /// Maximum occupations revealed per expanded cluster
    pub cluster_occupation_limit: usize,

    /// Maximum skills revealed per expanded cluster
    pub cluster_skill_limit: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_visible_clusters: 20,
            cluster_occupation_limit: 10,
            cluster_skill_limit: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.layout.iterations, 100);
        assert_eq!(config.layout.cluster_sweeps, 10);
        assert_eq!(config.limits.max_visible_clusters, 20);
        assert_eq!(config.limits.cluster_occupation_limit, 10);
        assert_eq!(config.limits.cluster_skill_limit, 15);
        assert!(config.style.background_color().unwrap().is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            iterations = 25

            [limits]
            max_visible_clusters = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.iterations, 25);
        assert_eq!(config.layout.damping_factor, 0.85);
        assert_eq!(config.limits.max_visible_clusters, 5);
        assert_eq!(config.limits.cluster_skill_limit, 15);
    }

    #[test]
    fn test_palette_overrides() {
        let config: AppConfig = toml::from_str(
            r##"
            [style]
            occupation_color = "#123456"
            "##,
        )
        .unwrap();

        let palette = config.style.palette().unwrap();
        assert_eq!(
            palette.color_for(Some(NodeKind::Occupation)),
            Color::new("#123456").unwrap()
        );
        // Unconfigured kinds keep their defaults.
        assert_eq!(
            palette.color_for(Some(NodeKind::Skill)),
            Palette::default().color_for(Some(NodeKind::Skill))
        );
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            background_color = "definitely-not-a-color"
            "#,
        )
        .unwrap();

        let err = config.style.background_color().unwrap_err();
        assert!(err.contains("Invalid background color"));
    }
}
