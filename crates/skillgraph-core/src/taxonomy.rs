//! Semantic model of the taxonomy graph.
//!
//! Defines the node and relation kinds that occur in taxonomy exports,
//! together with the visual-attribute rules derived from them: node sizes are
//! a clamped function of relation counts, node colors are fixed per kind, and
//! edge strokes are fixed per relation kind.

use std::fmt;

use crate::{color::Color, draw::StrokeDefinition};

/// Smallest rendered node radius.
pub const MIN_NODE_SIZE: f32 = 8.0;
/// Largest rendered node radius.
pub const MAX_NODE_SIZE: f32 = 25.0;
/// Radius gained per incident relation.
pub const SIZE_MULTIPLIER: f32 = 2.0;

/// Fill color for occupation nodes.
pub const OCCUPATION_COLOR: &str = "#2e86c1";
/// Fill color for skill nodes.
pub const SKILL_COLOR: &str = "#27ae60";
/// Fill color for skill-group nodes.
pub const SKILL_GROUP_COLOR: &str = "#e67e22";
/// Fill color for nodes whose kind could not be determined.
pub const FALLBACK_COLOR: &str = "#95a5a6";

/// Stroke color for essential relations.
pub const ESSENTIAL_EDGE_COLOR: &str = "#e74c3c";
/// Stroke color for hierarchy relations.
pub const HIERARCHY_EDGE_COLOR: &str = "#6b7280";
/// Stroke color for optional and unrecognized relations.
pub const NEUTRAL_EDGE_COLOR: &str = "#b0b7c3";

/// Computes the rendered radius for a node with the given relation count.
///
/// The result is always within `[MIN_NODE_SIZE, MAX_NODE_SIZE]`.
pub fn node_size(relation_count: usize) -> f32 {
    (relation_count as f32 * SIZE_MULTIPLIER).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// The kind of a taxonomy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Occupation,
    Skill,
    SkillGroup,
}

impl NodeKind {
    /// Parses a node kind from a free-form type string.
    ///
    /// Returns `None` for unrecognized values; callers fall back to
    /// [`FALLBACK_COLOR`] in that case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "occupation" => Some(NodeKind::Occupation),
            "skill" => Some(NodeKind::Skill),
            "skillgroup" | "skill_group" | "group" => Some(NodeKind::SkillGroup),
            _ => None,
        }
    }

    /// The fixed fill color for this node kind.
    pub fn color_value(self) -> &'static str {
        match self {
            NodeKind::Occupation => OCCUPATION_COLOR,
            NodeKind::Skill => SKILL_COLOR,
            NodeKind::SkillGroup => SKILL_GROUP_COLOR,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Occupation => "occupation",
            NodeKind::Skill => "skill",
            NodeKind::SkillGroup => "skill group",
        };
        write!(f, "{}", name)
    }
}

/// Resolves the fill color for an optionally known node kind.
pub fn node_color(kind: Option<NodeKind>) -> &'static str {
    kind.map(NodeKind::color_value).unwrap_or(FALLBACK_COLOR)
}

/// The kind of a relation between taxonomy nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// An essential occupation-to-skill relation.
    Essential,
    /// An optional occupation-to-skill relation.
    Optional,
    /// A parent/child relation from the hierarchy tables.
    Hierarchy,
    /// Any other relation type found in the data.
    Other,
}

impl RelationKind {
    /// Parses the `RELATIONTYPE` column of a relation table.
    ///
    /// The hierarchy kind never appears in that column; it is assigned by the
    /// ingestion of hierarchy tables directly.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "essential" => RelationKind::Essential,
            "optional" => RelationKind::Optional,
            _ => RelationKind::Other,
        }
    }

    /// The stroke used to render edges of this kind.
    ///
    /// Essential relations are solid and warm-toned. Hierarchy relations are
    /// thicker, neutral, and always solid regardless of any relation type the
    /// source row carried. Everything else renders dashed and neutral.
    pub fn stroke(self) -> StrokeDefinition {
        match self {
            RelationKind::Essential => StrokeDefinition::solid(essential_edge_color(), 1.0),
            RelationKind::Hierarchy => StrokeDefinition::solid(hierarchy_edge_color(), 2.5),
            RelationKind::Optional | RelationKind::Other => {
                StrokeDefinition::dashed(neutral_edge_color(), 1.0)
            }
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationKind::Essential => "essential",
            RelationKind::Optional => "optional",
            RelationKind::Hierarchy => "hierarchy",
            RelationKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

fn essential_edge_color() -> Color {
    Color::new(ESSENTIAL_EDGE_COLOR).expect("essential edge color is valid CSS")
}

fn hierarchy_edge_color() -> Color {
    Color::new(HIERARCHY_EDGE_COLOR).expect("hierarchy edge color is valid CSS")
}

fn neutral_edge_color() -> Color {
    Color::new(NEUTRAL_EDGE_COLOR).expect("neutral edge color is valid CSS")
}

/// The resolved node fill palette.
///
/// Defaults to the fixed constants above; style configuration may override
/// individual entries. Node color stays a pure function of node kind either
/// way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    occupation: Color,
    skill: Color,
    skill_group: Color,
    fallback: Color,
}

impl Palette {
    /// Creates a palette with explicit colors for every node kind.
    pub fn new(occupation: Color, skill: Color, skill_group: Color, fallback: Color) -> Self {
        Self {
            occupation,
            skill,
            skill_group,
            fallback,
        }
    }

    /// Returns the fill color for an optionally known node kind.
    pub fn color_for(&self, kind: Option<NodeKind>) -> Color {
        match kind {
            Some(NodeKind::Occupation) => self.occupation,
            Some(NodeKind::Skill) => self.skill,
            Some(NodeKind::SkillGroup) => self.skill_group,
            None => self.fallback,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            occupation: Color::new(OCCUPATION_COLOR).expect("occupation color is valid CSS"),
            skill: Color::new(SKILL_COLOR).expect("skill color is valid CSS"),
            skill_group: Color::new(SKILL_GROUP_COLOR).expect("skill group color is valid CSS"),
            fallback: Color::new(FALLBACK_COLOR).expect("fallback color is valid CSS"),
        }
    }
}
