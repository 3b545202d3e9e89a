//! Adapters turning pipeline errors into miette reportables.

use miette::Diagnostic;
use thiserror::Error;

use skillgraph::SkillGraphError;

/// Wrapper making [`SkillGraphError`] renderable by miette's report
/// handlers. The pipeline errors carry no source spans, so the default
/// diagnostic surface is enough.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Reportable(#[from] pub SkillGraphError);

impl Diagnostic for Reportable {}
