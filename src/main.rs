// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for outline editing on UFO glyphs
//!
//! ```text
//! outline-edit <font.ufo> <glyph> info
//! outline-edit <font.ufo> <glyph> reverse
//! outline-edit <font.ufo> <glyph> set-start <path> <point>
//! outline-edit <font.ufo> <glyph> toggle-smooth <path> <point>
//! outline-edit <font.ufo> <glyph> delete <path> <point> [--keep-shape]
//! outline-edit <font.ufo> <glyph> break <path> <point>
//! ```

use anyhow::{Context, Result, bail};
use outline_edit::model::{Anchor, EntityId, Guideline, ItemRef, PathPoint};
use outline_edit::{EditSession, Glyph, Workspace};
use serde::Serialize;
use std::path::PathBuf;

const USAGE: &str = "Usage: outline-edit <font.ufo> <glyph> <info|reverse|set-start|toggle-smooth|delete|break> [path] [point] [--keep-shape]";

fn main() -> Result<()> {
    outline_edit::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [font_path, glyph_name, command, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };

    let font_path = PathBuf::from(font_path);
    let mut workspace = Workspace::load(&font_path)?;
    let glyph = workspace
        .get_glyph(glyph_name)
        .cloned()
        .with_context(|| format!("Glyph '{}' not found in {}", glyph_name, font_path.display()))?;

    if command == "info" {
        let summary = GlyphSummary::new(&glyph);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut session = EditSession::new(glyph);
    session.glyph.take_changes();
    run_command(&mut session, command, rest)?;
    if !session.glyph.is_dirty() {
        tracing::info!("{}: nothing changed", command);
        return Ok(());
    }

    workspace.update_glyph(session.glyph);
    workspace.save()?;
    Ok(())
}

/// Apply a mutating command to the session's glyph
fn run_command(session: &mut EditSession, command: &str, args: &[String]) -> Result<()> {
    match command {
        "reverse" => {
            session.reverse_paths(None);
        }
        "set-start" => {
            let (path, index) = point_args(session, args)?;
            if session.glyph.path(path).is_some_and(|p| p.is_open()) {
                bail!("set-start needs a closed path");
            }
            session.set_start_point(path, index);
        }
        "toggle-smooth" => {
            let (path, index) = point_args(session, args)?;
            session.toggle_smooth(path, index);
        }
        "delete" => {
            let (path, index) = point_args(session, args)?;
            let keep_shape = args.iter().any(|a| a == "--keep-shape");
            session.select_only(ItemRef::Point { path, index });
            session.delete_selection(keep_shape);
        }
        "break" => {
            let (path, index) = point_args(session, args)?;
            session.break_path(path, index);
        }
        other => bail!("Unknown command '{}'\n{}", other, USAGE),
    }
    Ok(())
}

/// Parse `<path> <point>` indices and check them against the glyph
fn point_args(session: &EditSession, args: &[String]) -> Result<(EntityId, usize)> {
    let [path, point, ..] = args else {
        bail!("Expected <path> <point> indices\n{}", USAGE);
    };
    let path: usize = path.parse().with_context(|| format!("Bad path index '{}'", path))?;
    let point: usize = point
        .parse()
        .with_context(|| format!("Bad point index '{}'", point))?;

    let Some(p) = session.glyph.paths.get(path) else {
        bail!("Glyph has {} paths, no path {}", session.glyph.paths.len(), path);
    };
    let Some(pt) = p.points().get(point) else {
        bail!("Path {} has {} points, no point {}", path, p.len(), point);
    };
    if pt.is_off_curve() {
        bail!("Point {} of path {} is not an on-curve point", point, path);
    }
    Ok((p.id(), point))
}

// ===== JSON SUMMARY =====

#[derive(Serialize)]
struct GlyphSummary<'a> {
    name: &'a str,
    width: f64,
    codepoints: Vec<String>,
    paths: Vec<PathSummary<'a>>,
    anchors: &'a [Anchor],
    components: Vec<ComponentSummary<'a>>,
    guidelines: &'a [Guideline],
}

#[derive(Serialize)]
struct PathSummary<'a> {
    open: bool,
    points: &'a [PathPoint],
}

#[derive(Serialize)]
struct ComponentSummary<'a> {
    base: &'a str,
    transform: [f64; 6],
}

impl<'a> GlyphSummary<'a> {
    fn new(glyph: &'a Glyph) -> Self {
        Self {
            name: &glyph.name,
            width: glyph.width,
            codepoints: glyph
                .codepoints
                .iter()
                .map(|c| format!("U+{:04X}", *c as u32))
                .collect(),
            paths: glyph
                .paths
                .iter()
                .map(|p| PathSummary {
                    open: p.is_open(),
                    points: p.points(),
                })
                .collect(),
            anchors: &glyph.anchors,
            components: glyph
                .components
                .iter()
                .map(|c| ComponentSummary {
                    base: &c.base,
                    transform: c.transform.as_coeffs(),
                })
                .collect(),
            guidelines: &glyph.guidelines,
        }
    }
}
