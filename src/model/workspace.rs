// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! UFO boundary: loads glyphs from a `.ufo` with `norad` and writes them back.
//!
//! `Workspace` converts the default layer into editable `Glyph` values
//! (contours become paths, a contour starting with a `move` point is open)
//! and carries the font metrics the rendering layer needs. Saving reloads
//! the font from disk so data the editor never touches (lib, features,
//! kerning) is preserved.

use anyhow::{Context, Result};
use kurbo::{Affine, BezPath, Point};
use norad::{Font, Glyph as NoradGlyph};
use std::collections::HashMap;
use std::path::{Path as FsPath, PathBuf};

use super::glyph::{Anchor, Component, Glyph, Guideline};
use super::path::Path;
use super::point::{PathPoint, SegmentType};

/// Font-level metrics, consumed only by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct FontMetrics {
    pub units_per_em: Option<f64>,
    pub ascender: Option<f64>,
    pub descender: Option<f64>,
    pub x_height: Option<f64>,
    pub cap_height: Option<f64>,
}

/// A workspace represents a loaded UFO font with all its glyphs
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Path to the UFO directory
    pub path: PathBuf,

    /// Name of the font family
    pub family_name: String,

    /// Style name (e.g., "Regular", "Bold")
    pub style_name: String,

    /// All glyphs, indexed by name
    pub glyphs: HashMap<String, Glyph>,

    pub metrics: FontMetrics,
}

impl Workspace {
    /// Load a UFO from a directory path
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let font =
            Font::load(path).with_context(|| format!("Failed to load UFO from {:?}", path))?;

        let family_name = font
            .font_info
            .family_name
            .clone()
            .unwrap_or_else(|| "Untitled Font".to_string());

        let style_name = font
            .font_info
            .style_name
            .clone()
            .unwrap_or_else(|| "Regular".to_string());

        let mut glyphs = HashMap::new();
        for norad_glyph in font.default_layer().iter() {
            let glyph = Self::convert_glyph(norad_glyph);
            glyphs.insert(glyph.name.clone(), glyph);
        }

        tracing::info!(
            "Loaded {} glyphs from {} {}",
            glyphs.len(),
            family_name,
            style_name
        );

        Ok(Self {
            path: path.to_path_buf(),
            family_name,
            style_name,
            glyphs,
            metrics: FontMetrics {
                units_per_em: font.font_info.units_per_em.map(|n| n.as_f64()),
                ascender: font.font_info.ascender,
                descender: font.font_info.descender,
                x_height: font.font_info.x_height,
                cap_height: font.font_info.cap_height,
            },
        })
    }

    /// Convert a norad Glyph to our internal Glyph
    pub fn convert_glyph(norad_glyph: &NoradGlyph) -> Glyph {
        let mut glyph = Glyph::new(norad_glyph.name().to_string(), norad_glyph.width);
        glyph.codepoints = norad_glyph.codepoints.iter().collect();

        for contour in &norad_glyph.contours {
            let (points, open) = Self::convert_contour(contour);
            glyph.add_path(points, open);
        }

        glyph.anchors = norad_glyph
            .anchors
            .iter()
            .map(|a| Anchor {
                name: a.name.as_ref().map(|n| n.to_string()).unwrap_or_default(),
                x: a.x,
                y: a.y,
                selected: false,
            })
            .collect();

        glyph.components = norad_glyph
            .components
            .iter()
            .map(Self::convert_component)
            .collect();

        glyph.guidelines = norad_glyph
            .guidelines
            .iter()
            .map(Self::convert_guideline)
            .collect();

        // Freshly loaded data is clean
        glyph.take_changes();
        glyph
    }

    /// Convert a norad contour to a point list and open flag
    fn convert_contour(contour: &norad::Contour) -> (Vec<PathPoint>, bool) {
        let open = contour
            .points
            .first()
            .is_some_and(|pt| pt.typ == norad::PointType::Move);

        let points = contour
            .points
            .iter()
            .map(|pt| {
                let pos = Point::new(pt.x, pt.y);
                match Self::convert_point_type(&pt.typ) {
                    Some(kind) => PathPoint::on_curve(pos, kind).with_smooth(pt.smooth),
                    None => PathPoint::off_curve(pos),
                }
            })
            .collect();
        (points, open)
    }

    /// Convert a norad PointType; `None` marks an off-curve point
    fn convert_point_type(typ: &norad::PointType) -> Option<SegmentType> {
        match typ {
            norad::PointType::Move => Some(SegmentType::Move),
            norad::PointType::Line => Some(SegmentType::Line),
            norad::PointType::OffCurve => None,
            norad::PointType::Curve => Some(SegmentType::Curve),
            norad::PointType::QCurve => Some(SegmentType::QCurve),
        }
    }

    fn convert_component(norad_comp: &norad::Component) -> Component {
        // norad's AffineTransform has: x_scale, xy_scale, yx_scale, y_scale, x_offset, y_offset
        let t = &norad_comp.transform;
        let transform = Affine::new([
            t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset,
        ]);
        Component::new(norad_comp.base.to_string(), transform)
    }

    fn convert_guideline(norad_guide: &norad::Guideline) -> Guideline {
        let (pos, angle) = match norad_guide.line {
            norad::Line::Vertical(x) => (Point::new(x, 0.0), 90.0),
            norad::Line::Horizontal(y) => (Point::new(0.0, y), 0.0),
            norad::Line::Angle { x, y, degrees } => (Point::new(x, y), degrees),
        };
        let mut guideline = Guideline::new(pos, angle);
        guideline.name = norad_guide.name.as_ref().map(|n| n.to_string());
        guideline
    }

    /// Get a list of all glyph names, sorted by Unicode codepoint
    pub fn glyph_names(&self) -> Vec<String> {
        let mut glyph_list: Vec<_> = self.glyphs.iter().collect();
        glyph_list.sort_by(|(name_a, glyph_a), (name_b, glyph_b)| {
            match (glyph_a.codepoints.first(), glyph_b.codepoints.first()) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => name_a.cmp(name_b),
            }
        });
        glyph_list
            .into_iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn get_glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn get_glyph_mut(&mut self, name: &str) -> Option<&mut Glyph> {
        self.glyphs.get_mut(name)
    }

    /// Update a glyph in the workspace
    pub fn update_glyph(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.name.clone(), glyph);
    }

    /// Outlines of the base glyphs referenced by `glyph`'s components
    ///
    /// Used for component hit testing. Nested components are not expanded.
    pub fn component_outlines(&self, glyph: &Glyph) -> HashMap<String, BezPath> {
        glyph
            .components
            .iter()
            .filter_map(|component| {
                let base = self.glyphs.get(&component.base)?;
                let mut outline = BezPath::new();
                for path in &base.paths {
                    outline.extend(path.to_bezpath());
                }
                Some((component.base.clone(), outline))
            })
            .collect()
    }

    /// Save the UFO back to disk
    pub fn save(&self) -> Result<()> {
        // Load the original font to preserve metadata we don't edit
        let mut font = Font::load(&self.path)
            .with_context(|| format!("Failed to load UFO for saving: {:?}", self.path))?;

        let default_layer = font.default_layer_mut();
        for (name, glyph) in &self.glyphs {
            match default_layer.get_glyph_mut(name) {
                Some(existing) => Self::write_outline(glyph, existing)?,
                None => {
                    let mut norad_glyph = NoradGlyph::new(name);
                    for &cp in &glyph.codepoints {
                        norad_glyph.codepoints.insert(cp);
                    }
                    Self::write_outline(glyph, &mut norad_glyph)?;
                    default_layer.insert_glyph(norad_glyph);
                }
            }
        }

        font.save(&self.path)
            .with_context(|| format!("Failed to save UFO to {:?}", self.path))?;

        tracing::info!("Saved {} glyphs to {:?}", self.glyphs.len(), self.path);
        Ok(())
    }

    /// Copy the editable parts of `glyph` onto a norad glyph
    fn write_outline(glyph: &Glyph, target: &mut NoradGlyph) -> Result<()> {
        target.width = glyph.width;
        target.contours = glyph.paths.iter().map(Self::to_norad_contour).collect();
        target.components = glyph
            .components
            .iter()
            .map(Self::to_norad_component)
            .collect::<Result<_>>()?;
        target.anchors = glyph
            .anchors
            .iter()
            .map(Self::to_norad_anchor)
            .collect::<Result<_>>()?;
        target.guidelines = glyph
            .guidelines
            .iter()
            .map(Self::to_norad_guideline)
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// Convert an editable Path to a norad Contour
    fn to_norad_contour(path: &Path) -> norad::Contour {
        let points = path
            .points()
            .iter()
            .map(|pt| {
                norad::ContourPoint::new(
                    pt.x,
                    pt.y,
                    Self::to_norad_point_type(pt.kind),
                    pt.is_on_curve() && pt.smooth,
                    None, // name
                    None, // identifier
                    None, // lib (plist dictionary)
                )
            })
            .collect();
        norad::Contour::new(points, None, None)
    }

    fn to_norad_point_type(kind: Option<SegmentType>) -> norad::PointType {
        match kind {
            Some(SegmentType::Move) => norad::PointType::Move,
            Some(SegmentType::Line) => norad::PointType::Line,
            Some(SegmentType::Curve) => norad::PointType::Curve,
            Some(SegmentType::QCurve) => norad::PointType::QCurve,
            None => norad::PointType::OffCurve,
        }
    }

    fn to_norad_component(component: &Component) -> Result<norad::Component> {
        let coeffs = component.transform.as_coeffs();
        let transform = norad::AffineTransform {
            x_scale: coeffs[0],
            xy_scale: coeffs[1],
            yx_scale: coeffs[2],
            y_scale: coeffs[3],
            x_offset: coeffs[4],
            y_offset: coeffs[5],
        };
        let base = norad::Name::new(&component.base)
            .with_context(|| format!("Invalid component base name {:?}", component.base))?;
        Ok(norad::Component::new(base, transform, None, None))
    }

    fn to_norad_anchor(anchor: &Anchor) -> Result<norad::Anchor> {
        let name = if anchor.name.is_empty() {
            None
        } else {
            Some(
                norad::Name::new(&anchor.name)
                    .with_context(|| format!("Invalid anchor name {:?}", anchor.name))?,
            )
        };
        Ok(norad::Anchor::new(anchor.x, anchor.y, name, None, None, None))
    }

    fn to_norad_guideline(guideline: &Guideline) -> Result<norad::Guideline> {
        let line = if guideline.angle == 90.0 && guideline.y == 0.0 {
            norad::Line::Vertical(guideline.x)
        } else if guideline.angle == 0.0 && guideline.x == 0.0 {
            norad::Line::Horizontal(guideline.y)
        } else {
            norad::Line::Angle {
                x: guideline.x,
                y: guideline.y,
                degrees: guideline.angle,
            }
        };
        let name = guideline
            .name
            .as_deref()
            .map(norad::Name::new)
            .transpose()
            .with_context(|| format!("Invalid guideline name {:?}", guideline.name))?;
        Ok(norad::Guideline::new(line, name, None, None, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_contours_load_as_open_paths() {
        let contour = norad::Contour::new(
            vec![
                norad::ContourPoint::new(0.0, 0.0, norad::PointType::Move, false, None, None, None),
                norad::ContourPoint::new(10.0, 0.0, norad::PointType::OffCurve, false, None, None, None),
                norad::ContourPoint::new(20.0, 5.0, norad::PointType::OffCurve, false, None, None, None),
                norad::ContourPoint::new(20.0, 10.0, norad::PointType::Curve, true, None, None, None),
            ],
            None,
            None,
        );
        let (points, open) = Workspace::convert_contour(&contour);
        assert!(open);
        assert_eq!(points[0].kind, Some(SegmentType::Move));
        assert!(points[1].is_off_curve());
        assert!(points[3].smooth);
    }

    #[test]
    fn contours_round_trip_point_types() {
        let mut glyph = Glyph::new("o", 500.0);
        glyph.add_path(
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Line),
                PathPoint::off_curve((0.0, 50.0)),
                PathPoint::off_curve((50.0, 100.0)),
                PathPoint::on_curve((100.0, 100.0), SegmentType::Curve).with_smooth(true),
            ],
            false,
        );
        let contour = Workspace::to_norad_contour(&glyph.paths[0]);
        let (points, open) = Workspace::convert_contour(&contour);
        assert!(!open);
        assert_eq!(points, glyph.paths[0].points());
    }

    #[test]
    fn guidelines_map_to_norad_lines() {
        let vertical = Guideline::new(Point::new(40.0, 0.0), 90.0);
        let norad_guide = Workspace::to_norad_guideline(&vertical).unwrap();
        assert!(matches!(norad_guide.line, norad::Line::Vertical(x) if x == 40.0));
        assert_eq!(Workspace::convert_guideline(&norad_guide), vertical);
    }
}
