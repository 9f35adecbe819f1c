// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bézier projection, intersection and curve joining

use super::sturm::{Polynomial, roots_in_unit_interval};
use super::{EPSILON, Intersection};
use kurbo::common::{solve_cubic, solve_quadratic};
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveArclen, Point, QuadBez, Vec2};

/// Precision of the root search for nearest-point queries
const PROJECTION_EPSILON: f64 = 1e-10;

/// Slack when deciding whether a solved parameter is inside `[0, 1]`
const PARAM_SLACK: f64 = 1e-9;

/// Nearest point on a cubic Bézier to `pt`
///
/// Minimizes `|B(t) - pt|` by isolating the real roots of the degree-5
/// polynomial `(B(t) - pt) · B'(t)` in `[0, 1]`. The endpoints are always
/// candidates, so a degenerate control polygon still yields a usable
/// answer. Returns the point and its parameter.
pub fn curve_projection(cubic: CubicBez, pt: Point) -> (Point, f64) {
    let p0 = cubic.p0.to_vec2();
    let p1 = cubic.p1.to_vec2();
    let p2 = cubic.p2.to_vec2();
    let p3 = cubic.p3.to_vec2();

    // B(t) = a t^3 + b t^2 + c t + p0
    let a = -p0 + p1 * 3.0 - p2 * 3.0 + p3;
    let b = p0 * 3.0 - p1 * 6.0 + p2 * 3.0;
    let c = (p1 - p0) * 3.0;
    let e = p0 - pt.to_vec2();

    let poly = Polynomial::new(vec![
        e.dot(c),
        c.dot(c) + 2.0 * e.dot(b),
        3.0 * b.dot(c) + 3.0 * a.dot(e),
        4.0 * a.dot(c) + 2.0 * b.dot(b),
        5.0 * a.dot(b),
        3.0 * a.dot(a),
    ]);

    let mut best = (cubic.p0, 0.0, pt.distance_squared(cubic.p0));
    let end_dist = pt.distance_squared(cubic.p3);
    if end_dist < best.2 {
        best = (cubic.p3, 1.0, end_dist);
    }

    for t in roots_in_unit_interval(&poly, PROJECTION_EPSILON) {
        let candidate = cubic.eval(t);
        let dist = pt.distance_squared(candidate);
        if dist < best.2 {
            best = (candidate, t, dist);
        }
    }

    (best.0, best.1)
}

/// Distance from `pt` to the nearest point of a cubic Bézier
pub fn curve_distance(cubic: CubicBez, pt: Point) -> f64 {
    let (nearest, _) = curve_projection(cubic, pt);
    pt.distance(nearest)
}

/// Intersections of a line segment with a cubic Bézier
///
/// The curve is expressed as signed distance from the line, which turns
/// the problem into a closed-form cubic root solve.
pub fn curve_intersections(line: Line, cubic: CubicBez) -> Vec<Intersection> {
    let dir = line.p1 - line.p0;
    if dir.hypot2() < EPSILON * EPSILON {
        return Vec::new();
    }

    let d = [cubic.p0, cubic.p1, cubic.p2, cubic.p3].map(|p| dir.cross(p - line.p0));
    let c3 = -d[0] + 3.0 * d[1] - 3.0 * d[2] + d[3];
    let c2 = 3.0 * d[0] - 6.0 * d[1] + 3.0 * d[2];
    let c1 = 3.0 * (d[1] - d[0]);
    let c0 = d[0];

    let roots: Vec<f64> = solve_cubic(c0, c1, c2, c3).into_iter().collect();
    collect_hits(line, dir, roots, |t| cubic.eval(t))
}

/// Intersections of a line segment with a quadratic Bézier
pub fn qcurve_intersections(line: Line, quad: QuadBez) -> Vec<Intersection> {
    let dir = line.p1 - line.p0;
    if dir.hypot2() < EPSILON * EPSILON {
        return Vec::new();
    }

    let d = [quad.p0, quad.p1, quad.p2].map(|p| dir.cross(p - line.p0));
    let c2 = d[0] - 2.0 * d[1] + d[2];
    let c1 = 2.0 * (d[1] - d[0]);
    let c0 = d[0];

    let roots: Vec<f64> = solve_quadratic(c0, c1, c2).into_iter().collect();
    collect_hits(line, dir, roots, |t| quad.eval(t))
}

fn collect_hits(
    line: Line,
    dir: Vec2,
    roots: Vec<f64>,
    eval: impl Fn(f64) -> Point,
) -> Vec<Intersection> {
    let len_sq = dir.hypot2();
    let mut hits: Vec<Intersection> = roots
        .into_iter()
        .filter(|t| t.is_finite() && *t >= -PARAM_SLACK && *t <= 1.0 + PARAM_SLACK)
        .filter_map(|t| {
            let t_other = t.clamp(0.0, 1.0);
            let point = eval(t_other);
            let t_line = (point - line.p0).dot(dir) / len_sq;
            (t_line >= -PARAM_SLACK && t_line <= 1.0 + PARAM_SLACK).then(|| Intersection {
                point,
                t_line: t_line.clamp(0.0, 1.0),
                t_other,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.t_line.total_cmp(&b.t_line));
    hits
}

/// Fit one cubic to two consecutive cubics
///
/// The result starts at `first.p0`, ends at `second.p3` and keeps the
/// outer tangent directions of both inputs. Handle lengths come from a
/// least-squares fit against samples of the original pair, parameterized
/// by arc length. When the fit is degenerate the handles fall back to a
/// third of the chord.
pub fn join_curves(first: CubicBez, second: CubicBez) -> CubicBez {
    let start = first.p0;
    let end = second.p3;
    let chord = end.distance(start);

    let start_tangent = unit_or(
        first.p1 - start,
        [first.p2 - start, first.p3 - start, end - start],
    );
    let end_tangent = unit_or(
        second.p2 - end,
        [second.p1 - end, second.p0 - end, start - end],
    );

    let fallback = CubicBez::new(
        start,
        start + start_tangent * (chord / 3.0),
        end + end_tangent * (chord / 3.0),
        end,
    );

    let len_first = first.arclen(1e-6);
    let len_second = second.arclen(1e-6);
    let total = len_first + len_second;
    if total < EPSILON {
        return fallback;
    }
    let ratio = len_first / total;

    let sample = |u: f64| -> Point {
        if u <= ratio {
            first.eval(if ratio > 0.0 { u / ratio } else { 0.0 })
        } else {
            second.eval((u - ratio) / (1.0 - ratio))
        }
    };

    let (mut aa, mut ab, mut bb, mut ar, mut br) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for u in [0.25, 0.5, 0.75, ratio] {
        if u <= 0.0 || u >= 1.0 {
            continue;
        }
        let mt = 1.0 - u;
        let fixed = start.to_vec2() * (mt * mt * mt + 3.0 * mt * mt * u)
            + end.to_vec2() * (3.0 * mt * u * u + u * u * u);
        let residual = sample(u).to_vec2() - fixed;
        let a = start_tangent * (3.0 * mt * mt * u);
        let b = end_tangent * (3.0 * mt * u * u);
        aa += a.dot(a);
        ab += a.dot(b);
        bb += b.dot(b);
        ar += a.dot(residual);
        br += b.dot(residual);
    }

    let det = aa * bb - ab * ab;
    if det.abs() < EPSILON {
        return fallback;
    }
    let alpha = (ar * bb - br * ab) / det;
    let beta = (aa * br - ab * ar) / det;
    if !alpha.is_finite() || !beta.is_finite() || alpha <= EPSILON || beta <= EPSILON {
        return fallback;
    }

    CubicBez::new(
        start,
        start + start_tangent * alpha,
        end + end_tangent * beta,
        end,
    )
}

/// Normalize `v`, trying each fallback direction when it is degenerate
fn unit_or(v: Vec2, fallbacks: [Vec2; 3]) -> Vec2 {
    std::iter::once(v)
        .chain(fallbacks)
        .find(|d| d.hypot() > EPSILON)
        .map(|d| d.normalize())
        .unwrap_or(Vec2::new(1.0, 0.0))
}
