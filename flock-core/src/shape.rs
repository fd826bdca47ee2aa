//! Formation shapes agents can be sent to.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A "T": a vertical stroke of `size` centered on `center` with a bar of
    /// the same width across its top.
    LetterT {
        center: Vector2D,
        size: f32,
        points: usize,
    },
    /// Zig-zag of alternating horizontal and vertical runs starting at
    /// `start`, each run `segment_len` points `spacing` apart.
    Pathway {
        start: Vector2D,
        segments: usize,
        segment_len: usize,
        spacing: f32,
    },
    /// Any precomputed list, e.g. a recorded pointer stroke.
    Custom { points: Vec<Vector2D> },
}

impl Shape {
    pub fn letter_t(center: Vector2D) -> Self {
        Shape::LetterT {
            center,
            size: 200.0,
            points: 20,
        }
    }

    /// Pathway laid out up and left of `center`.
    pub fn pathway(center: Vector2D) -> Self {
        Shape::Pathway {
            start: center - Vector2D::new(200.0, 100.0),
            segments: 5,
            segment_len: 5,
            spacing: 20.0,
        }
    }

    pub fn points(&self) -> Vec<Vector2D> {
        match self {
            Shape::LetterT {
                center,
                size,
                points,
            } => letter_t_points(*center, *size, *points),
            Shape::Pathway {
                start,
                segments,
                segment_len,
                spacing,
            } => pathway_points(*start, *segments, *segment_len, *spacing),
            Shape::Custom { points } => points.clone(),
        }
    }
}

/// Target for the agent at `index`: shape points are handed out round-robin.
pub fn assigned_point(points: &[Vector2D], index: usize) -> Option<Vector2D> {
    if points.is_empty() {
        None
    } else {
        Some(points[index % points.len()])
    }
}

/// `count` evenly spaced points from `from` to `to` inclusive.
fn line(from: Vector2D, to: Vector2D, count: usize) -> impl Iterator<Item = Vector2D> {
    (0..count).map(move |i| {
        if count < 2 {
            from
        } else {
            from + (to - from) * (i as f32 / (count - 1) as f32)
        }
    })
}

fn letter_t_points(center: Vector2D, size: f32, count: usize) -> Vec<Vector2D> {
    let half = size / 2.0;
    // 40% of the points, rounded up, go to the stem
    let vertical = (count * 2).div_ceil(5);
    let horizontal = count - vertical;

    let top = Vector2D::new(center.x, center.y - half);
    let bottom = Vector2D::new(center.x, center.y + half);
    let bar_left = Vector2D::new(center.x - half, center.y - half);
    let bar_right = Vector2D::new(center.x + half, center.y - half);

    line(top, bottom, vertical)
        .chain(line(bar_left, bar_right, horizontal))
        .collect()
}

fn pathway_points(start: Vector2D, segments: usize, segment_len: usize, spacing: f32) -> Vec<Vector2D> {
    let mut points = Vec::with_capacity(segments * segment_len);
    let mut cursor = start;
    let run = segment_len as f32 * spacing;

    for segment in 0..segments {
        let horizontal = segment % 2 == 0;
        for j in 0..segment_len {
            let step = j as f32 * spacing;
            points.push(if horizontal {
                Vector2D::new(cursor.x + step, cursor.y)
            } else {
                Vector2D::new(cursor.x, cursor.y + step)
            });
        }
        if horizontal {
            cursor.x += run;
        } else {
            cursor.y += run;
        }
    }

    points
}
