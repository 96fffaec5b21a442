//! The ordered collection of committed shapes.

use crate::config::HitConfig;
use crate::shapes::Shape;
use kurbo::Point;

/// Committed shapes in paint order (back to front).
///
/// Shapes have no identity beyond their position. The sequence only grows at
/// the end; erasure removes whole shapes and keeps survivors in order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of everything else.
    pub fn commit(&mut self, shape: Shape) {
        log::debug!(
            "Committed {} with {} point(s), scene now has {} shape(s)",
            shape.kind.name(),
            shape.points.len(),
            self.shapes.len() + 1
        );
        self.shapes.push(shape);
    }

    /// Remove every shape matching `predicate`, keeping the rest in order.
    /// Returns the number of removed shapes.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Shape) -> bool,
    {
        let before = self.shapes.len();
        self.shapes.retain(|shape| !predicate(shape));
        before - self.shapes.len()
    }

    /// Remove every shape whose outline is near `target`.
    pub fn erase_at(&mut self, target: Point, config: &HitConfig) -> usize {
        let removed = self.remove_where(|shape| shape.hit_test(target, config));
        if removed > 0 {
            log::debug!(
                "Erased {} shape(s) at ({:.1}, {:.1})",
                removed,
                target.x,
                target.y
            );
        }
        removed
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Iterate shapes in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::DrawStyle;
    use crate::tools::ToolKind;

    fn rect(x: f64, y: f64) -> Shape {
        Shape::new(
            ToolKind::Rectangle,
            vec![Point::new(x, y), Point::new(x + 10.0, y + 10.0)],
            DrawStyle::default(),
        )
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_commit_appends_in_order() {
        let mut scene = Scene::new();
        scene.commit(rect(0.0, 0.0));
        scene.commit(rect(100.0, 0.0));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.shapes(), &[rect(0.0, 0.0), rect(100.0, 0.0)]);
    }

    #[test]
    fn test_remove_where_keeps_survivor_order() {
        let mut scene = Scene::new();
        for i in 0..5 {
            scene.commit(rect(f64::from(i) * 100.0, 0.0));
        }
        let removed = scene.remove_where(|s| (s.points[0].x as i32 / 100) % 2 == 1);
        assert_eq!(removed, 2);
        let xs: Vec<f64> = scene.iter().map(|s| s.points[0].x).collect();
        assert_eq!(xs, vec![0.0, 200.0, 400.0]);
    }

    #[test]
    fn test_erase_removes_only_matches() {
        let mut scene = Scene::new();
        scene.commit(rect(0.0, 0.0));
        scene.commit(rect(100.0, 0.0));
        scene.commit(rect(0.0, 0.0));

        let config = HitConfig::default();
        assert_eq!(scene.erase_at(Point::new(5.0, 0.0), &config), 2);
        assert_eq!(scene.shapes(), &[rect(100.0, 0.0)]);
        assert_eq!(scene.erase_at(Point::new(500.0, 500.0), &config), 0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        scene.commit(rect(0.0, 0.0));
        scene.clear();
        assert!(scene.is_empty());
    }
}
