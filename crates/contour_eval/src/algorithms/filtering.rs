use crate::{config::FilterConfig, traits::ContourFilter, types::Contour};

/// Minimum area filter using geo crate's area calculation
#[derive(Debug, Clone)]
pub struct MinimumAreaFilter {
    pub min_area: f64,
}

impl Default for MinimumAreaFilter {
    fn default() -> Self {
        Self { min_area: 100.0 }
    }
}

impl ContourFilter for MinimumAreaFilter {
    fn accepts(&self, contour: &Contour) -> bool {
        contour.area() > self.min_area
    }
}

/// Rejects contours whose bounding box is too narrow for its height.
/// Zero-height boxes never pass.
#[derive(Debug, Clone)]
pub struct AspectRatioFilter {
    pub min_aspect_ratio: f64,
}

impl Default for AspectRatioFilter {
    fn default() -> Self {
        Self { min_aspect_ratio: 0.5 }
    }
}

impl ContourFilter for AspectRatioFilter {
    fn accepts(&self, contour: &Contour) -> bool {
        contour
            .bounding_box()
            .aspect_ratio()
            .is_some_and(|ratio| ratio > self.min_aspect_ratio)
    }
}

/// Area first, then aspect ratio
pub fn filters_from_config(config: &FilterConfig) -> Vec<Box<dyn ContourFilter>> {
    let area: Box<dyn ContourFilter> = Box::new(MinimumAreaFilter { min_area: config.min_area });
    let aspect: Box<dyn ContourFilter> = Box::new(AspectRatioFilter { min_aspect_ratio: config.min_aspect_ratio });
    vec![area, aspect]
}
