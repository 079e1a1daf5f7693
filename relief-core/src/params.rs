/// Conversion parameters and their validation
use crate::error::{ReliefError, Result};

/// Solid name used when the caller does not supply one.
pub const DEFAULT_SOLID_NAME: &str = "model";

/// Parameter set for one heightmap-to-solid conversion.
///
/// Lengths are in millimeters. The footprint is square: `width_mm` is used
/// for both horizontal axes regardless of the source image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliefParams {
    /// Grid side length in samples.
    pub resolution: usize,
    /// Footprint edge length.
    pub width_mm: f32,
    /// Relief height added at elevation 1.0.
    pub height_scale_mm: f32,
    /// Thickness of the solid plate under the relief.
    pub base_thickness_mm: f32,
    /// Treat dark pixels as high instead of low.
    pub invert: bool,
}

impl ReliefParams {
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_width_mm(mut self, width_mm: f32) -> Self {
        self.width_mm = width_mm;
        self
    }

    pub fn with_height_scale_mm(mut self, height_scale_mm: f32) -> Self {
        self.height_scale_mm = height_scale_mm;
        self
    }

    pub fn with_base_thickness_mm(mut self, base_thickness_mm: f32) -> Self {
        self.base_thickness_mm = base_thickness_mm;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Check every field, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(ReliefError::configuration(format!(
                "resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        validate_dimensions(
            self.width_mm,
            self.height_scale_mm,
            self.base_thickness_mm,
        )
    }
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            resolution: 100,
            width_mm: 100.0,
            height_scale_mm: 10.0,
            base_thickness_mm: 2.0,
            invert: false,
        }
    }
}

pub(crate) fn validate_dimensions(
    width_mm: f32,
    height_scale_mm: f32,
    base_thickness_mm: f32,
) -> Result<()> {
    if !width_mm.is_finite() || width_mm <= 0.0 {
        return Err(ReliefError::configuration(format!(
            "width must be a positive finite length, got {width_mm}"
        )));
    }
    if !height_scale_mm.is_finite() || height_scale_mm < 0.0 {
        return Err(ReliefError::configuration(format!(
            "height scale must be a non-negative finite length, got {height_scale_mm}"
        )));
    }
    if !base_thickness_mm.is_finite() || base_thickness_mm < 0.0 {
        return Err(ReliefError::configuration(format!(
            "base thickness must be a non-negative finite length, got {base_thickness_mm}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ReliefParams::default().validate().is_ok());
    }

    #[test]
    fn test_low_resolution_rejected() {
        for resolution in [0, 1] {
            let params = ReliefParams::default().with_resolution(resolution);
            assert!(matches!(
                params.validate(),
                Err(ReliefError::Configuration { .. })
            ));
        }
        assert!(ReliefParams::default().with_resolution(2).validate().is_ok());
    }

    #[test]
    fn test_dimensions_rejected() {
        let bad = [
            ReliefParams::default().with_width_mm(0.0),
            ReliefParams::default().with_width_mm(-5.0),
            ReliefParams::default().with_width_mm(f32::NAN),
            ReliefParams::default().with_height_scale_mm(-0.1),
            ReliefParams::default().with_height_scale_mm(f32::INFINITY),
            ReliefParams::default().with_base_thickness_mm(-1.0),
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(ReliefError::Configuration { .. })),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_height_and_base_allowed() {
        let params = ReliefParams::default()
            .with_height_scale_mm(0.0)
            .with_base_thickness_mm(0.0)
            .with_invert(true);
        assert!(params.validate().is_ok());
    }
}
