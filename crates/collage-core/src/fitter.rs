//! Size fitting policy for scaling content into a target footprint.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// How a source size is mapped onto the fitter's target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMode {
    /// Never resize.
    NoFit,
    /// Scale uniformly so the result lies inside the target.
    #[default]
    Fit,
    /// Scale uniformly so the width matches the target width.
    FitToWidth,
    /// Scale uniformly so the height matches the target height.
    FitToHeight,
    /// Stretch to exactly the target size.
    ExactFit,
}

/// Decides whether and how content is rescaled into a target size.
///
/// The fitter is a pure function of its inputs. Fitted sizes are whole
/// pixels and never collapse below 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeFitter {
    /// Target footprint.
    pub target: Size,
    /// Fit policy.
    pub mode: FitMode,
    /// Whether sources smaller than the target are enlarged.
    #[serde(default)]
    pub scale_up: bool,
}

impl SizeFitter {
    /// Create a fitter for the given target and mode, without upscaling.
    pub fn new(target: Size, mode: FitMode) -> Self {
        Self {
            target,
            mode,
            scale_up: false,
        }
    }

    /// Allow enlarging sources that are smaller than the target.
    pub fn with_scale_up(mut self, scale_up: bool) -> Self {
        self.scale_up = scale_up;
        self
    }

    /// Fit `source` into the target.
    ///
    /// Returns `None` when no resize is needed, otherwise the fitted size.
    pub fn fit(&self, source: Size) -> Option<Size> {
        if source.width <= 0.0 || source.height <= 0.0 {
            return None;
        }
        if self.target.width <= 0.0 || self.target.height <= 0.0 {
            return None;
        }

        let fitted = match self.mode {
            FitMode::NoFit => return None,
            FitMode::ExactFit => self.target,
            FitMode::Fit => {
                let fits = source.width <= self.target.width && source.height <= self.target.height;
                if fits && !self.scale_up {
                    return None;
                }
                let scale = (self.target.width / source.width).min(self.target.height / source.height);
                source * scale
            }
            FitMode::FitToWidth => {
                if source.width <= self.target.width && !self.scale_up {
                    return None;
                }
                source * (self.target.width / source.width)
            }
            FitMode::FitToHeight => {
                if source.height <= self.target.height && !self.scale_up {
                    return None;
                }
                source * (self.target.height / source.height)
            }
        };

        let fitted = Size::new(fitted.width.round().max(1.0), fitted.height.round().max(1.0));
        if fitted == source {
            None
        } else {
            Some(fitted)
        }
    }
}

impl Default for SizeFitter {
    fn default() -> Self {
        Self::new(Size::new(400.0, 400.0), FitMode::Fit)
    }
}
