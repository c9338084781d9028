use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Press and job configuration for one analysis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessingOptions {
    /// Number of ink key zones across the plate
    pub num_keys: usize,

    /// Gray component replacement strength, 0.0 (rich black) to 1.0 (max black)
    pub black_generation: f32,

    /// Rotation applied to the image before mounting
    pub rotation: Rotation,

    // Physical dimensions, both in millimeters
    pub plate_width_mm: f32,
    pub image_width_mm: f32,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            num_keys: DEFAULT_NUM_KEYS,
            black_generation: DEFAULT_BLACK_GENERATION,
            rotation: Rotation::None,
            plate_width_mm: DEFAULT_PLATE_WIDTH_MM,
            image_width_mm: inch_to_mm(DEFAULT_PRINT_WIDTH_IN),
        }
    }
}

impl ProcessingOptions {
    /// Set the printed image width from a sheet preset
    pub fn with_print_width(mut self, width: PrintWidth) -> Self {
        self.image_width_mm = width.width_mm();
        self
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| InkError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| InkError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.num_keys < 1 {
            return Err(InkError::Config(
                "Number of ink keys must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.black_generation) {
            return Err(InkError::Config(format!(
                "Black generation must be between 0 and 1, got {}",
                self.black_generation
            )));
        }

        // Written as negated comparisons so NaN is rejected too
        if !(self.plate_width_mm > 0.0) || !self.plate_width_mm.is_finite() {
            return Err(InkError::Config(format!(
                "Plate width must be a positive length, got {} mm",
                self.plate_width_mm
            )));
        }

        if !(self.image_width_mm > 0.0) || !self.image_width_mm.is_finite() {
            return Err(InkError::Config(format!(
                "Image width must be a positive length, got {} mm",
                self.image_width_mm
            )));
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Rotation is stored as plain degrees so config files read naturally
    impl Serialize for Rotation {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_i32(self.degrees())
        }
    }

    impl<'de> Deserialize<'de> for Rotation {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let degrees = i32::deserialize(deserializer)?;
            Rotation::from_degrees(degrees).map_err(serde::de::Error::custom)
        }
    }
} // end of serde_impls module
