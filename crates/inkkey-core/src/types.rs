use crate::constants::MM_PER_INCH;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InkError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Degenerate geometry: {0}")]
    Geometry(String),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, InkError>;

/// Decoded raster handed to the pipeline: 8-bit RGBA, row-major.
pub type RasterImage = image::RgbaImage;

/// Quarter-turn rotation applied to the image before it is mounted on the plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a rotation in degrees. Only exact quarter turns are accepted.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            other => Err(InkError::Config(format!(
                "Rotation must be 0, 90, 180 or 270 degrees, got {}",
                other
            ))),
        }
    }

    /// The next quarter turn clockwise (270 wraps back to 0)
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    /// Whether the rotation swaps width and height
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Common printed widths for jobs mounted on a 40" plate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrintWidth {
    /// Full plate (40")
    FullPlate,
    /// Large sheet (32")
    LargeSheet,
    /// Half sheet (20")
    HalfSheet,
    /// 19 inch sheet
    Nineteen,
    /// A3 landscape (16.5")
    A3Landscape,
    /// A4 landscape (11.7")
    A4Landscape,
    Custom { inches: f32 },
}

impl PrintWidth {
    pub fn inches(self) -> f32 {
        match self {
            PrintWidth::FullPlate => 40.0,
            PrintWidth::LargeSheet => 32.0,
            PrintWidth::HalfSheet => 20.0,
            PrintWidth::Nineteen => 19.0,
            PrintWidth::A3Landscape => 16.5,
            PrintWidth::A4Landscape => 11.7,
            PrintWidth::Custom { inches } => inches,
        }
    }

    pub fn width_mm(self) -> f32 {
        self.inches() * MM_PER_INCH
    }
}

/// One of the four process inks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    Cyan,
    Magenta,
    Yellow,
    Black,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Cyan,
        Channel::Magenta,
        Channel::Yellow,
        Channel::Black,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Cyan => "Cyan",
            Channel::Magenta => "Magenta",
            Channel::Yellow => "Yellow",
            Channel::Black => "Black",
        }
    }
}

/// Ink coverage percentages, each channel in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmyk {
    pub c: u8,
    pub m: u8,
    pub y: u8,
    pub k: u8,
}

impl Cmyk {
    pub const WHITE: Cmyk = Cmyk {
        c: 0,
        m: 0,
        y: 0,
        k: 0,
    };

    pub fn new(c: u8, m: u8, y: u8, k: u8) -> Self {
        Self { c, m, y, k }
    }

    pub fn get(self, channel: Channel) -> u8 {
        match channel {
            Channel::Cyan => self.c,
            Channel::Magenta => self.m,
            Channel::Yellow => self.y,
            Channel::Black => self.k,
        }
    }
}

/// Average ink coverage per ink key zone.
///
/// All four sequences have one entry per zone, ordered from the left edge
/// of the plate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InkLevels {
    pub c: Vec<u8>,
    pub m: Vec<u8>,
    pub y: Vec<u8>,
    pub k: Vec<u8>,
}

impl InkLevels {
    pub fn with_capacity(num_keys: usize) -> Self {
        Self {
            c: Vec::with_capacity(num_keys),
            m: Vec::with_capacity(num_keys),
            y: Vec::with_capacity(num_keys),
            k: Vec::with_capacity(num_keys),
        }
    }

    pub fn push(&mut self, zone: Cmyk) {
        self.c.push(zone.c);
        self.m.push(zone.m);
        self.y.push(zone.y);
        self.k.push(zone.k);
    }

    pub fn num_keys(&self) -> usize {
        self.c.len()
    }

    pub fn zone(&self, index: usize) -> Option<Cmyk> {
        Some(Cmyk {
            c: *self.c.get(index)?,
            m: *self.m.get(index)?,
            y: *self.y.get(index)?,
            k: *self.k.get(index)?,
        })
    }

    pub fn channel(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Cyan => &self.c,
            Channel::Magenta => &self.m,
            Channel::Yellow => &self.y,
            Channel::Black => &self.k,
        }
    }
}

/// Coverage statistics for a single ink across all zones
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSummary {
    pub channel: Channel,
    /// Mean coverage over all zones
    pub mean: f32,
    /// 1-based number of the heaviest zone (first one on ties)
    pub peak_zone: usize,
    pub peak_value: u8,
}

/// Statistics about an analysis result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InkSummary {
    pub num_keys: usize,
    /// One entry per ink, in C, M, Y, K order
    pub channels: Vec<ChannelSummary>,
    /// Sum of the four channel means
    pub total_coverage: f32,
}
