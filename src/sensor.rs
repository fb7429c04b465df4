//! Sensor parameter bundles for simulated detectors

use crate::frame::FrameShape;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Noise parameters for a simulated detector.
///
/// Everything the dark-frame generator needs to produce a realistic
/// shutter-closed exposure: thermal signal rate, readout noise, the
/// electron-to-count conversion, and the bias pedestal the counts sit on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorSpec {
    /// Name/model of the sensor
    pub name: String,
    /// Sensor dimensions in pixels
    pub shape: FrameShape,
    /// Dark current in electrons per pixel per second
    pub dark_current_e_per_s: f64,
    /// Read noise RMS in electrons per pixel
    pub read_noise_e: f64,
    /// Gain in electrons per ADU
    pub gain_e_per_adu: f64,
    /// Bias pedestal in ADU
    pub bias_level_adu: f64,
    /// ADC bit depth
    pub bit_depth: u8,
}

impl SensorSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        shape: FrameShape,
        dark_current_e_per_s: f64,
        read_noise_e: f64,
        gain_e_per_adu: f64,
        bias_level_adu: f64,
        bit_depth: u8,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            dark_current_e_per_s,
            read_noise_e,
            gain_e_per_adu,
            bias_level_adu,
            bit_depth,
        }
    }

    /// Largest representable count for the sensor's ADC
    pub fn saturation_adu(&self) -> f64 {
        2.0f64.powi(self.bit_depth as i32) - 1.0
    }

    /// Expected dark electrons accumulated per pixel over an exposure
    pub fn dark_electrons(&self, exposure: &Duration) -> f64 {
        self.dark_current_e_per_s * exposure.as_secs_f64()
    }

    /// Expected mean dark signal in ADU over an exposure, above bias
    pub fn expected_dark_adu(&self, exposure: &Duration) -> f64 {
        self.dark_electrons(exposure) / self.gain_e_per_adu
    }

    /// Copy of this spec with different dimensions, for test patches
    pub fn with_shape(&self, shape: FrameShape) -> Self {
        Self {
            shape,
            ..self.clone()
        }
    }
}

/// Standard sensor models
pub mod models {
    use super::*;

    /// Thermoelectrically cooled full-frame CCD, typical of older
    /// astronomical cameras with a large dark signal
    pub static KAF1603: Lazy<SensorSpec> = Lazy::new(|| {
        SensorSpec::new(
            "KAF-1603",
            FrameShape::new(1536, 1024),
            0.3,
            10.5,
            1.4,
            1100.0,
            16,
        )
    });

    /// Back-illuminated CMOS sensor with low read noise and little dark
    /// current
    pub static IMX290: Lazy<SensorSpec> = Lazy::new(|| {
        SensorSpec::new(
            "IMX290",
            FrameShape::new(1920, 1080),
            0.05,
            2.9,
            0.45,
            64.0,
            12,
        )
    });

    /// All built-in sensor models
    pub static ALL_SENSORS: Lazy<Vec<&'static SensorSpec>> =
        Lazy::new(|| vec![&*KAF1603, &*IMX290]);

    /// Look up a built-in model by case-insensitive name
    pub fn by_name(name: &str) -> Option<&'static SensorSpec> {
        let wanted = name.to_lowercase().replace('-', "");
        ALL_SENSORS
            .iter()
            .copied()
            .find(|s| s.name.to_lowercase().replace('-', "") == wanted)
    }
}
