use serde::{Deserialize, Serialize};

use crate::{
    error::{WheelError, WheelResult},
    types::PrizeIndex,
};

pub const DEFAULT_PITY_THRESHOLD: u32 = 10;
pub const DEFAULT_INITIAL_COUPONS: u32 = 3;
pub const DEFAULT_TOP_UP_AMOUNT: u32 = 10;

/// Cosmetic fields the renderer needs. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMeta {
    /// Label drawn on the segment; `\n` splits value and caption lines.
    #[serde(default)]
    pub wheel_text: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One prize descriptor as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeConfig {
    pub name: String,
    /// Share of 100. The table expects the weights to sum to exactly 100.
    pub weight: u32,
    #[serde(flatten)]
    pub display: DisplayMeta,
}

impl PrizeConfig {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self { name: name.into(), weight, display: DisplayMeta::default() }
    }

    pub fn with_display(mut self, wheel_text: &str, color: &str, icon: &str) -> Self {
        self.display = DisplayMeta {
            wheel_text: wheel_text.into(),
            color: color.into(),
            icon: Some(icon.into()),
        };
        self
    }
}

/// Bounds for the randomised part of a spin animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Full rotations before the wheel settles, sampled in [min, max).
    pub min_full_turns: f64,
    pub max_full_turns: f64,
    /// Animation length in ms, sampled in [min, max).
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// Half-width of the landing window as a fraction of one segment arc.
    /// Must stay below 0.5 so the pointer never lands on a divider.
    pub jitter_fraction: f64,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            min_full_turns:  5.0,
            max_full_turns:  8.0,
            min_duration_ms: 5000.0,
            max_duration_ms: 7000.0,
            jitter_fraction: 0.35,
        }
    }
}

impl SpinTiming {
    /// Reject bounds that would let a spin stand still, run backwards or
    /// stop on a divider.
    pub fn validate(&self) -> WheelResult<()> {
        let reason = if !(self.min_full_turns > 0.0 && self.min_full_turns <= self.max_full_turns) {
            format!(
                "full turns must satisfy 0 < min <= max, got {}..{}",
                self.min_full_turns, self.max_full_turns
            )
        } else if !(self.min_duration_ms > 0.0 && self.min_duration_ms <= self.max_duration_ms) {
            format!(
                "duration must satisfy 0 < min <= max, got {}..{} ms",
                self.min_duration_ms, self.max_duration_ms
            )
        } else if !(0.0..0.5).contains(&self.jitter_fraction) {
            format!(
                "jitter fraction {} must be in [0, 0.5) to keep the pointer off dividers",
                self.jitter_fraction
            )
        } else {
            return Ok(());
        };
        Err(WheelError::Config { reason })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    pub prizes: Vec<PrizeConfig>,
    pub legendary_index: PrizeIndex,
    #[serde(default = "default_pity_threshold")]
    pub pity_threshold: u32,
    #[serde(default = "default_initial_coupons")]
    pub initial_coupons: u32,
    #[serde(default = "default_top_up_amount")]
    pub top_up_amount: u32,
    #[serde(default)]
    pub timing: SpinTiming,
}

fn default_pity_threshold() -> u32 { DEFAULT_PITY_THRESHOLD }
fn default_initial_coupons() -> u32 { DEFAULT_INITIAL_COUPONS }
fn default_top_up_amount() -> u32 { DEFAULT_TOP_UP_AMOUNT }

impl WheelConfig {
    /// Load from a JSON file such as `data/prizes.json`.
    /// In tests, use WheelConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: WheelConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Sum of all configured weights.
    pub fn total_weight(&self) -> u32 {
        self.prizes.iter().map(|p| p.weight).sum()
    }
}

impl Default for WheelConfig {
    /// The reference eight-segment wheel. Legendary Item sits at index 2.
    fn default() -> Self {
        Self {
            prizes: vec![
                PrizeConfig::new("25% Discount", 5)
                    .with_display("25%\nDiscount", "#005aff", "icons/discount.png"),
                PrizeConfig::new("100 Platinum", 15)
                    .with_display("100\nPlatinum", "#642ab5", "icons/platinum.png"),
                PrizeConfig::new("Legendary Item", 5)
                    .with_display("Legendary\nItem", "#003dad", "icons/legendary.png"),
                PrizeConfig::new("8 Spheres", 5)
                    .with_display("8\nSpheres", "#51258f", "icons/spheres.png"),
                PrizeConfig::new("200 Cores", 5)
                    .with_display("200\nCores", "#005aff", "icons/cores.png"),
                PrizeConfig::new("4 Spheres", 10)
                    .with_display("4\nSpheres", "#642ab5", "icons/spheres.png"),
                PrizeConfig::new("50 Platinum", 30)
                    .with_display("50\nPlatinum", "#003dad", "icons/platinum.png"),
                PrizeConfig::new("Premium 30 days", 25)
                    .with_display("Premium\n30 days", "#51258f", "icons/premium.png"),
            ],
            legendary_index: 2,
            pity_threshold:  DEFAULT_PITY_THRESHOLD,
            initial_coupons: DEFAULT_INITIAL_COUPONS,
            top_up_amount:   DEFAULT_TOP_UP_AMOUNT,
            timing:          SpinTiming::default(),
        }
    }
}
