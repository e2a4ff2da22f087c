/// Tunables for a bot instance. Environment variables override the
/// defaults; the reader is injectable so the parsing is testable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotConfig {
    /// Total Monte Carlo budget per decision, split across legal moves.
    pub n_samples: u32,
    /// RNG seed; a fixed seed makes decisions fully reproducible.
    pub seed: Option<u64>,
    /// Cap on feasibility restarts in the world sampler.
    pub max_retries: u32,
    /// Soft cap on decision latency, checked between samples.
    pub deadline_ms: Option<u64>,
    /// House rule: the Queen of Spades also breaks hearts.
    pub queen_breaks_hearts: bool,
    /// Keep point cards in hand rather than fast-path dumping them.
    pub aggressive_moon: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            seed: None,
            max_retries: 32,
            deadline_ms: None,
            queen_breaks_hearts: true,
            aggressive_moon: false,
        }
    }
}

impl BotConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_n_samples(mut self, n_samples: u32) -> Self {
        self.n_samples = n_samples.max(1);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    pub fn with_queen_breaks_hearts(mut self, enabled: bool) -> Self {
        self.queen_breaks_hearts = enabled;
        self
    }

    pub fn with_aggressive_moon(mut self, enabled: bool) -> Self {
        self.aggressive_moon = enabled;
        self
    }

    pub fn from_env() -> Self {
        Self::default().overridden_by(|key| std::env::var(key).ok())
    }

    fn overridden_by<F>(mut self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(value) = read("MCH_N_SAMPLES").and_then(|raw| raw.trim().parse().ok()) {
            self.n_samples = u32::max(value, 1);
        }
        if let Some(value) = read("MCH_SEED").and_then(|raw| raw.trim().parse().ok()) {
            self.seed = Some(value);
        }
        if let Some(value) = read("MCH_MAX_RETRIES").and_then(|raw| raw.trim().parse().ok()) {
            self.max_retries = u32::max(value, 1);
        }
        if let Some(value) = read("MCH_DEADLINE_MS").and_then(|raw| raw.trim().parse().ok()) {
            self.deadline_ms = Some(value);
        }
        if let Some(raw) = read("MCH_QUEEN_BREAKS") {
            self.queen_breaks_hearts = parse_flag(&raw);
        }
        if let Some(raw) = read("MCH_AGGRESSIVE_MOON") {
            self.aggressive_moon = parse_flag(&raw);
        }
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON")
}
