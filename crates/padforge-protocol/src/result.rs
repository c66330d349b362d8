use crate::finger::{Finger, Hand};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unplayable,
}

impl Difficulty {
    /// Unplayable if cost is infinite or > 100; Hard if > 10; Medium if > 3;
    /// else Easy.
    pub fn classify(cost: f32) -> Self {
        if cost.is_infinite() || cost > 100.0 {
            Difficulty::Unplayable
        } else if cost > 10.0 {
            Difficulty::Hard
        } else if cost > 3.0 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }
}

/// Named scalar cost buckets, used both as the per-note debug breakdown and
/// as the accumulator for solver-level averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub movement: f32,
    pub stretch: f32,
    pub drift: f32,
    pub bounce: f32,
    pub fatigue: f32,
    pub crossover: f32,
    pub total: f32,
}

impl CostBreakdown {
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            movement: self.movement * factor,
            stretch: self.stretch * factor,
            drift: self.drift * factor,
            bounce: self.bounce * factor,
            fatigue: self.fatigue * factor,
            crossover: self.crossover * factor,
            total: self.total * factor,
        }
    }

    pub fn add(&mut self, other: &CostBreakdown) {
        self.movement += other.movement;
        self.stretch += other.stretch;
        self.drift += other.drift;
        self.bounce += other.bounce;
        self.fatigue += other.fatigue;
        self.crossover += other.crossover;
        self.total += other.total;
    }
}

/// Per-input-note record produced by every solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugEvent {
    pub pitch: u8,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    pub hand: Option<Hand>,
    pub finger: Option<Finger>,
    #[serde(rename = "totalCost")]
    pub total_cost: f32,
    #[serde(default)]
    pub breakdown: Option<CostBreakdown>,
    pub difficulty: Difficulty,
    pub row: Option<u8>,
    pub col: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    Beam,
    Genetic,
    Annealing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionGenerationRecord {
    pub generation: usize,
    pub best: f32,
    pub average: f32,
    pub worst: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingSnapshot {
    pub iteration: usize,
    pub temperature: f32,
    #[serde(rename = "currentCost")]
    pub current_cost: f32,
    #[serde(rename = "bestCost")]
    pub best_cost: f32,
    pub accepted: bool,
    #[serde(rename = "deltaCost")]
    pub delta_cost: f32,
    #[serde(rename = "acceptanceProbability")]
    pub acceptance_probability: f32,
    #[serde(rename = "componentSums")]
    pub component_sums: CostBreakdown,
    #[serde(rename = "componentShares")]
    pub component_shares: CostBreakdown,
}

/// A coarse (iteration, best-cost-so-far) sample, kept for UI compatibility
/// alongside the full `annealingTrace`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizationLogEntry {
    pub iteration: usize,
    #[serde(rename = "bestCost")]
    pub best_cost: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResult {
    /// 0..=100
    pub score: u8,
    #[serde(rename = "unplayableCount")]
    pub unplayable_count: usize,
    #[serde(rename = "hardCount")]
    pub hard_count: usize,
    #[serde(rename = "debugEvents")]
    pub debug_events: Vec<DebugEvent>,
    /// "L-Finger" / "R-Finger" -> count.
    #[serde(rename = "fingerUsageStats")]
    pub finger_usage_stats: HashMap<String, u32>,
    #[serde(rename = "fatigueMap")]
    pub fatigue_map: HashMap<String, f32>,
    #[serde(rename = "averageDrift")]
    pub average_drift: f32,
    #[serde(rename = "averageMetrics")]
    pub average_metrics: CostBreakdown,
    #[serde(default, rename = "evolutionLog")]
    pub evolution_log: Option<Vec<EvolutionGenerationRecord>>,
    #[serde(default, rename = "optimizationLog")]
    pub optimization_log: Option<Vec<OptimizationLogEntry>>,
    #[serde(default, rename = "annealingTrace")]
    pub annealing_trace: Option<Vec<AnnealingSnapshot>>,
}

impl SolverResult {
    pub fn score_from_counts(hard_count: usize, unplayable_count: usize) -> u8 {
        let raw = 100 - 5 * hard_count as i32 - 20 * unplayable_count as i32;
        raw.max(0).min(100) as u8
    }
}
