/// Euclidean pad distance beyond which a finger is considered "not ideally
/// reaching" but still feasible.
pub const IDEAL_REACH: f32 = 2.0;

/// Hard ceiling on single-finger reach. Used by the onion-skin model's
/// `isImpossible` flag and by the reach predicate.
pub const MAX_REACH: f32 = 4.0;

/// Hard ceiling on pairwise finger span within one hand's grip.
pub const MAX_SPAN: f32 = 4.0;

/// Cost charged when a finger transitions from unplaced to placed.
pub const ACTIVATION_COST: f32 = 5.0;

/// Weight applied to each violated topology rule (§4.2).
pub const CROSSOVER_PENALTY_WEIGHT: f32 = 20.0;

/// Fatigue added to a finger each time it is used.
pub const FATIGUE_ACCUM_RATE: f32 = 0.1;

/// Fatigue decayed per second of rest.
pub const FATIGUE_DECAY_RATE: f32 = 0.05;

/// Upper bound on a finger's fatigue value.
pub const MAX_FATIGUE: f32 = 5.0;

/// Default comfortable pairwise span used when no neutral pad positions are
/// available to derive one from.
pub const DEFAULT_COMFORTABLE_SPAN: f32 = 2.0;

/// Stricter span bound used by the strict grip tier.
pub const STRICT_MAX_SPAN: f32 = 5.5;

/// Looser span bound used by the relaxed grip tier.
pub const RELAXED_MAX_SPAN: f32 = 7.5;

/// Thumb-row slack allowed by the strict grip tier.
pub const STRICT_THUMB_ROW_SLACK: f32 = 1.0;

/// Thumb-row slack allowed by the relaxed grip tier.
pub const RELAXED_THUMB_ROW_SLACK: f32 = 2.0;

/// Column overlap tolerance allowed by the relaxed grip tier.
pub const RELAXED_COLUMN_OVERLAP: f32 = 0.5;

/// Ceiling on hand-centroid speed, in grid-units/second, above which a
/// transition is physically impossible.
pub const MAX_HAND_SPEED: f32 = 12.0;

/// Linear weight applied to speed in the non-impossible transition-cost
/// branch.
pub const SPEED_COST_WEIGHT: f32 = 0.5;

/// Below this elapsed time, two events are treated as the same moment and
/// transition cost is zero.
pub const MIN_TIME_DELTA: f64 = 0.001;

/// Added to a grip's cost when it was produced by the fallback tier.
pub const FALLBACK_GRIP_PENALTY: f32 = 1000.0;

/// Recency window for the finger-bounce (stickiness) penalty, in seconds.
pub const STICKINESS_WINDOW: f64 = 5.0;

/// Peak finger-bounce penalty, scaled down linearly as Δt approaches the
/// window.
pub const STICKINESS_PENALTY: f32 = 2.0;

/// Moment-grouping epsilon used by the beam solver (§4.4.1).
pub const BEAM_MOMENT_EPSILON: f64 = 1e-3;

/// Moment-grouping epsilon used by the event analyzer (§4.5).
pub const ANALYZER_MOMENT_EPSILON: f64 = 1e-4;

pub const DEFAULT_BEAM_WIDTH: usize = 8;
pub const DEFAULT_STIFFNESS: f32 = 0.3;

pub const GENETIC_DEFAULT_POPULATION: usize = 50;
pub const GENETIC_DEFAULT_GENERATIONS: usize = 100;
pub const GENETIC_DEFAULT_MUTATION_RATE: f32 = 0.05;
pub const GENETIC_DEFAULT_TOURNAMENT_SIZE: usize = 2;
pub const GENETIC_DEFAULT_ELITISM: usize = 2;
pub const GENETIC_YIELD_EVERY: usize = 10;
/// Fitness penalty added per infeasible (infinite-transition) bigram.
pub const GENETIC_INFEASIBLE_TRANSITION_PENALTY: f32 = 1000.0;
/// Fitness penalty added per fallback-tier gene.
pub const GENETIC_FALLBACK_PENALTY: f32 = 100.0;

pub const ANNEALING_DEFAULT_INITIAL_TEMP: f32 = 500.0;
pub const ANNEALING_DEFAULT_COOLING_RATE: f32 = 0.99;
pub const ANNEALING_DEFAULT_ITERATIONS: usize = 1000;
pub const ANNEALING_DEFAULT_FAST_BEAM_WIDTH: usize = 2;
pub const ANNEALING_DEFAULT_FINAL_BEAM_WIDTH: usize = 50;
pub const ANNEALING_YIELD_EVERY: usize = 50;

/// Drift-cost linear scale (§4.3).
pub const DRIFT_WEIGHT: f32 = 0.5;
/// Neutral-bias scale folded into movement cost (§4.3).
pub const MOVEMENT_NEUTRAL_BIAS_WEIGHT: f32 = 0.1;

pub const DIFFICULTY_HARD_THRESHOLD: f32 = 10.0;
pub const DIFFICULTY_MEDIUM_THRESHOLD: f32 = 3.0;
pub const DIFFICULTY_UNPLAYABLE_THRESHOLD: f32 = 100.0;
