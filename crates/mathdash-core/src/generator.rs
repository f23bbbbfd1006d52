use crate::{Difficulty, GameConfig, MathProblem, Operator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Inclusive operand range for a difficulty and operator.
///
/// Multiplication and division share a tighter upper bound so results
/// stay tractable in your head.
pub fn operand_range(difficulty: Difficulty, operator: Operator) -> (u32, u32) {
    let (min, max) = match difficulty {
        Difficulty::Easy => (1, 10),
        Difficulty::Medium => (5, 20),
        Difficulty::Hard => (10, 50),
    };

    if operator.is_multiplicative() {
        let max = match difficulty {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 12,
        };
        (min, max)
    } else {
        (min, max)
    }
}

/// Random arithmetic problem generator
pub struct ProblemGenerator {
    rng: StdRng,
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemGenerator {
    /// Create a generator seeded from the platform entropy source
    pub fn new() -> Self {
        // getrandom also works on wasm32 with the `js` feature
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a problem for the given configuration
    pub fn generate(&mut self, config: &GameConfig) -> MathProblem {
        let operator = self.pick_operator(&config.operators);
        generate_with(&mut self.rng, operator, config.difficulty)
    }

    fn pick_operator(&mut self, operators: &[Operator]) -> Operator {
        if operators.is_empty() {
            return Operator::Add;
        }
        operators[self.rng.gen_range(0..operators.len())]
    }
}

/// Build one problem for a fixed operator using any RNG
pub(crate) fn generate_with<R: Rng>(
    rng: &mut R,
    operator: Operator,
    difficulty: Difficulty,
) -> MathProblem {
    let (min, max) = operand_range(difficulty, operator);
    let first = rng.gen_range(min..=max);
    let second = rng.gen_range(min..=max);

    match operator {
        Operator::Divide => {
            // second draw is the divisor, first is the quotient
            let divisor = if second == 0 { min.max(1) } else { second };
            MathProblem::new(divisor * first, divisor, operator)
        }
        Operator::Subtract if first < second => MathProblem::new(second, first, operator),
        _ => MathProblem::new(first, second, operator),
    }
}
