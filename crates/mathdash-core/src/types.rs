use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Arithmetic operator a problem can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// Display symbol, also the serialized form
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Apply the operator. Division must already be exact.
    pub fn apply(self, lhs: u32, rhs: u32) -> i64 {
        let (lhs, rhs) = (lhs as i64, rhs as i64);
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => {
                if rhs == 0 {
                    0
                } else {
                    lhs / rhs
                }
            }
        }
    }

    /// Whether operands get a tighter upper bound for this operator
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Accepts the display symbols plus ASCII stand-ins (`x`, `*`, `/`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "add" => Ok(Operator::Add),
            "-" | "sub" => Ok(Operator::Subtract),
            "×" | "x" | "*" | "mul" => Ok(Operator::Multiply),
            "÷" | "/" | "div" => Ok(Operator::Divide),
            other => Err(format!("unknown operator: {other}")),
        }
    }
}

/// Difficulty level, selects operand ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Whether a round is scored and timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Score, streak and the countdown are active
    #[default]
    Ranked,
    /// Problems are checked but nothing is counted
    Practice,
}

/// Round configuration, only changed between rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub operators: Vec<Operator>,
    pub difficulty: Difficulty,
    pub player_name: String,
    pub mode: GameMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            operators: vec![Operator::Add],
            difficulty: Difficulty::Easy,
            player_name: String::new(),
            mode: GameMode::Ranked,
        }
    }
}

impl GameConfig {
    pub fn new(operators: impl IntoIterator<Item = Operator>, difficulty: Difficulty) -> Self {
        let mut config = Self {
            operators: Vec::new(),
            difficulty,
            ..Default::default()
        };
        for op in operators {
            if !config.operators.contains(&op) {
                config.operators.push(op);
            }
        }
        config
    }

    pub fn with_player(mut self, name: &str) -> Self {
        self.player_name = name.to_string();
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_ranked(&self) -> bool {
        self.mode == GameMode::Ranked
    }

    /// Operator recorded on a leaderboard entry: the only one, or the first
    pub fn primary_operator(&self) -> Operator {
        self.operators.first().copied().unwrap_or(Operator::Add)
    }
}

/// A single generated problem. Replaced, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    pub operand1: u32,
    pub operand2: u32,
    pub operator: Operator,
    pub answer: i64,
}

impl MathProblem {
    pub fn new(operand1: u32, operand2: u32, operator: Operator) -> Self {
        Self {
            operand1,
            operand2,
            operator,
            answer: operator.apply(operand1, operand2),
        }
    }
}

impl fmt::Display for MathProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operand1, self.operator, self.operand2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_serde_uses_symbols() {
        let json = serde_json::to_string(&Operator::ALL).unwrap();
        assert_eq!(json, r#"["+","-","×","÷"]"#);

        let back: Vec<Operator> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Operator::ALL.to_vec());
    }

    #[test]
    fn test_operator_parse_ascii() {
        assert_eq!("x".parse::<Operator>(), Ok(Operator::Multiply));
        assert_eq!("/".parse::<Operator>(), Ok(Operator::Divide));
        assert_eq!("÷".parse::<Operator>(), Ok(Operator::Divide));
        assert!("%".parse::<Operator>().is_err());
    }

    #[test]
    fn test_config_dedups_operators() {
        let config = GameConfig::new(
            [Operator::Add, Operator::Add, Operator::Divide],
            Difficulty::Hard,
        );
        assert_eq!(config.operators, vec![Operator::Add, Operator::Divide]);
        assert_eq!(config.primary_operator(), Operator::Add);
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&GameMode::Practice).unwrap(), "\"practice\"");
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"Medium\"");
    }

    #[test]
    fn test_problem_display() {
        let problem = MathProblem::new(12, 3, Operator::Divide);
        assert_eq!(problem.answer, 4);
        assert_eq!(problem.to_string(), "12 ÷ 3");
    }
}
