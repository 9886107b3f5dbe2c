use serde::{Deserialize, Deserializer, Serialize};

/// One step of a cutting plan. `Cut` is the operation being minimized;
/// `Assign` hands whole or already-cut pieces to a demand and is free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Assign { pieces: Vec<u64>, demand: u64 },
    Cut { piece: u64, take: u64, rest: u64 },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Assign { pieces, demand } => {
                write!(f, "distribute {pieces:?} to demand {demand}")
            }
            Action::Cut { piece, take, rest } => {
                write!(f, "cut {piece} into {take} + {rest}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub cuts: u64,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Infeasible,
    Solved(Plan),
}

impl Outcome {
    pub fn cuts(&self) -> Option<u64> {
        match self {
            Outcome::Infeasible => None,
            Outcome::Solved(plan) => Some(plan.cuts),
        }
    }
}

/// Accepts JSON arrays whose numbers arrive float-typed (e.g. `5.0` from JS
/// clients) and converts them when integral.
pub fn deserialize_lengths<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<f64>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|v| {
            if v.fract() == 0.0 && v >= 0.0 && v <= u64::MAX as f64 {
                Ok(v as u64)
            } else {
                Err(serde::de::Error::custom(format!("invalid length {v}")))
            }
        })
        .collect()
}
