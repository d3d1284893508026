// src/types.rs
//
// Common shared types for the fareflow decision core.

use serde::{Deserialize, Serialize};

/// Normalized market state for one pricing decision.
///
/// On the wire a state is a bare JSON array `[price_norm, demand_estimate,
/// days_until_departure]`, which is what trainers and the serving surface
/// exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 3]", from = "[f64; 3]")]
pub struct State {
    /// Normalized price level in [0, 1], where 1 corresponds to the price cap.
    pub price_norm: f64,
    /// Estimated demand in [0, 1].
    pub demand_estimate: f64,
    /// Days until departure, in [0, 365]. Non-increasing within an episode.
    pub days_until_departure: f64,
}

impl State {
    pub fn to_array(&self) -> [f64; 3] {
        [
            self.price_norm,
            self.demand_estimate,
            self.days_until_departure,
        ]
    }

    /// Whether all components are finite and within their documented ranges.
    pub fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.price_norm)
            && (0.0..=1.0).contains(&self.demand_estimate)
            && (0.0..=365.0).contains(&self.days_until_departure)
    }
}

impl From<State> for [f64; 3] {
    fn from(s: State) -> Self {
        s.to_array()
    }
}

impl From<[f64; 3]> for State {
    fn from(v: [f64; 3]) -> Self {
        Self {
            price_norm: v[0],
            demand_estimate: v[1],
            days_until_departure: v[2],
        }
    }
}

/// Discrete price adjustment.
///
/// Serialized as its ordinal (0..4). The actual multipliers applied by the
/// environment live in `EnvConfig::action_multipliers`; the defaults match
/// the labels here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Action {
    Down10,
    Down5,
    Hold,
    Up5,
    Up10,
}

impl Action {
    pub const COUNT: usize = 5;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Down10,
        Action::Down5,
        Action::Hold,
        Action::Up5,
        Action::Up10,
    ];

    /// Ordinal index used on the wire and in Q-value tables.
    pub fn index(&self) -> usize {
        match self {
            Action::Down10 => 0,
            Action::Down5 => 1,
            Action::Hold => 2,
            Action::Up5 => 3,
            Action::Up10 => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// Human-readable adjustment label for explanations and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Down10 => "-10%",
            Action::Down5 => "-5%",
            Action::Hold => "0%",
            Action::Up5 => "+5%",
            Action::Up10 => "+10%",
        }
    }
}

impl From<Action> for u8 {
    fn from(a: Action) -> Self {
        a.index() as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Action::from_index(v as usize).ok_or_else(|| format!("action out of range: {v}"))
    }
}

/// One recorded environment step, used as a training example.
///
/// Immutable once created. The observation store serializes this as a single
/// JSON line:
/// `{"state":[...],"action":1,"reward":0.0,"next_state":[...],"done":true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: f64,
    pub next_state: State,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_as_bare_array() {
        let s = State {
            price_norm: 0.5,
            demand_estimate: 0.25,
            days_until_departure: 30.0,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[0.5,0.25,30.0]");

        let parsed: State = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, s);
    }

    #[test]
    fn action_serializes_as_ordinal() {
        for (i, action) in Action::ALL.iter().enumerate() {
            let json = serde_json::to_string(action).unwrap();
            assert_eq!(json, i.to_string());

            let parsed: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, *action);
        }
    }

    #[test]
    fn action_rejects_out_of_range_ordinal() {
        let parsed: Result<Action, _> = serde_json::from_str("5");
        assert!(parsed.is_err());
    }

    #[test]
    fn transition_round_trip() {
        let t = Transition {
            state: State {
                price_norm: 0.6,
                demand_estimate: 0.4,
                days_until_departure: 12.0,
            },
            action: Action::Down5,
            reward: 1520.0,
            next_state: State {
                price_norm: 0.58,
                demand_estimate: 0.41,
                days_until_departure: 11.0,
            },
            done: true,
        };

        let json = serde_json::to_string(&t).unwrap();
        let parsed: Transition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn transition_wire_field_names() {
        let t = Transition {
            state: State {
                price_norm: 0.5,
                demand_estimate: 0.5,
                days_until_departure: 10.0,
            },
            action: Action::Hold,
            reward: 0.0,
            next_state: State {
                price_norm: 0.5,
                demand_estimate: 0.5,
                days_until_departure: 9.0,
            },
            done: true,
        };
        let value: serde_json::Value = serde_json::to_value(&t).unwrap();
        assert!(value.get("state").unwrap().is_array());
        assert_eq!(value.get("action").unwrap(), 2);
        assert!(value.get("next_state").unwrap().is_array());
        assert_eq!(value.get("done").unwrap(), true);
    }

    #[test]
    fn state_bounds() {
        let ok = State {
            price_norm: 0.0,
            demand_estimate: 1.0,
            days_until_departure: 365.0,
        };
        assert!(ok.in_bounds());

        let bad = State {
            price_norm: 1.2,
            demand_estimate: 0.5,
            days_until_departure: 10.0,
        };
        assert!(!bad.in_bounds());
    }
}
