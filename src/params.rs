use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tuning knobs of the wave engine.
///
/// The shifts are empirically chosen; the defaults give a slow, visibly damped
/// ripple at terminal and image resolutions alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Damped-wave sub-steps per `iterate()`.
    pub substeps: u32,
    /// `vel -= vel >> velocity_damping_shift` after each cell update.
    pub velocity_damping_shift: u32,
    /// `force -= force >> force_damping_shift` after each cell update.
    pub force_damping_shift: u32,
    /// Height gradient is shifted right by this much to get a pixel offset.
    pub gamma_shift: u32,
    /// Split each sub-step across rayon workers by rows.
    pub parallel: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            substeps: 4,
            velocity_damping_shift: 7,
            force_damping_shift: 2,
            gamma_shift: 12,
            parallel: false,
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<()> {
        if self.substeps == 0 {
            return Err(EngineError::InvalidParams(
                "substeps must be at least 1".to_string(),
            ));
        }
        let shifts = [
            ("velocity_damping_shift", self.velocity_damping_shift),
            ("force_damping_shift", self.force_damping_shift),
            ("gamma_shift", self.gamma_shift),
        ];
        for (name, shift) in shifts {
            if shift >= 32 {
                return Err(EngineError::InvalidParams(format!(
                    "{name} must be below 32, got {shift}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = EngineParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.substeps, 4);
        assert_eq!(p.velocity_damping_shift, 7);
        assert_eq!(p.force_damping_shift, 2);
        assert_eq!(p.gamma_shift, 12);
    }

    #[test]
    fn rejects_zero_substeps_and_wide_shifts() {
        let p = EngineParams {
            substeps: 0,
            ..EngineParams::default()
        };
        assert!(matches!(p.validate(), Err(EngineError::InvalidParams(_))));

        let p = EngineParams {
            gamma_shift: 32,
            ..EngineParams::default()
        };
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("gamma_shift"));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let p: EngineParams = serde_json::from_str(r#"{ "gamma_shift": 10 }"#).unwrap();
        assert_eq!(p.gamma_shift, 10);
        assert_eq!(p.substeps, 4);
        assert!(!p.parallel);
    }
}
