use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const PARAM_MIN: u8 = 1;
const PARAM_MAX: u8 = 10;

/// Per-waypoint weighting parameters, each an integer in `[1, 10]`.
///
/// The three values fold into one arrival discount,
/// `factor = 1 - (0.8 * p1 + 0.15 * p2 + 0.05 * p3) / 10`: an all-ones
/// waypoint keeps 90% of its inbound costs, an all-tens waypoint becomes
/// free to arrive at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub p1: u8,
    pub p2: u8,
    pub p3: u8,
}

impl Parameters {
    /// Validating constructor.
    pub fn new(p1: u8, p2: u8, p3: u8) -> Result<Self> {
        let params = Self { p1, p2, p3 };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("p1", self.p1), ("p2", self.p2), ("p3", self.p3)] {
            if !(PARAM_MIN..=PARAM_MAX).contains(&value) {
                return Err(Error::invalid_parameter(format!(
                    "{name} = {value} is outside [{PARAM_MIN}, {PARAM_MAX}]"
                )));
            }
        }
        Ok(())
    }

    /// Arrival discount factor for this waypoint.
    ///
    /// Computed over an integer numerator so the boundary values are
    /// exact: all-ones gives 0.9, all-tens gives 0.
    pub fn factor(&self) -> f64 {
        let weighted =
            800 * u32::from(self.p1) + 150 * u32::from(self.p2) + 50 * u32::from(self.p3);
        1.0 - f64::from(weighted) / 10_000.0
    }
}
