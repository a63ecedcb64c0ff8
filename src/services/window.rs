use crate::models::lighting::CommonParameters;

/// Decides, hour by hour, whether supplemental lighting may run.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityRule {
    pub window_start: u32,
    pub window_duration: u32,
    pub radiation_setpoint_w_m2: f64,
    pub temp_setpoint_c: f64,
}

impl EligibilityRule {
    pub fn new(common: &CommonParameters, temp_setpoint_c: f64) -> Self {
        Self {
            window_start: common.window_start,
            window_duration: common.window_duration,
            radiation_setpoint_w_m2: common.radiation_setpoint_w_m2,
            temp_setpoint_c,
        }
    }

    /// `[start, start + duration]`, both ends included, so a 16 h duration
    /// opens a 17 h window. The window never wraps past midnight.
    pub fn in_window(&self, hour: u32) -> bool {
        let end = self
            .window_start
            .saturating_add(self.window_duration)
            .saturating_add(1);
        hour >= self.window_start && hour < end
    }

    /// Window open, sun below the radiation setpoint and no daytime
    /// overheating. Absent samples make their comparisons false: missing
    /// irradiance closes the hour, missing temperature never counts as
    /// overheating.
    pub fn is_eligible(&self, hour: u32, temp: Option<f64>, shaded: Option<f64>) -> bool {
        let below_setpoint = shaded.is_some_and(|s| s < self.radiation_setpoint_w_m2);
        let overheating = temp.is_some_and(|t| t > self.temp_setpoint_c)
            && shaded.is_some_and(|s| s != 0.0);

        self.in_window(hour) && below_setpoint && !overheating
    }
}
