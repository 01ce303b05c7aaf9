use serde::{Deserialize, Serialize};

/// Quadratic glide polar, sink(v) = a v² + b v + c with sink positive down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlidePolar {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Minimum flying speed [m/s]
    pub v_min: f64,
    /// MacCready setting, the expected climb rate in thermals [m/s]
    pub mc: f64,
}

impl Default for GlidePolar {
    /// 15 m class glider, roughly 44:1 at 28 m/s
    fn default() -> Self {
        Self {
            a: 0.0016,
            b: -0.0672,
            c: 1.2556,
            v_min: 18.0,
            mc: 2.0,
        }
    }
}

impl GlidePolar {
    /// Sink rate at true airspeed `v` [m/s, positive down]
    pub fn sink_rate(&self, v: f64) -> f64 {
        self.a * v * v + self.b * v + self.c
    }

    /// Speed of best glide ratio
    pub fn v_best_ld(&self) -> f64 {
        (self.c / self.a).sqrt().max(self.v_min)
    }

    /// Best glide ratio in still air
    pub fn best_ld(&self) -> f64 {
        let v = self.v_best_ld();
        v / self.sink_rate(v)
    }

    /// MacCready speed to fly between thermals
    pub fn speed_to_fly(&self) -> f64 {
        ((self.c + self.mc.max(0.0)) / self.a).sqrt().max(self.v_min)
    }
}
