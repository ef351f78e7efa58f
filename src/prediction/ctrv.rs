// src/prediction/ctrv.rs
//
// Constant Turn-Rate and Velocity model. Closed-form integration, so one
// call per sample rather than stepwise Euler; the straight-line branch
// avoids the divide-by-zero as the yaw rate vanishes.

/// One swept-path centerline sample.
#[derive(Debug, Clone, Copy)]
pub struct PathSample {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

/// Below this yaw rate (rad/s) the arc is numerically indistinguishable
/// from a straight line.
const YAW_RATE_FLOOR: f64 = 0.01;

/// Predict the pose `dt` seconds ahead under constant speed and steering.
///
/// Positive steering angle turns the nose to the right in this convention,
/// hence the negative sign on the yaw rate.
pub fn predict_position(
    start: &PathSample,
    speed_mps: f64,
    steering_angle_rad: f64,
    wheelbase_m: f64,
    dt: f64,
) -> PathSample {
    let yaw_rate = -speed_mps / wheelbase_m * steering_angle_rad.tan();
    let yaw_next = start.yaw + yaw_rate * dt;

    let (x, y) = if yaw_rate.abs() > YAW_RATE_FLOOR {
        (
            start.x + speed_mps / yaw_rate * (yaw_next.sin() - start.yaw.sin()),
            start.y + speed_mps / yaw_rate * (start.yaw.cos() - yaw_next.cos()),
        )
    } else {
        (
            start.x + speed_mps * dt * start.yaw.cos(),
            start.y + speed_mps * dt * start.yaw.sin(),
        )
    };

    PathSample {
        x,
        y,
        yaw: yaw_next.sin().atan2(yaw_next.cos()),
    }
}

/// Integrate the centerline over `n_steps + 1` uniform samples on
/// `[0, horizon]`, the t = 0 sample included.
pub fn predict_path(
    start: &PathSample,
    speed_mps: f64,
    steering_angle_rad: f64,
    wheelbase_m: f64,
    horizon_s: f64,
    n_steps: usize,
) -> Vec<PathSample> {
    (0..=n_steps)
        .map(|k| {
            let t = horizon_s * k as f64 / n_steps as f64;
            predict_position(start, speed_mps, steering_angle_rad, wheelbase_m, t)
        })
        .collect()
}
