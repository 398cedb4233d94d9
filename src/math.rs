use std::f64::consts::TAU;

/// Position in the pendulum's own oscillation plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
}

/// Position in the Earth-fixed drawing frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
}

impl LocalPosition {
    pub fn new(x: f64, y: f64) -> Self {
        LocalPosition { x, y }
    }
}

impl WorldPosition {
    pub fn new(x: f64, y: f64) -> Self {
        WorldPosition { x, y }
    }
}

impl From<WorldPosition> for LocalPosition {
    fn from(p: WorldPosition) -> Self {
        LocalPosition::new(p.x, p.y)
    }
}

/// Reference frame used to draw the pendulum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FrameMode {
    /// The swing plane rotates over a fixed floor
    #[default]
    Normal,
    /// The swing plane stays put and the floor rotates beneath it
    Fixed,
}

impl FrameMode {
    pub fn toggled(self) -> Self {
        match self {
            FrameMode::Normal => FrameMode::Fixed,
            FrameMode::Fixed => FrameMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameMode::Normal => "Normal",
            FrameMode::Fixed => "Fixed",
        }
    }
}

/// Builds the 2x2 counter-clockwise rotation matrix for `angle` radians
pub fn rotation_matrix(angle: f64) -> [[f64; 2]; 2] {
    let (sin_a, cos_a) = angle.sin_cos();
    [[cos_a, -sin_a], [sin_a, cos_a]]
}

/// Multiplies a 2x2 matrix by a 2-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 2]; 2], vector: &[f64; 2]) -> [f64; 2] {
    let mut result = [0.0; 2];
    for i in 0..2 {
        for j in 0..2 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Rotates `(x, y)` by `angle` radians about the origin
pub fn rotate(x: f64, y: f64, angle: f64) -> [f64; 2] {
    multiply_matrix_vector(&rotation_matrix(angle), &[x, y])
}

/// Rotation applied to the pendulum trace for a given precession angle
pub fn pendulum_rotation(theta: f64, mode: FrameMode) -> f64 {
    match mode {
        FrameMode::Normal => theta,
        FrameMode::Fixed => 0.0,
    }
}

/// Rotation applied to the Earth-frame markers (compass, floor grid)
///
/// `pendulum_rotation(θ, m) - frame_rotation(θ, m) == θ` holds for both
/// modes, so the angle between swing plane and floor never depends on the
/// drawing convention.
pub fn frame_rotation(theta: f64, mode: FrameMode) -> f64 {
    match mode {
        FrameMode::Normal => 0.0,
        FrameMode::Fixed => -theta,
    }
}

/// Transforms a local-plane position into the drawing frame
pub fn to_world(local: LocalPosition, theta: f64, mode: FrameMode) -> WorldPosition {
    let [x, y] = rotate(local.x, local.y, pendulum_rotation(theta, mode));
    WorldPosition { x, y }
}

/// Wraps an angle into `[0, 2π)` for display
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
