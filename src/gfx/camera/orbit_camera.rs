use cgmath::{
    perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3,
};

/// Remaps OpenGL clip depth `[-1, 1]` to the `[0, 1]` range wgpu expects
#[rustfmt::skip]
pub const GL_TO_WGPU_DEPTH: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera block as bound by a host's shaders. The eye is padded to a `vec4`
/// to keep the 16 byte alignment of the matrix that follows.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest absolute elevation in radians
    pub pitch_limit: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 0.05,
            max_distance: 50.0,
            pitch_limit: std::f32::consts::FRAC_PI_2 - 0.01,
        }
    }
}

/// Y-up camera circling `target`.
///
/// `pitch` is the elevation above the XZ plane and `yaw` the heading around Y,
/// measured from +Z towards +X. [`OrbitCamera::look_from`] places the eye
/// exactly, so named views report the precise position they were given even
/// when it lies outside the orbit limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub limits: OrbitLimits,
}

impl OrbitCamera {
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            target,
            up: Vector3::unit_y(),
            distance: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            fovy: Deg(50.0).into(),
            aspect,
            znear: 0.1,
            zfar: 1000.0,
            limits: OrbitLimits::default(),
        };
        camera.look_from(eye, target);
        camera
    }

    /// Snap to an explicit eye/target pair. The spherical parameters are
    /// recovered from the offset so later orbiting continues from here.
    pub fn look_from(&mut self, eye: Vector3<f32>, target: Vector3<f32>) {
        let offset = eye - target;
        let distance = offset.magnitude();
        self.target = target;

        if distance <= f32::EPSILON {
            // Coincident points: back off along +Z
            self.distance = self.limits.min_distance.max(1.0);
            self.pitch = 0.0;
            self.yaw = 0.0;
            self.place_eye();
            return;
        }

        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
        self.eye = eye;
        self.up = screen_up(target - eye, self.yaw);
    }

    /// Rotate around the target. Pitch stops just short of the poles.
    pub fn orbit_by(&mut self, yaw: f32, pitch: f32) {
        let limit = self.limits.pitch_limit;
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-limit, limit);
        self.place_eye();
    }

    /// Multiplicative zoom: positive `delta` backs away from the target
    pub fn zoom_by(&mut self, delta: f32) {
        let factor = (1.0 + delta * 0.1).max(0.1);
        self.distance =
            (self.distance * factor).clamp(self.limits.min_distance, self.limits.max_distance);
        self.place_eye();
    }

    /// Shift eye and target together across the view plane. The step scales
    /// with distance so panning feels the same at every zoom level.
    pub fn pan_by(&mut self, right: f32, up: f32) {
        let forward = (self.target - self.eye).normalize();
        let screen_right = forward.cross(self.up).normalize();
        let screen_up = screen_right.cross(forward);
        let step = (screen_right * right + screen_up * up) * (self.distance * 0.1);
        self.eye += step;
        self.target += step;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(self.eye), Point3::from_vec(self.target), self.up)
    }

    /// OpenGL-convention projection, used for unprojecting picks
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Clip-space transform with wgpu depth conventions
    pub fn view_projection(&self) -> Matrix4<f32> {
        GL_TO_WGPU_DEPTH * self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.eye.extend(1.0).into(),
            view_proj: self.view_projection().into(),
        }
    }

    fn place_eye(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.eye = self.target
            + Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance;
        self.up = screen_up(self.target - self.eye, self.yaw);
    }
}

/// World +Y, unless looking almost straight along it. At the poles the
/// screen-up axis follows the yaw so the image does not flip.
fn screen_up(forward: Vector3<f32>, yaw: f32) -> Vector3<f32> {
    if forward.magnitude2() <= f32::EPSILON {
        return Vector3::unit_y();
    }
    let alignment = forward.normalize().y;
    let heading = Vector3::new(yaw.sin(), 0.0, yaw.cos());
    if alignment < -0.999 {
        -heading
    } else if alignment > 0.999 {
        heading
    } else {
        Vector3::unit_y()
    }
}
