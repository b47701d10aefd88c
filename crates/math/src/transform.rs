use glam::{Mat4, Vec3, Vec4};

/// The identity transform.
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// Standard 4x4 product `a * b`.
///
/// Applied to a column vector, `b` acts first and `a` second.
pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    a.mul_mat4(&b)
}

/// Right-handed, OpenGL-style perspective projection (clip z in `[-1, 1]`).
///
/// `fov_y` is the vertical field of view in radians and `aspect` is
/// width / height. Requires `near > 0` and `far > near`.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(near > 0.0, "near plane must be positive, got {near}");
    debug_assert!(far > near, "far plane ({far}) must lie beyond near ({near})");
    debug_assert!(aspect > 0.0, "aspect ratio must be positive, got {aspect}");

    let f = 1.0 / (0.5 * fov_y).tan();
    let nf = 1.0 / (near - far);
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (far + near) * nf, -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near * nf, 0.0),
    )
}

/// View matrix for a camera at `eye` looking at `center`.
///
/// `up` only needs to be approximately up; it must not be parallel to the
/// viewing direction, and `eye` must differ from `center`.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let f = (center - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    Mat4::from_cols(
        Vec4::new(s.x, u.x, -f.x, 0.0),
        Vec4::new(s.y, u.y, -f.y, 0.0),
        Vec4::new(s.z, u.z, -f.z, 0.0),
        Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
    )
}

/// `m * T(v)`.
pub fn translate(m: Mat4, v: Vec3) -> Mat4 {
    let mut out = m;
    out.w_axis = m.x_axis * v.x + m.y_axis * v.y + m.z_axis * v.z + m.w_axis;
    out
}

/// `m * R(axis, angle)` using Rodrigues' rotation formula.
///
/// `axis` is normalized here. A zero-length axis has no defined rotation and
/// leaves `m` unchanged.
pub fn rotate(m: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    let len = axis.length();
    if len == 0.0 {
        return m;
    }
    let n = axis / len;
    let (x, y, z) = (n.x, n.y, n.z);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    let rot = Mat4::from_cols(
        Vec4::new(c + x * x * t, y * x * t + z * s, z * x * t - y * s, 0.0),
        Vec4::new(x * y * t - z * s, c + y * y * t, z * y * t + x * s, 0.0),
        Vec4::new(x * z * t + y * s, y * z * t - x * s, c + z * z * t, 0.0),
        Vec4::W,
    );
    multiply(m, rot)
}

/// `m * S(v)`.
pub fn scale(m: Mat4, v: Vec3) -> Mat4 {
    let mut out = m;
    out.x_axis = m.x_axis * v.x;
    out.y_axis = m.y_axis * v.y;
    out.z_axis = m.z_axis * v.z;
    out
}

/// Applies `m` to the point `p` (w = 1) and divides by the resulting w.
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    let v = m * p.extend(1.0);
    v.truncate() / v.w
}

/// Element-wise comparison within `epsilon`.
pub fn approx_eq(a: Mat4, b: Mat4, epsilon: f32) -> bool {
    a.abs_diff_eq(b, epsilon)
}
