//! Minimal world for the demo: static boxes and a mobile robot with planar joints,
//! with pairwise collision checks.
//!
//! Bodies and joints are referred to by opaque indices. The world owns all the state;
//! rendering is not performed, but the viewer-related calls (render lock, waiting) keep
//! their meaning so the demo reads the same with or without a display.

use std::fmt;
use std::io::BufRead;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use parry3d::bounding_volume::{Aabb, BoundingVolume};
use parry3d::shape::SharedShape;
use tracing::{debug, info};

use crate::parameter_error::ParameterError;

/// RGBA colors (alpha is transparency)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

pub const RED: Rgba = Rgba([1.0, 0.0, 0.0, 1.0]);
pub const TAN: Rgba = Rgba([0.824, 0.706, 0.549, 1.0]);
pub const GREY: Rgba = Rgba([0.5, 0.5, 0.5, 1.0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Index of the joint within its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    PrismaticX,
    PrismaticY,
    RevoluteZ,
}

impl JointKind {
    fn transform(&self, value: f64) -> Isometry3<f64> {
        match self {
            JointKind::PrismaticX => Isometry3::translation(value, 0.0, 0.0),
            JointKind::PrismaticY => Isometry3::translation(0.0, value, 0.0),
            JointKind::RevoluteZ => Isometry3::rotation(Vector3::z() * value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JointSpec {
    pub name: String,
    pub kind: JointKind,
    /// None for unlimited joints
    pub limits: Option<(f64, f64)>,
}

/// Collision shape with its placement in the body frame
#[derive(Clone)]
pub struct ShapeSpec {
    pub local: Isometry3<f32>,
    pub shape: SharedShape,
}

/// Everything needed to add a robot to the world.
#[derive(Clone)]
pub struct RobotModel {
    pub name: String,
    /// Applied in this order, each in the frame of the previous one
    pub joints: Vec<JointSpec>,
    pub shapes: Vec<ShapeSpec>,
    pub color: Rgba,
}

impl RobotModel {
    /// Turtlebot with explicit joints representing x, y and theta of the mobile base.
    /// The body is a cylinder standing on the body origin.
    pub fn turtlebot() -> Self {
        let radius = 0.177;
        let height = 0.42;
        // Cylinders are along Y, turn it to stand along Z
        let standing = Isometry3::from_parts(
            Translation3::new(0.0, 0.0, height / 2.0),
            UnitQuaternion::from_euler_angles(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
        );
        RobotModel {
            name: "turtlebot".to_string(),
            joints: vec![
                JointSpec { name: "x".to_string(), kind: JointKind::PrismaticX, limits: None },
                JointSpec { name: "y".to_string(), kind: JointKind::PrismaticY, limits: None },
                JointSpec { name: "theta".to_string(), kind: JointKind::RevoluteZ, limits: None },
            ],
            shapes: vec![ShapeSpec { local: standing, shape: SharedShape::cylinder(height / 2.0, radius) }],
            color: GREY,
        }
    }
}

struct Joint {
    spec: JointSpec,
    position: f64,
}

struct Body {
    name: String,
    pose: Isometry3<f64>,
    joints: Vec<Joint>,
    shapes: Vec<ShapeSpec>,
    color: Rgba,
}

impl Body {
    /// Pose of the geometry after all joints are applied
    fn link_pose(&self) -> Isometry3<f64> {
        self.joints.iter()
            .fold(self.pose, |pose, joint| pose * joint.spec.kind.transform(joint.position))
    }

    fn placed_shapes(&self) -> impl Iterator<Item = (Isometry3<f32>, &SharedShape)> {
        let link: Isometry3<f32> = self.link_pose().cast::<f32>();
        self.shapes.iter().map(move |spec| (link * spec.local, &spec.shape))
    }

    fn aabb(&self) -> Option<Aabb> {
        self.placed_shapes()
            .map(|(pose, shape)| shape.compute_aabb(&pose))
            .reduce(|a, b| a.merged(&b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldConfig {
    /// With the viewer, waits take real time and `wait_for_user` blocks on stdin.
    pub gui: bool,
}

pub struct World {
    config: WorldConfig,
    bodies: Vec<Body>,
    render_locked: bool,
    output_hidden: bool,
    redraws: usize,
}

const SUPPORTED: &str = "Intersection of convex shapes should be supported by Parry3d";

impl World {
    /// Creates an empty world and, if configured, a viewer for it
    pub fn connect(config: WorldConfig) -> Self {
        info!("Connected, gui: {}", config.gui);
        World { config, bodies: Vec::new(), render_locked: false, output_hidden: false, redraws: 0 }
    }

    /// Destroys the world
    pub fn disconnect(self) {
        info!("Disconnected, {} bodies removed", self.bodies.len());
    }

    /// Number of times the viewer would have been refreshed
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    fn changed(&mut self) {
        if !self.render_locked {
            self.redraws += 1;
        }
    }

    fn body(&self, id: BodyId) -> Result<&Body, ParameterError> {
        self.bodies.get(id.0).ok_or(ParameterError::UnknownBody(id.0))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, ParameterError> {
        self.bodies.get_mut(id.0).ok_or(ParameterError::UnknownBody(id.0))
    }

    fn add(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        self.changed();
        BodyId(self.bodies.len() - 1)
    }

    /// Box of the given width (x), length (y) and height (z), centered on the body origin.
    pub fn create_box(&mut self, w: f64, l: f64, h: f64, color: Rgba) -> BodyId {
        let shape = SharedShape::cuboid(w as f32 / 2.0, l as f32 / 2.0, h as f32 / 2.0);
        let id = self.add(Body {
            name: format!("box{}", self.bodies.len()),
            pose: Isometry3::identity(),
            joints: Vec::new(),
            shapes: vec![ShapeSpec { local: Isometry3::identity(), shape }],
            color,
        });
        debug!("Created {}x{}x{} box, {}", w, l, h, id);
        id
    }

    pub fn load_model(&mut self, model: &RobotModel) -> BodyId {
        let id = self.add(Body {
            name: model.name.clone(),
            pose: Isometry3::identity(),
            joints: model.joints.iter()
                .map(|spec| Joint { spec: spec.clone(), position: 0.0 })
                .collect(),
            shapes: model.shapes.clone(),
            color: model.color,
        });
        if !self.output_hidden {
            info!("Loaded {} with {} joints as {}", model.name, model.joints.len(), id);
        }
        id
    }

    /// Sets the [x,y,z] translation of the body, keeping its orientation
    pub fn set_point(&mut self, id: BodyId, point: [f64; 3]) -> Result<(), ParameterError> {
        self.body_mut(id)?.pose.translation = Translation3::new(point[0], point[1], point[2]);
        self.changed();
        Ok(())
    }

    pub fn get_point(&self, id: BodyId) -> Result<[f64; 3], ParameterError> {
        let t = self.body(id)?.pose.translation.vector;
        Ok([t.x, t.y, t.z])
    }

    /// Sets the [roll,pitch,yaw] orientation of the body, keeping its position
    pub fn set_euler(&mut self, id: BodyId, euler: [f64; 3]) -> Result<(), ParameterError> {
        self.body_mut(id)?.pose.rotation = UnitQuaternion::from_euler_angles(euler[0], euler[1], euler[2]);
        self.changed();
        Ok(())
    }

    pub fn get_euler(&self, id: BodyId) -> Result<[f64; 3], ParameterError> {
        let (roll, pitch, yaw) = self.body(id)?.pose.rotation.euler_angles();
        Ok([roll, pitch, yaw])
    }

    /// The z offset required for `body` to be placed on top of `surface`.
    pub fn stable_z(&self, body: BodyId, surface: BodyId) -> Result<f64, ParameterError> {
        let body_ref = self.body(body)?;
        let body_aabb = body_ref.aabb()
            .ok_or_else(|| ParameterError::KinematicsConfigurationError(format!("{} has no shape", body)))?;
        let surface_aabb = self.body(surface)?.aabb()
            .ok_or_else(|| ParameterError::KinematicsConfigurationError(format!("{} has no shape", surface)))?;
        let z = body_ref.pose.translation.z;
        Ok(surface_aabb.maxs.z as f64 + (z - body_aabb.mins.z as f64))
    }

    /// Logs joint and shape information about the body
    pub fn dump_body(&self, id: BodyId) -> Result<(), ParameterError> {
        let body = self.body(id)?;
        info!("Body: {} | Name: {} | Joints: {} | Shapes: {} | Color: {:?}",
            id.0, body.name, body.joints.len(), body.shapes.len(), body.color.0);
        for (index, joint) in body.joints.iter().enumerate() {
            info!("Joint id: {} | Name: {} | Type: {:?} | Limits: {:?} | Position: {:.5}",
                index, joint.spec.name, joint.spec.kind, joint.spec.limits, joint.position);
        }
        if let Some(aabb) = body.aabb() {
            info!("AABB: {:?} .. {:?}", aabb.mins.coords.as_slice(), aabb.maxs.coords.as_slice());
        }
        Ok(())
    }

    /// Looks up the robot joint with the given name
    pub fn joint_from_name(&self, id: BodyId, name: &str) -> Result<JointId, ParameterError> {
        self.body(id)?.joints.iter()
            .position(|joint| joint.spec.name == name)
            .map(JointId)
            .ok_or_else(|| ParameterError::UnknownJoint(name.to_string()))
    }

    /// Sets the current value of the joint. Limits are not enforced.
    pub fn set_joint_position(&mut self, id: BodyId, joint: JointId, value: f64) -> Result<(), ParameterError> {
        let joint = self.body_mut(id)?.joints.get_mut(joint.0)
            .ok_or_else(|| ParameterError::UnknownJoint(format!("#{}", joint.0)))?;
        joint.position = value;
        self.changed();
        Ok(())
    }

    pub fn get_joint_positions(&self, id: BodyId, joints: &[JointId]) -> Result<Vec<f64>, ParameterError> {
        let body = self.body(id)?;
        joints.iter()
            .map(|joint| body.joints.get(joint.0)
                .map(|j| j.position)
                .ok_or_else(|| ParameterError::UnknownJoint(format!("#{}", joint.0))))
            .collect()
    }

    /// Checks whether any shape of one body intersects any shape of the other.
    pub fn pairwise_collision(&self, a: BodyId, b: BodyId) -> Result<bool, ParameterError> {
        let body_a = self.body(a)?;
        let body_b = self.body(b)?;
        for (pose_a, shape_a) in body_a.placed_shapes() {
            for (pose_b, shape_b) in body_b.placed_shapes() {
                if parry3d::query::intersection_test(&pose_a, &**shape_a, &pose_b, &**shape_b)
                    .expect(SUPPORTED) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Temporarily prevents the viewer from updating, until the guard is dropped.
    pub fn lock_renderer(&mut self) -> RenderLock<'_> {
        let previous = self.render_locked;
        self.render_locked = true;
        RenderLock { world: self, previous }
    }

    /// Temporarily suppresses informational output of the world, until the guard is dropped.
    pub fn hide_output(&mut self) -> HiddenOutput<'_> {
        let previous = self.output_hidden;
        self.output_hidden = true;
        HiddenOutput { world: self, previous }
    }

    /// Like sleep() but also updates the viewer. Returns immediately without one.
    pub fn wait_for_duration(&mut self, duration: Duration) {
        self.changed();
        if self.config.gui {
            std::thread::sleep(duration);
        } else {
            debug!("Skipping wait of {:?} without viewer", duration);
        }
    }

    /// Blocks until the user presses enter. Returns immediately without viewer.
    pub fn wait_for_user(&mut self) -> Result<(), ParameterError> {
        self.changed();
        if self.config.gui {
            info!("Press enter to continue");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
        }
        Ok(())
    }
}

/// Guard returned by `World::lock_renderer`
pub struct RenderLock<'w> {
    world: &'w mut World,
    previous: bool,
}

impl Deref for RenderLock<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for RenderLock<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for RenderLock<'_> {
    fn drop(&mut self) {
        self.world.render_locked = self.previous;
        self.world.changed();
    }
}

/// Guard returned by `World::hide_output`
pub struct HiddenOutput<'w> {
    world: &'w mut World,
    previous: bool,
}

impl Deref for HiddenOutput<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for HiddenOutput<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for HiddenOutput<'_> {
    fn drop(&mut self) {
        self.world.output_hidden = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn floor_and_robot(world: &mut World) -> (BodyId, BodyId) {
        let floor = world.create_box(2.0, 2.0, 0.001, TAN);
        world.set_point(floor, [0.0, 0.0, -0.001 / 2.0]).unwrap();
        let robot = world.load_model(&RobotModel::turtlebot());
        (floor, robot)
    }

    #[test]
    fn test_stable_z_on_floor() {
        let mut world = World::connect(WorldConfig::default());
        let (floor, robot) = floor_and_robot(&mut world);
        let z = world.stable_z(robot, floor).unwrap();
        assert!(z.abs() < 1E-5, "Robot origin is at its bottom, floor top is at 0: {}", z);

        world.set_point(floor, [0.0, 0.0, 0.5]).unwrap();
        let z = world.stable_z(robot, floor).unwrap();
        assert!((z - 0.5005).abs() < 1E-5, "{}", z);
    }

    #[test]
    fn test_point_and_euler() {
        let mut world = World::connect(WorldConfig::default());
        let obstacle = world.create_box(0.5, 0.5, 0.1, RED);
        world.set_point(obstacle, [0.5, 0.5, 0.05]).unwrap();
        world.set_euler(obstacle, [0.0, 0.0, PI / 4.0]).unwrap();
        assert_eq!(world.get_point(obstacle).unwrap(), [0.5, 0.5, 0.05]);
        let euler = world.get_euler(obstacle).unwrap();
        assert!(euler[0].abs() < 1E-12 && euler[1].abs() < 1E-12);
        assert!((euler[2] - PI / 4.0).abs() < 1E-12);
    }

    #[test]
    fn test_joints() {
        let mut world = World::connect(WorldConfig::default());
        let robot = world.load_model(&RobotModel::turtlebot());
        let x = world.joint_from_name(robot, "x").unwrap();
        let theta = world.joint_from_name(robot, "theta").unwrap();
        assert!(matches!(world.joint_from_name(robot, "z"), Err(ParameterError::UnknownJoint(_))));

        world.set_joint_position(robot, x, 0.25).unwrap();
        world.set_joint_position(robot, theta, -1.0).unwrap();
        assert_eq!(world.get_joint_positions(robot, &[x, theta]).unwrap(), vec![0.25, -1.0]);
        assert!(world.get_joint_positions(robot, &[JointId(7)]).is_err());
        assert!(matches!(world.get_point(BodyId(9)), Err(ParameterError::UnknownBody(9))));
    }

    #[test]
    fn test_collision_follows_joints() {
        let mut world = World::connect(WorldConfig::default());
        let (floor, robot) = floor_and_robot(&mut world);
        let obstacle = world.create_box(0.5, 0.5, 0.1, RED);
        world.set_point(obstacle, [0.5, 0.5, 0.05]).unwrap();
        world.set_euler(obstacle, [0.0, 0.0, PI / 4.0]).unwrap();
        let z = world.stable_z(robot, floor).unwrap();
        world.set_point(robot, [0.0, 0.0, z + 0.001]).unwrap();

        let x = world.joint_from_name(robot, "x").unwrap();
        let y = world.joint_from_name(robot, "y").unwrap();

        assert!(!world.pairwise_collision(robot, obstacle).unwrap());
        world.set_joint_position(robot, x, 0.5).unwrap();
        world.set_joint_position(robot, y, 0.5).unwrap();
        assert!(world.pairwise_collision(robot, obstacle).unwrap());
        assert!(world.pairwise_collision(obstacle, robot).unwrap());

        world.set_joint_position(robot, x, -0.9).unwrap();
        world.set_joint_position(robot, y, -0.9).unwrap();
        assert!(!world.pairwise_collision(robot, obstacle).unwrap());
    }

    #[test]
    fn test_guards_restore_state() {
        let mut world = World::connect(WorldConfig::default());
        let before = world.redraws();
        {
            let mut locked = world.lock_renderer();
            let mut hidden = locked.hide_output();
            let robot = hidden.load_model(&RobotModel::turtlebot());
            hidden.set_point(robot, [0.0, 0.0, 0.1]).unwrap();
            assert!(hidden.output_hidden && hidden.render_locked);
        }
        assert!(!world.output_hidden && !world.render_locked);
        // Only the unlock itself refreshes the viewer
        assert_eq!(world.redraws(), before + 1);
    }
}
