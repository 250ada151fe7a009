//! Entity component glue for the simulation demos.
//!
//! Components are plain structs over a [`hecs::World`]; systems are free
//! functions the frame loop calls in order. Nothing here touches the GPU:
//! rendering reads the world matrices and draws.

use glam::{Mat4, Vec2, Vec3};

/// 2D position in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec2);

/// 2D velocity in world units per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Velocity(pub Vec2);

/// Local transform: position, XYZ Euler rotation in degrees, scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Builds the local matrix by applying scale, then the XYZ rotations,
    /// then translation to the current matrix in that order.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_translation(self.position)
    }
}

/// Continuous rotation in degrees per second, applied to [`Transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin(pub Vec3);

/// Link to the entity this one is transformed relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parent(pub hecs::Entity);

/// Display name for logs.
#[derive(Clone, Debug, PartialEq)]
pub struct Name(pub String);

/// Advances every [`Position`] by its [`Velocity`] over `dt` seconds.
pub fn advance_positions(world: &mut hecs::World, dt: f32) {
    for (_, (position, velocity)) in world.query_mut::<(&mut Position, &Velocity)>() {
        position.0 += velocity.0 * dt;
    }
}

/// Advances every [`Transform`]'s rotation by its [`Spin`] over `dt` seconds.
pub fn advance_spins(world: &mut hecs::World, dt: f32) {
    for (_, (transform, spin)) in world.query_mut::<(&mut Transform, &Spin)>() {
        transform.rotation += spin.0 * dt;
    }
}

/// Composes the world matrix for `entity` by walking its [`Parent`] chain.
///
/// Entities without a [`Transform`] contribute identity, so a bare grouping
/// parent is legal. The parent graph must be acyclic.
pub fn world_matrix(world: &hecs::World, entity: hecs::Entity) -> Mat4 {
    let local = world
        .get::<&Transform>(entity)
        .map(|t| t.local_matrix())
        .unwrap_or(Mat4::IDENTITY);
    match world.get::<&Parent>(entity).map(|p| p.0).ok() {
        Some(parent) => world_matrix(world, parent) * local,
        None => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_advance_by_velocity() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Position(Vec2::new(10.0, 20.0)),
            Velocity(Vec2::new(1.0, 2.0)),
        ));
        let still = world.spawn((Position(Vec2::ZERO),));

        advance_positions(&mut world, 0.5);

        assert_eq!(
            world.get::<&Position>(entity).unwrap().0,
            Vec2::new(10.5, 21.0)
        );
        assert_eq!(world.get::<&Position>(still).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn test_spins_accumulate_rotation() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::default(), Spin(Vec3::new(0.0, 90.0, 0.0))));

        advance_spins(&mut world, 0.5);
        advance_spins(&mut world, 0.5);

        assert_eq!(
            world.get::<&Transform>(entity).unwrap().rotation,
            Vec3::new(0.0, 90.0, 0.0)
        );
    }

    #[test]
    fn test_local_matrix_translates() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Transform::default()
        };
        let point = transform.local_matrix().transform_point3(Vec3::ZERO);
        assert!(point.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
    }

    #[test]
    fn test_local_matrix_rotates_translation() {
        // Translation is applied to the vertex first, so the rotation swings
        // the offset position around the origin.
        let transform = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
            ..Transform::default()
        };
        let point = transform.local_matrix().transform_point3(Vec3::ZERO);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_world_matrix_composes_parent_chain() {
        let mut world = hecs::World::new();
        let parent = world.spawn((Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            ..Transform::default()
        },));
        let child = world.spawn((
            Transform {
                position: Vec3::new(1.0, 0.0, 0.0),
                ..Transform::default()
            },
            Parent(parent),
        ));

        let point = world_matrix(&world, child).transform_point3(Vec3::ZERO);
        assert!(point.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_world_matrix_applies_parent_rotation_to_child_offset() {
        let mut world = hecs::World::new();
        let parent = world.spawn((Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
            ..Transform::default()
        },));
        let child = world.spawn((
            Transform {
                position: Vec3::new(1.0, 0.0, 0.0),
                ..Transform::default()
            },
            Parent(parent),
        ));

        let point = world_matrix(&world, child).transform_point3(Vec3::ZERO);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn test_world_matrix_missing_parent_transform_is_identity() {
        let mut world = hecs::World::new();
        let parent = world.spawn((Name("group".to_string()),));
        let child = world.spawn((
            Transform {
                position: Vec3::new(3.0, 0.0, 0.0),
                ..Transform::default()
            },
            Parent(parent),
        ));

        let point = world_matrix(&world, child).transform_point3(Vec3::ZERO);
        assert!(point.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }
}
