use crate::{
    dual::{BufferSpan, TileBuffers, TileSet},
    error::Error,
    mesh::Mesh,
    tile::Tile,
};
use log::debug;

/// Idle spin of the planet, in radians per second.
const SPIN_RATE: f32 = 0.5;

/// A tiled planet: the subdivided icosphere, its dual tiling and the render
/// buffers, assembled once at construction.
///
/// After construction the topology is frozen; the only mutation allowed is
/// repainting tiles, which touches pre-existing buffer regions and reports
/// the spans to re-upload. The planet performs no camera logic of its own;
/// projection and view matrices are supplied per frame.
pub struct Planet {
    mesh: Mesh,
    tiles: TileSet,
    angle: f32,
}

impl Planet {
    /// Build a planet from the given number of subdivision rounds. Round 0
    /// is the bare icosahedron with its 12 pentagonal tiles.
    pub fn new(rounds: usize) -> Result<Self, Error> {
        let mesh = Mesh::icosphere(rounds)?;
        debug!(
            "icosphere after {} rounds: {} vertices, {} edges, {} faces",
            rounds,
            mesh.num_vertices(),
            mesh.num_edges(),
            mesh.num_faces()
        );
        let tiles = mesh.dual_tiles()?;
        debug!(
            "extracted {} tiles, {} of them pentagons",
            tiles.num_tiles(),
            tiles.tiles().iter().filter(|t| t.sides() == 5).count()
        );
        Ok(Planet {
            mesh,
            tiles,
            angle: 0.0,
        })
    }

    /// The subdivided primal mesh the tiling was derived from.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.num_tiles()
    }

    pub fn tiles(&self) -> &[Tile] {
        self.tiles.tiles()
    }

    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.tile(id)
    }

    /// The flattened render buffers of the tiled surface.
    pub fn buffers(&self) -> &TileBuffers {
        self.tiles.buffers()
    }

    /// Advance the idle spin.
    pub fn update(&mut self, dt: f32) {
        self.angle += dt * SPIN_RATE;
    }

    /// The model transform of the spinning planet.
    pub fn model_transform(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_y(self.angle)
    }

    /// Combine externally supplied projection and view matrices with the
    /// planet's own model transform.
    pub fn mvp(&self, proj: &glam::Mat4, view: &glam::Mat4) -> glam::Mat4 {
        *proj * *view * self.model_transform()
    }

    /// The tile whose center lies closest to the given direction from the
    /// planet center.
    pub fn nearest_tile(&self, dir: glam::Vec3) -> Option<u32> {
        let dir = dir.normalize_or_zero();
        self.tiles
            .tiles()
            .iter()
            .max_by(|a, b| {
                a.pos()
                    .dot(dir)
                    .partial_cmp(&b.pos().dot(dir))
                    .expect("Tile centers must be comparable")
            })
            .map(|t| t.id())
    }

    /// Repaint one tile. Returns the touched span of the color buffer.
    pub fn paint_tile(&mut self, id: u32, color: glam::Vec3) -> Option<BufferSpan> {
        self.tiles.paint_tile(id, color)
    }

    /// Repaint the two tiles at the poles. Returns the touched spans of the
    /// color buffer.
    pub fn paint_poles(&mut self, color: glam::Vec3) -> Vec<BufferSpan> {
        let ids: Vec<u32> = [glam::Vec3::Y, -glam::Vec3::Y]
            .iter()
            .filter_map(|dir| self.nearest_tile(*dir))
            .collect();
        ids.into_iter()
            .filter_map(|id| self.paint_tile(id, color))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::Planet;

    #[test]
    fn t_planet_round_zero_is_all_pentagons() {
        let planet = Planet::new(0).expect("Cannot build planet");
        assert_eq!(12, planet.num_tiles());
        assert!(planet.tiles().iter().all(|t| t.sides() == 5));
        assert!(planet.tiles().iter().all(|t| t.neighbors().len() == 5));
    }

    #[test]
    fn t_planet_tile_lookup() {
        let planet = Planet::new(2).expect("Cannot build planet");
        assert_eq!(162, planet.num_tiles());
        for id in 0..planet.num_tiles() as u32 {
            let tile = planet.tile(id).expect("Missing tile");
            assert_eq!(id, tile.id());
        }
        assert!(planet.tile(162).is_none());
    }

    #[test]
    fn t_planet_nearest_tile() {
        let planet = Planet::new(2).expect("Cannot build planet");
        let id = planet
            .nearest_tile(glam::Vec3::Y)
            .expect("Cannot find tile");
        let tile = planet.tile(id).expect("Missing tile");
        // No other tile center is closer to the pole.
        let best = tile.pos().normalize().dot(glam::Vec3::Y);
        for other in planet.tiles() {
            assert!(other.pos().normalize().dot(glam::Vec3::Y) <= best + f32::EPSILON);
        }
    }

    #[test]
    fn t_planet_paint_poles() {
        let mut planet = Planet::new(1).expect("Cannot build planet");
        let spans = planet.paint_poles(glam::vec3(0.9, 0.9, 0.95));
        assert_eq!(2, spans.len());
        assert_ne!(spans[0], spans[1]);
    }

    #[test]
    fn t_planet_transform_injection() {
        let mut planet = Planet::new(0).expect("Cannot build planet");
        // Before any update the model transform is the identity, so the
        // combined transform is just proj * view.
        let proj = glam::Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
        let view = glam::Mat4::from_translation(glam::vec3(0.0, 0.0, -10.0));
        assert_eq!(proj * view, planet.mvp(&proj, &view));
        planet.update(0.25);
        assert_ne!(proj * view, planet.mvp(&proj, &view));
    }
}
