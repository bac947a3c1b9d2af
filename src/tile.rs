/// One playable cell of the planet surface: a pentagon or hexagon of the
/// dual mesh.
///
/// A tile sits at a vertex of the subdivided primal mesh; its corners are the
/// centroids of the faces around that vertex. Tiles remember where their
/// geometry landed in the flattened render buffers, so individual tiles can
/// be repainted without re-uploading the whole planet.
pub struct Tile {
    id: u32,
    pos: glam::Vec3,
    neighbors: Vec<u32>,
    first_vertex: usize,
    vertex_count: usize,
    first_index: usize,
    index_count: usize,
}

impl Tile {
    pub(crate) fn new(
        id: u32,
        pos: glam::Vec3,
        first_vertex: usize,
        vertex_count: usize,
        first_index: usize,
        index_count: usize,
    ) -> Self {
        Tile {
            id,
            pos,
            neighbors: Vec::new(),
            first_vertex,
            vertex_count,
            first_index,
            index_count,
        }
    }

    pub(crate) fn add_neighbor(&mut self, id: u32) {
        self.neighbors.push(id);
    }

    /// Stable numeric id of this tile, usable for placement lookups.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The center of the tile, i.e. the position of its primal vertex.
    pub fn pos(&self) -> glam::Vec3 {
        self.pos
    }

    /// Ids of the adjacent tiles. All true neighbors are present, without
    /// duplicates or self references; their order carries no meaning.
    pub fn neighbors(&self) -> &[u32] {
        &self.neighbors
    }

    /// The polygon degree of this tile: 5 for the twelve pentagons, 6
    /// everywhere else.
    pub fn sides(&self) -> usize {
        self.vertex_count - 1
    }

    /// Range of this tile's vertices in the flattened buffers, as
    /// (first vertex, vertex count). The first vertex is the fan center.
    pub fn vertex_span(&self) -> (usize, usize) {
        (self.first_vertex, self.vertex_count)
    }

    /// Range of this tile's entries in the index buffer, as
    /// (first index, index count).
    pub fn index_span(&self) -> (usize, usize) {
        (self.first_index, self.index_count)
    }
}
