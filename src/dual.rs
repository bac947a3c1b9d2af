use crate::{element::Handle, error::Error, iterator, mesh::Mesh, tile::Tile};

/// UV corners of the shared hexagon region of the texture atlas, one per
/// corner of a hexagonal tile, going counter-clockwise from the positive U
/// axis.
const HEX_CORNER_UV: [[f32; 2]; 6] = [
    [1.0, 0.5],
    [0.75, 0.9330127],
    [0.25, 0.9330127],
    [0.0, 0.5],
    [0.25, 0.0669873],
    [0.75, 0.0669873],
];

const HEX_CENTER_UV: [f32; 2] = [0.5, 0.5];

/// Pentagons have no five-fold symmetric region in the atlas; all of their
/// vertices collapse onto this placeholder coordinate.
const PENT_UV: [f32; 2] = [0.5, 0.5];

const DEFAULT_TILE_COLOR: glam::Vec3 = glam::vec3(0.44, 0.56, 0.42);

/// A contiguous range of floats in one of the flattened buffers, for partial
/// re-uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpan {
    pub offset: usize,
    pub len: usize,
}

/// GPU-ready geometry of the tiled planet surface: flattened positions,
/// colors and texture coordinates, three floats per vertex for the first
/// two and two floats per vertex for the third, plus a 32 bit index buffer.
pub struct TileBuffers {
    positions: Vec<f32>,
    colors: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl TileBuffers {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }
}

/// The dual tiling of a subdivided icosphere: the tile records with their
/// adjacency, and the flattened buffers their geometry was emitted into.
pub struct TileSet {
    tiles: Vec<Tile>,
    buffers: TileBuffers,
}

impl TileSet {
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn buffers(&self) -> &TileBuffers {
        &self.buffers
    }

    /// Overwrite the color of every vertex of one tile. Returns the touched
    /// range of the color buffer, so the caller can re-upload just that
    /// part. Topology and positions are left untouched.
    pub fn paint_tile(&mut self, id: u32, color: glam::Vec3) -> Option<BufferSpan> {
        let tile = self.tiles.get(id as usize)?;
        let (first, count) = tile.vertex_span();
        let span = BufferSpan {
            offset: first * 3,
            len: count * 3,
        };
        for chunk in self.buffers.colors[span.offset..span.offset + span.len].chunks_exact_mut(3) {
            chunk.copy_from_slice(&[color.x, color.y, color.z]);
        }
        Some(span)
    }
}

impl Mesh {
    /// Extract the dual tiling of this mesh.
    ///
    /// Every non-boundary vertex becomes one tile: its corners are the
    /// centroids of the faces around the vertex, collected by rotating
    /// counter-clockwise through the fan, and the tile center is the vertex
    /// itself. Each tile is fan-triangulated around its center into the
    /// flattened buffers, and two tiles are neighbors iff their vertices
    /// share an edge.
    pub fn dual_tiles(&self) -> Result<TileSet, Error> {
        let points = self.points();
        let points = points.try_borrow()?;
        let mut tiles: Vec<Tile> = Vec::new();
        let mut buffers = TileBuffers {
            positions: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        };
        let mut tile_of_vertex: Vec<Option<u32>> = vec![None; self.num_vertices()];
        let mut corners: Vec<glam::Vec3> = Vec::new();
        for v in self.vertices() {
            if self.is_boundary_vertex(v) {
                continue;
            }
            corners.clear();
            for f in iterator::vf_ccw_iter(&self.topol, v) {
                let (count, sum) = iterator::fv_ccw_iter(&self.topol, f)
                    .fold((0usize, glam::Vec3::ZERO), |(count, sum), fv| {
                        (count + 1, sum + points[fv])
                    });
                corners.push(sum / count as f32);
            }
            let sides = corners.len();
            let id = tiles.len() as u32;
            tile_of_vertex[v.index() as usize] = Some(id);
            let first_vertex = buffers.num_vertices();
            let first_index = buffers.indices.len();
            let center = points[v];
            push_vertex(
                &mut buffers,
                center,
                if sides == 6 { HEX_CENTER_UV } else { PENT_UV },
            );
            for (i, corner) in corners.iter().enumerate() {
                let uv = if sides == 6 { HEX_CORNER_UV[i] } else { PENT_UV };
                push_vertex(&mut buffers, *corner, uv);
            }
            let base = first_vertex as u32;
            for i in 0..sides as u32 {
                buffers.indices.push(base);
                buffers.indices.push(base + 1 + i);
                buffers.indices.push(base + 1 + (i + 1) % sides as u32);
            }
            tiles.push(Tile::new(
                id,
                center,
                first_vertex,
                sides + 1,
                first_index,
                sides * 3,
            ));
        }
        // Two tiles are adjacent iff their primal vertices share an edge.
        // Every edge is visited once, so the lists stay free of duplicates.
        for e in self.edges() {
            let (va, vb) = e.vertices(self);
            if let (Some(ta), Some(tb)) = (
                tile_of_vertex[va.index() as usize],
                tile_of_vertex[vb.index() as usize],
            ) {
                tiles[ta as usize].add_neighbor(tb);
                tiles[tb as usize].add_neighbor(ta);
            }
        }
        Ok(TileSet { tiles, buffers })
    }
}

fn push_vertex(buffers: &mut TileBuffers, pos: glam::Vec3, uv: [f32; 2]) {
    buffers.positions.extend_from_slice(&[pos.x, pos.y, pos.z]);
    buffers.colors.extend_from_slice(&[
        DEFAULT_TILE_COLOR.x,
        DEFAULT_TILE_COLOR.y,
        DEFAULT_TILE_COLOR.z,
    ]);
    buffers.uvs.extend_from_slice(&uv);
}
