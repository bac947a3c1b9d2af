/*!
This crate generates spherical planet meshes tiled with hexagons and
pentagons, the way board games tile a globe. The surface is derived from a
recursively subdivided icosahedron represented as a halfedge mesh, in the
tradition of [OpenMesh](https://www.graphics.rwth-aachen.de/software/openmesh/).

# Overview

+ A halfedge datastructure represents the connectivity of vertices, edges and
  faces. All elements live in flat arenas owned by the mesh and refer to each
  other through index handles, so the cyclic vertex/edge/face graph needs no
  pointer juggling.

+ [`Mesh::icosahedron`] builds the seed solid from its golden-ratio
  coordinates, and [`Mesh::subdivide`] refines it: every round splits each
  edge at its midpoint, restores the triangulation with edge flips, and
  projects the new vertices onto the unit sphere.

+ [`Mesh::dual_tiles`] converts the refined triangle mesh into its dual
  tiling: one polygonal tile per vertex, with corners at the surrounding
  face centroids. Any icosahedral subdivision yields exactly 12 pentagons;
  every other tile is a hexagon.

+ [`Planet`] bundles the pipeline for consumers: it owns the tiles, their
  adjacency and the flattened vertex/index buffers, combines externally
  supplied camera matrices with its spin, and supports repainting individual
  tiles through partial buffer updates.

```rust
use hexglobe::Planet;

let planet = Planet::new(2).expect("Cannot build planet");
assert_eq!(162, planet.num_tiles());
let pentagons = planet.tiles().iter().filter(|t| t.sides() == 5).count();
assert_eq!(12, pentagons);
```
*/

mod check;
mod dual;
mod edit;
mod element;
mod error;
mod iterator;
mod macros;
mod mesh;
mod planet;
mod primitive;
mod property;
mod status;
mod subdiv;
mod tile;
mod topol;

pub use dual::{BufferSpan, TileBuffers, TileSet};
pub use element::{EH, FH, HH, Handle, HasTopology, VH};
pub use error::Error;
pub use mesh::Mesh;
pub use planet::Planet;
pub use property::{EProperty, FProperty, HProperty, Property, VProperty};
pub use status::Status;
pub use tile::Tile;
pub use topol::Topology;
