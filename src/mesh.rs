use crate::{
    element::{EH, FH, HH, HasTopology, VH},
    error::Error,
    iterator,
    property::VProperty,
    topol::{TopolCache, Topology},
};

/// A polygon mesh: connectivity plus vertex positions.
///
/// The topology exclusively owns all vertices, edges and faces in flat
/// arenas; positions live in a vertex property that grows in lockstep with
/// the vertex arena.
pub struct Mesh {
    pub(crate) topol: Topology,
    cache: TopolCache,
    points: VProperty<glam::Vec3>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        let mut topol = Topology::with_capacity(nverts, nedges, nfaces);
        let points = topol.create_vertex_prop(glam::Vec3::ZERO);
        Mesh {
            topol,
            points,
            cache: TopolCache::default(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.topol.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_halfedges(&self) -> usize {
        self.topol.num_halfedges()
    }

    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<> {
        self.topol.vertices()
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<> {
        self.topol.halfedges()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        self.topol.edges()
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        self.topol.faces()
    }

    pub fn head_vertex(&self, h: HH) -> VH {
        self.topol.head_vertex(h)
    }

    pub fn tail_vertex(&self, h: HH) -> VH {
        self.topol.tail_vertex(h)
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        self.topol.find_halfedge(from, to)
    }

    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        self.topol.is_boundary_vertex(v)
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        self.topol.is_boundary_edge(e)
    }

    pub fn is_manifold_vertex(&self, v: VH) -> bool {
        self.topol.is_manifold_vertex(v)
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        self.topol.vertex_valence(v)
    }

    pub fn face_valence(&self, f: FH) -> usize {
        self.topol.face_valence(f)
    }

    pub fn voh_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        iterator::voh_ccw_iter(&self.topol, v)
    }

    pub fn vv_ccw_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        iterator::vv_ccw_iter(&self.topol, v)
    }

    pub fn ve_ccw_iter(&self, v: VH) -> impl Iterator<Item = EH> + use<'_> {
        iterator::ve_ccw_iter(&self.topol, v)
    }

    pub fn vf_ccw_iter(&self, v: VH) -> impl Iterator<Item = FH> + use<'_> {
        iterator::vf_ccw_iter(&self.topol, v)
    }

    pub fn fh_ccw_iter(&self, f: FH) -> impl Iterator<Item = HH> + use<'_> {
        iterator::fh_ccw_iter(&self.topol, f)
    }

    pub fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        iterator::fv_ccw_iter(&self.topol, f)
    }

    /// The positions of the vertices of this mesh.
    ///
    /// The property handle can be cloned cheaply, and borrowed for raw slice
    /// access.
    pub fn points(&self) -> VProperty<glam::Vec3> {
        self.points.clone()
    }

    /// The position of the vertex `v`.
    pub fn point(&self, v: VH) -> Result<glam::Vec3, Error> {
        self.points.get_cloned(v)
    }

    pub fn add_vertex(&mut self, pos: glam::Vec3) -> Result<VH, Error> {
        let vi = self.topol.add_vertex()?;
        self.points.set(vi, pos)?;
        Ok(vi)
    }

    pub fn add_face(&mut self, verts: &[VH]) -> Result<FH, Error> {
        self.topol.add_face(verts, &mut self.cache)
    }

    pub fn add_tri_face(&mut self, v0: VH, v1: VH, v2: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2])
    }

    /// The arithmetic mean of the positions of the vertices of the face.
    pub fn face_centroid(&self, f: FH) -> Result<glam::Vec3, Error> {
        let points = self.points.try_borrow()?;
        let (count, sum) = iterator::fv_ccw_iter(&self.topol, f)
            .fold((0usize, glam::Vec3::ZERO), |(count, sum), v| {
                (count + 1, sum + points[v])
            });
        Ok(sum / count as f32)
    }

    /// Check the topology of the mesh.
    ///
    /// This function will return an error if any errors are found in the
    /// topology.
    pub fn check_topology(&self) -> Result<(), Error> {
        self.topol.check()
    }
}

impl HasTopology for Mesh {
    fn topology(&self) -> &Topology {
        &self.topol
    }
}

impl Mesh {
    pub fn create_vertex_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> VProperty<T> {
        self.topol.create_vertex_prop(default)
    }
}
