use crate::{
    element::{EH, Edge, FH, Face, HH, Halfedge, Handle, HasTopology, VH, Vertex},
    error::Error,
    iterator,
    property::{EProperty, FProperty, HProperty, Property, PropertyContainer, VProperty},
    status::Status,
};

const LOOP_ERR: &str = "Face loop halfedge missing";

/// Scratch buffers used by `add_face` to avoid repeated allocations.
#[derive(Default)]
pub(crate) struct TopolCache {
    loop_halfedges: Vec<Option<HH>>,
    is_new: Vec<bool>,
    needs_adjust: Vec<bool>,
    links: Vec<(HH, HH)>,
}

impl TopolCache {
    fn clear(&mut self) {
        self.loop_halfedges.clear();
        self.is_new.clear();
        self.needs_adjust.clear();
        self.links.clear();
    }
}

/// The connectivity of a mesh: flat arenas of vertices, edges and faces with
/// all cross references expressed as index handles. An edge owns its two
/// halfedges, so the opposite of halfedge `h` is always `h ^ 1`.
pub struct Topology {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    vprops: PropertyContainer<VH>,
    hprops: PropertyContainer<HH>,
    eprops: PropertyContainer<EH>,
    fprops: PropertyContainer<FH>,
    pub(crate) vstatus: VProperty<Status>,
    pub(crate) estatus: EProperty<Status>,
}

impl Topology {
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        let mut vprops = PropertyContainer::new();
        let mut eprops = PropertyContainer::new();
        let vstatus = Property::new(&mut vprops, Status::default());
        let estatus = Property::new(&mut eprops, Status::default());
        Topology {
            vertices: Vec::with_capacity(nverts),
            edges: Vec::with_capacity(nedges),
            faces: Vec::with_capacity(nfaces),
            vprops,
            hprops: PropertyContainer::new(),
            eprops,
            fprops: PropertyContainer::new(),
            vstatus,
            estatus,
        }
    }

    pub fn create_vertex_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> VProperty<T> {
        Property::new(&mut self.vprops, default)
    }

    pub fn create_halfedge_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> HProperty<T> {
        Property::new(&mut self.hprops, default)
    }

    pub fn create_edge_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> EProperty<T> {
        Property::new(&mut self.eprops, default)
    }

    pub fn create_face_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> FProperty<T> {
        Property::new(&mut self.fprops, default)
    }

    fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    fn halfedge(&self, h: HH) -> &Halfedge {
        &self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    pub(crate) fn face_mut(&mut self, f: FH) -> &mut Face {
        &mut self.faces[f.index() as usize]
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn head_vertex(&self, h: HH) -> VH {
        self.halfedge(h).vertex
    }

    pub fn tail_vertex(&self, h: HH) -> VH {
        self.halfedge(h.opposite()).vertex
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn halfedge_face(&self, h: HH) -> Option<FH> {
        self.halfedge(h).face
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.faces[f.index() as usize].halfedge
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.halfedge(h).face.is_none()
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        let (h, oh) = e.halfedges();
        self.is_boundary_halfedge(h) || self.is_boundary_halfedge(oh)
    }

    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        match self.vertex(v).halfedge {
            Some(h) => self.is_boundary_halfedge(h),
            None => true,
        }
    }

    pub fn is_manifold_vertex(&self, v: VH) -> bool {
        /* The outgoing halfedge of a boundary vertex is kept on the boundary,
         * so a second boundary halfedge encountered while circulating implies
         * more than one gap in the fan, i.e. a non-manifold vertex.
         */
        iterator::voh_ccw_iter(self, v)
            .skip(1)
            .all(|h| !self.is_boundary_halfedge(h))
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_halfedges(&self) -> usize {
        self.num_edges() * 2
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<> {
        (0..(self.num_vertices() as u32)).map(|i| i.into())
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<> {
        (0..(self.num_halfedges() as u32)).map(|i| i.into())
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        (0..(self.num_edges() as u32)).map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        (0..(self.num_faces() as u32)).map(|i| i.into())
    }

    /// Find the halfedge running from `from` to `to`, if the two vertices are
    /// connected by an edge.
    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_ccw_iter(self, from).find(|h| self.head_vertex(*h) == to)
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        iterator::voh_ccw_iter(self, v).count()
    }

    pub fn face_valence(&self, f: FH) -> usize {
        iterator::fh_ccw_iter(self, f).count()
    }

    pub(crate) fn set_vertex_halfedge(&mut self, v: VH, h: HH) {
        self.vertex_mut(v).halfedge = Some(h);
    }

    /// Link two halfedges so that `hnext` follows `hprev`. Keeps the `next`
    /// and `prev` pointers symmetric.
    pub(crate) fn link_halfedges(&mut self, hprev: HH, hnext: HH) {
        self.halfedge_mut(hprev).next = hnext;
        self.halfedge_mut(hnext).prev = hprev;
    }

    /// Move the outgoing halfedge of `v` onto the boundary, if the vertex has
    /// any boundary halfedge. Fan circulation relies on this.
    pub(crate) fn adjust_outgoing_halfedge(&mut self, v: VH) {
        let h = iterator::voh_ccw_iter(self, v).find(|h| self.is_boundary_halfedge(*h));
        if let Some(h) = h {
            self.set_vertex_halfedge(v, h);
        }
    }

    pub fn add_vertex(&mut self) -> Result<VH, Error> {
        let vi = self.vertices.len() as u32;
        self.vprops.push_value()?;
        self.vertices.push(Vertex { halfedge: None });
        Ok(vi.into())
    }

    /// Create a new edge between `from` and `to`.
    ///
    /// Both halfedges start out without a face, linked to each other as a
    /// two-halfedge boundary loop, which is the correct linkage for an
    /// isolated edge. Callers relink them as needed.
    pub(crate) fn new_edge(&mut self, from: VH, to: VH) -> Result<EH, Error> {
        let ei = self.edges.len() as u32;
        self.eprops.push_value()?;
        for _ in 0..2 {
            self.hprops.push_value()?;
        }
        let h: HH = (ei << 1).into();
        let oh: HH = ((ei << 1) | 1).into();
        self.edges.push(Edge {
            halfedges: [
                Halfedge {
                    face: None,
                    vertex: to,
                    next: oh,
                    prev: oh,
                },
                Halfedge {
                    face: None,
                    vertex: from,
                    next: h,
                    prev: h,
                },
            ],
        });
        Ok(ei.into())
    }

    pub(crate) fn new_face(&mut self, halfedge: HH) -> Result<FH, Error> {
        let fi = self.faces.len() as u32;
        self.fprops.push_value()?;
        self.faces.push(Face { halfedge });
        Ok(fi.into())
    }

    /// Add a face bounded by the given vertex loop, in counter-clockwise
    /// order.
    ///
    /// Existing halfedges between consecutive vertices are reused; this is
    /// how two faces sharing an edge end up with paired opposite-direction
    /// halfedges. A reverse halfedge that already has a face means the edge
    /// would become non-manifold, which is an error.
    pub(crate) fn add_face(&mut self, verts: &[VH], cache: &mut TopolCache) -> Result<FH, Error> {
        let n = verts.len();
        debug_assert!(n > 2);
        cache.clear();
        cache.loop_halfedges.reserve(n);
        cache.is_new.reserve(n);
        cache.needs_adjust.resize(n, false);
        // Check for topological errors before mutating anything.
        for i in 0..n {
            if !self.is_boundary_vertex(verts[i]) {
                return Err(Error::ComplexVertex(verts[i]));
            }
            let h = self.find_halfedge(verts[i], verts[(i + 1) % n]);
            if let Some(h) = h {
                if !self.is_boundary_halfedge(h) {
                    return Err(Error::ComplexHalfedge(h));
                }
            }
            cache.loop_halfedges.push(h);
        }
        // Where two existing halfedges meet at a corner without following each
        // other, the boundary chain between them has to be relinked out of the
        // way first.
        for i in 0..n {
            let j = (i + 1) % n;
            if let (Some(prev), Some(next)) = (cache.loop_halfedges[i], cache.loop_halfedges[j]) {
                if self.next_halfedge(prev) != next {
                    let boundprev = {
                        let mut out = next.opposite();
                        loop {
                            out = self.next_halfedge(out).opposite();
                            if self.is_boundary_halfedge(out) {
                                break out;
                            }
                        }
                    };
                    if boundprev == prev {
                        return Err(Error::PatchRelinkingFailed);
                    }
                    let boundnext = self.next_halfedge(boundprev);
                    debug_assert!(self.is_boundary_halfedge(boundnext));
                    let pstart = self.next_halfedge(prev);
                    let pend = self.prev_halfedge(next);
                    cache.links.extend_from_slice(&[
                        (boundprev, pstart),
                        (pend, boundnext),
                        (prev, next),
                    ]);
                }
            }
        }
        // Create the missing edges.
        for i in 0..n {
            match cache.loop_halfedges[i] {
                Some(_) => cache.is_new.push(false),
                None => {
                    let e = self.new_edge(verts[i], verts[(i + 1) % n])?;
                    cache.loop_halfedges[i] = Some(e.halfedge(false));
                    cache.is_new.push(true);
                }
            }
        }
        // Stitch the loop together around each corner vertex. The links are
        // deferred so that the lookups below still see the old linkage.
        for j in 0..n {
            let i = (j + n - 1) % n;
            let v = verts[j];
            let inner_prev = cache.loop_halfedges[i].expect(LOOP_ERR);
            let inner_next = cache.loop_halfedges[j].expect(LOOP_ERR);
            match (cache.is_new[i], cache.is_new[j]) {
                (false, false) => {
                    cache.needs_adjust[j] = self.vertex_halfedge(v) == Some(inner_next);
                }
                (true, false) => {
                    let outer_next = inner_prev.opposite();
                    let boundprev = self.prev_halfedge(inner_next);
                    cache.links.push((boundprev, outer_next));
                    cache.links.push((inner_prev, inner_next));
                    self.set_vertex_halfedge(v, outer_next);
                }
                (false, true) => {
                    let outer_prev = inner_next.opposite();
                    let boundnext = self.next_halfedge(inner_prev);
                    cache.links.push((outer_prev, boundnext));
                    cache.links.push((inner_prev, inner_next));
                    self.set_vertex_halfedge(v, boundnext);
                }
                (true, true) => {
                    let outer_next = inner_prev.opposite();
                    let outer_prev = inner_next.opposite();
                    match self.vertex_halfedge(v) {
                        Some(boundnext) => {
                            let boundprev = self.prev_halfedge(boundnext);
                            cache.links.push((boundprev, outer_next));
                            cache.links.push((outer_prev, boundnext));
                            cache.links.push((inner_prev, inner_next));
                        }
                        None => {
                            // Isolated vertex.
                            self.set_vertex_halfedge(v, outer_next);
                            cache.links.push((outer_prev, outer_next));
                            cache.links.push((inner_prev, inner_next));
                        }
                    }
                }
            }
        }
        // Create the face and claim the inner halfedges.
        let f = self.new_face(cache.loop_halfedges[n - 1].expect(LOOP_ERR))?;
        for i in 0..n {
            let h = cache.loop_halfedges[i].expect(LOOP_ERR);
            self.halfedge_mut(h).face = Some(f);
        }
        // Apply the deferred links.
        for (prev, next) in cache.links.drain(..) {
            self.link_halfedges(prev, next);
        }
        for j in 0..n {
            if cache.needs_adjust[j] {
                self.adjust_outgoing_halfedge(verts[j]);
            }
        }
        Ok(f)
    }

    /// Verify that the mesh is a closed solid, i.e. has no boundary
    /// halfedges. Solids built from a face-index table must pass this; a
    /// leftover boundary halfedge means the table was malformed.
    pub fn check_closed(&self) -> Result<(), Error> {
        match self.halfedges().find(|h| self.is_boundary_halfedge(*h)) {
            Some(h) => Err(Error::UnpairedHalfedge(h)),
            None => Ok(()),
        }
    }

    pub(crate) fn reserve(&mut self, nverts: usize, nedges: usize, nfaces: usize) -> Result<(), Error> {
        let nv = nverts.saturating_sub(self.num_vertices());
        let ne = nedges.saturating_sub(self.num_edges());
        let nf = nfaces.saturating_sub(self.num_faces());
        self.vertices.reserve(nv);
        self.edges.reserve(ne);
        self.faces.reserve(nf);
        self.vprops.reserve(nv)?;
        self.hprops.reserve(2 * ne)?;
        self.eprops.reserve(ne)?;
        self.fprops.reserve(nf)?;
        Ok(())
    }

    /// Reset all transient element flags. Called at the start of every
    /// subdivision pass.
    pub(crate) fn clear_status(&mut self) -> Result<(), Error> {
        self.vstatus.try_borrow_mut()?.fill(Status::default());
        self.estatus.try_borrow_mut()?.fill(Status::default());
        Ok(())
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl HasTopology for Topology {
    fn topology(&self) -> &Topology {
        self
    }
}

#[cfg(test)]
mod test {
    use super::{TopolCache, Topology};
    use crate::{
        element::{HH, Handle, VH},
        error::Error,
        iterator,
    };
    use arrayvec::ArrayVec;

    fn tri_fan() -> Topology {
        /* A fan of five triangles around vertex 0, with rim 1-2-3-4-5-6.
         * The first three faces are disjoint sectors meeting only at vertex
         * 0, which leaves the vertex temporarily non-manifold; the bridging
         * faces added afterwards close the gaps, and force boundary patch
         * relinking around vertex 0.
         */
        let mut topol = Topology::with_capacity(7, 11, 5);
        let mut cache = TopolCache::default();
        for _ in 0..7 {
            topol.add_vertex().expect("Cannot add vertex");
        }
        for fvi in [[0u32, 1, 2], [0, 3, 4], [0, 5, 6], [0, 2, 3], [0, 4, 5]] {
            let vs = fvi.iter().map(|i| (*i).into()).collect::<ArrayVec<VH, 3>>();
            topol.add_face(&vs, &mut cache).expect("Cannot add face");
        }
        topol
    }

    #[test]
    fn t_triangle() {
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        let verts: Vec<_> = (0..3).flat_map(|_| topol.add_vertex()).collect();
        assert_eq!(verts, (0..3u32).map(|idx| idx.into()).collect::<Vec<_>>());
        let face = topol.add_face(&verts, &mut cache).unwrap();
        assert_eq!(topol.num_faces(), 1);
        assert_eq!(topol.num_edges(), 3);
        assert_eq!(topol.num_halfedges(), 6);
        assert_eq!(topol.num_vertices(), 3);
        assert_eq!(face.index(), 0);
        for v in topol.vertices() {
            let h = topol
                .vertex_halfedge(v)
                .expect("Vertex must have an incident halfedge");
            assert!(topol.is_boundary_halfedge(h));
            let oh = h.opposite();
            assert!(!topol.is_boundary_halfedge(oh));
            assert_eq!(
                topol
                    .halfedge_face(oh)
                    .expect("Halfedge must have an incident face"),
                face
            );
        }
        assert_eq!(
            topol
                .halfedges()
                .filter(|h| topol.is_boundary_halfedge(*h))
                .count(),
            3
        );
        // The inner loop must close after exactly three steps.
        let h = topol.face_halfedge(face);
        assert_eq!(
            h,
            topol.next_halfedge(topol.next_halfedge(topol.next_halfedge(h)))
        );
    }

    #[test]
    fn t_two_triangles() {
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        let verts: Vec<_> = (0..4)
            .map(|_| topol.add_vertex().expect("Cannot add vertex"))
            .collect();
        let faces = vec![
            topol
                .add_face(&[verts[0], verts[1], verts[2]], &mut cache)
                .expect("Cannot add face"),
            topol
                .add_face(&[verts[0], verts[2], verts[3]], &mut cache)
                .expect("Cannot add face"),
        ];
        assert_eq!(
            faces,
            [0u32, 1].iter().map(|idx| (*idx).into()).collect::<Vec<_>>()
        );
        assert_eq!(topol.num_vertices(), 4);
        assert_eq!(topol.num_halfedges(), 10);
        assert_eq!(topol.num_edges(), 5);
        assert_eq!(topol.num_faces(), 2);
        assert_eq!(
            topol.edges().filter(|e| topol.is_boundary_edge(*e)).count(),
            4
        );
        // The shared edge is interior and its halfedges are opposites of each
        // other.
        let h = topol
            .find_halfedge(verts[0], verts[2])
            .expect("Cannot find halfedge");
        assert_eq!(topol.head_vertex(h.opposite()), verts[0]);
        assert!(!topol.is_boundary_halfedge(h));
        assert!(!topol.is_boundary_halfedge(h.opposite()));
    }

    #[test]
    fn t_tri_fan_relinking() {
        let topol = tri_fan();
        topol.check().expect("Topological errors found");
        assert_eq!(topol.num_vertices(), 7);
        assert_eq!(topol.num_faces(), 5);
        assert_eq!(topol.num_edges(), 11);
        assert_eq!(topol.vertex_valence(0.into()), 6);
        assert_eq!(iterator::vf_ccw_iter(&topol, 0.into()).count(), 5);
        for v in topol.vertices() {
            assert!(topol.is_manifold_vertex(v));
        }
    }

    #[test]
    fn t_complex_halfedge_rejected() {
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        for _ in 0..4 {
            topol.add_vertex().expect("Cannot add vertex");
        }
        topol
            .add_face(&[0.into(), 1.into(), 2.into()], &mut cache)
            .expect("Cannot add face");
        // The halfedge 0 -> 1 already has a face; reusing it in the same
        // direction must fail.
        let err = topol
            .add_face(&[0.into(), 1.into(), 3.into()], &mut cache)
            .expect_err("Non-manifold face must be rejected");
        let h: HH = topol
            .find_halfedge(0.into(), 1.into())
            .expect("Cannot find halfedge");
        assert_eq!(err, Error::ComplexHalfedge(h));
    }

    #[test]
    fn t_closed_check_flags_boundary() {
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        for _ in 0..3 {
            topol.add_vertex().expect("Cannot add vertex");
        }
        topol
            .add_face(&[0.into(), 1.into(), 2.into()], &mut cache)
            .expect("Cannot add face");
        assert!(matches!(
            topol.check_closed(),
            Err(Error::UnpairedHalfedge(_))
        ));
    }
}
