use crate::{
    element::{EH, VH},
    error::Error,
    mesh::Mesh,
};

impl Mesh {
    /// Subdivide the mesh for the given number of rounds.
    ///
    /// Each round replaces every triangle with four smaller ones: every edge
    /// is split at its midpoint, and the fresh edges connecting a midpoint to
    /// a pre-existing vertex are flipped to restore the regular
    /// triangulation. Vertex positions are never smoothed; when `project` is
    /// set, the midpoints are pushed out onto the unit sphere.
    ///
    /// ```rust
    /// use hexglobe::Mesh;
    ///
    /// let mut mesh = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
    /// mesh.subdivide(1, true).expect("Subdivision failed");
    /// assert_eq!((42, 120, 80), (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces()));
    /// mesh.check_topology().expect("Topological errors found");
    /// ```
    pub fn subdivide(&mut self, rounds: usize, project: bool) -> Result<(), Error> {
        for _ in 0..rounds {
            self.subdivide_round(project)?;
        }
        Ok(())
    }

    fn subdivide_round(&mut self, project: bool) -> Result<(), Error> {
        let nv = self.num_vertices();
        let ne = self.num_edges();
        let nf = self.num_faces();
        if let Some(f) = self.faces().find(|f| self.face_valence(*f) != 3) {
            return Err(Error::NonTriangularFace(f));
        }
        self.topol.clear_status()?;
        self.topol.reserve(nv + ne, 2 * ne + 3 * nf, 4 * nf)?;
        // Split phase: visit the edges that existed at the start of the
        // round. Each split rewires the one or two incident triangles into
        // four around the midpoint.
        for ei in 0..(ne as u32) {
            self.split_subdivision_edge(ei.into(), project)?;
        }
        // Flip phase: rotate every fresh edge connecting a midpoint to a
        // pre-existing vertex. Boundary edges are skipped.
        let ne_after = self.num_edges() as u32;
        for ei in (ne as u32)..ne_after {
            let e: EH = ei.into();
            let fresh = {
                let estatus = self.topol.estatus.try_borrow()?;
                estatus[e].fresh()
            };
            if !fresh || self.topol.is_boundary_edge(e) {
                continue;
            }
            let (v0, v1) = e.vertices(&self.topol);
            let mismatched = {
                let vstatus = self.topol.vstatus.try_borrow()?;
                vstatus[v0].fresh() != vstatus[v1].fresh()
            };
            if mismatched {
                self.topol.flip_edge(e)?;
            }
        }
        Ok(())
    }

    /// Split one edge for the current subdivision round: insert the midpoint
    /// vertex and cut each incident face back into triangles. A no-op if the
    /// edge was already split this round, since the split mark is shared by
    /// both halfedges. Returns the midpoint vertex when a split happened.
    pub(crate) fn split_subdivision_edge(
        &mut self,
        e: EH,
        project: bool,
    ) -> Result<Option<VH>, Error> {
        {
            let estatus = self.topol.estatus.try_borrow()?;
            if estatus[e].split() {
                return Ok(None);
            }
        }
        let (v0, v1) = e.vertices(&self.topol);
        let mid = {
            let points = self.points();
            let points = points.try_borrow()?;
            let mid = (points[v0] + points[v1]) * 0.5;
            if project { mid.normalize() } else { mid }
        };
        let (h0, h1) = e.halfedges();
        // Capture the face loops before the split rewires them. Either side
        // may be missing on a boundary edge.
        let has_a = !self.topol.is_boundary_halfedge(h0);
        let has_b = !self.topol.is_boundary_halfedge(h1);
        let na = self.topol.next_halfedge(h0);
        let nb = self.topol.next_halfedge(h1);
        let (v, enew) = self.split_edge(e, mid)?;
        {
            let mut estatus = self.topol.estatus.try_borrow_mut()?;
            estatus[e].set_split(true);
            estatus[enew].set_split(true);
        }
        {
            let mut vstatus = self.topol.vstatus.try_borrow_mut()?;
            vstatus[v].set_fresh(true);
        }
        // Cut the corner off each incident face, turning the two quads left
        // behind by the split back into triangles. The cut edges are the
        // flip candidates of this round.
        if has_a {
            let ea = self.topol.insert_diagonal(enew.halfedge(false), na)?;
            let mut estatus = self.topol.estatus.try_borrow_mut()?;
            estatus[ea].set_fresh(true);
        }
        if has_b {
            let eb = self.topol.insert_diagonal(h1, nb)?;
            let mut estatus = self.topol.estatus.try_borrow_mut()?;
            estatus[eb].set_fresh(true);
        }
        Ok(Some(v))
    }
}
