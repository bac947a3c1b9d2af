use crate::{
    element::{EH, HH, VH},
    error::Error,
    mesh::Mesh,
    topol::Topology,
};

impl Topology {
    /// Split the edge `e` with the vertex `v`.
    ///
    /// The edge keeps the segment from `v` to its head; a new edge is created
    /// for the segment from the old tail to `v`. The incident faces are not
    /// split, so their valence grows by one. Works on boundary edges too.
    /// Returns the new edge.
    pub(crate) fn split_edge(&mut self, e: EH, v: VH) -> Result<EH, Error> {
        let (h0, h1) = e.halfedges();
        let vfrom = self.tail_vertex(h0);
        let ph0 = self.prev_halfedge(h0);
        let nh1 = self.next_halfedge(h1);
        let f0 = self.halfedge_face(h0);
        let f1 = self.halfedge_face(h1);
        let enew = self.new_edge(vfrom, v)?;
        let hnew = enew.halfedge(false);
        let ohnew = enew.halfedge(true);
        // Rewire halfedge -> vertex.
        self.halfedge_mut(h1).vertex = v;
        // Rewire halfedge -> halfedge.
        self.link_halfedges(hnew, h0);
        self.link_halfedges(h1, ohnew);
        self.link_halfedges(ph0, hnew);
        self.link_halfedges(ohnew, nh1);
        // Rewire halfedge -> face.
        self.halfedge_mut(hnew).face = f0;
        self.halfedge_mut(ohnew).face = f1;
        // Rewire vertex -> halfedge.
        self.set_vertex_halfedge(v, h0);
        self.adjust_outgoing_halfedge(v);
        if self.vertex_halfedge(vfrom) == Some(h0) {
            self.set_vertex_halfedge(vfrom, hnew);
            self.adjust_outgoing_halfedge(vfrom);
        }
        Ok(enew)
    }

    /// Insert a diagonal from the head of `ha` to the head of `hb`, splitting
    /// the face they both belong to into two. Returns the new edge; its first
    /// halfedge runs from the head of `ha` to the head of `hb` and stays in
    /// the original face.
    pub(crate) fn insert_diagonal(&mut self, ha: HH, hb: HH) -> Result<EH, Error> {
        let f = self
            .halfedge_face(ha)
            .ok_or(Error::CannotInsertDiagonal(ha))?;
        debug_assert_eq!(self.halfedge_face(hb), Some(f));
        debug_assert!(ha != hb && self.next_halfedge(ha) != hb);
        let va = self.head_vertex(ha);
        let vb = self.head_vertex(hb);
        let han = self.next_halfedge(ha);
        let hbn = self.next_halfedge(hb);
        let enew = self.new_edge(va, vb)?;
        let hnew = enew.halfedge(false);
        let ohnew = enew.halfedge(true);
        self.link_halfedges(ha, hnew);
        self.link_halfedges(hnew, hbn);
        self.link_halfedges(hb, ohnew);
        self.link_halfedges(ohnew, han);
        // The loop through hnew keeps the old face.
        self.halfedge_mut(hnew).face = Some(f);
        self.face_mut(f).halfedge = hnew;
        // The other loop becomes a new face.
        let fnew = self.new_face(ohnew)?;
        let mut h = ohnew;
        loop {
            self.halfedge_mut(h).face = Some(fnew);
            h = self.next_halfedge(h);
            if h == ohnew {
                break;
            }
        }
        Ok(enew)
    }

    /// Rotate the interior edge `e` to connect the apex vertices of its two
    /// incident triangles instead of its current endpoints.
    ///
    /// Fails if either side has no face, or a side is not a triangle.
    pub(crate) fn flip_edge(&mut self, e: EH) -> Result<(), Error> {
        let (a0, b0) = e.halfedges();
        let fa = self.halfedge_face(a0).ok_or(Error::CannotFlipEdge(e))?;
        let fb = self.halfedge_face(b0).ok_or(Error::CannotFlipEdge(e))?;
        let a1 = self.next_halfedge(a0);
        let a2 = self.next_halfedge(a1);
        let b1 = self.next_halfedge(b0);
        let b2 = self.next_halfedge(b1);
        if self.next_halfedge(a2) != a0 || self.next_halfedge(b2) != b0 {
            return Err(Error::CannotFlipEdge(e));
        }
        let va0 = self.head_vertex(a0);
        let vb0 = self.head_vertex(b0);
        let va1 = self.head_vertex(a1);
        let vb1 = self.head_vertex(b1);
        // Rewire halfedge -> vertex.
        self.halfedge_mut(a0).vertex = va1;
        self.halfedge_mut(b0).vertex = vb1;
        // Rewire halfedge -> halfedge.
        self.link_halfedges(a0, a2);
        self.link_halfedges(a2, b1);
        self.link_halfedges(b1, a0);
        self.link_halfedges(b0, b2);
        self.link_halfedges(b2, a1);
        self.link_halfedges(a1, b0);
        // Rewire halfedge -> face.
        self.halfedge_mut(a1).face = Some(fb);
        self.halfedge_mut(b1).face = Some(fa);
        self.face_mut(fa).halfedge = a0;
        self.face_mut(fb).halfedge = b0;
        // The old endpoints may have lost their outgoing halfedge.
        if self.vertex_halfedge(va0) == Some(b0) {
            self.set_vertex_halfedge(va0, a1);
        }
        if self.vertex_halfedge(vb0) == Some(a0) {
            self.set_vertex_halfedge(vb0, b1);
        }
        Ok(())
    }
}

impl Mesh {
    /// Split the edge `e` with a new vertex at the given position. Returns
    /// the new vertex and the new edge.
    pub fn split_edge(&mut self, e: EH, pos: glam::Vec3) -> Result<(VH, EH), Error> {
        let v = self.add_vertex(pos)?;
        let enew = self.topol.split_edge(e, v)?;
        Ok((v, enew))
    }
}

#[cfg(test)]
mod test {
    use crate::{element::Handle, mesh::Mesh};

    #[test]
    fn t_split_interior_edge() {
        let mut mesh = Mesh::flat_square(1.0).expect("Cannot create a square");
        let e = mesh
            .find_halfedge(0.into(), 2.into())
            .expect("Cannot find halfedge")
            .edge();
        let (h, oh) = e.halfedges();
        let head = mesh.head_vertex(h);
        let tail = mesh.head_vertex(oh);
        let (v, enew) = mesh
            .split_edge(e, glam::vec3(0.5, 0.5, 0.0))
            .expect("Cannot split edge");
        mesh.check_topology().expect("Topological errors found");
        assert_eq!(5, mesh.num_vertices());
        assert_eq!(6, mesh.num_edges());
        // Both faces became quads.
        for f in mesh.faces() {
            assert_eq!(4, mesh.face_valence(f));
        }
        // The two halves meet at the new vertex.
        assert_eq!(mesh.head_vertex(enew.halfedge(false)), v);
        assert_eq!(mesh.tail_vertex(enew.halfedge(false)), tail);
        assert_eq!(mesh.head_vertex(h), head);
        assert_eq!(mesh.tail_vertex(h), v);
    }

    #[test]
    fn t_split_boundary_edge() {
        let mut mesh = Mesh::flat_square(1.0).expect("Cannot create a square");
        let e = mesh
            .find_halfedge(0.into(), 1.into())
            .expect("Cannot find halfedge")
            .edge();
        let (v, _) = mesh
            .split_edge(e, glam::vec3(0.5, 0.0, 0.0))
            .expect("Cannot split edge");
        mesh.check_topology().expect("Topological errors found");
        assert_eq!(5, mesh.num_vertices());
        assert_eq!(6, mesh.num_edges());
        assert_eq!(2, mesh.num_faces());
        assert!(mesh.is_boundary_vertex(v));
        assert_eq!(2, mesh.vertex_valence(v));
    }

    #[test]
    fn t_insert_diagonal() {
        let mut mesh = Mesh::new();
        for pos in [
            glam::vec3(0.0, 0.0, 0.0),
            glam::vec3(1.0, 0.0, 0.0),
            glam::vec3(1.0, 1.0, 0.0),
            glam::vec3(0.0, 1.0, 0.0),
        ] {
            mesh.add_vertex(pos).expect("Cannot add vertex");
        }
        mesh.add_face(&[0.into(), 1.into(), 2.into(), 3.into()])
            .expect("Cannot add face");
        let ha = mesh
            .find_halfedge(0.into(), 1.into())
            .expect("Cannot find halfedge");
        let hb = mesh
            .find_halfedge(2.into(), 3.into())
            .expect("Cannot find halfedge");
        mesh.topol
            .insert_diagonal(ha, hb)
            .expect("Cannot insert diagonal");
        mesh.check_topology().expect("Topological errors found");
        assert_eq!(2, mesh.num_faces());
        assert_eq!(5, mesh.num_edges());
        for f in mesh.faces() {
            assert_eq!(3, mesh.face_valence(f));
        }
    }

    #[test]
    fn t_flip_edge() {
        let mut mesh = Mesh::flat_square(1.0).expect("Cannot create a square");
        let e = mesh
            .find_halfedge(0.into(), 2.into())
            .expect("Cannot find halfedge")
            .edge();
        mesh.topol.flip_edge(e).expect("Cannot flip edge");
        mesh.check_topology().expect("Topological errors found");
        // The diagonal now connects the other pair of corners.
        let (v0, v1) = e.vertices(&mesh);
        let mut ends = [v0.index(), v1.index()];
        ends.sort();
        assert_eq!([1, 3], ends);
        for f in mesh.faces() {
            assert_eq!(3, mesh.face_valence(f));
        }
    }

    #[test]
    fn t_flip_boundary_edge_fails() {
        let mut mesh = Mesh::flat_square(1.0).expect("Cannot create a square");
        let e = mesh
            .find_halfedge(0.into(), 1.into())
            .expect("Cannot find halfedge")
            .edge();
        assert!(mesh.topol.flip_edge(e).is_err());
    }
}
