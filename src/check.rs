use crate::{element::Handle, error::Error, iterator, topol::Topology};

fn check_vertices(topol: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    for v in topol.vertices() {
        if let Some(h) = topol.vertex_halfedge(v) {
            if h.index() as usize >= topol.num_halfedges() {
                return Err(Error::InvalidHalfedge(h));
            }
            // The outgoing halfedge must be a boundary halfedge, or none of
            // the outgoing halfedges are boundary.
            if !topol.is_boundary_halfedge(h)
                && iterator::voh_ccw_iter(topol, v).any(|h| topol.is_boundary_halfedge(h))
            {
                return Err(Error::OutgoingHalfedgeNotBoundary(v));
            }
            // Outgoing halfedge must point away from this vertex.
            if topol.tail_vertex(h) != v {
                return Err(Error::InvalidOutgoingHalfedge(v));
            }
        }
        // Counter-clockwise circulation must not visit a halfedge twice, and
        // clockwise circulation must visit exactly the same halfedges.
        for h in iterator::voh_ccw_iter(topol, v) {
            if std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(Error::InvalidOutgoingHalfedge(v));
            }
        }
        for h in iterator::voh_cw_iter(topol, v) {
            if !std::mem::replace(&mut hvisited[h.index() as usize], false) {
                return Err(Error::InvalidOutgoingHalfedge(v));
            }
        }
    }
    Ok(())
}

fn check_halfedges(topol: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    for h in topol.halfedges() {
        let head = topol.head_vertex(h);
        let tail = topol.tail_vertex(h);
        if head == tail {
            return Err(Error::DegenerateHalfedge(h));
        }
        // Check link symmetry and the vertex chain.
        let hprev = topol.prev_halfedge(h);
        let hnext = topol.next_halfedge(h);
        if topol.next_halfedge(hprev) != h
            || topol.prev_halfedge(hnext) != h
            || topol.tail_vertex(hnext) != head
            || topol.head_vertex(hprev) != tail
        {
            return Err(Error::InvalidHalfedgeLink(h));
        }
        // The halfedge must be found when circulating its tail and head.
        if !iterator::voh_ccw_iter(topol, tail).any(|hh| hh == h)
            || !iterator::vih_ccw_iter(topol, head).any(|hh| hh == h)
        {
            return Err(Error::InvalidHalfedgeVertexLink(h));
        }
    }
    // Walk all loops; every halfedge belongs to exactly one, and all members
    // of a loop must agree on the incident face. The clockwise unwind must
    // visit exactly the halfedges the counter-clockwise walk marked.
    hvisited.fill(false);
    for h in topol.halfedges() {
        if hvisited[h.index() as usize] {
            continue;
        }
        let f = topol.halfedge_face(h);
        for h in iterator::loop_ccw_iter(topol, h) {
            if std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(Error::InvalidLoopTopology(h));
            }
            if topol.halfedge_face(h) != f {
                return Err(Error::InconsistentFaceInLoop(h));
            }
        }
    }
    for h in topol.halfedges() {
        if !hvisited[h.index() as usize] {
            continue;
        }
        let f = topol.halfedge_face(h);
        for h in iterator::loop_cw_iter(topol, h) {
            if !std::mem::replace(&mut hvisited[h.index() as usize], false) {
                return Err(Error::InvalidLoopTopology(h));
            }
            if topol.halfedge_face(h) != f {
                return Err(Error::InconsistentFaceInLoop(h));
            }
        }
    }
    debug_assert!(hvisited.iter().all(|f| !f));
    Ok(())
}

fn check_faces(topol: &Topology) -> Result<(), Error> {
    for f in topol.faces() {
        let h = topol.face_halfedge(f);
        if h.index() as usize >= topol.num_halfedges() {
            return Err(Error::InvalidHalfedge(h));
        }
        if topol.halfedge_face(h) != Some(f) {
            return Err(Error::InvalidFaceHalfedgeLink(f, h));
        }
    }
    Ok(())
}

impl Topology {
    /// Check the entire connectivity of the mesh.
    ///
    /// Returns an error describing the first problem found, if any.
    pub fn check(&self) -> Result<(), Error> {
        let mut hvisited = vec![false; self.num_halfedges()].into_boxed_slice();
        check_vertices(self, &mut hvisited)?;
        check_halfedges(self, &mut hvisited)?;
        check_faces(self)?;
        Ok(())
    }
}
